// Public modules
pub mod backend;
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod render;
pub mod sse;
pub mod types;
pub mod utils;

mod observability;

// Re-exports
pub use backend::{ChatSettings, ConversationHandle, FragmentStream, ModelClient};
pub use client::{Gemini, GeminiChat};
pub use client_logger::ClientLogger;
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
pub use types::*;
