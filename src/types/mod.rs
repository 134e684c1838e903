// Public modules
pub mod attachment;
pub mod content;
pub mod generate_content_request;
pub mod generate_content_response;
pub mod generation_config;
pub mod message;
pub mod model;
pub mod part;
pub mod role;

// Re-exports
pub use attachment::Attachment;
pub use content::Content;
pub use generate_content_request::GenerateContentRequest;
pub use generate_content_response::{
    Candidate, FinishReason, GenerateContentResponse, PromptFeedback, UsageMetadata,
};
pub use generation_config::GenerationConfig;
pub use message::Message;
pub use model::{KnownModel, Model};
pub use part::{Blob, Part};
pub use role::{ContentRole, Role};
