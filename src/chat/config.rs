//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::path::PathBuf;

use arrrg_derive::CommandLine;

use crate::backend::ChatSettings;
use crate::error::{Error, Result};
use crate::types::{GenerationConfig, Model};

/// Command-line arguments for the geminius-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gemini-2.5-flash)", "MODEL")]
    pub model: Option<String>,

    /// System instruction for the conversation.
    #[arrrg(optional, "System instruction for the conversation", "PROMPT")]
    pub system: Option<String>,

    /// Sampling temperature, parsed by [`parse_temperature`].
    #[arrrg(optional, "Sampling temperature (default: model default)", "TEMP")]
    pub temperature: Option<String>,

    /// Maximum tokens per response.
    #[arrrg(optional, "Max tokens per response (default: model default)", "TOKENS")]
    pub max_output_tokens: Option<u32>,

    /// Path to a YAML secrets file holding GOOGLE_API_KEY.
    #[arrrg(optional, "Secrets file (default: .geminius/secrets.yaml)", "PATH")]
    pub secrets: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

impl ChatArgs {
    /// The `--temperature` value, if one was given and it parses.
    pub fn temperature(&self) -> Result<Option<f32>> {
        self.temperature.as_deref().map(parse_temperature).transpose()
    }
}

/// Parses a sampling temperature in the range Gemini accepts, `0.0..=2.0`.
pub fn parse_temperature(text: &str) -> Result<f32> {
    let temperature: f32 = text.trim().parse().map_err(|_| {
        Error::validation(
            format!("temperature must be a number, got {text:?}"),
            Some("temperature".to_string()),
        )
    })?;
    if !(0.0..=2.0).contains(&temperature) {
        return Err(Error::validation(
            format!("temperature must be between 0 and 2, got {temperature}"),
            Some("temperature".to_string()),
        ));
    }
    Ok(temperature)
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// Optional system instruction.
    pub system_prompt: Option<String>,

    /// Optional sampling temperature.
    pub temperature: Option<f32>,

    /// Optional response token limit.
    pub max_output_tokens: Option<u32>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Explicit secrets file; `None` means the default location.
    pub secrets_path: Option<PathBuf>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-2.5-flash
    /// - Color: enabled
    /// - Everything else: unset
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            system_prompt: None,
            temperature: None,
            max_output_tokens: None,
            use_color: true,
            secrets_path: None,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: String) -> Self {
        self.system_prompt = Some(prompt);
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the response token limit.
    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the secrets file path.
    pub fn with_secrets_path(mut self, path: Option<PathBuf>) -> Self {
        self.secrets_path = path;
        self
    }

    /// The request settings this configuration implies.
    pub fn settings(&self) -> ChatSettings {
        ChatSettings {
            model: self.model.clone(),
            system_instruction: self.system_prompt.clone(),
            generation_config: GenerationConfig::default()
                .with_temperature(self.temperature)
                .with_max_output_tokens(self.max_output_tokens),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    /// An unparseable temperature is left unset; check [`ChatArgs::temperature`] to report it.
    fn from(args: ChatArgs) -> Self {
        let temperature = args.temperature().ok().flatten();
        let model = args.model.map(Model::from).unwrap_or_default();

        ChatConfig {
            model,
            system_prompt: args.system,
            temperature,
            max_output_tokens: args.max_output_tokens,
            use_color: !args.no_color,
            secrets_path: args.secrets.map(PathBuf::from),
        }
    }
}
