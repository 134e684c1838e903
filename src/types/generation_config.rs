use serde::{Deserialize, Serialize};

/// Sampling and length controls for a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Nucleus sampling cutoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Top-k sampling limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    /// Maximum number of tokens in the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    /// Sequences that stop generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

impl GenerationConfig {
    /// Returns true when nothing is set, in which case the field is left off the request.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_fields() {
        let config = GenerationConfig::default()
            .with_temperature(Some(0.5))
            .with_max_output_tokens(Some(256));
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"temperature":0.5,"maxOutputTokens":256}"#);
    }

    #[test]
    fn default_is_empty() {
        assert!(GenerationConfig::default().is_empty());
        assert!(!GenerationConfig::default().with_temperature(Some(1.0)).is_empty());
    }
}
