//! Loading the API key at startup.
//!
//! The key is looked up once, in order: a YAML secrets file, then the `GOOGLE_API_KEY` and
//! `GEMINI_API_KEY` environment variables.  The secrets file looks like:
//!
//! ```yaml
//! GOOGLE_API_KEY: "AIza..."
//! ```
//!
//! `GEMINI_API_KEY` is read too; when both are set, a non-empty `GOOGLE_API_KEY` wins.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::client::API_KEY_ENV_VARS;
use crate::error::{Error, Result};

/// Where the secrets file is looked for when no path is given.
pub const DEFAULT_SECRETS_PATH: &str = ".geminius/secrets.yaml";

/// The banner shown while no API key is configured.
pub const API_KEY_MISSING: &str = "Google API Key not found. Please set it in your secrets file.";

/// The contents of a secrets file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Secrets {
    /// The key under `GOOGLE_API_KEY`.
    #[serde(rename = "GOOGLE_API_KEY", default)]
    pub google_api_key: Option<String>,

    /// The key under `GEMINI_API_KEY`.
    #[serde(rename = "GEMINI_API_KEY", default)]
    pub gemini_api_key: Option<String>,
}

impl Secrets {
    /// Parses secrets from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::configuration(format!("failed to parse secrets: {e}")))
    }

    /// Reads secrets from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "failed to read secrets file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// The first non-empty key, `GOOGLE_API_KEY` before `GEMINI_API_KEY`.
    pub fn api_key(&self) -> Option<&str> {
        [&self.google_api_key, &self.gemini_api_key]
            .into_iter()
            .filter_map(|key| key.as_deref())
            .map(str::trim)
            .find(|key| !key.is_empty())
    }
}

/// Loads the API key.
///
/// If `path` is given the file must be readable; otherwise [`DEFAULT_SECRETS_PATH`] is used when
/// it exists.  Falls back to the environment.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if an explicitly named file cannot be read or parsed, or if no
/// source provides a non-empty key.
pub fn load_api_key(path: Option<&Path>) -> Result<String> {
    let secrets = match path {
        Some(path) => Some(Secrets::from_file(path)?),
        None => {
            let default = PathBuf::from(DEFAULT_SECRETS_PATH);
            if default.is_file() {
                Some(Secrets::from_file(&default)?)
            } else {
                None
            }
        }
    };
    resolve_api_key(secrets.as_ref(), |name| env::var(name).ok())
}

/// Picks the key from the secrets file or, failing that, the first non-empty variable named in
/// [`API_KEY_ENV_VARS`].
pub fn resolve_api_key<F>(secrets: Option<&Secrets>, lookup_env: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = secrets.and_then(Secrets::api_key) {
        return Ok(key.to_string());
    }
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| lookup_env(name))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
        .ok_or_else(|| Error::configuration(API_KEY_MISSING))
}
