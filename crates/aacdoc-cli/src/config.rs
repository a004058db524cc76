//! Configuration
//!
//! Settings are loaded from `aacdoc.toml` in the working directory, or from
//! the file given with `--config`:
//!
//! ```toml
//! [backend]
//! url = "https://aaclearningbackend.azurewebsites.net/api/WebAAC"
//!
//! [llm]
//! asset_model = "gpt-4o-mini"
//! evaluation_model = "o3"
//!
//! [render]
//! font_path = "fonts/NotoSansTC-Regular.otf"
//! font_family = "Noto Sans TC"
//! ```
//!
//! The model API key is never stored in the file; it comes from the
//! environment variable named by `llm.api_key_env`.

use std::fs;
use std::path::{Path, PathBuf};

use aacdoc_client::{
    ModelSelection, DEFAULT_ASSET_MODEL, DEFAULT_BACKEND_URL, DEFAULT_EVALUATION_MODEL,
    DEFAULT_LLM_URL,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default configuration file name
pub const CONFIG_FILE: &str = "aacdoc.toml";

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Learning backend settings
    pub backend: BackendSettings,
    /// Model endpoint settings
    pub llm: LlmSettings,
    /// Rendering settings
    pub render: RenderSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings.
    ///
    /// An explicit path must exist. Without one, `aacdoc.toml` in the
    /// working directory is used when present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

/// Backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendSettings {
    /// Base URL of the learning backend
    pub url: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

/// Model endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmSettings {
    /// OpenAI-compatible base URL
    pub url: String,
    /// Model for the lesson plan and worksheet
    pub asset_model: String,
    /// Model for the evaluation rubric
    pub evaluation_model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_LLM_URL.to_string(),
            asset_model: DEFAULT_ASSET_MODEL.to_string(),
            evaluation_model: DEFAULT_EVALUATION_MODEL.to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl LlmSettings {
    /// Models to use for generation
    pub fn models(&self) -> ModelSelection {
        ModelSelection {
            asset: self.asset_model.clone(),
            evaluation: self.evaluation_model.clone(),
        }
    }

    /// API key from the environment, if set and non-empty
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderSettings {
    /// Font file embedded in PDF output
    pub font_path: Option<PathBuf>,
    /// Family name provided by the font file
    pub font_family: String,
    /// Directory exports are written to
    pub output_dir: PathBuf,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            font_path: None,
            font_family: "Noto Sans TC".to_string(),
            output_dir: PathBuf::from("output"),
        }
    }
}
