//! Runtime configuration: process environment (optionally seeded from `.env`)
//! plus the summarizer config file.

pub mod summarizer;

use std::path::PathBuf;

pub use summarizer::SummarizerConfig;

pub const ENV_USE_HF: &str = "USE_HF";
pub const ENV_SUMMARIZER_CONFIG_PATH: &str = "PATHGUARD_SUMMARIZER_CONFIG";
pub const DEFAULT_SUMMARIZER_CONFIG_PATH: &str = "config/summarizer.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Route explanations go through the alternate backend when set.
    pub use_alternate_backend: bool,
    /// `USE_HF` as found in the environment, echoed by `/health`.
    pub use_hf_raw: String,
    pub summarizer_config_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            use_alternate_backend: false,
            use_hf_raw: "false".to_string(),
            summarizer_config_path: PathBuf::from(DEFAULT_SUMMARIZER_CONFIG_PATH),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let use_hf_raw = std::env::var(ENV_USE_HF).unwrap_or_else(|_| "false".to_string());
        let use_alternate_backend = use_hf_raw.trim().eq_ignore_ascii_case("true");
        let summarizer_config_path = std::env::var(ENV_SUMMARIZER_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SUMMARIZER_CONFIG_PATH));
        Self {
            use_alternate_backend,
            use_hf_raw,
            summarizer_config_path,
        }
    }

    pub fn summarizer(&self) -> SummarizerConfig {
        SummarizerConfig::load_or_default(&self.summarizer_config_path)
    }
}
