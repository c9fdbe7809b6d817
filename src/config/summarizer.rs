// src/config/summarizer.rs
use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};
use tracing::{debug, warn};

pub const ENV_HF_API_TOKEN: &str = "HF_API_TOKEN";

fn default_provider() -> String {
    "huggingface".to_string()
}
fn default_model() -> String {
    "t5-small".to_string()
}
fn default_max_length() -> u32 {
    50
}
fn default_min_length() -> u32 {
    10
}
fn default_timeout_ms() -> u64 {
    10_000
}

/// Alternate explanation backend settings, loaded from `config/summarizer.json`
/// (or `.toml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizerConfig {
    #[serde(default)]
    pub enabled: bool,
    /// "huggingface" | "mock" (case-insensitive)
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// "ENV" means: read from HF_API_TOKEN. Empty means anonymous.
    #[serde(default)]
    pub api_key: String,
    /// Full inference URL; defaults to the public endpoint for `model`.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_max_length")]
    pub max_length: u32,
    #[serde(default = "default_min_length")]
    pub min_length: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_provider(),
            model: default_model(),
            api_key: String::new(),
            endpoint: None,
            max_length: default_max_length(),
            min_length: default_min_length(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SummarizerConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading summarizer config from {}", path.display()))?;
        let is_toml = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        let cfg: SummarizerConfig = if is_toml {
            toml::from_str(&data).context("parsing summarizer TOML")?
        } else {
            serde_json::from_str(&data).context("parsing summarizer JSON")?
        };
        cfg.normalized()
    }

    /// Like [`load_from_file`](Self::load_from_file) but never fails: a missing
    /// or broken file yields the disabled default.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no summarizer config, using defaults");
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(error = ?e, "summarizer config unusable, alternate backend disabled");
                Self::default()
            }
        }
    }

    fn normalized(mut self) -> anyhow::Result<Self> {
        self.provider = self.provider.trim().to_lowercase();

        if self.api_key.trim().eq_ignore_ascii_case("env") {
            self.api_key = match env::var(ENV_HF_API_TOKEN) {
                Ok(key) => key,
                // A disabled backend never sends the key
                Err(_) if !self.enabled => String::new(),
                Err(_) => return Err(anyhow!("Missing {ENV_HF_API_TOKEN} env var")),
            };
        }

        if self.model.trim().is_empty() {
            bail!("summarizer model must not be empty");
        }

        // Keep a valid, non-empty length interval
        if self.max_length == 0 {
            self.max_length = default_max_length();
        }
        if self.min_length == 0 {
            self.min_length = 1;
        }
        if self.min_length > self.max_length {
            std::mem::swap(&mut self.min_length, &mut self.max_length);
        }
        if self.timeout_ms == 0 {
            self.timeout_ms = default_timeout_ms();
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_disabled_t5_small() {
        let d = SummarizerConfig::default();
        assert!(!d.enabled);
        assert_eq!(d.provider, "huggingface");
        assert_eq!(d.model, "t5-small");
        assert_eq!((d.min_length, d.max_length), (10, 50));
    }

    #[test]
    fn normalization_fixes_lengths_and_case() {
        let cfg = SummarizerConfig {
            provider: "  Mock ".into(),
            min_length: 80,
            max_length: 20,
            timeout_ms: 0,
            ..SummarizerConfig::default()
        }
        .normalized()
        .unwrap();
        assert_eq!(cfg.provider, "mock");
        assert_eq!((cfg.min_length, cfg.max_length), (20, 80));
        assert_eq!(cfg.timeout_ms, 10_000);
    }

    #[test]
    fn empty_model_is_rejected() {
        let cfg = SummarizerConfig {
            model: " ".into(),
            ..SummarizerConfig::default()
        };
        assert!(cfg.normalized().is_err());
    }
}
