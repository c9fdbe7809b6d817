//! Summarizer backends: an optional rewrite step for route explanations.
//!
//! The rule-based sentence is always produced first; a summarizer only gets to
//! rewrite it. Every implementation may fail, and callers are expected to fall
//! back to the input sentence when it does (see [`crate::explain::RouteExplainer`]).
//!
//! There is no process-wide cached model. The serving layer owns a
//! [`LazySummarizer`] that builds the real backend on first use.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::summarizer::SummarizerConfig;

/// Upper bound on summarizer output, in characters.
pub const MAX_SUMMARY_CHARS: usize = 160;

const HF_INFERENCE_BASE: &str = "https://api-inference.huggingface.co/models";

/// Env override used by tests and local runs: `mock` or `error`.
pub const ENV_SUMMARIZER_TEST_MODE: &str = "SUMMARIZER_TEST_MODE";

/// Rewrites an explanation sentence into a (usually shorter) summary.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
    /// Backend name for logs and diagnostics.
    fn name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynSummarizer = Arc<dyn Summarizer>;

/// Factory: build a backend according to config and environment.
///
/// * `SUMMARIZER_TEST_MODE=mock` → [`MockSummarizer`].
/// * `SUMMARIZER_TEST_MODE=error` → [`FailingSummarizer`].
/// * `enabled == false` → [`DisabledSummarizer`].
/// * otherwise the configured provider.
pub fn build_summarizer(config: &SummarizerConfig) -> Result<DynSummarizer> {
    match std::env::var(ENV_SUMMARIZER_TEST_MODE).as_deref() {
        Ok("mock") => return Ok(Arc::new(MockSummarizer)),
        Ok("error") => return Ok(Arc::new(FailingSummarizer)),
        _ => {}
    }

    if !config.enabled {
        return Ok(Arc::new(DisabledSummarizer));
    }

    match config.provider.as_str() {
        "huggingface" | "hf" => Ok(Arc::new(HuggingFaceSummarizer::new(config)?)),
        "mock" => Ok(Arc::new(MockSummarizer)),
        other => bail!("unsupported summarizer provider: {other}"),
    }
}

// ------------------------------------------------------------
// Trivial backends
// ------------------------------------------------------------

/// Always fails; used when the alternate backend is switched off.
pub struct DisabledSummarizer;

#[async_trait::async_trait]
impl Summarizer for DisabledSummarizer {
    async fn summarize(&self, _text: &str) -> Result<String> {
        Err(anyhow!("summarizer disabled"))
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Deterministic rewrite for tests and offline runs.
pub struct MockSummarizer;

#[async_trait::async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        Ok(sanitize_summary(&format!("Summary: {text}")))
    }
    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Fails on every call. Exercises the fallback path end to end.
pub struct FailingSummarizer;

#[async_trait::async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize(&self, _text: &str) -> Result<String> {
        Err(anyhow!("summarizer backend error (forced)"))
    }
    fn name(&self) -> &'static str {
        "failing"
    }
}

// ------------------------------------------------------------
// Hugging Face inference API
// ------------------------------------------------------------

/// Summarization through the Hugging Face inference API (default model `t5-small`).
pub struct HuggingFaceSummarizer {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_length: u32,
    min_length: u32,
}

#[derive(Serialize)]
struct HfRequest<'a> {
    inputs: &'a str,
    parameters: HfParameters,
}

#[derive(Serialize)]
struct HfParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

#[derive(Deserialize)]
struct HfSummary {
    summary_text: Option<String>,
}

impl HuggingFaceSummarizer {
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("pathguard/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .context("building summarizer http client")?;
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("{HF_INFERENCE_BASE}/{}", config.model));
        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key.clone(),
            max_length: config.max_length,
            min_length: config.min_length,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        let req = HfRequest {
            inputs: text,
            parameters: HfParameters {
                max_length: self.max_length,
                min_length: self.min_length,
                do_sample: false,
            },
        };

        let mut builder = self.http.post(&self.endpoint).json(&req);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let resp = builder.send().await.context("summarizer request")?;
        let status = resp.status();
        if !status.is_success() {
            bail!("summarizer returned HTTP {status}");
        }

        let body: Vec<HfSummary> = resp.json().await.context("summarizer response body")?;
        let raw = body
            .into_iter()
            .next()
            .and_then(|s| s.summary_text)
            .ok_or_else(|| anyhow!("summarizer returned no summary_text"))?;

        let cleaned = sanitize_summary(&raw);
        if cleaned.is_empty() {
            bail!("summarizer returned an empty summary");
        }
        debug!(chars = cleaned.chars().count(), "summarizer produced summary");
        Ok(cleaned)
    }
    fn name(&self) -> &'static str {
        "huggingface"
    }
}

// ------------------------------------------------------------
// Lazily initialized handle
// ------------------------------------------------------------

type Factory = dyn Fn() -> Result<DynSummarizer> + Send + Sync;

/// Builds its backend on first use and keeps it for the lifetime of the owner.
///
/// A failed initialization is not cached: the next call tries again.
pub struct LazySummarizer {
    factory: Box<Factory>,
    cell: OnceCell<DynSummarizer>,
}

impl LazySummarizer {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<DynSummarizer> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            cell: OnceCell::new(),
        }
    }

    /// Handle that builds from `config` on first use.
    pub fn from_config(config: SummarizerConfig) -> Self {
        Self::new(move || build_summarizer(&config))
    }

    /// Handle around an already constructed backend.
    pub fn ready(inner: DynSummarizer) -> Self {
        Self {
            factory: Box::new(|| -> Result<DynSummarizer> {
                Err(anyhow!("summarizer already initialized"))
            }),
            cell: OnceCell::from(inner),
        }
    }

    pub async fn get(&self) -> Result<&DynSummarizer> {
        self.cell
            .get_or_try_init(|| async { (self.factory)() })
            .await
            .context("initializing summarizer")
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

#[async_trait::async_trait]
impl Summarizer for LazySummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        let inner = self.get().await?;
        inner.summarize(text).await
    }
    fn name(&self) -> &'static str {
        self.cell.get().map(|s| s.name()).unwrap_or("lazy")
    }
}

// ------------------------------------------------------------
// Sanitization
// ------------------------------------------------------------

/// Single line, collapsed whitespace, at most [`MAX_SUMMARY_CHARS`] characters.
pub fn sanitize_summary(input: &str) -> String {
    let mut out = String::with_capacity(MAX_SUMMARY_CHARS);
    let mut count = 0usize;
    let mut prev_space = false;
    for ch in input.chars() {
        let c = if ch.is_whitespace() || ch.is_control() {
            ' '
        } else {
            ch
        };
        if c == ' ' {
            if !prev_space && !out.is_empty() {
                out.push(' ');
                count += 1;
            }
            prev_space = true;
        } else {
            out.push(c);
            count += 1;
            prev_space = false;
        }
        if count >= MAX_SUMMARY_CHARS {
            break;
        }
    }
    out.trim().to_string()
}
