//! # Route Explainer
//! Aggregates scored segments into a route score and a one-sentence
//! explanation of the most frequent reason tags.
//!
//! The rule-based path ([`explain`]) is synchronous and infallible. The
//! [`RouteExplainer`] can additionally pass that sentence through a
//! [`Summarizer`](crate::summarizer::Summarizer); any failure or timeout
//! there yields the rule-based sentence unchanged. Backend output is
//! sanitised to a single capped line before it is used.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::segment::{clamp01, round3, ScoredSegment};
use crate::summarizer::{sanitize_summary, DisabledSummarizer, DynSummarizer};

pub const EXPLANATION_PREFIX: &str = "This route's score is influenced by: ";
pub const NO_RISK_FACTORS: &str = "No specific risk factors detected on this toy route.";
/// How many reason tags make it into the sentence.
pub const TOP_REASONS: usize = 3;
pub const DEFAULT_SUMMARIZER_TIMEOUT: Duration = Duration::from_secs(10);

/// Route-level outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Mean segment safety rounded to three decimals; 0.0 for an empty route.
    pub safety_score: f64,
    /// Never empty.
    pub explanation: String,
}

/// Which backend produced the explanation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationSource {
    RuleBased,
    Summarizer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Explained {
    pub result: RouteResult,
    pub source: ExplanationSource,
}

/// Arithmetic mean of segment safety, clamped into `[0.0, 1.0]` and rounded
/// to three decimals. An empty route scores 0.0.
pub fn route_safety_score(segments: &[ScoredSegment]) -> f64 {
    if segments.is_empty() {
        return 0.0;
    }
    let sum: f64 = segments.iter().map(|s| s.safety).sum();
    round3(clamp01(sum / segments.len() as f64))
}

/// Up to `n` reason tags with their occurrence counts, most frequent first.
///
/// Every occurrence counts, including repeats within one segment. Equal
/// counts keep first-encounter order (stable sort).
pub fn top_reasons(segments: &[ScoredSegment], n: usize) -> Vec<(&str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for tag in segments.iter().flat_map(|s| s.reasons.iter()) {
        match index.get(tag.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(tag.as_str(), counts.len());
                counts.push((tag.as_str(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// The rule-based sentence, or [`NO_RISK_FACTORS`] when no segment has a reason.
pub fn rule_based_explanation(segments: &[ScoredSegment]) -> String {
    let top = top_reasons(segments, TOP_REASONS);
    if top.is_empty() {
        return NO_RISK_FACTORS.to_string();
    }
    let bullets = top
        .iter()
        .map(|(tag, count)| format!("{tag} (x{count})"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{EXPLANATION_PREFIX}{bullets}.")
}

/// Rule-based route result. Pure and infallible.
pub fn explain(segments: &[ScoredSegment]) -> RouteResult {
    RouteResult {
        safety_score: route_safety_score(segments),
        explanation: rule_based_explanation(segments),
    }
}

/// Explanation front end with an optional alternate backend.
#[derive(Clone)]
pub struct RouteExplainer {
    summarizer: DynSummarizer,
    timeout: Duration,
}

impl Default for RouteExplainer {
    fn default() -> Self {
        Self::rule_based()
    }
}

impl RouteExplainer {
    pub fn new(summarizer: DynSummarizer) -> Self {
        Self {
            summarizer,
            timeout: DEFAULT_SUMMARIZER_TIMEOUT,
        }
    }

    /// Explainer whose alternate backend is always unavailable.
    pub fn rule_based() -> Self {
        Self::new(Arc::new(DisabledSummarizer))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn explain_route(
        &self,
        segments: &[ScoredSegment],
        use_alternate_backend: bool,
    ) -> RouteResult {
        self.explain_route_detailed(segments, use_alternate_backend)
            .await
            .result
    }

    /// Same as [`explain_route`](Self::explain_route), also reporting which
    /// backend wrote the text.
    pub async fn explain_route_detailed(
        &self,
        segments: &[ScoredSegment],
        use_alternate_backend: bool,
    ) -> Explained {
        counter!("explain_requests_total").increment(1);
        let mut result = explain(segments);

        if !use_alternate_backend {
            return Explained {
                result,
                source: ExplanationSource::RuleBased,
            };
        }

        let outcome = tokio::time::timeout(
            self.timeout,
            self.summarizer.summarize(&result.explanation),
        )
        .await
        .map(|res| res.map(|text| sanitize_summary(&text)));
        // Read after the call: lazy backends only know their name once built
        let backend = self.summarizer.name();

        match outcome {
            Ok(Ok(text)) if !text.is_empty() => {
                counter!("explain_summarizer_used_total").increment(1);
                result.explanation = text;
                Explained {
                    result,
                    source: ExplanationSource::Summarizer,
                }
            }
            Ok(Ok(_)) => {
                warn!(backend, "summarizer returned empty text, using rule-based explanation");
                fallback(result)
            }
            Ok(Err(e)) => {
                warn!(backend, error = ?e, "summarizer failed, using rule-based explanation");
                fallback(result)
            }
            Err(_) => {
                warn!(
                    backend,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "summarizer timed out, using rule-based explanation"
                );
                fallback(result)
            }
        }
    }
}

fn fallback(result: RouteResult) -> Explained {
    counter!("explain_summarizer_fallback_total").increment(1);
    Explained {
        result,
        source: ExplanationSource::RuleBased,
    }
}
