// src/refine/mod.rs — refinement trait + failover engine

mod gemini;
mod types;

pub use gemini::{GeminiRefiner, FALLBACK_REFINE_MODEL, PRIMARY_REFINE_MODEL};
pub use types::{RefineError, RefineOptions};

use crate::orchestrator::retry::with_retry;
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_DELAY_MS: u64 = 1_000;

/// Trait for script refinement adapters
#[async_trait]
pub trait RefineAdapter: Send + Sync {
    /// Rewrite the script per the requested dialect and field.
    async fn refine(&self, text: &str, options: &RefineOptions) -> Result<String, RefineError>;

    /// Provider name
    fn name(&self) -> &str;
}

/// Refinement engine with sequential failover across providers; each
/// provider call is wrapped in the quota-aware retry executor.
pub struct RefineEngine {
    providers: Vec<Box<dyn RefineAdapter>>,
}

impl RefineEngine {
    pub fn new(providers: Vec<Box<dyn RefineAdapter>>) -> Self {
        Self { providers }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let mut providers: Vec<Box<dyn RefineAdapter>> = Vec::new();

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                providers.push(Box::new(GeminiRefiner::new(
                    key.clone(),
                    PRIMARY_REFINE_MODEL,
                )));
                providers.push(Box::new(GeminiRefiner::new(key, FALLBACK_REFINE_MODEL)));
                tracing::info!("Refine: Gemini adapters loaded");
            }
        }

        tracing::info!("Refine Engine: {} providers available", providers.len());

        Self::new(providers)
    }

    /// Refine with failover across all providers; returns the cleaned text
    /// and the name of the provider that produced it.
    pub async fn refine(
        &self,
        text: &str,
        options: &RefineOptions,
    ) -> Result<(String, String), RefineError> {
        let mut last_error = RefineError::AllProvidersFailed;

        for provider in &self.providers {
            tracing::info!("Refine: Trying provider '{}'...", provider.name());

            match with_retry(
                || provider.refine(text, options),
                MAX_ATTEMPTS,
                INITIAL_DELAY_MS,
            )
            .await
            {
                Ok(raw) => {
                    let cleaned = clean_refined_text(&raw);
                    if cleaned.is_empty() {
                        tracing::warn!("Refine: '{}' returned empty text", provider.name());
                        last_error = RefineError::EmptyText;
                        continue;
                    }

                    tracing::info!(
                        "Refine: '{}' succeeded ({} chars)",
                        provider.name(),
                        cleaned.len()
                    );
                    return Ok((cleaned, provider.name().to_string()));
                }
                Err(e) => {
                    tracing::warn!("Refine: '{}' failed: {:?}", provider.name(), e);
                    last_error = e.into_inner();
                }
            }
        }

        tracing::error!("Refine: All providers failed");
        Err(last_error)
    }
}

/// Models wrap their output in code fences or quotes despite the
/// output-only instruction; strip the wrapping and collapse whitespace.
pub fn clean_refined_text(text: &str) -> String {
    static FENCE_RE: OnceLock<Regex> = OnceLock::new();
    let re = FENCE_RE
        .get_or_init(|| Regex::new(r"^```[a-zA-Z]*\s*|\s*```$").expect("valid fence regex"));

    let stripped = re.replace_all(text.trim(), "");
    let stripped = stripped
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '«' | '»' | '\u{201C}' | '\u{201D}'));

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_passthrough() {
        assert_eq!(
            clean_refined_text("مرحباً بكم في الاستوديو."),
            "مرحباً بكم في الاستوديو."
        );
    }

    #[test]
    fn test_clean_strips_wrapping_quotes() {
        assert_eq!(clean_refined_text("\"نص مقتبس\""), "نص مقتبس");
        assert_eq!(clean_refined_text("«نص مقتبس»"), "نص مقتبس");
    }

    #[test]
    fn test_clean_strips_code_fence() {
        assert_eq!(clean_refined_text("```text\nالنص الجديد\n```"), "النص الجديد");
    }

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean_refined_text("  سطر   أول \n سطر ثانٍ "), "سطر أول سطر ثانٍ");
    }
}
