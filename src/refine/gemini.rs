// src/refine/gemini.rs — Gemini text refinement adapter

use super::types::{RefineError, RefineOptions};
use super::RefineAdapter;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const PRIMARY_REFINE_MODEL: &str = "gemini-3-flash-preview";
pub const FALLBACK_REFINE_MODEL: &str = "gemini-2.5-flash";
const TIMEOUT_SECS: u64 = 20;

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

pub struct GeminiRefiner {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiRefiner {
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            model: model.into(),
        }
    }

    /// Arabic rewrite instruction: rephrase in the requested dialect for
    /// the requested field, add punctuation for breathing and pauses,
    /// output the new text only.
    fn rewrite_prompt(text: &str, options: &RefineOptions) -> String {
        format!(
            "أعد صياغة النص التالي بلهجة {} لمجال {}. أضف علامات ترقيم لضبط النفس والوقفات. أخرج النص الجديد فقط: \"{}\"",
            options.dialect, options.field, text
        )
    }
}

#[async_trait]
impl RefineAdapter for GeminiRefiner {
    async fn refine(&self, text: &str, options: &RefineOptions) -> Result<String, RefineError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Self::rewrite_prompt(text, options),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                max_output_tokens: 2048,
            },
        };

        let response = self.client.post(&url).json(&request).send().await;

        match response {
            Ok(resp) => {
                let status = resp.status();

                if status.is_success() {
                    let gemini: GeminiResponse = resp
                        .json()
                        .await
                        .map_err(|e| RefineError::ProviderError(format!("Gemini parse: {}", e)))?;

                    gemini
                        .candidates
                        .first()
                        .and_then(|c| c.content.parts.first())
                        .map(|p| p.text.clone())
                        .ok_or(RefineError::EmptyText)
                } else if status.as_u16() == 401 {
                    Err(RefineError::AuthenticationError)
                } else if status.as_u16() == 429 {
                    Err(RefineError::RateLimitError)
                } else {
                    let body = resp.text().await.unwrap_or_default();
                    Err(RefineError::ProviderError(format!(
                        "Gemini {}: {}",
                        status, body
                    )))
                }
            }
            Err(e) => {
                if e.is_timeout() {
                    Err(RefineError::TimeoutError)
                } else {
                    Err(RefineError::NetworkError(format!("Gemini: {}", e)))
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.model
    }
}
