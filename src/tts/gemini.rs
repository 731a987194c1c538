// src/tts/gemini.rs
// Gemini Native Audio TTS Adapter

use super::{RawAudio, TtsAdapter, TtsError, VoiceRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const PRIMARY_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const FALLBACK_TTS_MODEL: &str = "gemini-2.5-pro-preview-tts";
const TIMEOUT_SECS: u64 = 60;

// Gemini native audio is raw PCM with no header; rate and layout are fixed
// by the API, not announced per response.
const OUTPUT_SAMPLE_RATE_HZ: u32 = 24_000;
const OUTPUT_CHANNELS: u16 = 1;

#[derive(Serialize)]
struct GenerateRequest {
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
    #[serde(rename = "responseModalities")]
    response_modalities: Vec<String>,
    #[serde(rename = "speechConfig")]
    speech_config: SpeechConfig,
}

#[derive(Serialize)]
struct SpeechConfig {
    #[serde(rename = "voiceConfig")]
    voice_config: VoiceConfig,
}

#[derive(Serialize)]
struct VoiceConfig {
    #[serde(rename = "prebuiltVoiceConfig")]
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Serialize)]
struct PrebuiltVoiceConfig {
    #[serde(rename = "voiceName")]
    voice_name: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
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
    #[serde(rename = "inlineData", default)]
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct InlineData {
    data: String,
}

pub struct GeminiTts {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiTts {
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

    /// Arabic delivery directive wrapping the script, as the studio's
    /// prompt contract expects.
    fn directive(request: &VoiceRequest) -> String {
        format!(
            "الأداء المطلوب: {}. النص المراد تسجيله: \"{}\"",
            request.performance_note, request.text
        )
    }
}

#[async_trait]
impl TtsAdapter for GeminiTts {
    async fn synthesize(&self, request: &VoiceRequest) -> Result<RawAudio, TtsError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE, self.model, self.api_key
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Self::directive(request),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: request.voice.as_str().to_string(),
                        },
                    },
                },
            },
        };

        tracing::info!(
            "Gemini TTS [{}]: synthesizing {} chars as {}",
            self.model,
            request.text.len(),
            request.voice.as_str()
        );

        let response = self.client.post(&url).json(&body).send().await;

        match response {
            Ok(resp) => {
                let status = resp.status();

                if status.is_success() {
                    let parsed: GenerateResponse = resp
                        .json()
                        .await
                        .map_err(|e| TtsError::ProviderError(format!("Gemini parse: {}", e)))?;

                    let data = parsed
                        .candidates
                        .into_iter()
                        .next()
                        .and_then(|c| {
                            c.content.parts.into_iter().find_map(|p| p.inline_data)
                        })
                        .map(|d| d.data)
                        .filter(|d| !d.is_empty())
                        .ok_or(TtsError::NoAudioData)?;

                    Ok(RawAudio {
                        base64_pcm: data,
                        sample_rate: OUTPUT_SAMPLE_RATE_HZ,
                        channels: OUTPUT_CHANNELS,
                    })
                } else if status.as_u16() == 401 {
                    Err(TtsError::AuthenticationError)
                } else if status.as_u16() == 429 {
                    Err(TtsError::RateLimitError)
                } else {
                    // Keep the body: quota pressure sometimes arrives as a
                    // non-429 status whose message names the exceeded limit.
                    let error_text = resp.text().await.unwrap_or_default();
                    Err(TtsError::ProviderError(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )))
                }
            }
            Err(e) => {
                if e.is_timeout() {
                    Err(TtsError::TimeoutError)
                } else {
                    Err(TtsError::NetworkError(e.to_string()))
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.model
    }
}
