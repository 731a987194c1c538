// src/tts/types.rs
// TTS Types and Error Definitions

use crate::orchestrator::retry::{mentions_quota, Retryable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prebuilt Gemini voices available to the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrebuiltVoice {
    Kore,
    Puck,
    Charon,
    Fenrir,
    Zephyr,
}

impl PrebuiltVoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrebuiltVoice::Kore => "Kore",
            PrebuiltVoice::Puck => "Puck",
            PrebuiltVoice::Charon => "Charon",
            PrebuiltVoice::Fenrir => "Fenrir",
            PrebuiltVoice::Zephyr => "Zephyr",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceType {
    Adult,
    Elder,
    Cartoon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// Map a profile's voice type and gender to the base prebuilt voice the
/// provider is asked to perform. The dialect and delivery style ride in
/// the performance note, not the voice choice.
pub fn base_voice_for(voice_type: VoiceType, gender: Gender) -> PrebuiltVoice {
    if gender == Gender::Female {
        return PrebuiltVoice::Kore;
    }
    match voice_type {
        VoiceType::Elder => PrebuiltVoice::Charon,
        VoiceType::Cartoon => PrebuiltVoice::Kore,
        VoiceType::Adult => PrebuiltVoice::Fenrir,
    }
}

/// One voice-over generation request.
#[derive(Debug, Clone)]
pub struct VoiceRequest {
    /// The script to record, already refined if the caller chose to.
    pub text: String,
    pub voice: PrebuiltVoice,
    /// Free-form Arabic delivery directive: dialect, character, pacing.
    pub performance_note: String,
}

/// Raw audio exactly as the provider returned it: a base64 payload of
/// signed 16-bit little-endian PCM plus the parameters it was produced
/// with. Consumed once by the codec.
#[derive(Debug, Clone)]
pub struct RawAudio {
    pub base64_pcm: String,
    pub sample_rate: u32,
    pub channels: u16,
}

/// TTS error types with rate-limit classification
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    TimeoutError,

    #[error("Authentication failed")]
    AuthenticationError,

    #[error("Rate limit exceeded")]
    RateLimitError,

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("No audio data in provider response")]
    NoAudioData,
}

impl TtsError {
    /// True when the provider is throttling us: either the structured 429
    /// mapped by the adapter, or a payload whose message talks about
    /// quota/limits.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            TtsError::RateLimitError => true,
            TtsError::ProviderError(message) => mentions_quota(message),
            _ => false,
        }
    }
}

impl Retryable for TtsError {
    fn is_rate_limited(&self) -> bool {
        TtsError::is_rate_limited(self)
    }
}
