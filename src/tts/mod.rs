// src/tts/mod.rs
// TTS Module - Text-to-Speech Provider Adapters

mod gemini;
mod types;

pub use gemini::{GeminiTts, FALLBACK_TTS_MODEL, PRIMARY_TTS_MODEL};
pub use types::{
    base_voice_for, Gender, PrebuiltVoice, RawAudio, TtsError, VoiceRequest, VoiceType,
};

use async_trait::async_trait;

/// Unified TTS Adapter trait
#[async_trait]
pub trait TtsAdapter: Send + Sync {
    /// Synthesize a voice-over and return the provider's raw PCM payload.
    async fn synthesize(&self, request: &VoiceRequest) -> Result<RawAudio, TtsError>;

    /// Get provider name
    fn name(&self) -> &str;
}
