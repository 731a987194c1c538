// src/studio.rs
// Studio Facade - refinement and generation behind one service

use crate::audio::SynthesizedAudio;
use crate::orchestrator::metrics::Metrics;
use crate::orchestrator::{OrchestratorError, VoiceOrchestrator};
use crate::refine::{RefineEngine, RefineOptions};
use crate::tts::{PrebuiltVoice, VoiceRequest};

/// The voice-over studio: script refinement plus orchestrated generation.
/// Holds no global state; construct one per consumer and inject it.
pub struct Studio {
    refine: RefineEngine,
    voices: VoiceOrchestrator,
}

impl Studio {
    pub fn new(refine: RefineEngine, voices: VoiceOrchestrator) -> Self {
        Self { refine, voices }
    }

    /// Build from environment variables. Honors `.env`; `GEMINI_API_KEY`
    /// enables both refinement and generation.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let studio = Self::new(RefineEngine::from_env(), VoiceOrchestrator::from_env());
        tracing::info!("Majd Studio initialized");
        studio
    }

    /// Rewrite the script in the requested dialect with pause punctuation.
    /// Falls back to the caller's text when every refinement path fails.
    pub async fn preprocess_text(&self, text: &str, options: &RefineOptions) -> String {
        match self.refine.refine(text, options).await {
            Ok((refined, provider)) => {
                tracing::info!("Text refined by '{}'", provider);
                refined
            }
            Err(e) => {
                tracing::warn!("Text refinement failed, using original text: {:?}", e);
                text.to_string()
            }
        }
    }

    /// Generate a voice-over: returns a playable WAV data URL and its
    /// duration in seconds.
    pub async fn generate_voice_over(
        &mut self,
        text: &str,
        voice: PrebuiltVoice,
        performance_note: &str,
    ) -> Result<SynthesizedAudio, OrchestratorError> {
        let request = VoiceRequest {
            text: text.to_string(),
            voice,
            performance_note: performance_note.to_string(),
        };

        self.voices.generate(&request).await
    }

    pub fn metrics(&self) -> &Metrics {
        self.voices.get_metrics()
    }
}
