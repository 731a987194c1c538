use super::ProviderConfig;
use crate::tts::{GeminiTts, FALLBACK_TTS_MODEL, PRIMARY_TTS_MODEL};
use std::env;

pub fn default_providers_from_env() -> Vec<ProviderConfig> {
    let mut providers = Vec::new();

    if let Some(key) = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()) {
        providers.push(ProviderConfig {
            id: PRIMARY_TTS_MODEL.to_string(),
            priority: 1,
            adapter: Box::new(GeminiTts::new(key.clone(), PRIMARY_TTS_MODEL)),
            max_attempts: 3,
            initial_delay_ms: 1_000,
            timeout_secs: 60,
        });

        providers.push(ProviderConfig {
            id: FALLBACK_TTS_MODEL.to_string(),
            priority: 2,
            adapter: Box::new(GeminiTts::new(key, FALLBACK_TTS_MODEL)),
            max_attempts: 2,
            initial_delay_ms: 2_000,
            timeout_secs: 90,
        });
    }

    providers
}
