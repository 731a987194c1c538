use crate::audio::{self, CodecError, SynthesizedAudio};
use crate::tts::{RawAudio, TtsAdapter, TtsError, VoiceRequest};
use std::collections::HashMap;
use std::time::Duration;

use self::cooldown::QuotaCooldown;
use self::metrics::Metrics;
use self::provider_registry::default_providers_from_env;
use self::retry::{with_retry, RetryError};

pub mod cooldown;
pub mod metrics;
pub mod provider_registry;
pub mod retry;

const COOLDOWN_WINDOW: Duration = Duration::from_secs(600);

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("All providers failed")]
    AllProvidersFailed(Vec<(String, TtsError)>),

    #[error("No providers available")]
    NoProvidersAvailable,

    #[error("Audio decode failed: {0}")]
    Codec(#[from] CodecError),
}

pub struct ProviderConfig {
    pub id: String,
    pub priority: u8,
    pub adapter: Box<dyn TtsAdapter + Send + Sync>,
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub timeout_secs: u64,
}

/// Walks an ordered list of TTS models, wrapping each attempt in the
/// quota-aware retry executor, and feeds the first successful payload
/// through the WAV codec. Models that burned their whole retry budget on
/// quota errors are skipped until their cooldown elapses.
pub struct VoiceOrchestrator {
    providers: Vec<ProviderConfig>,
    cooldowns: HashMap<String, QuotaCooldown>,
    metrics: Metrics,
}

impl VoiceOrchestrator {
    pub fn new(mut providers: Vec<ProviderConfig>) -> Self {
        providers.sort_by_key(|p| p.priority);

        let mut cooldowns = HashMap::new();
        for provider in &providers {
            cooldowns.insert(provider.id.clone(), QuotaCooldown::new(COOLDOWN_WINDOW));
        }

        Self {
            providers,
            cooldowns,
            metrics: Metrics::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(default_providers_from_env())
    }

    pub async fn generate(
        &mut self,
        request: &VoiceRequest,
    ) -> Result<SynthesizedAudio, OrchestratorError> {
        if self.providers.is_empty() {
            return Err(OrchestratorError::NoProvidersAvailable);
        }

        let mut all_errors = Vec::new();

        for provider in &self.providers {
            let allowed = {
                let gate = self
                    .cooldowns
                    .get_mut(&provider.id)
                    .expect("Cooldown gate missing");
                gate.is_available()
            };

            if !allowed {
                tracing::warn!("Provider {} skipped: quota cooldown active", provider.id);
                all_errors.push((
                    provider.id.clone(),
                    TtsError::ProviderError("Quota cooldown active".to_string()),
                ));
                continue;
            }

            tracing::info!(
                "Attempting provider: {} (priority {})",
                provider.id,
                provider.priority
            );

            let outcome = with_retry(
                || Self::try_provider(provider, request),
                provider.max_attempts,
                provider.initial_delay_ms,
            )
            .await;

            match outcome {
                Ok(raw) => {
                    let audio = match audio::synthesize_wav(
                        &raw.base64_pcm,
                        raw.sample_rate,
                        raw.channels,
                    ) {
                        Ok(audio) => audio,
                        Err(e) => {
                            // A corrupt payload is an upstream contract
                            // violation, not a transient condition; do not
                            // fall through to another model.
                            self.metrics.record_failure(&provider.id);
                            return Err(OrchestratorError::Codec(e));
                        }
                    };

                    tracing::info!(
                        "Provider {} succeeded: {:.1}s of audio",
                        provider.id,
                        audio.duration_secs
                    );

                    if let Some(gate) = self.cooldowns.get_mut(&provider.id) {
                        gate.note_success();
                    }
                    self.metrics.record_success(&provider.id, audio.duration_secs);
                    return Ok(audio);
                }
                Err(RetryError::QuotaExhausted { attempts, last }) => {
                    tracing::warn!(
                        "Provider {} exhausted {} attempts on quota, trying fallback: {:?}",
                        provider.id,
                        attempts,
                        last
                    );

                    if let Some(gate) = self.cooldowns.get_mut(&provider.id) {
                        gate.note_quota_exhausted();
                    }
                    self.metrics.record_failure(&provider.id);
                    all_errors.push((provider.id.clone(), last));
                }
                Err(RetryError::Fatal(e)) => {
                    tracing::warn!("Provider {} failed: {:?}, trying fallback...", provider.id, e);

                    self.metrics.record_failure(&provider.id);
                    all_errors.push((provider.id.clone(), e));
                }
            }
        }

        tracing::error!("All providers failed: {:?}", all_errors);
        Err(OrchestratorError::AllProvidersFailed(all_errors))
    }

    pub fn get_metrics(&self) -> &Metrics {
        &self.metrics
    }

    async fn try_provider(
        provider: &ProviderConfig,
        request: &VoiceRequest,
    ) -> Result<RawAudio, TtsError> {
        let timeout = Duration::from_secs(provider.timeout_secs);

        match tokio::time::timeout(timeout, provider.adapter.synthesize(request)).await {
            Ok(result) => result,
            Err(_) => Err(TtsError::TimeoutError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tts::PrebuiltVoice;
    use async_trait::async_trait;
    use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
    use base64::Engine as _;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct ScriptedAdapter {
        id: &'static str,
        calls: Arc<AtomicU32>,
        failures_before_success: u32,
        error: fn() -> TtsError,
        payload: String,
    }

    // 2400 frames at 24 kHz = 0.1s of audio
    fn valid_payload() -> String {
        let samples = vec![500i16; 2400];
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        BASE64_STANDARD.encode(bytes)
    }

    #[async_trait]
    impl TtsAdapter for ScriptedAdapter {
        async fn synthesize(&self, _request: &VoiceRequest) -> Result<RawAudio, TtsError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures_before_success {
                Err((self.error)())
            } else {
                Ok(RawAudio {
                    base64_pcm: self.payload.clone(),
                    sample_rate: 24000,
                    channels: 1,
                })
            }
        }

        fn name(&self) -> &str {
            self.id
        }
    }

    fn provider(id: &'static str, priority: u8, adapter: ScriptedAdapter) -> ProviderConfig {
        ProviderConfig {
            id: id.to_string(),
            priority,
            adapter: Box::new(adapter),
            max_attempts: 2,
            initial_delay_ms: 1,
            timeout_secs: 5,
        }
    }

    fn adapter(
        id: &'static str,
        calls: &Arc<AtomicU32>,
        failures_before_success: u32,
        error: fn() -> TtsError,
    ) -> ScriptedAdapter {
        ScriptedAdapter {
            id,
            calls: calls.clone(),
            failures_before_success,
            error,
            payload: valid_payload(),
        }
    }

    fn request() -> VoiceRequest {
        VoiceRequest {
            text: "مرحبا بكم".to_string(),
            voice: PrebuiltVoice::Fenrir,
            performance_note: "وثائقي هادئ".to_string(),
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let primary_calls = Arc::new(AtomicU32::new(0));
        let fallback_calls = Arc::new(AtomicU32::new(0));

        let mut orchestrator = VoiceOrchestrator::new(vec![
            provider(
                "primary",
                1,
                adapter("primary", &primary_calls, 0, || TtsError::RateLimitError),
            ),
            provider(
                "fallback",
                2,
                adapter("fallback", &fallback_calls, 0, || TtsError::RateLimitError),
            ),
        ]);

        let audio = orchestrator.generate(&request()).await.unwrap();

        assert!((audio.duration_secs - 0.1).abs() < 1e-3);
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
        assert_eq!(orchestrator.get_metrics().get_success_count("primary"), 1);
    }

    #[tokio::test]
    async fn test_fatal_error_cascades_without_retry() {
        let primary_calls = Arc::new(AtomicU32::new(0));
        let fallback_calls = Arc::new(AtomicU32::new(0));

        let mut orchestrator = VoiceOrchestrator::new(vec![
            provider(
                "primary",
                1,
                adapter("primary", &primary_calls, u32::MAX, || {
                    TtsError::AuthenticationError
                }),
            ),
            provider(
                "fallback",
                2,
                adapter("fallback", &fallback_calls, 0, || TtsError::RateLimitError),
            ),
        ]);

        let audio = orchestrator.generate(&request()).await.unwrap();

        // Auth failures are not retried, only cascaded past.
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
        assert!((audio.duration_secs - 0.1).abs() < 1e-3);
        assert_eq!(orchestrator.get_metrics().get_failure_count("primary"), 1);
    }

    #[tokio::test]
    async fn test_quota_exhaustion_cools_provider_down() {
        let primary_calls = Arc::new(AtomicU32::new(0));
        let fallback_calls = Arc::new(AtomicU32::new(0));

        let mut orchestrator = VoiceOrchestrator::new(vec![
            provider(
                "primary",
                1,
                adapter("primary", &primary_calls, u32::MAX, || {
                    TtsError::RateLimitError
                }),
            ),
            provider(
                "fallback",
                2,
                adapter("fallback", &fallback_calls, 0, || TtsError::RateLimitError),
            ),
        ]);

        orchestrator.generate(&request()).await.unwrap();
        assert_eq!(primary_calls.load(Ordering::SeqCst), 2); // full retry budget
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);

        // Second request: primary is cooling, fallback serves directly.
        orchestrator.generate(&request()).await.unwrap();
        assert_eq!(primary_calls.load(Ordering::SeqCst), 2);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_all_providers_failing_aggregates_errors() {
        let primary_calls = Arc::new(AtomicU32::new(0));
        let fallback_calls = Arc::new(AtomicU32::new(0));

        let mut orchestrator = VoiceOrchestrator::new(vec![
            provider(
                "primary",
                1,
                adapter("primary", &primary_calls, u32::MAX, || {
                    TtsError::AuthenticationError
                }),
            ),
            provider(
                "fallback",
                2,
                adapter("fallback", &fallback_calls, u32::MAX, || {
                    TtsError::NetworkError("connection reset".to_string())
                }),
            ),
        ]);

        match orchestrator.generate(&request()).await {
            Err(OrchestratorError::AllProvidersFailed(errors)) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].0, "primary");
                assert_eq!(errors[1].0, "fallback");
            }
            other => panic!("unexpected result: {:?}", other.map(|a| a.duration_secs)),
        }
    }

    #[tokio::test]
    async fn test_no_providers_available() {
        let mut orchestrator = VoiceOrchestrator::new(Vec::new());
        assert!(matches!(
            orchestrator.generate(&request()).await,
            Err(OrchestratorError::NoProvidersAvailable)
        ));
    }

    #[tokio::test]
    async fn test_corrupt_payload_aborts_cascade() {
        let primary_calls = Arc::new(AtomicU32::new(0));
        let fallback_calls = Arc::new(AtomicU32::new(0));

        let mut corrupt = adapter("primary", &primary_calls, 0, || TtsError::RateLimitError);
        corrupt.payload = "not-valid-base64!!".to_string();

        let mut orchestrator = VoiceOrchestrator::new(vec![
            provider("primary", 1, corrupt),
            provider(
                "fallback",
                2,
                adapter("fallback", &fallback_calls, 0, || TtsError::RateLimitError),
            ),
        ]);

        assert!(matches!(
            orchestrator.generate(&request()).await,
            Err(OrchestratorError::Codec(_))
        ));
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }
}
