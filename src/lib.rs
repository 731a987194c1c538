pub mod audio;
pub mod orchestrator;
pub mod refine;
pub mod studio;
pub mod tts;

pub use audio::{synthesize_wav, CodecError, SampleBuffer, SynthesizedAudio};
pub use orchestrator::retry::{with_retry, RetryError, RetryPolicy, Retryable};
pub use orchestrator::{OrchestratorError, ProviderConfig, VoiceOrchestrator};
pub use refine::{RefineEngine, RefineOptions};
pub use studio::Studio;
pub use tts::{base_voice_for, Gender, PrebuiltVoice, VoiceRequest, VoiceType};
