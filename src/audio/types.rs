// src/audio/types.rs
// Audio Types and Codec Error Definitions

use serde::Serialize;
use thiserror::Error;

/// Decoded audio held as per-channel float samples in [-1.0, 1.0].
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
        }
    }

    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Samples per channel. All channels hold the same length.
    pub fn frame_count(&self) -> usize {
        self.channels.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f32 / self.sample_rate as f32
    }
}

/// A playable voice-over clip, ready for an audio element or download link.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizedAudio {
    /// `data:audio/wav;base64,...`, playable with no further fetch.
    pub data_url: String,
    pub duration_secs: f32,
}

/// Codec errors. All of these are fatal: they mean the upstream payload
/// violated the PCM contract, not that the operation should be retried.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Audio payload is empty")]
    EmptyAudio,

    #[error("PCM payload has odd byte length ({0}), expected 2 bytes per sample")]
    OddByteLength(usize),

    #[error("Channel count must be at least 1")]
    NoChannels,

    #[error("Sample rate must be non-zero")]
    ZeroSampleRate,

    #[error("{samples} samples do not divide evenly into {channels} channels")]
    RaggedFrames { samples: usize, channels: u16 },
}
