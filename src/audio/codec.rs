// src/audio/codec.rs
// Raw PCM decoding: base64 payload -> bytes -> float sample buffer

use super::types::{CodecError, SampleBuffer};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;

/// Decode the base64 audio payload of a TTS response into raw bytes.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, CodecError> {
    Ok(BASE64_STANDARD.decode(payload)?)
}

/// Interpret raw bytes as interleaved signed 16-bit little-endian PCM and
/// split them into per-channel float samples.
///
/// Division by 32768.0 is the 16-bit PCM convention: negative full scale
/// maps to exactly -1.0, positive full scale to 32767/32768.
pub fn decode_pcm(
    bytes: &[u8],
    sample_rate: u32,
    channels: u16,
) -> Result<SampleBuffer, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::EmptyAudio);
    }
    if bytes.len() % 2 != 0 {
        return Err(CodecError::OddByteLength(bytes.len()));
    }
    if channels == 0 {
        return Err(CodecError::NoChannels);
    }
    if sample_rate == 0 {
        return Err(CodecError::ZeroSampleRate);
    }

    let total_samples = bytes.len() / 2;
    if total_samples % channels as usize != 0 {
        return Err(CodecError::RaggedFrames {
            samples: total_samples,
            channels,
        });
    }

    let frame_count = total_samples / channels as usize;
    let mut out = vec![Vec::with_capacity(frame_count); channels as usize];

    for (index, pair) in bytes.chunks_exact(2).enumerate() {
        let sample = i16::from_le_bytes([pair[0], pair[1]]);
        out[index % channels as usize].push(sample as f32 / 32768.0);
    }

    Ok(SampleBuffer::new(out, sample_rate))
}
