// src/audio/wav.rs
// Canonical RIFF/WAVE encoding of a float sample buffer

use super::types::SampleBuffer;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;

/// Encode a sample buffer as a standards-compliant WAV file:
/// 44-byte canonical header followed by interleaved 16-bit PCM.
/// Downstream players validate this header strictly.
pub fn encode_wav(buffer: &SampleBuffer) -> Vec<u8> {
    let channels = buffer.channel_count();
    let sample_rate = buffer.sample_rate;
    let frame_count = buffer.frame_count();
    let data_size = (frame_count * channels as usize * 2) as u32;

    let mut wav = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(data_size + 36).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    let byte_rate = sample_rate * channels as u32 * 2;
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&(channels * 2).to_le_bytes()); // block align
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());

    // Interleaved frames, one sample per channel
    for frame in 0..frame_count {
        for channel in &buffer.channels {
            wav.extend_from_slice(&quantize(channel[frame]).to_le_bytes());
        }
    }

    wav
}

/// Clamp to [-1, 1] and scale to i16. Negative values scale by 32768 and
/// non-negative by 32767, mirroring the decode divisor so a round trip
/// stays within one quantization step.
fn quantize(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0) as i16
    } else {
        (clamped * 32767.0) as i16
    }
}

/// Wrap WAV bytes as a `data:` URI playable with no further network fetch.
pub fn to_data_url(wav: &[u8]) -> String {
    format!("data:audio/wav;base64,{}", BASE64_STANDARD.encode(wav))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::codec::decode_pcm;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn test_header_layout_mono() {
        let frames = 250usize;
        let buffer = SampleBuffer::new(vec![vec![0.25; frames]], 24000);
        let wav = encode_wav(&buffer);

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32_at(&wav, 4), 36 + 2 * frames as u32);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(u32_at(&wav, 16), 16);
        assert_eq!(u16_at(&wav, 20), 1);
        assert_eq!(u16_at(&wav, 22), 1);
        assert_eq!(u32_at(&wav, 24), 24000);
        assert_eq!(u32_at(&wav, 28), 24000 * 2);
        assert_eq!(u16_at(&wav, 32), 2);
        assert_eq!(u16_at(&wav, 34), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 40), 2 * frames as u32);
        assert_eq!(wav.len(), 44 + 2 * frames);
    }

    #[test]
    fn test_round_trip_within_one_quantization_step() {
        let samples: Vec<f32> = (0..1000)
            .map(|i| ((i as f32) / 500.0 - 1.0) * 0.999)
            .collect();
        let buffer = SampleBuffer::new(vec![samples.clone()], 24000);

        let wav = encode_wav(&buffer);
        let decoded = decode_pcm(&wav[44..], 24000, 1).unwrap();

        for (original, round_tripped) in samples.iter().zip(decoded.channels[0].iter()) {
            assert!(
                (original - round_tripped).abs() <= 1.0 / 32768.0,
                "sample drifted: {} -> {}",
                original,
                round_tripped
            );
        }
    }

    #[test]
    fn test_out_of_range_samples_are_clamped() {
        let buffer = SampleBuffer::new(vec![vec![2.0, -2.0]], 24000);
        let wav = encode_wav(&buffer);

        let first = i16::from_le_bytes([wav[44], wav[45]]);
        let second = i16::from_le_bytes([wav[46], wav[47]]);
        assert_eq!(first, 32767);
        assert_eq!(second, -32768);
    }

    #[test]
    fn test_stereo_frames_are_interleaved() {
        let left = vec![0.5, 0.5];
        let right = vec![-0.5, -0.5];
        let buffer = SampleBuffer::new(vec![left, right], 44100);
        let wav = encode_wav(&buffer);

        assert_eq!(u16_at(&wav, 22), 2);
        assert_eq!(u16_at(&wav, 32), 4); // block align

        let s0 = i16::from_le_bytes([wav[44], wav[45]]);
        let s1 = i16::from_le_bytes([wav[46], wav[47]]);
        assert!(s0 > 0 && s1 < 0, "expected L then R in the first frame");
    }

    #[test]
    fn test_data_url_prefix() {
        let buffer = SampleBuffer::new(vec![vec![0.0; 4]], 24000);
        let url = to_data_url(&encode_wav(&buffer));
        assert!(url.starts_with("data:audio/wav;base64,"));
    }
}
