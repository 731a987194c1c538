pub mod codec;
pub mod types;
pub mod wav;

pub use types::{CodecError, SampleBuffer, SynthesizedAudio};

/// Turn the base64 raw-PCM payload of a TTS response into a playable WAV
/// resource plus its duration.
///
/// Pure single-pass pipeline: decode -> build buffer -> encode -> stringify.
/// Any failure means the upstream payload was malformed; callers must not
/// retry it, only the network call that produced it.
pub fn synthesize_wav(
    base64_pcm: &str,
    sample_rate: u32,
    channels: u16,
) -> Result<SynthesizedAudio, CodecError> {
    let bytes = codec::decode_base64(base64_pcm)?;
    let buffer = codec::decode_pcm(&bytes, sample_rate, channels)?;
    let wav = wav::encode_wav(&buffer);

    Ok(SynthesizedAudio {
        data_url: wav::to_data_url(&wav),
        duration_secs: buffer.duration_secs(),
    })
}
