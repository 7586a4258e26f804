//! WAV encoding for synthesized speech.
//!
//! The speech model returns raw 16-bit little-endian mono PCM. Clips are
//! wrapped in a WAV container and carried around as
//! `data:audio/wav;base64,…` URIs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use clarity_domain::AudioRef;
use std::io::Cursor;
use thiserror::Error;

/// Sample rate used when the model does not report one
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

#[derive(Error, Debug)]
pub enum AudioEncodingError {
    #[error("Not a base64 data URI")]
    NotDataUri,

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("WAV encoding error: {0}")]
    Wav(#[from] hound::Error),

    #[error("PCM data has an odd number of bytes ({0})")]
    OddLength(usize),
}

/// Sample rate from a mime type such as `audio/L16;codec=pcm;rate=24000`
pub fn pcm_sample_rate(mime_type: &str) -> u32 {
    mime_type
        .split(';')
        .filter_map(|param| param.trim().strip_prefix("rate="))
        .find_map(|rate| rate.parse().ok())
        .unwrap_or(DEFAULT_SAMPLE_RATE)
}

/// Wrap 16-bit little-endian mono PCM in a WAV container
pub fn pcm_to_wav(pcm: &[u8], sample_rate: u32) -> Result<Vec<u8>, AudioEncodingError> {
    if pcm.len() % 2 != 0 {
        return Err(AudioEncodingError::OddLength(pcm.len()));
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(pcm.len() + 44));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for frame in pcm.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([frame[0], frame[1]]))?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

pub fn wav_data_uri(wav: &[u8]) -> AudioRef {
    AudioRef::new(format!(
        "data:audio/wav;base64,{}",
        BASE64_STANDARD.encode(wav)
    ))
}

pub fn pcm_to_wav_data_uri(pcm: &[u8], sample_rate: u32) -> Result<AudioRef, AudioEncodingError> {
    Ok(wav_data_uri(&pcm_to_wav(pcm, sample_rate)?))
}

/// Split a base64 `data:` URI into its mime type and decoded bytes
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>), AudioEncodingError> {
    let rest = uri.strip_prefix("data:").ok_or(AudioEncodingError::NotDataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(AudioEncodingError::NotDataUri)?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or(AudioEncodingError::NotDataUri)?;

    let normalized: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64_STANDARD.decode(normalized.as_bytes())?;
    Ok((mime_type.to_string(), bytes))
}
