//! Audio infrastructure
//!
//! - [`wav`]: PCM to WAV encoding and `data:` URI handling
//! - [`file_output`]: [`AudioOutput`](clarity_application::AudioOutput)
//!   that renders clips to WAV files and optionally hands them to a player

pub mod file_output;
pub mod wav;

pub use file_output::WavFileAudioOutput;
pub use wav::{
    AudioEncodingError, DEFAULT_SAMPLE_RATE, decode_data_uri, pcm_sample_rate, pcm_to_wav,
    pcm_to_wav_data_uri, wav_data_uri,
};
