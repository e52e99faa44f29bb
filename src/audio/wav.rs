//! WAV decode/encode on top of `hound`.
//!
//! Two producers hand the pipeline WAV data: the ffmpeg extraction step
//! (scratch files on disk) and the text-to-speech collaborator (base64 bytes
//! in the response body). Both land here and come out as a mono
//! [`PcmBuffer`] — any channel count is downmixed, any integer bit depth or
//! float layout is scaled to i16. The sample rate is preserved; rate
//! normalisation is the synthesizer's job.

use std::io::{Cursor, Read};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use thiserror::Error;

use crate::audio::pcm::PcmBuffer;
use crate::audio::resample::downmix_to_mono;

// ---------------------------------------------------------------------------
// WavError
// ---------------------------------------------------------------------------

/// Errors raised while decoding or encoding WAV data.
#[derive(Debug, Error)]
pub enum WavError {
    #[error(transparent)]
    Codec(#[from] hound::Error),

    #[error("failed to read WAV file: {0}")]
    Io(#[from] std::io::Error),

    /// A layout hound can parse but this pipeline cannot use.
    #[error("unsupported WAV layout: {0}")]
    Unsupported(String),
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a WAV file from disk into a mono [`PcmBuffer`].
pub fn read_wav_file(path: &Path) -> Result<PcmBuffer, WavError> {
    let file = std::fs::File::open(path)?;
    decode(WavReader::new(std::io::BufReader::new(file))?)
}

/// Decode in-memory WAV bytes (e.g. a decoded `audioContent` payload).
pub fn read_wav_bytes(bytes: &[u8]) -> Result<PcmBuffer, WavError> {
    decode(WavReader::new(Cursor::new(bytes))?)
}

fn decode<R: Read>(reader: WavReader<R>) -> Result<PcmBuffer, WavError> {
    let spec = reader.spec();
    let interleaved = read_samples_i16(reader, &spec)?;
    let samples = downmix_to_mono(&interleaved, spec.channels);
    Ok(PcmBuffer::new(spec.sample_rate, samples))
}

/// Read all samples, scaled to i16 regardless of the on-disk format.
fn read_samples_i16<R: Read>(
    reader: WavReader<R>,
    spec: &WavSpec,
) -> Result<Vec<i16>, WavError> {
    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(WavError::from),
        (SampleFormat::Int, bits @ 17..=32) => {
            let shift = bits - 16;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| (v >> shift) as i16).map_err(WavError::from))
                .collect()
        }
        (SampleFormat::Int, 8) => reader
            .into_samples::<i8>()
            .map(|s| s.map(|v| i16::from(v) << 8).map_err(WavError::from))
            .collect(),
        (SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .map(|s| {
                s.map(|v| (v.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16)
                    .map_err(WavError::from)
            })
            .collect(),
        (format, bits) => Err(WavError::Unsupported(format!(
            "{format:?} at {bits} bits per sample"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Write `buffer` to `path` as mono 16-bit PCM WAV.
pub fn write_wav_file(path: &Path, buffer: &PcmBuffer) -> Result<(), WavError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &s in &buffer.samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::pcm::TRACK_RATE;
    use tempfile::tempdir;

    fn encode_to_bytes(spec: WavSpec, samples: &[i16]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn file_round_trip_preserves_samples() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let buffer = PcmBuffer::new(TRACK_RATE, vec![0i16, 1000, -1000, i16::MAX]);

        write_wav_file(&path, &buffer).unwrap();
        let decoded = read_wav_file(&path).unwrap();

        assert_eq!(decoded, buffer);
    }

    #[test]
    fn bytes_round_trip_preserves_samples() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 24_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let samples = vec![3i16; 240];
        let bytes = encode_to_bytes(spec, &samples);

        let decoded = read_wav_bytes(&bytes).unwrap();
        assert_eq!(decoded.sample_rate, 24_000);
        assert_eq!(decoded.samples, samples);
    }

    #[test]
    fn stereo_input_is_downmixed() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: TRACK_RATE,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        // Two frames: (1000, -1000) and (400, 600).
        let bytes = encode_to_bytes(spec, &[1000, -1000, 400, 600]);

        let decoded = read_wav_bytes(&bytes).unwrap();
        assert_eq!(decoded.samples, vec![0, 500]);
    }

    #[test]
    fn garbage_bytes_are_a_codec_error() {
        let err = read_wav_bytes(b"not a wav file at all").unwrap_err();
        assert!(matches!(err, WavError::Codec(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_wav_file(Path::new("/nonexistent/never.wav")).unwrap_err();
        assert!(matches!(err, WavError::Io(_)));
    }
}
