//! Channel downmix and sample-rate conversion.
//!
//! The text-to-speech collaborator declares its own output rate (commonly
//! 24 kHz), while the track format is fixed at 16 kHz mono. This module
//! normalises arbitrary decoded audio to that format:
//!
//! 1. [`downmix_to_mono`] — average interleaved channels down to one.
//! 2. [`resample`] — linear-interpolation rate conversion.
//!
//! Linear interpolation is fast and dependency-free; synthesized speech is
//! band-limited well below 8 kHz so the quality loss is inaudible here.

use crate::audio::pcm::PcmBuffer;

// ---------------------------------------------------------------------------
// downmix_to_mono
// ---------------------------------------------------------------------------

/// Mix interleaved multi-channel samples down to mono by averaging frames.
///
/// * `channels == 1` returns the input as an owned `Vec` unchanged.
/// * `channels == 0` returns an empty vector.
pub fn downmix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| {
                    let sum: i32 = frame.iter().map(|&s| i32::from(s)).sum();
                    (sum / n as i32) as i16
                })
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// resample
// ---------------------------------------------------------------------------

/// Resample `buffer` to `target_rate` using linear interpolation.
///
/// A buffer already at the target rate is returned as a clone (no
/// interpolation performed). Empty input stays empty.
pub fn resample(buffer: &PcmBuffer, target_rate: u32) -> PcmBuffer {
    if buffer.sample_rate == target_rate || buffer.samples.is_empty() {
        return PcmBuffer::new(target_rate, buffer.samples.clone());
    }

    let ratio = f64::from(target_rate) / f64::from(buffer.sample_rate);
    let output_len = (buffer.samples.len() as f64 * ratio).round() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 / ratio;
        let idx = src_pos as usize;
        let frac = (src_pos - idx as f64) as f32;

        let sample = if idx + 1 < buffer.samples.len() {
            let a = f32::from(buffer.samples[idx]);
            let b = f32::from(buffer.samples[idx + 1]);
            (a * (1.0 - frac) + b * frac) as i16
        } else if idx < buffer.samples.len() {
            buffer.samples[idx]
        } else {
            0
        };

        output.push(sample);
    }

    PcmBuffer::new(target_rate, output)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::pcm::TRACK_RATE;

    // ---- downmix_to_mono ---------------------------------------------------

    #[test]
    fn downmix_mono_passthrough() {
        let input = vec![1i16, 2, 3];
        assert_eq!(downmix_to_mono(&input, 1), input);
    }

    #[test]
    fn downmix_stereo_averages_frames() {
        let input = vec![1000i16, -1000, 400, 600];
        let out = downmix_to_mono(&input, 2);
        assert_eq!(out, vec![0, 500]);
    }

    #[test]
    fn downmix_zero_channels_is_empty() {
        assert!(downmix_to_mono(&[1, 2], 0).is_empty());
    }

    // ---- resample ----------------------------------------------------------

    #[test]
    fn resample_same_rate_is_noop() {
        let buf = PcmBuffer::new(TRACK_RATE, vec![5i16; 160]);
        let out = resample(&buf, TRACK_RATE);
        assert_eq!(out, buf);
    }

    #[test]
    fn resample_24k_to_16k_duration_preserved() {
        // 24 000 samples @ 24 kHz = 1 s → 16 000 samples @ 16 kHz.
        let buf = PcmBuffer::new(24_000, vec![0i16; 24_000]);
        let out = resample(&buf, TRACK_RATE);
        assert_eq!(out.samples.len(), 16_000);
        assert_eq!(out.duration_ms(), 1000);
    }

    #[test]
    fn resample_preserves_dc_level() {
        let buf = PcmBuffer::new(48_000, vec![500i16; 4_800]);
        let out = resample(&buf, TRACK_RATE);
        assert!(out.samples.iter().all(|&s| (s - 500).abs() <= 1));
    }

    #[test]
    fn resample_empty_stays_empty() {
        let buf = PcmBuffer::new(24_000, Vec::new());
        assert!(resample(&buf, TRACK_RATE).samples.is_empty());
    }

    #[test]
    fn resample_upsamples_too() {
        let buf = PcmBuffer::new(8_000, vec![0i16; 80]); // 10 ms
        let out = resample(&buf, TRACK_RATE);
        assert_eq!(out.samples.len(), 160);
    }
}
