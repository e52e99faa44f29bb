//! Mono 16-bit PCM buffers with millisecond-exact duration arithmetic.
//!
//! Everything downstream of extraction works on [`PcmBuffer`]s. The pipeline
//! normalises to [`TRACK_RATE`] (16 kHz mono — the transcription
//! collaborator's required input format, and at 16 kHz one millisecond is
//! exactly 16 samples, so window durations are sample-exact).

/// The fixed track sample rate: mono 16 kHz, 16-bit linear PCM.
pub const TRACK_RATE: u32 = 16_000;

// ---------------------------------------------------------------------------
// PcmBuffer
// ---------------------------------------------------------------------------

/// A mono buffer of signed 16-bit samples at a known sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    /// Samples per second.
    pub sample_rate: u32,
    /// Interleaving-free mono samples.
    pub samples: Vec<i16>,
}

impl PcmBuffer {
    /// Wrap existing samples.
    pub fn new(sample_rate: u32, samples: Vec<i16>) -> Self {
        Self {
            sample_rate,
            samples,
        }
    }

    /// Pure silence of `duration_ms` at `sample_rate`.
    pub fn silence(duration_ms: u64, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            samples: vec![0i16; samples_for_ms(duration_ms, sample_rate)],
        }
    }

    /// Buffer duration in milliseconds, rounded to nearest.
    pub fn duration_ms(&self) -> u64 {
        let rate = u64::from(self.sample_rate);
        (self.samples.len() as u64 * 1000 + rate / 2) / rate
    }

    /// Append trailing silence until the buffer is `target_ms` long.
    /// A buffer already at or beyond the target is left unchanged.
    pub fn pad_to(&mut self, target_ms: u64) {
        let target = samples_for_ms(target_ms, self.sample_rate);
        if self.samples.len() < target {
            self.samples.resize(target, 0);
        }
    }

    /// Shorten the buffer to `target_ms`, applying a linear fade-out over the
    /// final `fade_ms` so the cut is not an audible click. A buffer already
    /// at or below the target is left unchanged.
    pub fn truncate_with_fade(&mut self, target_ms: u64, fade_ms: u64) {
        let target = samples_for_ms(target_ms, self.sample_rate);
        if self.samples.len() <= target {
            return;
        }
        self.samples.truncate(target);

        let fade = samples_for_ms(fade_ms, self.sample_rate).min(target);
        if fade == 0 {
            return;
        }
        let start = target - fade;
        for i in 0..fade {
            let gain = (fade - i) as f32 / fade as f32;
            let idx = start + i;
            self.samples[idx] = (f32::from(self.samples[idx]) * gain) as i16;
        }
    }

    /// Append all samples of `other`.
    ///
    /// # Panics
    /// Panics on a sample-rate mismatch — concatenation across rates is a
    /// programming error (the synthesizer normalises every segment first).
    pub fn append(&mut self, other: &PcmBuffer) {
        assert_eq!(
            self.sample_rate, other.sample_rate,
            "cannot append {} Hz audio to a {} Hz buffer",
            other.sample_rate, self.sample_rate
        );
        self.samples.extend_from_slice(&other.samples);
    }

    /// Raw little-endian bytes, the form the transcription collaborator
    /// expects (LINEAR16).
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.samples.len() * 2);
        for s in &self.samples {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        bytes
    }
}

/// Number of samples covering `duration_ms` at `sample_rate`, rounded.
pub fn samples_for_ms(duration_ms: u64, sample_rate: u32) -> usize {
    ((duration_ms * u64::from(sample_rate) + 500) / 1000) as usize
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_has_exact_duration() {
        for ms in [1, 500, 1000, 10_500] {
            let buf = PcmBuffer::silence(ms, TRACK_RATE);
            assert_eq!(buf.duration_ms(), ms);
            assert!(buf.samples.iter().all(|&s| s == 0));
        }
    }

    #[test]
    fn one_ms_is_sixteen_samples_at_track_rate() {
        assert_eq!(samples_for_ms(1, TRACK_RATE), 16);
        assert_eq!(samples_for_ms(1000, TRACK_RATE), 16_000);
    }

    #[test]
    fn pad_to_appends_only_silence() {
        let mut buf = PcmBuffer::new(TRACK_RATE, vec![100i16; 8_000]); // 500 ms
        buf.pad_to(1000);
        assert_eq!(buf.duration_ms(), 1000);
        // Original content untouched, remainder silent.
        assert!(buf.samples[..8_000].iter().all(|&s| s == 100));
        assert!(buf.samples[8_000..].iter().all(|&s| s == 0));
    }

    #[test]
    fn pad_to_never_shortens() {
        let mut buf = PcmBuffer::new(TRACK_RATE, vec![1i16; 32_000]); // 2 s
        buf.pad_to(1000);
        assert_eq!(buf.duration_ms(), 2000);
    }

    #[test]
    fn truncate_with_fade_hits_target_and_fades() {
        let mut buf = PcmBuffer::new(TRACK_RATE, vec![10_000i16; 32_000]); // 2 s
        buf.truncate_with_fade(1000, 10);
        assert_eq!(buf.duration_ms(), 1000);
        // Final sample is nearly silent, a sample before the fade is not.
        assert!(buf.samples.last().unwrap().abs() < 10_000 / 10);
        assert_eq!(buf.samples[15_000], 10_000);
    }

    #[test]
    fn truncate_is_noop_when_already_short_enough() {
        let mut buf = PcmBuffer::new(TRACK_RATE, vec![5i16; 8_000]);
        let before = buf.clone();
        buf.truncate_with_fade(1000, 10);
        assert_eq!(buf, before);
    }

    #[test]
    fn append_concatenates_durations() {
        let mut a = PcmBuffer::silence(400, TRACK_RATE);
        let b = PcmBuffer::silence(600, TRACK_RATE);
        a.append(&b);
        assert_eq!(a.duration_ms(), 1000);
    }

    #[test]
    #[should_panic(expected = "cannot append")]
    fn append_rejects_rate_mismatch() {
        let mut a = PcmBuffer::silence(100, TRACK_RATE);
        let b = PcmBuffer::silence(100, 24_000);
        a.append(&b);
    }

    #[test]
    fn le_bytes_are_little_endian_pairs() {
        let buf = PcmBuffer::new(TRACK_RATE, vec![0x0102i16, -1]);
        assert_eq!(buf.to_le_bytes(), vec![0x02, 0x01, 0xFF, 0xFF]);
    }
}
