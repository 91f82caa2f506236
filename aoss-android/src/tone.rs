/// Tone whose pitch follows the tracked distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSynth {
    pub sample_rate: u32,
    pub duration_secs: u32,
    /// Lower bound on the frequency, in Hz
    pub min_frequency: f64,
}

impl Default for ToneSynth {
    fn default() -> Self {
        Self {
            sample_rate: 10_000,
            duration_secs: 2,
            min_frequency: 100.0,
        }
    }
}

impl ToneSynth {
    pub fn sample_count(&self) -> usize {
        (self.sample_rate * self.duration_secs) as usize
    }

    pub fn frequency(&self, distance: f64) -> f64 {
        distance.max(self.min_frequency)
    }

    /// Samples of `tan(2 pi i f / rate)`, clipped to full scale.
    /// The first sample is silent.
    pub fn samples(&self, distance: f64) -> Vec<i16> {
        let freq = self.frequency(distance);
        let period = self.sample_rate as f64 / freq;

        let mut samples = vec![0i16; self.sample_count()];
        for (i, sample) in samples.iter_mut().enumerate().skip(1) {
            let value = (2.0 * std::f64::consts::PI * i as f64 / period).tan();
            *sample = (value.clamp(-1.0, 1.0) * i16::MAX as f64) as i16;
        }
        samples
    }

    /// 16-bit little-endian mono PCM
    pub fn pcm(&self, distance: f64) -> Vec<u8> {
        self.samples(distance)
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_is_two_seconds() {
        let synth = ToneSynth::default();
        assert_eq!(synth.sample_count(), 20_000);
        assert_eq!(synth.pcm(250.0).len(), 40_000);
    }

    #[test]
    fn test_frequency_floor() {
        let synth = ToneSynth::default();
        assert_eq!(synth.frequency(-1.0), 100.0);
        assert_eq!(synth.frequency(42.0), 100.0);
        assert_eq!(synth.frequency(320.5), 320.5);
    }

    #[test]
    fn test_first_sample_silent_and_clipped() {
        let samples = ToneSynth::default().samples(100.0);
        assert_eq!(samples[0], 0);
        // 100 Hz at 10 kHz: sample 12 sits at tan(0.24 pi) just under 1
        assert!(samples[12] > 30_000 && samples[12] < i16::MAX);
        // sample 13 is past pi/4 and saturates
        assert_eq!(samples[13], i16::MAX);
        // sample 26 is just past pi/2 where tan is large and negative
        assert_eq!(samples[26], -i16::MAX);
        // sample 40 sits at 0.8 pi, tan is about -0.73
        assert!(samples[40] < -23_000 && samples[40] > -24_500);
    }

    #[test]
    fn test_pcm_is_little_endian() {
        let synth = ToneSynth::default();
        let samples = synth.samples(100.0);
        let pcm = synth.pcm(100.0);
        assert_eq!(&pcm[0..2], &[0, 0]);
        assert_eq!(&pcm[26..28], &samples[13].to_le_bytes());
        assert_eq!(&pcm[26..28], &[0xff, 0x7f]);
    }
}
