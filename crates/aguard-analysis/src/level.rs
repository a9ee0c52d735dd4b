use super::constants::SILENCE_RMS_FLOOR;

/// Estimates a dB-offset loudness value from a block of center-biased
/// 8-bit time-domain samples.
///
/// The output is not calibrated SPL: RMS of the normalized block is mapped
/// through `20*log10(rms) + 100`, anchoring full scale at 100 and a quiet
/// room around 30 once smoothing settles.
pub struct LevelEstimator {
    silence_floor: f32,
}

impl LevelEstimator {
    pub fn new() -> Self {
        Self {
            silence_floor: SILENCE_RMS_FLOOR,
        }
    }

    /// RMS of the block after normalizing each sample to [-1, 1].
    pub fn rms(&self, block: &[u8]) -> f32 {
        if block.is_empty() {
            return 0.0;
        }

        let sum_squares: f64 = block
            .iter()
            .map(|&raw| {
                let normalized = (raw as f64 - 128.0) / 128.0;
                normalized * normalized
            })
            .sum();

        (sum_squares / block.len() as f64).sqrt() as f32
    }

    /// Single non-negative loudness reading for one block.
    pub fn estimate(&self, block: &[u8]) -> u16 {
        let rms = self.rms(block);
        if rms < self.silence_floor {
            return 0;
        }

        let db = 20.0 * rms.log10() + 100.0;
        db.round().max(0.0) as u16
    }
}

impl Default for LevelEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FFT_SIZE;

    #[test]
    fn silence_block_reads_zero() {
        let estimator = LevelEstimator::new();
        let silence = vec![128u8; FFT_SIZE];
        assert_eq!(estimator.estimate(&silence), 0);
    }

    #[test]
    fn full_scale_alternating_reads_one_hundred() {
        let estimator = LevelEstimator::new();
        let block: Vec<u8> = (0..FFT_SIZE)
            .map(|i| if i % 2 == 0 { 0 } else { 255 })
            .collect();
        // RMS is just under 1.0 (255 normalizes to 0.992)
        let db = estimator.estimate(&block);
        assert!((99..=100).contains(&db), "got {}", db);
    }

    #[test]
    fn half_scale_sine_maps_below_full_scale() {
        let estimator = LevelEstimator::new();
        let block: Vec<u8> = (0..FFT_SIZE)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * i as f32 / 128.0;
                (128.0 + phase.sin() * 64.0).round() as u8
            })
            .collect();
        // Amplitude 0.5 sine: rms ~0.354 -> ~91 dB on the offset scale
        let db = estimator.estimate(&block);
        assert!((90..=92).contains(&db), "got {}", db);
    }

    #[test]
    fn single_sample_block_is_valid() {
        let estimator = LevelEstimator::new();
        assert_eq!(estimator.estimate(&[128]), 0);
        assert_eq!(estimator.estimate(&[255]), 100);
    }

    #[test]
    fn output_is_total_over_random_blocks() {
        use rand::Rng;
        let estimator = LevelEstimator::new();
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let len = rng.gen_range(1..4096);
            let block: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            // Never panics, output bounded by the offset scale
            let db = estimator.estimate(&block);
            assert!(db <= 101);
        }
    }
}
