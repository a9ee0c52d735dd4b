use super::config::AnalysisConfig;
use super::types::SoundType;

/// Labels a spectrum block by where its energy sits.
///
/// Low-frequency dominance (impacts, footsteps, machinery) classifies as
/// `Structure`; everything else is `Environment`. The policy never emits
/// `Voice` (see the note on [`SoundType`]).
pub struct SpectralClassifier {
    low_freq_cutoff_bin: usize,
    ratio_threshold: f32,
}

impl SpectralClassifier {
    pub fn new(config: &AnalysisConfig) -> Self {
        let cutoff = (config.low_freq_bound_hz / config.bin_width_hz()).floor() as usize;
        Self {
            low_freq_cutoff_bin: cutoff,
            ratio_threshold: config.low_freq_ratio_threshold,
        }
    }

    /// Bin index below which energy counts as low-frequency.
    pub fn low_freq_cutoff_bin(&self) -> usize {
        self.low_freq_cutoff_bin
    }

    pub fn classify(&self, spectrum: &[u8]) -> SoundType {
        let mut total_energy: u64 = 0;
        let mut low_freq_energy: u64 = 0;

        for (bin, &magnitude) in spectrum.iter().enumerate() {
            total_energy += magnitude as u64;
            if bin < self.low_freq_cutoff_bin {
                low_freq_energy += magnitude as u64;
            }
        }

        if total_energy == 0 {
            return SoundType::Environment;
        }

        let low_freq_ratio = low_freq_energy as f32 / total_energy as f32;
        if low_freq_ratio > self.ratio_threshold {
            SoundType::Structure
        } else {
            SoundType::Environment
        }
    }
}
