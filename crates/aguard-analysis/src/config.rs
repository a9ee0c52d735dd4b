use serde::{Deserialize, Serialize};

use super::constants::{
    DB_THRESHOLD_WARNING, EVENT_COOLDOWN_MS, LOW_FREQ_BOUND_HZ, LOW_FREQ_RATIO_THRESHOLD,
    SAMPLE_RATE_HZ, SPECTRUM_BINS,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub sample_rate_hz: u32,
    pub spectrum_bins: usize,
    pub event_threshold_db: u16,
    pub event_cooldown_ms: u64,
    pub low_freq_bound_hz: f32,
    pub low_freq_ratio_threshold: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: SAMPLE_RATE_HZ,
            spectrum_bins: SPECTRUM_BINS,
            event_threshold_db: DB_THRESHOLD_WARNING,
            event_cooldown_ms: EVENT_COOLDOWN_MS,
            low_freq_bound_hz: LOW_FREQ_BOUND_HZ,
            low_freq_ratio_threshold: LOW_FREQ_RATIO_THRESHOLD,
        }
    }
}

impl AnalysisConfig {
    /// Width of one frequency bin in Hz (Nyquist / bin count).
    pub fn bin_width_hz(&self) -> f32 {
        (self.sample_rate_hz as f32 / 2.0) / self.spectrum_bins as f32
    }
}
