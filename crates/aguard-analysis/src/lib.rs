pub mod classifier;
pub mod config;
pub mod constants;
pub mod detector;
pub mod level;
pub mod stats;
pub mod types;

// Core exports - grouped and sorted alphabetically
pub use classifier::SpectralClassifier;
pub use config::AnalysisConfig;
pub use constants::{DB_THRESHOLD_DANGER, DB_THRESHOLD_WARNING, FFT_SIZE, SAMPLE_RATE_HZ, SPECTRUM_BINS};
pub use detector::EventDetector;
pub use level::LevelEstimator;
pub use stats::StatsTracker;
pub use types::{AudioEvent, SafetyLevel, SessionStats, SoundType};
