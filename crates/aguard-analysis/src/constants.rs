//! Fixed analysis constants. None of these are runtime-negotiable; the
//! config structs default to them and exist so components can be built
//! against explicit values in tests.

/// Capture and analysis sample rate (Hz)
pub const SAMPLE_RATE_HZ: u32 = 44_100;

/// Size of one analysis block in time-domain samples
pub const FFT_SIZE: usize = 2_048;

/// Number of frequency bins per spectrum block (half the FFT size)
pub const SPECTRUM_BINS: usize = FFT_SIZE / 2;

/// Loudness at or above this is a warning; also the event trigger threshold
pub const DB_THRESHOLD_WARNING: u16 = 50;

/// Loudness at or above this is dangerous
pub const DB_THRESHOLD_DANGER: u16 = 70;

/// Minimum interval between two emitted events (ms)
pub const EVENT_COOLDOWN_MS: u64 = 2_000;

/// Bins below this frequency count as low-frequency energy (Hz)
pub const LOW_FREQ_BOUND_HZ: f32 = 200.0;

/// Low-frequency energy share above which a sound is an impact
pub const LOW_FREQ_RATIO_THRESHOLD: f32 = 0.4;

/// Readings at or below this are analysis noise and excluded from min tracking
pub const MIN_TRACKED_DB: u16 = 10;

/// RMS below this reads as digital silence (avoids log of zero)
pub const SILENCE_RMS_FLOOR: f32 = 1e-4;

/// Exponential smoothing weight kept from the previous `current` value
pub const SMOOTHING_PREVIOUS_WEIGHT: f32 = 0.7;

/// Exponential smoothing weight given to the newest reading
pub const SMOOTHING_NEW_WEIGHT: f32 = 0.3;

/// Seed for the smoothed `current` stat at session start
pub const STATS_SEED_CURRENT: u16 = 30;

/// Seed for the session minimum before any reading is tracked
pub const STATS_SEED_MIN: u16 = 100;
