use std::fmt;

use serde::{Deserialize, Serialize};

use super::constants::{
    DB_THRESHOLD_DANGER, DB_THRESHOLD_WARNING, STATS_SEED_CURRENT, STATS_SEED_MIN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyLevel {
    Safe,
    Warning,
    Danger,
}

impl SafetyLevel {
    /// Pure function of the latest loudness reading against the two fixed
    /// thresholds. Recomputed every tick, never stored across ticks.
    pub fn for_db(db: u16) -> Self {
        if db >= DB_THRESHOLD_DANGER {
            SafetyLevel::Danger
        } else if db >= DB_THRESHOLD_WARNING {
            SafetyLevel::Warning
        } else {
            SafetyLevel::Safe
        }
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SafetyLevel::Safe => "SAFE",
            SafetyLevel::Warning => "WARNING",
            SafetyLevel::Danger => "DANGER",
        };
        write!(f, "{}", label)
    }
}

/// Coarse classification of a detected sound event.
///
/// `Voice` is a reserved label: the current ratio-based policy never
/// produces it. Known gap, kept so the classification surface matches the
/// event log schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundType {
    Environment,
    Structure,
    Voice,
}

impl fmt::Display for SoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SoundType::Environment => "Environment",
            SoundType::Structure => "Structure/Impact",
            SoundType::Voice => "Voice/High Freq",
        };
        write!(f, "{}", label)
    }
}

/// Smoothed/extremal loudness over one session. All fields are integers on
/// the dB-offset scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub current: u16,
    pub max: u16,
    pub min: u16,
    pub avg: u16,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            current: STATS_SEED_CURRENT,
            max: 0,
            min: STATS_SEED_MIN,
            avg: 0,
        }
    }
}

/// One detected anomaly. Immutable after creation; appended to the ordered
/// session event log and cleared only together with the session stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioEvent {
    /// Unique within a session, monotonically increasing
    pub id: u64,
    /// Wall-clock time of the trigger, unix milliseconds
    pub timestamp_ms: u64,
    /// Seconds since recording start; always >= 0 and <= recording duration
    pub relative_secs: f64,
    /// Loudness reading that triggered the event
    pub db: u16,
    pub sound_type: SoundType,
}
