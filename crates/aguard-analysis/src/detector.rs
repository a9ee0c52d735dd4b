use super::classifier::SpectralClassifier;
use super::config::AnalysisConfig;
use super::types::AudioEvent;

/// Debounced threshold policy over the loudness stream.
///
/// Emits at most one event per cooldown window; sustained loud periods
/// produce one event every `event_cooldown_ms`, not one per tick. The
/// spectrum is only classified when a trigger actually fires.
pub struct EventDetector {
    classifier: SpectralClassifier,
    threshold_db: u16,
    cooldown_ms: u64,
    last_event_ms: Option<u64>,
    next_id: u64,
}

impl EventDetector {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            classifier: SpectralClassifier::new(config),
            threshold_db: config.event_threshold_db,
            cooldown_ms: config.event_cooldown_ms,
            last_event_ms: None,
            next_id: 1,
        }
    }

    /// Evaluate one tick. `now_ms` and `recording_start_ms` are unix
    /// milliseconds supplied by the caller, which keeps this deterministic
    /// under test.
    pub fn process(
        &mut self,
        db: u16,
        spectrum: &[u8],
        now_ms: u64,
        recording_start_ms: u64,
    ) -> Option<AudioEvent> {
        if db <= self.threshold_db {
            return None;
        }
        if let Some(last) = self.last_event_ms {
            if now_ms.saturating_sub(last) <= self.cooldown_ms {
                return None;
            }
        }

        let sound_type = self.classifier.classify(spectrum);
        let id = self.next_id;
        self.next_id += 1;
        self.last_event_ms = Some(now_ms);

        Some(AudioEvent {
            id,
            timestamp_ms: now_ms,
            relative_secs: now_ms.saturating_sub(recording_start_ms) as f64 / 1000.0,
            db,
            sound_type,
        })
    }

    /// Clears the cooldown for a fresh capture session. The id counter is
    /// not rewound, so ids stay unique even across restarts within one
    /// process.
    pub fn reset(&mut self) {
        self.last_event_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SPECTRUM_BINS;
    use crate::types::SoundType;

    fn detector() -> EventDetector {
        EventDetector::new(&AnalysisConfig::default())
    }

    fn quiet_spectrum() -> Vec<u8> {
        vec![0u8; SPECTRUM_BINS]
    }

    #[test]
    fn below_threshold_never_triggers() {
        let mut det = detector();
        let spectrum = quiet_spectrum();
        for tick in 0..100u64 {
            assert!(det.process(50, &spectrum, tick * 46, 0).is_none());
        }
    }

    #[test]
    fn first_loud_tick_triggers_immediately() {
        let mut det = detector();
        let event = det.process(85, &quiet_spectrum(), 5_000, 2_000).unwrap();
        assert_eq!(event.id, 1);
        assert_eq!(event.timestamp_ms, 5_000);
        assert!((event.relative_secs - 3.0).abs() < f64::EPSILON);
        assert_eq!(event.db, 85);
        assert_eq!(event.sound_type, SoundType::Environment);
    }

    #[test]
    fn cooldown_suppresses_second_event() {
        let mut det = detector();
        let spectrum = quiet_spectrum();
        assert!(det.process(80, &spectrum, 1_000, 0).is_some());
        // Inside the window, including the exact boundary
        assert!(det.process(80, &spectrum, 2_500, 0).is_none());
        assert!(det.process(80, &spectrum, 3_000, 0).is_none());
        // Strictly past the boundary
        let second = det.process(80, &spectrum, 3_001, 0).unwrap();
        assert_eq!(second.id, 2);
    }

    #[test]
    fn events_are_never_closer_than_cooldown() {
        let mut det = detector();
        let spectrum = quiet_spectrum();
        let mut emitted: Vec<u64> = Vec::new();
        // Sustained loud period ticked every 46 ms for 10 seconds
        let mut now = 0u64;
        while now < 10_000 {
            if let Some(event) = det.process(90, &spectrum, now, 0) {
                emitted.push(event.timestamp_ms);
            }
            now += 46;
        }
        assert!(emitted.len() >= 2);
        for pair in emitted.windows(2) {
            assert!(pair[1] - pair[0] > 2_000);
        }
    }

    #[test]
    fn trigger_classifies_the_spectrum() {
        let mut det = detector();
        let cfg = AnalysisConfig::default();
        let cutoff = SpectralClassifier::new(&cfg).low_freq_cutoff_bin();
        let mut spectrum = quiet_spectrum();
        for bin in 0..cutoff {
            spectrum[bin] = 200;
        }
        let event = det.process(95, &spectrum, 0, 0).unwrap();
        assert_eq!(event.sound_type, SoundType::Structure);
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let mut det = detector();
        let spectrum = quiet_spectrum();
        let a = det.process(80, &spectrum, 0, 0).unwrap();
        let b = det.process(80, &spectrum, 3_000, 0).unwrap();
        det.reset();
        let c = det.process(80, &spectrum, 3_100, 0).unwrap();
        assert!(a.id < b.id && b.id < c.id);
    }

    #[test]
    fn reset_clears_the_cooldown() {
        let mut det = detector();
        let spectrum = quiet_spectrum();
        assert!(det.process(80, &spectrum, 1_000, 0).is_some());
        assert!(det.process(80, &spectrum, 1_500, 0).is_none());
        det.reset();
        assert!(det.process(80, &spectrum, 1_500, 0).is_some());
    }
}
