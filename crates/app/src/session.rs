use chrono::{DateTime, Utc};

use aguard_analysis::{
    AnalysisConfig, AudioEvent, EventDetector, LevelEstimator, SafetyLevel, SessionStats,
    StatsTracker,
};
use aguard_audio::{wav, CaptureBuffer};

/// Seconds of context included before an event when slicing a clip.
pub const PRE_EVENT_SECS: f64 = 3.0;
/// Seconds of context included after an event.
pub const POST_EVENT_SECS: f64 = 4.0;

/// Presentation-facing output of one analysis tick.
#[derive(Debug, Clone)]
pub struct TickSnapshot {
    pub db: u16,
    pub stats: SessionStats,
    pub safety: SafetyLevel,
    /// Latest time-domain block, for waveform rendering
    pub waveform: Vec<u8>,
    pub event_count: usize,
    pub new_event: Option<AudioEvent>,
    pub recording_secs: f64,
}

/// A complete in-memory WAV file ready to hand to a collaborator.
#[derive(Debug, Clone)]
pub struct WavExport {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
    pub suggested_filename: String,
}

/// Owned session aggregate: all mutable monitoring state lives here and is
/// only touched from the tick path, so updates never interleave.
pub struct Session {
    level: LevelEstimator,
    stats: StatsTracker,
    detector: EventDetector,
    events: Vec<AudioEvent>,
    buffer: CaptureBuffer,
}

impl Session {
    pub fn new(config: &AnalysisConfig, buffer: CaptureBuffer, now_ms: u64) -> Self {
        buffer.start(now_ms);
        Self {
            level: LevelEstimator::new(),
            stats: StatsTracker::new(),
            detector: EventDetector::new(config),
            events: Vec::new(),
            buffer,
        }
    }

    /// One analysis cycle over the tick's byte blocks. Runs estimator,
    /// stats, safety classification, and event detection in that order.
    pub fn tick(&mut self, time_domain: &[u8], spectrum: &[u8], now_ms: u64) -> TickSnapshot {
        let db = self.level.estimate(time_domain);
        let stats = self.stats.update(db);
        let safety = SafetyLevel::for_db(db);

        let new_event =
            self.detector
                .process(db, spectrum, now_ms, self.buffer.recording_start_ms());
        if let Some(event) = &new_event {
            tracing::info!(
                "Detected {} event at {:.1}s ({} dB)",
                event.sound_type,
                event.relative_secs,
                event.db
            );
            self.events.push(event.clone());
        }

        TickSnapshot {
            db,
            stats,
            safety,
            waveform: time_domain.to_vec(),
            event_count: self.events.len(),
            new_event,
            recording_secs: self.buffer.total_duration_secs(),
        }
    }

    /// Clear stats, event log, and captured audio together; the recording
    /// clock restarts at `now_ms`. The detector cooldown carries over the
    /// reset.
    pub fn reset(&mut self, now_ms: u64) {
        self.stats.reset();
        self.events.clear();
        self.buffer.start(now_ms);
    }

    pub fn stats(&self) -> SessionStats {
        self.stats.snapshot()
    }

    pub fn events(&self) -> &[AudioEvent] {
        &self.events
    }

    pub fn recording_secs(&self) -> f64 {
        self.buffer.total_duration_secs()
    }

    /// Encode the whole captured session. `None` when nothing has been
    /// captured yet; callers treat that as a no-op.
    pub fn save(&self, now: DateTime<Utc>) -> Option<WavExport> {
        if self.buffer.is_empty() {
            return None;
        }

        let merged = self.buffer.merge();
        let bytes = wav::encode(&merged, self.buffer.sample_rate());
        Some(WavExport {
            bytes,
            media_type: "audio/wav",
            suggested_filename: format!(
                "acoustic-guard-{}.wav",
                now.format("%Y-%m-%dT%H-%M-%S")
            ),
        })
    }

    /// Bounded clip around a detected event. `None` when the buffer holds
    /// nothing for that window (cleared since, or not yet populated).
    pub fn play_event(&self, event: &AudioEvent) -> Option<WavExport> {
        if self.buffer.is_empty() {
            return None;
        }

        let start = (event.relative_secs - PRE_EVENT_SECS).max(0.0);
        let end = event.relative_secs + POST_EVENT_SECS;
        let slice = self.buffer.slice(start, end)?;

        let bytes = wav::encode(&slice, self.buffer.sample_rate());
        Some(WavExport {
            bytes,
            media_type: "audio/wav",
            suggested_filename: format!("acoustic-guard-event-{}.wav", event.id),
        })
    }
}
