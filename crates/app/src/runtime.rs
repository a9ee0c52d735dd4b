use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::info;

use aguard_analysis::constants::{FFT_SIZE, SAMPLE_RATE_HZ};
use aguard_analysis::{AnalysisConfig, AudioEvent, SessionStats};
use aguard_audio::{
    AudioChunk, AudioChunker, AudioRingBuffer, BlockAnalyzer, CaptureBuffer, CaptureThread,
    ChunkerConfig, DeviceConfig,
};
use aguard_foundation::{AppError, PlaybackError, SessionState, StateManager};

use crate::session::{Session, TickSnapshot, WavExport};

/// Options for starting the monitor runtime
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    pub device: Option<String>,
}

/// Playback lifecycle notifications; the UI uses these to track the single
/// concurrently-playing clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackNotice {
    Started { event_id: u64 },
    Ended { event_id: u64 },
}

/// External playback collaborator. Receives complete WAV clips; how they
/// are rendered audible is outside the core.
pub trait PlaybackSink: Send + Sync {
    fn play(&self, clip: &WavExport) -> Result<(), PlaybackError>;
}

/// Default sink for the headless binary: writes the clip to disk.
pub struct FileSink {
    pub dir: PathBuf,
}

impl PlaybackSink for FileSink {
    fn play(&self, clip: &WavExport) -> Result<(), PlaybackError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| PlaybackError::Sink(e.to_string()))?;
        let path = self.dir.join(&clip.suggested_filename);
        std::fs::write(&path, &clip.bytes).map_err(|e| PlaybackError::Sink(e.to_string()))?;
        info!("Wrote playback clip to {}", path.display());
        Ok(())
    }
}

/// Handle to the running capture-and-analysis pipeline
pub struct AppHandle {
    session: Arc<Mutex<Session>>,
    state: StateManager,
    capture: CaptureThread,
    chunker_handle: Mutex<Option<JoinHandle<()>>>,
    tick_handle: Mutex<Option<JoinHandle<()>>>,
    snapshot_tx: broadcast::Sender<TickSnapshot>,
    playback_tx: broadcast::Sender<PlaybackNotice>,
    sink: Arc<dyn PlaybackSink>,
    device_config: DeviceConfig,
}

/// Open the capture device and start the pipeline: capture thread ->
/// ring buffer -> chunker -> analyzer/tick task.
///
/// Fails without leaving anything running when the device cannot be
/// acquired. A caller that wants to restart an active session stops the
/// old handle first (stop-then-start; there is no implicit replacement).
pub fn start(options: RuntimeOptions, sink: Arc<dyn PlaybackSink>) -> Result<AppHandle, AppError> {
    let state = StateManager::new();

    // ~1.5s of headroom between the capture callback and the chunker
    let ring = AudioRingBuffer::new(FFT_SIZE * 32);
    let (producer, consumer) = ring.split();

    let (capture, device_config) =
        CaptureThread::spawn(options.device.clone(), producer, SAMPLE_RATE_HZ)?;
    state.transition(SessionState::Running)?;

    let (chunk_tx, _) = broadcast::channel::<AudioChunk>(64);
    let chunker = AudioChunker::new(
        consumer,
        chunk_tx.clone(),
        ChunkerConfig {
            chunk_size_samples: FFT_SIZE,
            sample_rate_hz: SAMPLE_RATE_HZ,
            channels: device_config.channels,
        },
    );
    let chunker_handle = chunker.spawn();

    let buffer = CaptureBuffer::new(SAMPLE_RATE_HZ);
    let session = Arc::new(Mutex::new(Session::new(
        &AnalysisConfig::default(),
        buffer.clone(),
        unix_ms(),
    )));

    let (snapshot_tx, _) = broadcast::channel::<TickSnapshot>(64);
    let tick_handle = spawn_tick_task(
        chunk_tx.subscribe(),
        buffer,
        session.clone(),
        snapshot_tx.clone(),
    );

    let (playback_tx, _) = broadcast::channel::<PlaybackNotice>(16);

    info!("Monitor runtime started");
    Ok(AppHandle {
        session,
        state,
        capture,
        chunker_handle: Mutex::new(Some(chunker_handle)),
        tick_handle: Mutex::new(Some(tick_handle)),
        snapshot_tx,
        playback_tx,
        sink,
        device_config,
    })
}

/// Sequential tick loop: every chunk is appended to the capture buffer,
/// analyzed into byte blocks, and fed through the session. One task owns
/// the session, so tick updates never interleave.
fn spawn_tick_task(
    mut rx: broadcast::Receiver<AudioChunk>,
    buffer: CaptureBuffer,
    session: Arc<Mutex<Session>>,
    snapshot_tx: broadcast::Sender<TickSnapshot>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut analyzer = BlockAnalyzer::new(FFT_SIZE);
        loop {
            let chunk = match rx.recv().await {
                Ok(chunk) => chunk,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Tick task lagged, skipped {} chunks", skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            buffer.append(&chunk.samples);
            let blocks = analyzer.analyze(&chunk.samples);
            let snapshot = session
                .lock()
                .tick(&blocks.time_domain, &blocks.spectrum, unix_ms());

            // No subscribers is fine; the monitor can run headless.
            let _ = snapshot_tx.send(snapshot);
        }
        info!("Tick task stopped");
    })
}

fn unix_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

impl AppHandle {
    /// Subscribe to per-tick snapshots (multiple subscribers supported)
    pub fn subscribe(&self) -> broadcast::Receiver<TickSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn subscribe_playback(&self) -> broadcast::Receiver<PlaybackNotice> {
        self.playback_tx.subscribe()
    }

    pub fn device_config(&self) -> DeviceConfig {
        self.device_config
    }

    pub fn stats(&self) -> SessionStats {
        self.session.lock().stats()
    }

    pub fn events(&self) -> Vec<AudioEvent> {
        self.session.lock().events().to_vec()
    }

    pub fn recording_secs(&self) -> f64 {
        self.session.lock().recording_secs()
    }

    /// Clear stats, events, and the capture buffer together.
    pub fn reset(&self) {
        self.session.lock().reset(unix_ms());
        info!("Session statistics and event log reset");
    }

    /// Whole-session WAV export; `None` when nothing has been captured.
    pub fn save(&self) -> Option<WavExport> {
        self.session.lock().save(Utc::now())
    }

    /// Slice a clip around the event and hand it to the playback sink.
    /// Faults are logged and do not affect the capture session.
    pub fn play_event(&self, event: &AudioEvent) {
        let clip = self.session.lock().play_event(event);
        let Some(clip) = clip else {
            tracing::debug!("No captured audio for event {}; ignoring playback", event.id);
            return;
        };

        let _ = self.playback_tx.send(PlaybackNotice::Started { event_id: event.id });
        if let Err(e) = self.sink.play(&clip) {
            tracing::warn!("Playback failed for event {}: {}", event.id, e);
        }
        let _ = self.playback_tx.send(PlaybackNotice::Ended { event_id: event.id });
    }

    /// Stop capture and cancel the pipeline tasks. Idempotent: calling it
    /// again, or on a handle that never ran, is a no-op.
    pub fn shutdown(&self) {
        if self.state.transition(SessionState::Stopping).is_err() {
            return;
        }

        self.capture.stop();
        if let Some(handle) = self.chunker_handle.lock().take() {
            handle.abort();
        }
        if let Some(handle) = self.tick_handle.lock().take() {
            handle.abort();
        }

        let dropped = self.capture.dropped_samples();
        if dropped > 0 {
            tracing::warn!("Capture dropped {} samples during the session", dropped);
        }

        let _ = self.state.transition(SessionState::Idle);
        info!("Monitor runtime stopped");
    }
}

impl Drop for AppHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
