use parking_lot::Mutex;
use std::sync::Arc;

struct Inner {
    chunks: Vec<Vec<f32>>,
    recording_start_ms: u64,
}

/// Session-scoped raw PCM accumulator.
///
/// Chunks append on the audio delivery path while stats/event reads happen
/// on the tick path; the single mutex makes append and merge/slice mutually
/// exclusive so a merge never observes a half-pushed chunk list.
#[derive(Clone)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<Inner>>,
    sample_rate: u32,
}

impl CaptureBuffer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                chunks: Vec::new(),
                recording_start_ms: 0,
            })),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Begin a fresh recording: drop accumulated chunks, stamp the start.
    pub fn start(&self, now_ms: u64) {
        let mut inner = self.inner.lock();
        inner.chunks.clear();
        inner.recording_start_ms = now_ms;
    }

    pub fn append(&self, chunk: &[f32]) {
        self.inner.lock().chunks.push(chunk.to_vec());
    }

    pub fn recording_start_ms(&self) -> u64 {
        self.inner.lock().recording_start_ms
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().chunks.is_empty()
    }

    /// Captured duration in seconds (sum of chunk lengths over the rate).
    pub fn total_duration_secs(&self) -> f64 {
        let samples: usize = self.inner.lock().chunks.iter().map(|c| c.len()).sum();
        samples as f64 / self.sample_rate as f64
    }

    /// Concatenate every chunk in append order. Allocates the full
    /// sequence; not for hot paths.
    pub fn merge(&self) -> Vec<f32> {
        let inner = self.inner.lock();
        let total: usize = inner.chunks.iter().map(|c| c.len()).sum();
        let mut merged = Vec::with_capacity(total);
        for chunk in &inner.chunks {
            merged.extend_from_slice(chunk);
        }
        merged
    }

    /// Samples between two time offsets. The end clamps to the captured
    /// range; a start at or past the end means there is nothing to play.
    pub fn slice(&self, start_secs: f64, end_secs: f64) -> Option<Vec<f32>> {
        let merged = self.merge();
        let start = (start_secs * self.sample_rate as f64).floor() as usize;
        if start >= merged.len() {
            return None;
        }
        let end = ((end_secs * self.sample_rate as f64).floor() as usize).min(merged.len());
        Some(merged[start..end].to_vec())
    }
}
