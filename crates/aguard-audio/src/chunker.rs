use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};

use aguard_analysis::constants::{FFT_SIZE, SAMPLE_RATE_HZ};

use super::ring_buffer::AudioConsumer;

/// One fixed-length mono block of normalized samples, shared across
/// broadcast subscribers without copying.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub samples: Arc<[f32]>,
    pub seq: u64,
}

pub struct ChunkerConfig {
    pub chunk_size_samples: usize,
    pub sample_rate_hz: u32,
    pub channels: u16,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size_samples: FFT_SIZE,
            sample_rate_hz: SAMPLE_RATE_HZ,
            channels: 1,
        }
    }
}

/// Drains the capture ring buffer into fixed-size mono chunks and fans
/// them out to subscribers. Multi-channel input is averaged down to mono.
pub struct AudioChunker {
    consumer: AudioConsumer,
    output_tx: broadcast::Sender<AudioChunk>,
    cfg: ChunkerConfig,
    running: Arc<AtomicBool>,
}

impl AudioChunker {
    pub fn new(
        consumer: AudioConsumer,
        output_tx: broadcast::Sender<AudioChunk>,
        cfg: ChunkerConfig,
    ) -> Self {
        Self {
            consumer,
            output_tx,
            cfg,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();
        let mut worker = ChunkerWorker::new(self.consumer, self.output_tx, self.cfg);

        tokio::spawn(async move {
            worker.run(running).await;
        })
    }
}

struct ChunkerWorker {
    consumer: AudioConsumer,
    output_tx: broadcast::Sender<AudioChunk>,
    cfg: ChunkerConfig,
    pending: VecDeque<f32>,
    interleave_carry: Vec<f32>,
    read_buf: Vec<f32>,
    seq: u64,
}

impl ChunkerWorker {
    fn new(
        consumer: AudioConsumer,
        output_tx: broadcast::Sender<AudioChunk>,
        cfg: ChunkerConfig,
    ) -> Self {
        let cap = cfg.chunk_size_samples * 4;
        Self {
            consumer,
            output_tx,
            cfg,
            pending: VecDeque::with_capacity(cap),
            interleave_carry: Vec::new(),
            read_buf: vec![0f32; cap],
            seq: 0,
        }
    }

    async fn run(&mut self, running: Arc<AtomicBool>) {
        tracing::info!("Audio chunker started");

        while running.load(Ordering::SeqCst) {
            let n = self.consumer.read(&mut self.read_buf[..]);
            if n == 0 {
                // One 2048-sample chunk arrives roughly every 46ms at
                // 44.1kHz; a 10ms poll keeps latency low without spinning.
                time::sleep(Duration::from_millis(10)).await;
                continue;
            }

            let data: Vec<f32> = self.read_buf[..n].to_vec();
            self.push_samples(&data);
            self.flush_ready_chunks();
        }

        tracing::info!("Audio chunker stopped");
    }

    fn push_samples(&mut self, data: &[f32]) {
        if self.cfg.channels <= 1 {
            self.pending.extend(data.iter().copied());
            return;
        }

        // Interleaved multi-channel: average each frame down to mono.
        // Reads may split a frame, so carry the remainder to the next read.
        let channels = self.cfg.channels as usize;
        self.interleave_carry.extend_from_slice(data);
        let whole = self.interleave_carry.len() / channels * channels;
        for frame in self.interleave_carry[..whole].chunks_exact(channels) {
            let sum: f32 = frame.iter().sum();
            self.pending.push_back(sum / channels as f32);
        }
        self.interleave_carry.drain(..whole);
    }

    fn flush_ready_chunks(&mut self) {
        let size = self.cfg.chunk_size_samples;
        while self.pending.len() >= size {
            let mut out = Vec::with_capacity(size);
            for _ in 0..size {
                out.push(self.pending.pop_front().unwrap());
            }

            let chunk = AudioChunk {
                samples: out.into(),
                seq: self.seq,
            };
            self.seq += 1;

            // A send fails only when no one is subscribed; not an error.
            match self.output_tx.send(chunk) {
                Ok(receivers) => {
                    tracing::trace!("Chunker: chunk sent to {} receivers", receivers);
                }
                Err(_) => {
                    tracing::debug!("No active listeners for audio chunks");
                }
            }
        }
    }
}
