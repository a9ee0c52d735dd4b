use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Byte-domain analysis blocks for one chunk: the inputs the analysis
/// crate consumes each tick.
#[derive(Debug, Clone)]
pub struct AnalysisBlocks {
    /// Center-biased time-domain samples (silence = 128)
    pub time_domain: Vec<u8>,
    /// Frequency magnitudes, 0-255, bin 0 = DC
    pub spectrum: Vec<u8>,
}

/// Produces per-tick byte blocks from raw f32 chunks.
///
/// Spectrum bytes follow the common analyser convention: Hann-windowed
/// forward FFT, magnitudes normalized by the FFT size, exponentially
/// smoothed across ticks (0.8), then mapped from the [-100 dB, -30 dB]
/// range onto 0-255. Time-domain bytes are `128 * (1 + sample)`.
pub struct BlockAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    bins: usize,
    window: Vec<f32>,
    smoothed: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    smoothing: f32,
    min_db: f32,
    max_db: f32,
}

impl BlockAnalyzer {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        let window: Vec<f32> = (0..fft_size)
            .map(|i| {
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (fft_size - 1) as f32).cos())
            })
            .collect();

        let bins = fft_size / 2;
        Self {
            fft,
            fft_size,
            bins,
            window,
            smoothed: vec![0.0; bins],
            scratch: Vec::with_capacity(fft_size),
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,
        }
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn analyze(&mut self, chunk: &[f32]) -> AnalysisBlocks {
        let time_domain: Vec<u8> = chunk
            .iter()
            .take(self.bins)
            .map(|&s| {
                let byte = (128.0 * (1.0 + s.clamp(-1.0, 1.0))).round();
                byte.clamp(0.0, 255.0) as u8
            })
            .collect();

        self.scratch.clear();
        self.scratch.extend(
            chunk
                .iter()
                .zip(self.window.iter())
                .map(|(&sample, &w)| Complex::new(sample * w, 0.0)),
        );
        self.scratch.resize(self.fft_size, Complex::new(0.0, 0.0));

        self.fft.process(&mut self.scratch);

        let db_span = self.max_db - self.min_db;
        let mut spectrum = Vec::with_capacity(self.bins);
        for (k, c) in self.scratch[..self.bins].iter().enumerate() {
            let magnitude = (c.re * c.re + c.im * c.im).sqrt() / self.fft_size as f32;
            let s = self.smoothing * self.smoothed[k] + (1.0 - self.smoothing) * magnitude;
            self.smoothed[k] = s;

            let byte = if s > 0.0 {
                let db = 20.0 * s.log10();
                (((db - self.min_db) / db_span) * 255.0).round().clamp(0.0, 255.0) as u8
            } else {
                0
            };
            spectrum.push(byte);
        }

        AnalysisBlocks {
            time_domain,
            spectrum,
        }
    }
}
