use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use aguard_foundation::AudioError;

use super::ring_buffer::AudioProducer;

/// Negotiated stream parameters for the opened input device.
#[derive(Debug, Clone, Copy)]
pub struct DeviceConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

/// A handle to the dedicated audio capture thread.
///
/// The cpal stream is created and dropped on that thread (streams are not
/// Send). `stop` is idempotent; the thread exits within its poll interval.
pub struct CaptureThread {
    pub handle: JoinHandle<()>,
    shutdown: Arc<AtomicBool>,
    dropped_samples: Arc<AtomicU64>,
}

impl CaptureThread {
    /// Open the requested (or default) input device at `target_sample_rate`
    /// and start pushing normalized f32 samples into the ring buffer.
    ///
    /// Fails synchronously with `CaptureUnavailable`/`DeviceNotFound`/
    /// `FormatNotSupported` before any thread state is left behind.
    pub fn spawn(
        device_name: Option<String>,
        producer: AudioProducer,
        target_sample_rate: u32,
    ) -> Result<(Self, DeviceConfig), AudioError> {
        let running = Arc::new(AtomicBool::new(true));
        let shutdown = running.clone();
        let dropped_samples = Arc::new(AtomicU64::new(0));
        let dropped = dropped_samples.clone();

        let (startup_tx, startup_rx) = mpsc::channel::<Result<DeviceConfig, AudioError>>();

        let handle = thread::Builder::new()
            .name("audio-capture".to_string())
            .spawn(move || {
                let stream = match open_stream(device_name, producer, target_sample_rate, dropped)
                {
                    Ok((stream, cfg)) => {
                        let _ = startup_tx.send(Ok(cfg));
                        stream
                    }
                    Err(e) => {
                        let _ = startup_tx.send(Err(e));
                        return;
                    }
                };

                while running.load(Ordering::Relaxed) {
                    thread::sleep(Duration::from_millis(100));
                }

                drop(stream);
                tracing::info!("Audio capture thread stopped");
            })
            .map_err(|e| AudioError::CaptureUnavailable {
                reason: format!("failed to spawn capture thread: {}", e),
            })?;

        match startup_rx.recv_timeout(Duration::from_secs(5)) {
            Ok(Ok(cfg)) => {
                tracing::info!(
                    "Audio capture started: {} Hz, {} channel(s)",
                    cfg.sample_rate,
                    cfg.channels
                );
                Ok((
                    Self {
                        handle,
                        shutdown,
                        dropped_samples,
                    },
                    cfg,
                ))
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                shutdown.store(false, Ordering::Relaxed);
                Err(AudioError::CaptureUnavailable {
                    reason: "timed out waiting for the capture stream to open".to_string(),
                })
            }
        }
    }

    /// Signal the capture thread to stop. Safe to call more than once.
    pub fn stop(&self) {
        self.shutdown.store(false, Ordering::Relaxed);
    }

    /// Samples rejected because the ring buffer was full.
    pub fn dropped_samples(&self) -> u64 {
        self.dropped_samples.load(Ordering::Relaxed)
    }
}

fn open_stream(
    device_name: Option<String>,
    producer: AudioProducer,
    target_sample_rate: u32,
    dropped: Arc<AtomicU64>,
) -> Result<(cpal::Stream, DeviceConfig), AudioError> {
    let host = cpal::default_host();

    let device = match &device_name {
        Some(name) => host
            .input_devices()
            .map_err(|e| AudioError::CaptureUnavailable {
                reason: format!("cannot enumerate input devices: {}", e),
            })?
            .find(|d| d.name().map(|n| &n == name).unwrap_or(false))
            .ok_or_else(|| AudioError::DeviceNotFound {
                name: device_name.clone(),
            })?,
        None => host
            .default_input_device()
            .ok_or_else(|| AudioError::CaptureUnavailable {
                reason: "no default input device".to_string(),
            })?,
    };

    let supported = select_input_config(&device, target_sample_rate)?;
    let sample_format = supported.sample_format();
    let config: StreamConfig = supported.config();
    let device_config = DeviceConfig {
        sample_rate: config.sample_rate.0,
        channels: config.channels,
    };

    tracing::debug!(
        "Opening input stream on {:?}: {:?} {} Hz {} ch",
        device.name().unwrap_or_else(|_| "<unnamed>".into()),
        sample_format,
        device_config.sample_rate,
        device_config.channels
    );

    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, producer, dropped)?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, producer, dropped)?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, producer, dropped)?,
        other => {
            return Err(AudioError::FormatNotSupported {
                format: format!("{:?}", other),
            })
        }
    };

    stream.play()?;
    Ok((stream, device_config))
}

/// Pick a supported config range containing the target rate, preferring f32.
fn select_input_config(
    device: &cpal::Device,
    target_sample_rate: u32,
) -> Result<cpal::SupportedStreamConfig, AudioError> {
    let target = SampleRate(target_sample_rate);
    let mut fallback = None;

    for range in device.supported_input_configs()? {
        if range.min_sample_rate() <= target && target <= range.max_sample_rate() {
            if range.sample_format() == SampleFormat::F32 {
                return Ok(range.with_sample_rate(target));
            }
            if fallback.is_none() {
                fallback = Some(range);
            }
        }
    }

    fallback
        .map(|range| range.with_sample_rate(target))
        .ok_or_else(|| AudioError::FormatNotSupported {
            format: format!("no input config supports {} Hz", target_sample_rate),
        })
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut producer: AudioProducer,
    dropped: Arc<AtomicU64>,
) -> Result<cpal::Stream, AudioError>
where
    T: cpal::Sample + cpal::SizedSample + Send + 'static,
    f32: cpal::FromSample<T>,
{
    let err_fn = |err: cpal::StreamError| {
        tracing::error!("Capture stream error: {}", err);
    };

    let mut scratch: Vec<f32> = Vec::new();
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            scratch.clear();
            scratch.extend(data.iter().map(|&s| {
                let sample: f32 = cpal::Sample::from_sample(s);
                sample
            }));
            if producer.write(&scratch).is_err() {
                dropped.fetch_add(scratch.len() as u64, Ordering::Relaxed);
            }
        },
        err_fn,
        None,
    )?;
    Ok(stream)
}
