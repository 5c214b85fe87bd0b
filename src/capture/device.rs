use std::f32::consts::TAU;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use super::error::CaptureError;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for an audio input device
#[derive(Debug, Clone)]
pub struct AudioInputConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Frame size in milliseconds (affects latency)
    pub frame_duration_ms: u64,
}

impl Default for AudioInputConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            frame_duration_ms: 100,
        }
    }
}

/// Audio input device abstraction.
///
/// The device is an exclusively-owned resource: `open()` acquires it and
/// returns a channel of frames, `close()` releases it and closes the
/// channel. A device that cannot be acquired reports
/// `CaptureError::DeviceUnavailable`.
#[async_trait::async_trait]
pub trait AudioInput: Send + Sync {
    /// Acquire the device and start producing frames.
    async fn open(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError>;

    /// Release the device. Closes the frame channel.
    async fn close(&mut self) -> Result<(), CaptureError>;

    /// Whether the device is currently held.
    fn is_open(&self) -> bool;

    /// Device name for logging.
    fn name(&self) -> &str;
}

/// Synthetic input device producing a steady test tone.
///
/// Stands in for a platform microphone backend in demos and tests; frames
/// arrive on the same cadence a real device would deliver them.
pub struct ToneInput {
    config: AudioInputConfig,
    stop_tx: Option<watch::Sender<bool>>,
    producer: Option<JoinHandle<()>>,
}

impl ToneInput {
    pub fn new(config: AudioInputConfig) -> Self {
        Self {
            config,
            stop_tx: None,
            producer: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioInput for ToneInput {
    async fn open(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        if self.is_open() {
            return Err(CaptureError::RecordingInProgress);
        }

        let (frame_tx, frame_rx) = mpsc::channel(64);
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let config = self.config.clone();
        let producer = tokio::spawn(async move {
            let samples_per_frame =
                (config.sample_rate as u64 * config.frame_duration_ms / 1000) as usize
                    * config.channels as usize;
            let mut ticker =
                tokio::time::interval(Duration::from_millis(config.frame_duration_ms));
            let mut timestamp_ms = 0u64;
            let mut phase = 0usize;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let samples = (0..samples_per_frame)
                            .map(|i| {
                                let t = (phase + i) as f32 / config.sample_rate as f32;
                                ((t * 440.0 * TAU).sin() * 3000.0) as i16
                            })
                            .collect();
                        phase += samples_per_frame;

                        let frame = AudioFrame {
                            samples,
                            sample_rate: config.sample_rate,
                            channels: config.channels,
                            timestamp_ms,
                        };
                        if frame_tx.send(frame).await.is_err() {
                            break;
                        }
                        timestamp_ms += config.frame_duration_ms;
                    }
                    _ = stop_rx.changed() => break,
                }
            }
        });

        self.stop_tx = Some(stop_tx);
        self.producer = Some(producer);

        info!("Audio input opened: {}", self.name());

        Ok(frame_rx)
    }

    async fn close(&mut self) -> Result<(), CaptureError> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
        if let Some(producer) = self.producer.take() {
            let _ = producer.await;
        }

        info!("Audio input closed: {}", self.name());

        Ok(())
    }

    fn is_open(&self) -> bool {
        self.producer.is_some()
    }

    fn name(&self) -> &str {
        "tone"
    }
}
