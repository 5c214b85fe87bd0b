use std::io::Cursor;

use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{error, info, warn};

use super::device::{AudioFrame, AudioInput, AudioInputConfig};
use super::error::CaptureError;
use super::playback::PlaybackCursor;

/// A finished recording, held in memory until saved or discarded.
#[derive(Debug, Clone)]
pub struct RawArtifact {
    /// WAV-encoded audio bytes
    pub bytes: Vec<u8>,
    /// Recording length, frozen from the elapsed counter at stop
    pub duration_seconds: u64,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
}

impl RawArtifact {
    fn assemble(collected: CollectedAudio, duration_seconds: u64) -> Result<Self, CaptureError> {
        let spec = hound::WavSpec {
            channels: collected.channels,
            sample_rate: collected.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| CaptureError::Artifact(e.to_string()))?;
            for &sample in &collected.samples {
                writer
                    .write_sample(sample)
                    .map_err(|e| CaptureError::Artifact(e.to_string()))?;
            }
            writer
                .finalize()
                .map_err(|e| CaptureError::Artifact(e.to_string()))?;
        }

        Ok(Self {
            bytes: cursor.into_inner(),
            duration_seconds,
            sample_rate: collected.sample_rate,
            channels: collected.channels,
        })
    }
}

/// Capture state. Transitions are the only mutation path.
enum CaptureState {
    Idle,
    Armed,
    Recording { started_at: Instant },
    Stopped { artifact: RawArtifact, playback: PlaybackCursor },
    Reviewing { artifact: RawArtifact, playback: PlaybackCursor },
}

impl CaptureState {
    fn label(&self) -> &'static str {
        match self {
            CaptureState::Idle => "idle",
            CaptureState::Armed => "armed",
            CaptureState::Recording { .. } => "recording",
            CaptureState::Stopped { .. } => "stopped",
            CaptureState::Reviewing { .. } => "reviewing",
        }
    }
}

/// Snapshot of the capture state for status queries.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureStatus {
    pub state: String,
    pub elapsed_seconds: u64,
    pub has_artifact: bool,
    pub playing: bool,
    pub position_seconds: u64,
}

/// Samples accumulated by the collector task between start and stop.
struct CollectedAudio {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

/// Voice capture controller.
///
/// Owns the input device and drives the
/// Idle → Armed → Recording → Stopped → Reviewing state machine. At most
/// one recording can be armed or running per controller; the device is
/// released on stop, on discard, and on every terminating error.
pub struct VoiceRecorder {
    device: Mutex<Box<dyn AudioInput>>,
    config: AudioInputConfig,
    state: Mutex<CaptureState>,
    collector: Mutex<Option<JoinHandle<CollectedAudio>>>,
}

impl VoiceRecorder {
    pub fn new(device: Box<dyn AudioInput>, config: AudioInputConfig) -> Self {
        Self {
            device: Mutex::new(device),
            config,
            state: Mutex::new(CaptureState::Idle),
            collector: Mutex::new(None),
        }
    }

    /// Start a new recording. Valid only from Idle.
    ///
    /// Arms the controller, acquires the device, and begins accumulating
    /// frames. If the device cannot be acquired the controller returns to
    /// Idle and the error is surfaced.
    pub async fn start(&self) -> Result<(), CaptureError> {
        let mut state = self.state.lock().await;

        match *state {
            CaptureState::Idle => {}
            CaptureState::Armed | CaptureState::Recording { .. } => {
                warn!("start() rejected: recording already in progress");
                return Err(CaptureError::RecordingInProgress);
            }
            ref other => {
                return Err(CaptureError::InvalidState { state: other.label() });
            }
        }

        *state = CaptureState::Armed;

        let mut device = self.device.lock().await;
        let frame_rx = match device.open().await {
            Ok(rx) => rx,
            Err(e) => {
                *state = CaptureState::Idle;
                warn!("Could not acquire audio input: {}", e);
                return Err(e);
            }
        };

        let config = self.config.clone();
        let handle = tokio::spawn(collect_frames(frame_rx, config));
        *self.collector.lock().await = Some(handle);

        *state = CaptureState::Recording {
            started_at: Instant::now(),
        };

        info!("Recording started on {}", device.name());

        Ok(())
    }

    /// Stop the active recording. Valid only from Recording.
    ///
    /// Releases the device, drains the collector, and assembles the
    /// accumulated frames into one artifact.
    pub async fn stop(&self) -> Result<(), CaptureError> {
        let mut state = self.state.lock().await;

        let started_at = match *state {
            CaptureState::Recording { started_at } => started_at,
            ref other => {
                return Err(CaptureError::InvalidState { state: other.label() });
            }
        };

        // Release the device first; this closes the frame channel and
        // lets the collector finish.
        if let Err(e) = self.device.lock().await.close().await {
            warn!("Audio input close failed: {}", e);
        }

        let collected = match self.collector.lock().await.take() {
            Some(handle) => match handle.await {
                Ok(collected) => collected,
                Err(e) => {
                    error!("Frame collector panicked: {}", e);
                    CollectedAudio {
                        samples: Vec::new(),
                        sample_rate: self.config.sample_rate,
                        channels: self.config.channels,
                    }
                }
            },
            None => CollectedAudio {
                samples: Vec::new(),
                sample_rate: self.config.sample_rate,
                channels: self.config.channels,
            },
        };

        let elapsed = started_at.elapsed().as_secs();
        let sample_count = collected.samples.len();
        let artifact = RawArtifact::assemble(collected, elapsed)?;

        info!(
            "Recording stopped: {}s, {} samples, {} bytes",
            elapsed,
            sample_count,
            artifact.bytes.len()
        );

        *state = CaptureState::Stopped {
            playback: PlaybackCursor::new(artifact.duration_seconds),
            artifact,
        };

        Ok(())
    }

    /// Discard the recorded artifact and return to Idle.
    ///
    /// Idempotent: discarding from Idle is a no-op.
    pub async fn discard(&self) -> Result<(), CaptureError> {
        let mut state = self.state.lock().await;

        match *state {
            CaptureState::Stopped { .. } | CaptureState::Reviewing { .. } => {
                *state = CaptureState::Idle;
                info!("Recording discarded");
                Ok(())
            }
            CaptureState::Idle => Ok(()),
            ref other => Err(CaptureError::InvalidState { state: other.label() }),
        }
    }

    /// Toggle playback of the recorded artifact.
    ///
    /// Valid only when an artifact exists; the first toggle moves
    /// Stopped → Reviewing. Returns whether playback is now running.
    pub async fn toggle_playback(&self) -> Result<bool, CaptureError> {
        let mut guard = self.state.lock().await;
        let state = std::mem::replace(&mut *guard, CaptureState::Idle);

        match state {
            CaptureState::Stopped {
                artifact,
                mut playback,
            }
            | CaptureState::Reviewing {
                artifact,
                mut playback,
            } => {
                playback.toggle();
                let playing = playback.is_playing();
                *guard = CaptureState::Reviewing { artifact, playback };
                Ok(playing)
            }
            other => {
                let err = CaptureError::NoArtifact;
                *guard = other;
                Err(err)
            }
        }
    }

    /// Advance the playback cursor. Reaching the end of the artifact
    /// resets playback to paused at position zero.
    pub async fn playback_tick(&self, seconds: u64) {
        let mut state = self.state.lock().await;
        if let CaptureState::Reviewing { playback, .. } = &mut *state {
            playback.advance(seconds);
        }
    }

    /// Elapsed seconds of the active recording, or the frozen duration of
    /// the recorded artifact. 1-second resolution.
    pub async fn elapsed_seconds(&self) -> u64 {
        let state = self.state.lock().await;
        match &*state {
            CaptureState::Recording { started_at } => started_at.elapsed().as_secs(),
            CaptureState::Stopped { artifact, .. } | CaptureState::Reviewing { artifact, .. } => {
                artifact.duration_seconds
            }
            _ => 0,
        }
    }

    /// The recorded artifact, if one exists.
    pub async fn artifact(&self) -> Option<RawArtifact> {
        let state = self.state.lock().await;
        match &*state {
            CaptureState::Stopped { artifact, .. } | CaptureState::Reviewing { artifact, .. } => {
                Some(artifact.clone())
            }
            _ => None,
        }
    }

    /// Current state snapshot for status queries.
    pub async fn status(&self) -> CaptureStatus {
        let state = self.state.lock().await;
        let (has_artifact, playing, position_seconds) = match &*state {
            CaptureState::Stopped { playback, .. } | CaptureState::Reviewing { playback, .. } => {
                (true, playback.is_playing(), playback.position_seconds())
            }
            _ => (false, false, 0),
        };
        let elapsed_seconds = match &*state {
            CaptureState::Recording { started_at } => started_at.elapsed().as_secs(),
            CaptureState::Stopped { artifact, .. } | CaptureState::Reviewing { artifact, .. } => {
                artifact.duration_seconds
            }
            _ => 0,
        };

        CaptureStatus {
            state: state.label().to_string(),
            elapsed_seconds,
            has_artifact,
            playing,
            position_seconds,
        }
    }
}

/// Accumulate frames until the device channel closes.
async fn collect_frames(
    mut frame_rx: mpsc::Receiver<AudioFrame>,
    config: AudioInputConfig,
) -> CollectedAudio {
    let mut samples = Vec::new();
    let mut sample_rate = config.sample_rate;
    let mut channels = config.channels;
    let mut first = true;

    while let Some(frame) = frame_rx.recv().await {
        if first {
            sample_rate = frame.sample_rate;
            channels = frame.channels;
            first = false;
        }
        samples.extend_from_slice(&frame.samples);
    }

    CollectedAudio {
        samples,
        sample_rate,
        channels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::device::ToneInput;

    fn recorder() -> VoiceRecorder {
        let config = AudioInputConfig::default();
        VoiceRecorder::new(Box::new(ToneInput::new(config.clone())), config)
    }

    #[tokio::test]
    async fn stop_without_start_is_an_error_not_a_crash() {
        let rec = recorder();
        assert!(matches!(
            rec.stop().await,
            Err(CaptureError::InvalidState { state: "idle" })
        ));
    }

    #[tokio::test]
    async fn start_while_recording_is_rejected() {
        let rec = recorder();
        rec.start().await.unwrap();
        assert!(matches!(
            rec.start().await,
            Err(CaptureError::RecordingInProgress)
        ));
        rec.stop().await.unwrap();
    }

    #[tokio::test]
    async fn discard_is_idempotent() {
        let rec = recorder();
        rec.start().await.unwrap();
        rec.stop().await.unwrap();

        rec.discard().await.unwrap();
        assert_eq!(rec.status().await.state, "idle");
        rec.discard().await.unwrap();
        assert_eq!(rec.status().await.state, "idle");
    }

    #[tokio::test]
    async fn playback_requires_an_artifact() {
        let rec = recorder();
        assert!(matches!(
            rec.toggle_playback().await,
            Err(CaptureError::NoArtifact)
        ));
        // The failed toggle must not corrupt the state.
        assert_eq!(rec.status().await.state, "idle");
    }

    #[tokio::test]
    async fn toggle_moves_stopped_to_reviewing() {
        let rec = recorder();
        rec.start().await.unwrap();
        rec.stop().await.unwrap();
        assert_eq!(rec.status().await.state, "stopped");

        let playing = rec.toggle_playback().await.unwrap();
        assert!(playing);
        assert_eq!(rec.status().await.state, "reviewing");

        let playing = rec.toggle_playback().await.unwrap();
        assert!(!playing);
    }

    #[tokio::test]
    async fn artifact_is_a_wav_container() {
        let rec = recorder();
        rec.start().await.unwrap();
        rec.stop().await.unwrap();

        let artifact = rec.artifact().await.unwrap();
        assert_eq!(&artifact.bytes[..4], b"RIFF");
        assert_eq!(&artifact.bytes[8..12], b"WAVE");
        assert_eq!(artifact.sample_rate, 16000);
        assert_eq!(artifact.channels, 1);
    }
}
