// Integration tests for the voice capture state machine
//
// These tests verify the Idle → Armed → Recording → Stopped → Reviewing
// transitions, timed recording, exclusive device ownership, and the
// failure paths that must leave the controller back in Idle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use nyx_journal::capture::{
    AudioFrame, AudioInput, AudioInputConfig, CaptureError, ToneInput, VoiceRecorder,
};
use tokio::sync::mpsc;

fn tone_recorder() -> VoiceRecorder {
    let config = AudioInputConfig::default();
    VoiceRecorder::new(Box::new(ToneInput::new(config.clone())), config)
}

/// Device that counts acquisitions, to pin down exclusive ownership.
struct CountingInput {
    opens: Arc<AtomicUsize>,
    frame_tx: Option<mpsc::Sender<AudioFrame>>,
}

impl CountingInput {
    fn new(opens: Arc<AtomicUsize>) -> Self {
        Self {
            opens,
            frame_tx: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioInput for CountingInput {
    async fn open(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(8);
        self.frame_tx = Some(tx);
        Ok(rx)
    }

    async fn close(&mut self) -> Result<(), CaptureError> {
        self.frame_tx = None;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.frame_tx.is_some()
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Device that always refuses to open (permission denied).
struct DeniedInput;

#[async_trait::async_trait]
impl AudioInput for DeniedInput {
    async fn open(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        Err(CaptureError::DeviceUnavailable(
            "microphone permission denied".to_string(),
        ))
    }

    async fn close(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    fn is_open(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "denied"
    }
}

#[tokio::test(start_paused = true)]
async fn three_second_recording_freezes_elapsed_at_three() -> Result<()> {
    let recorder = tone_recorder();

    recorder.start().await?;
    tokio::time::advance(Duration::from_secs(3)).await;
    assert_eq!(recorder.elapsed_seconds().await, 3);

    recorder.stop().await?;

    let artifact = recorder.artifact().await.expect("artifact after stop");
    assert_eq!(artifact.duration_seconds, 3);
    assert!(!artifact.bytes.is_empty());
    assert_eq!(recorder.elapsed_seconds().await, 3);

    Ok(())
}

#[tokio::test]
async fn device_is_acquired_at_most_once_per_recording() -> Result<()> {
    let opens = Arc::new(AtomicUsize::new(0));
    let config = AudioInputConfig::default();
    let recorder = VoiceRecorder::new(Box::new(CountingInput::new(opens.clone())), config);

    recorder.start().await?;
    assert_eq!(opens.load(Ordering::SeqCst), 1);

    // A second start is rejected and must not touch the device again.
    assert!(matches!(
        recorder.start().await,
        Err(CaptureError::RecordingInProgress)
    ));
    assert_eq!(opens.load(Ordering::SeqCst), 1);

    recorder.stop().await?;
    recorder.discard().await?;

    // A fresh recording acquires the device once more.
    recorder.start().await?;
    assert_eq!(opens.load(Ordering::SeqCst), 2);
    recorder.stop().await?;

    Ok(())
}

#[tokio::test]
async fn stop_without_start_is_an_error_never_a_crash() {
    let recorder = tone_recorder();
    assert!(matches!(
        recorder.stop().await,
        Err(CaptureError::InvalidState { .. })
    ));
    assert_eq!(recorder.status().await.state, "idle");
}

#[tokio::test]
async fn denied_device_surfaces_error_and_returns_to_idle() -> Result<()> {
    let config = AudioInputConfig::default();
    let recorder = VoiceRecorder::new(Box::new(DeniedInput), config);

    let err = recorder.start().await.unwrap_err();
    assert!(matches!(err, CaptureError::DeviceUnavailable(_)));

    // The controller is back in Idle and a retry is possible.
    assert_eq!(recorder.status().await.state, "idle");
    assert!(matches!(
        recorder.start().await,
        Err(CaptureError::DeviceUnavailable(_))
    ));

    Ok(())
}

#[tokio::test]
async fn discard_twice_leaves_idle_both_times() -> Result<()> {
    let recorder = tone_recorder();
    recorder.start().await?;
    recorder.stop().await?;
    assert!(recorder.artifact().await.is_some());

    recorder.discard().await?;
    assert_eq!(recorder.status().await.state, "idle");
    assert!(recorder.artifact().await.is_none());
    assert_eq!(recorder.elapsed_seconds().await, 0);

    recorder.discard().await?;
    assert_eq!(recorder.status().await.state, "idle");

    Ok(())
}

#[tokio::test]
async fn playback_reaching_end_resets_to_paused_at_zero() -> Result<()> {
    let recorder = tone_recorder();
    recorder.start().await?;
    recorder.stop().await?;

    let playing = recorder.toggle_playback().await?;
    assert!(playing);

    let duration = recorder.artifact().await.unwrap().duration_seconds;
    recorder.playback_tick(duration + 1).await;

    let status = recorder.status().await;
    assert!(!status.playing);
    assert_eq!(status.position_seconds, 0);
    assert_eq!(status.state, "reviewing");

    Ok(())
}

#[tokio::test]
async fn discard_after_review_allows_a_new_recording() -> Result<()> {
    let recorder = tone_recorder();
    recorder.start().await?;
    recorder.stop().await?;
    recorder.toggle_playback().await?;
    recorder.discard().await?;

    recorder.start().await?;
    recorder.stop().await?;
    assert!(recorder.artifact().await.is_some());

    Ok(())
}
