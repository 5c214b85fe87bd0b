//! Voice capture
//!
//! This module owns the capture side of the journal:
//! - The `AudioInput` device abstraction and the synthetic `ToneInput`
//! - The `VoiceRecorder` state machine (Idle → Armed → Recording →
//!   Stopped → Reviewing) with timed recording and in-memory WAV assembly
//! - Playback of the recorded artifact before it is saved

pub mod device;
pub mod error;
pub mod playback;
pub mod recorder;

pub use device::{AudioFrame, AudioInput, AudioInputConfig, ToneInput};
pub use error::CaptureError;
pub use playback::PlaybackCursor;
pub use recorder::{CaptureStatus, RawArtifact, VoiceRecorder};
