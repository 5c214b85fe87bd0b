use thiserror::Error;

/// Errors from the voice capture state machine.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Microphone permission denied or no input device present.
    #[error("audio input unavailable: {0}")]
    DeviceUnavailable(String),

    /// A recording is already armed or running on this controller.
    #[error("a recording is already in progress")]
    RecordingInProgress,

    /// The operation is not valid in the current state.
    #[error("operation not valid while {state}")]
    InvalidState { state: &'static str },

    /// Playback was requested but no artifact exists.
    #[error("no recorded artifact")]
    NoArtifact,

    /// The captured frames could not be assembled into an artifact.
    #[error("failed to assemble artifact: {0}")]
    Artifact(String),
}
