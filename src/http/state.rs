use std::sync::Arc;

use crate::capture::VoiceRecorder;
use crate::interpret::InterpretationSession;
use crate::journal::{DreamEntryCoordinator, SleepLog};

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub recorder: Arc<VoiceRecorder>,
    pub coordinator: Arc<DreamEntryCoordinator>,
    pub sleep: Arc<SleepLog>,
    pub interpreter: Arc<InterpretationSession>,
}

impl AppState {
    pub fn new(
        recorder: Arc<VoiceRecorder>,
        coordinator: Arc<DreamEntryCoordinator>,
        sleep: Arc<SleepLog>,
        interpreter: Arc<InterpretationSession>,
    ) -> Self {
        Self {
            recorder,
            coordinator,
            sleep,
            interpreter,
        }
    }
}
