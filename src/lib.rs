pub mod capture;
pub mod config;
pub mod http;
pub mod interpret;
pub mod journal;
pub mod transport;

pub use capture::{
    AudioFrame, AudioInput, AudioInputConfig, CaptureError, CaptureStatus, PlaybackCursor,
    RawArtifact, ToneInput, VoiceRecorder,
};
pub use config::Config;
pub use http::{create_router, AppState};
pub use interpret::{
    ChatCompletionsClient, ChatMessage, CompletionClient, InferenceError, InterpretError,
    InterpretationSession, InterpreterConfig, Sender,
};
pub use journal::{
    DraftContent, DreamDraft, DreamEntry, DreamEntryCoordinator, DreamKind, DreamStore,
    IdentityProvider, JournalError, MemoryStore, SleepLog, SleepRecord, SleepSummary,
    StaticIdentity, StoreError,
};
pub use transport::{
    HttpUploadGateway, TransportPayload, UploadError, UploadGateway, UploadResult,
};
