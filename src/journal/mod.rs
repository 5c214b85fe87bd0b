//! Dream journal
//!
//! This module owns the persisted side of the product:
//! - The `DreamEntry` model and draft validation
//! - `DreamEntryCoordinator`, which turns a draft (text or recording)
//!   into a persisted entry via the encode → upload handoff
//! - The `DreamStore` persistence collaborator and `IdentityProvider`
//! - The owner's sleep log and its aggregate summary

pub mod coordinator;
pub mod entry;
pub mod error;
pub mod identity;
pub mod sleep;
pub mod store;

pub use coordinator::DreamEntryCoordinator;
pub use entry::{format_duration, DraftContent, DreamDraft, DreamEntry, DreamKind};
pub use error::JournalError;
pub use identity::{IdentityProvider, StaticIdentity};
pub use sleep::{SleepLog, SleepRecord, SleepSummary};
pub use store::{DreamStore, MemoryStore, StoreError};
