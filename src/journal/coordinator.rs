use std::sync::Arc;

use tracing::{info, warn};

use crate::capture::VoiceRecorder;
use crate::transport::{self, UploadGateway};

use super::entry::{DraftContent, DreamDraft, DreamEntry, DreamKind};
use super::error::JournalError;
use super::identity::IdentityProvider;
use super::store::{DreamStore, StoreError};

/// Orchestrates saving a dream draft: validation, the encode → upload
/// handoff for recordings, record construction, and persistence.
pub struct DreamEntryCoordinator {
    store: Arc<dyn DreamStore>,
    gateway: Arc<dyn UploadGateway>,
    identity: Arc<dyn IdentityProvider>,
    collection: String,
    destination_hint: String,
}

impl DreamEntryCoordinator {
    pub fn new(
        store: Arc<dyn DreamStore>,
        gateway: Arc<dyn UploadGateway>,
        identity: Arc<dyn IdentityProvider>,
        destination_hint: String,
    ) -> Self {
        Self {
            store,
            gateway,
            identity,
            collection: "dreams".to_string(),
            destination_hint,
        }
    }

    /// Save a draft as a dream entry.
    ///
    /// Validation happens before any I/O. On the audio path, an encode or
    /// upload failure aborts the save and leaves the recorder (and its
    /// artifact) untouched so the user can retry; an entry is never
    /// partially persisted. On success the recorder is reset to Idle and
    /// the consumed draft is gone.
    pub async fn save(
        &self,
        draft: DreamDraft,
        recorder: &VoiceRecorder,
    ) -> Result<DreamEntry, JournalError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(JournalError::Validation(
                "a title is required".to_string(),
            ));
        }

        let owner = self.identity.current_owner();
        let owner_id = owner.clone().unwrap_or_default();

        let mut entry = match draft.content {
            DraftContent::Text { body } => {
                let body = body.trim();
                if body.is_empty() {
                    return Err(JournalError::Validation(
                        "a dream description is required".to_string(),
                    ));
                }
                DreamEntry::text(owner_id, title.to_string(), body.to_string())
            }
            DraftContent::Audio => {
                let artifact = recorder.artifact().await.ok_or_else(|| {
                    JournalError::Validation("record your dream first".to_string())
                })?;

                let payload = transport::encode(&artifact)?;
                let uploaded = self
                    .gateway
                    .upload(&payload, &self.destination_hint)
                    .await?;

                DreamEntry::audio(
                    owner_id,
                    title.to_string(),
                    uploaded.reference,
                    artifact.duration_seconds,
                )
            }
        };

        match owner {
            Some(_) => {
                let document = serde_json::to_value(&entry)
                    .map_err(|e| StoreError::Malformed(e.to_string()))?;
                entry.id = self.store.create(&self.collection, document).await?;
            }
            None => {
                warn!("No signed-in owner; dream entry kept local only");
                entry.id = uuid::Uuid::new_v4().to_string();
            }
        }

        // The artifact now lives behind the uploaded reference; release
        // the recorder for the next capture.
        if entry.kind == DreamKind::Audio {
            if let Err(e) = recorder.discard().await {
                warn!("Could not reset recorder after save: {}", e);
            }
        }

        info!(
            "Dream saved: \"{}\" ({:?}, id={})",
            entry.title, entry.kind, entry.id
        );

        Ok(entry)
    }

    /// The owner's entries, newest first. Anonymous sessions see an empty
    /// journal rather than fabricated demo data.
    pub async fn list(&self) -> Result<Vec<DreamEntry>, JournalError> {
        let Some(owner) = self.identity.current_owner() else {
            warn!("No signed-in owner; dream list is empty");
            return Ok(Vec::new());
        };

        let documents = self
            .store
            .query(&self.collection, &owner, "created_at", true)
            .await?;

        documents
            .into_iter()
            .map(|doc| {
                serde_json::from_value(doc)
                    .map_err(|e| JournalError::Store(StoreError::Malformed(e.to_string())))
            })
            .collect()
    }
}
