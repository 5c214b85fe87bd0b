use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a dream entry carries: written text or a voice recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DreamKind {
    Text,
    Audio,
}

/// A saved dream. Immutable once persisted.
///
/// Exactly one of `body` / `audio_ref` is populated, consistent with
/// `kind`; the constructors are the only way to build one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DreamEntry {
    pub id: String,
    pub owner: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub kind: DreamKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
}

impl DreamEntry {
    pub fn text(owner: String, title: String, body: String) -> Self {
        Self {
            id: String::new(),
            owner,
            title,
            created_at: Utc::now(),
            kind: DreamKind::Text,
            body: Some(body),
            audio_ref: None,
            duration_seconds: None,
        }
    }

    pub fn audio(owner: String, title: String, audio_ref: String, duration_seconds: u64) -> Self {
        Self {
            id: String::new(),
            owner,
            title,
            created_at: Utc::now(),
            kind: DreamKind::Audio,
            body: None,
            audio_ref: Some(audio_ref),
            duration_seconds: Some(duration_seconds),
        }
    }
}

/// In-progress, unsaved user input.
#[derive(Debug, Clone, Deserialize)]
pub struct DreamDraft {
    pub title: String,
    #[serde(flatten)]
    pub content: DraftContent,
}

/// Draft content: written text or the recorder's pending artifact.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum DraftContent {
    Text { body: String },
    Audio,
}

/// Format a duration as mm:ss for display.
pub fn format_duration(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_entry_has_body_and_no_audio_ref() {
        let entry = DreamEntry::text(
            "ada@example.com".into(),
            "Flight".into(),
            "I was flying over mountains".into(),
        );
        assert_eq!(entry.kind, DreamKind::Text);
        assert!(entry.body.is_some());
        assert!(entry.audio_ref.is_none());
        assert!(entry.duration_seconds.is_none());
    }

    #[test]
    fn audio_entry_has_audio_ref_and_no_body() {
        let entry = DreamEntry::audio(
            "ada@example.com".into(),
            "Nightmare".into(),
            "https://blob.example/dream.wav".into(),
            3,
        );
        assert_eq!(entry.kind, DreamKind::Audio);
        assert!(entry.body.is_none());
        assert_eq!(
            entry.audio_ref.as_deref(),
            Some("https://blob.example/dream.wav")
        );
        assert_eq!(entry.duration_seconds, Some(3));
    }

    #[test]
    fn unpopulated_side_is_omitted_from_documents() {
        let entry = DreamEntry::text("o".into(), "t".into(), "b".into());
        let doc = serde_json::to_value(&entry).unwrap();
        assert!(doc.get("audio_ref").is_none());
        assert!(doc.get("duration_seconds").is_none());
    }

    #[test]
    fn draft_deserializes_both_modes() {
        let text: DreamDraft =
            serde_json::from_str(r#"{"title":"Flight","mode":"text","body":"..."}"#).unwrap();
        assert!(matches!(text.content, DraftContent::Text { .. }));

        let audio: DreamDraft =
            serde_json::from_str(r#"{"title":"Nightmare","mode":"audio"}"#).unwrap();
        assert!(matches!(audio.content, DraftContent::Audio));
    }

    #[test]
    fn durations_format_as_minutes_and_seconds() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(3), "00:03");
        assert_eq!(format_duration(75), "01:15");
        assert_eq!(format_duration(600), "10:00");
    }
}
