use base64::Engine;
use thiserror::Error;

use crate::capture::RawArtifact;

/// Errors from the artifact encoder.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("artifact is empty")]
    EmptyArtifact,

    #[error("payload is not valid base64: {0}")]
    Malformed(String),
}

/// Text-safe envelope of an artifact, suitable for a JSON transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportPayload(String);

impl TransportPayload {
    /// Wrap text that is already base64-encoded (e.g. received from a
    /// client rather than produced by `encode`).
    pub fn new(encoded: String) -> Self {
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Encode artifact bytes for upload. Deterministic; byte-exact under
/// `decode`.
pub fn encode(artifact: &RawArtifact) -> Result<TransportPayload, EncodingError> {
    if artifact.bytes.is_empty() {
        return Err(EncodingError::EmptyArtifact);
    }

    let encoded = base64::engine::general_purpose::STANDARD.encode(&artifact.bytes);
    Ok(TransportPayload(encoded))
}

/// Decode a payload back into the original bytes.
pub fn decode(payload: &TransportPayload) -> Result<Vec<u8>, EncodingError> {
    base64::engine::general_purpose::STANDARD
        .decode(payload.as_str())
        .map_err(|e| EncodingError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(bytes: Vec<u8>) -> RawArtifact {
        RawArtifact {
            bytes,
            duration_seconds: 1,
            sample_rate: 16000,
            channels: 1,
        }
    }

    #[test]
    fn round_trip_is_byte_exact() {
        let original: Vec<u8> = (0..=255).collect();
        let payload = encode(&artifact(original.clone())).unwrap();
        assert_eq!(decode(&payload).unwrap(), original);
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = encode(&artifact(vec![1, 2, 3])).unwrap();
        let b = encode(&artifact(vec![1, 2, 3])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_artifact_is_rejected() {
        assert!(matches!(
            encode(&artifact(Vec::new())),
            Err(EncodingError::EmptyArtifact)
        ));
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let payload = TransportPayload("not base64 !!!".to_string());
        assert!(matches!(decode(&payload), Err(EncodingError::Malformed(_))));
    }
}
