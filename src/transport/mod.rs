//! Artifact transport: the base64 envelope and the one-shot upload
//! gateway that hands an encoded artifact to durable storage.

pub mod encode;
pub mod gateway;

pub use encode::{decode, encode, EncodingError, TransportPayload};
pub use gateway::{HttpUploadGateway, UploadError, UploadGateway, UploadResult};
