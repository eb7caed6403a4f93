//! Upload validation for custom chimes
//!
//! Applied by the uploading caller before any persistence attempt; a
//! rejection leaves the slot unchanged.

use thiserror::Error;

/// Maximum accepted upload size in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 5_000_000;

const ACCEPTED_MEDIA_TYPES: [&str; 4] = ["audio/mpeg", "audio/ogg", "video/ogg", "audio/wav"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("unsupported file type '{media_type}' (must be MP3, OGG, or WAV)")]
    UnsupportedType { media_type: String },

    #[error("file is too large ({size} bytes, must be 5 MB or less)")]
    TooLarge { size: u64 },
}

/// Check an upload's media type and size against the accepted set and the
/// size cap.
pub fn validate_upload(media_type: &str, size: u64) -> Result<(), UploadError> {
    if !ACCEPTED_MEDIA_TYPES.contains(&media_type) {
        return Err(UploadError::UnsupportedType {
            media_type: media_type.to_string(),
        });
    }

    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge { size });
    }

    Ok(())
}
