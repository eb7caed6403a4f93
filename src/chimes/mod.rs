//! Custom chime storage
//!
//! This module provides:
//! - **Manager**: CRUD access to the 12 custom audio slots, with a cached
//!   occupancy index kept consistent with the persisted record
//! - **Validation**: media-type and size checks applied before any
//!   persistence attempt

mod manager;
mod validate;


pub use manager::{
    ChimeError, ChimeSlot, ChimeStore, KEY_CUSTOM_CHIMES, MAX_HOUR, MIN_HOUR, slot_key,
};
pub use validate::{MAX_UPLOAD_BYTES, UploadError, validate_upload};
