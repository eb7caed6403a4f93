//! Hourly alarm handling
//!
//! This module provides:
//! - **Contracts**: the platform timer ([`AlarmService`]) and audio playback
//!   ([`AudioSink`]) collaborators, modeled as traits
//! - **Service**: [`ChimeService`], the orchestration layer that validates
//!   timing drift on each firing, resolves the chime to play, and dispatches
//!   playback
//!
//! A firing whose drift exceeds the tolerance is not an error; it is an
//! expected condition (system sleep/resume, clock changes) that triggers a
//! reschedule instead of playback.

mod service;


pub use service::{AlarmError, AlarmOutcome, ChimeService};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::settings::KEY_TIMEZONE;

/// Name under which the hourly alarm registers with the timer service.
pub const ALARM_NAME: &str = "grandfather-fox";

/// Nominal alarm period.
pub const ALARM_PERIOD_MINUTES: u32 = 60;

/// Maximum tolerated drift between a firing's scheduled and actual instant.
pub const DRIFT_TOLERANCE_MS: i64 = 10_000;

/// An alarm scheduled further ahead than this is considered broken and is
/// recreated.
pub const ALARM_LOOKAHEAD_MS: i64 = 3_600_000;

/// A request to (re)register the hourly alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmSchedule {
    pub when: DateTime<Utc>,
    pub period_minutes: u32,
}

/// A registered alarm as reported by the timer service; firings carry the
/// originally scheduled instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmInfo {
    pub scheduled_time: DateTime<Utc>,
}

/// Platform timer collaborator. Delivers periodic firings externally; this
/// crate only registers and inspects the alarm.
#[allow(async_fn_in_trait)]
pub trait AlarmService {
    async fn create(&self, name: &str, schedule: AlarmSchedule);
    async fn get(&self, name: &str) -> Option<AlarmInfo>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("audio playback failed: {reason}")]
pub struct PlaybackError {
    pub reason: String,
}

/// Audio playback collaborator.
#[allow(async_fn_in_trait)]
pub trait AudioSink {
    async fn play(&self, url: &str, volume: f64) -> Result<(), PlaybackError>;

    /// Best-effort abort of ongoing playback.
    async fn stop(&self);
}

/// Whether the registered alarm must be recreated: it is missing, its
/// scheduled time is already in the past, or it is more than an hour out.
pub fn needs_recreate(alarm: Option<&AlarmInfo>, now: DateTime<Utc>) -> bool {
    match alarm {
        None => true,
        Some(info) => {
            let lead_ms = info
                .scheduled_time
                .signed_duration_since(now)
                .num_milliseconds();
            lead_ms < 0 || lead_ms > ALARM_LOOKAHEAD_MS
        }
    }
}

/// Whether a change to the persisted key invalidates the current schedule.
pub fn invalidates_schedule(key: &str) -> bool {
    key == KEY_TIMEZONE
}

/// Bundled asset path for a preset chime, e.g. `audio/default/7.ogg`.
pub fn preset_url(chime: &str, hour: u8) -> String {
    format!("audio/{chime}/{hour}.ogg")
}
