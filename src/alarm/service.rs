//! Chime orchestration service

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::chimes::{ChimeError, ChimeStore};
use crate::schedule::{self, ScheduleError};
use crate::settings::Settings;
use crate::storage::{KeyValueStore, StorageError};

use super::{
    ALARM_NAME, ALARM_PERIOD_MINUTES, AlarmInfo, AlarmSchedule, AlarmService, AudioSink,
    DRIFT_TOLERANCE_MS, PlaybackError, needs_recreate, preset_url,
};

#[derive(Debug, Error)]
pub enum AlarmError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Chimes(#[from] ChimeError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

/// What a firing resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmOutcome {
    /// A chime was dispatched to the audio sink.
    Played { hour: u8 },
    /// No audio exists for the hour; playback was skipped.
    Skipped { hour: u8 },
    /// The firing was stale; the alarm should be re-registered with this
    /// schedule instead of playing.
    Rescheduled(AlarmSchedule),
}

/// Orchestrates the hourly chime: settings are loaded once per event and
/// passed down, the schedule calculator picks the hour, and the chime store
/// or a preset asset path supplies the audio.
pub struct ChimeService<S, A> {
    store: S,
    chimes: ChimeStore<S>,
    audio: A,
}

impl<S: KeyValueStore + Clone, A: AudioSink> ChimeService<S, A> {
    pub fn new(store: S, audio: A) -> Self {
        Self {
            chimes: ChimeStore::new(store.clone()),
            store,
            audio,
        }
    }

    /// The custom chime manager backed by the same record.
    pub fn chimes(&self) -> &ChimeStore<S> {
        &self.chimes
    }

    /// Schedule for the next top-of-hour in the configured timezone.
    pub async fn next_schedule(&self) -> Result<AlarmSchedule, AlarmError> {
        self.next_schedule_at(Utc::now()).await
    }

    pub(crate) async fn next_schedule_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<AlarmSchedule, AlarmError> {
        let settings = Settings::load(&self.store).await?;
        let timezone = settings.parse_timezone()?;
        Ok(AlarmSchedule {
            when: schedule::next_top_of_hour_at(now, timezone),
            period_minutes: ALARM_PERIOD_MINUTES,
        })
    }

    /// Register the hourly alarm with the timer service.
    pub async fn register<T: AlarmService>(&self, timer: &T) -> Result<(), AlarmError> {
        let schedule = self.next_schedule().await?;
        timer.create(ALARM_NAME, schedule).await;
        Ok(())
    }

    /// Recreate the alarm if it is missing, overdue, or scheduled too far
    /// out.
    pub async fn ensure_registered<T: AlarmService>(&self, timer: &T) -> Result<(), AlarmError> {
        self.ensure_registered_at(timer, Utc::now()).await
    }

    pub(crate) async fn ensure_registered_at<T: AlarmService>(
        &self,
        timer: &T,
        now: DateTime<Utc>,
    ) -> Result<(), AlarmError> {
        let existing = timer.get(ALARM_NAME).await;
        if needs_recreate(existing.as_ref(), now) {
            let schedule = self.next_schedule_at(now).await?;
            timer.create(ALARM_NAME, schedule).await;
        }
        Ok(())
    }

    /// Handle one alarm firing.
    pub async fn handle_alarm(&self, alarm: &AlarmInfo) -> Result<AlarmOutcome, AlarmError> {
        self.handle_alarm_at(alarm, Utc::now()).await
    }

    pub(crate) async fn handle_alarm_at(
        &self,
        alarm: &AlarmInfo,
        now: DateTime<Utc>,
    ) -> Result<AlarmOutcome, AlarmError> {
        let drift_ms = alarm
            .scheduled_time
            .signed_duration_since(now)
            .num_milliseconds()
            .abs();
        if drift_ms > DRIFT_TOLERANCE_MS {
            tracing::info!(drift_ms, "stale alarm firing, rescheduling");
            return Ok(AlarmOutcome::Rescheduled(self.next_schedule_at(now).await?));
        }

        let settings = Settings::load(&self.store).await?;
        let timezone = settings.parse_timezone()?;
        let hour = schedule::chime_hour_at(now, timezone);

        let url = if settings.is_custom() {
            self.chimes.get(hour).await?.map(|slot| slot.data)
        } else {
            Some(preset_url(&settings.chime, hour))
        };

        let Some(url) = url else {
            tracing::warn!(chime = %settings.chime, hour, "could not load chime");
            return Ok(AlarmOutcome::Skipped { hour });
        };

        self.audio.play(&url, settings.volume).await?;
        Ok(AlarmOutcome::Played { hour })
    }

    /// Abort ongoing playback (best-effort).
    pub async fn stop(&self) {
        self.audio.stop().await;
    }
}
