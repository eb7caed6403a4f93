pub mod alarm;
pub mod chimes;
pub mod schedule;
pub mod settings;
pub mod storage;

// Re-exports for convenience
pub use alarm::{
    ALARM_NAME, AlarmInfo, AlarmOutcome, AlarmSchedule, AlarmService, AudioSink, ChimeService,
    PlaybackError, invalidates_schedule, needs_recreate, preset_url,
};
pub use chimes::{ChimeError, ChimeSlot, ChimeStore, UploadError, validate_upload};
pub use schedule::{ScheduleError, Timezone, chime_hour, current_time_in_zone, next_top_of_hour};
pub use settings::Settings;
pub use storage::{FileStore, KeyValueStore, MemoryStore, Record, StorageError};
