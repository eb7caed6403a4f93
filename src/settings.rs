//! User settings
//!
//! Settings live in the key-value record under the `chime`, `volume` and
//! `timezone` keys. A record read from storage is never trusted as complete
//! or well-typed: every read passes through [`Settings::from_record`], which
//! fills missing or invalid fields from one authoritative default table.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schedule::{AUTO_TIMEZONE, ScheduleError, Timezone};
use crate::storage::{KeyValueStore, Record, StorageError};

pub const KEY_CHIME: &str = "chime";
pub const KEY_VOLUME: &str = "volume";
pub const KEY_TIMEZONE: &str = "timezone";

/// Name of the built-in preset used when no chime is configured.
pub const DEFAULT_CHIME: &str = "default";
/// Sentinel chime value selecting user-uploaded audio.
pub const CUSTOM_CHIME: &str = "custom";
pub const DEFAULT_VOLUME: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Preset name, or [`CUSTOM_CHIME`] for user-uploaded audio.
    pub chime: String,
    /// Playback volume in `[0, 1]`.
    pub volume: f64,
    /// [`AUTO_TIMEZONE`] or an IANA timezone identifier.
    pub timezone: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chime: DEFAULT_CHIME.to_string(),
            volume: DEFAULT_VOLUME,
            timezone: AUTO_TIMEZONE.to_string(),
        }
    }
}

impl Settings {
    /// Normalize a persisted record into well-typed settings.
    ///
    /// A non-string `chime` or `timezone`, and a non-numeric or
    /// out-of-`[0, 1]` `volume`, are replaced by their defaults.
    pub fn from_record(record: &Record) -> Self {
        let chime = match record.get(KEY_CHIME) {
            Some(Value::String(s)) => s.clone(),
            _ => DEFAULT_CHIME.to_string(),
        };

        let volume = match record.get(KEY_VOLUME).and_then(Value::as_f64) {
            Some(v) if (0.0..=1.0).contains(&v) => v,
            _ => DEFAULT_VOLUME,
        };

        let timezone = match record.get(KEY_TIMEZONE) {
            Some(Value::String(s)) => s.clone(),
            _ => AUTO_TIMEZONE.to_string(),
        };

        Self {
            chime,
            volume,
            timezone,
        }
    }

    /// Render the settings back into their persisted key layout.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert(KEY_CHIME.to_string(), Value::String(self.chime.clone()));
        record.insert(KEY_VOLUME.to_string(), Value::from(self.volume));
        record.insert(
            KEY_TIMEZONE.to_string(),
            Value::String(self.timezone.clone()),
        );
        record
    }

    /// Read and normalize the settings from the store.
    pub async fn load<S: KeyValueStore>(store: &S) -> Result<Self, StorageError> {
        let record = store.get(&[KEY_CHIME, KEY_VOLUME, KEY_TIMEZONE]).await?;
        Ok(Self::from_record(&record))
    }

    /// Persist the settings verbatim.
    pub async fn save<S: KeyValueStore>(&self, store: &S) -> Result<(), StorageError> {
        store.set(self.to_record()).await
    }

    /// Whether user-uploaded chimes are selected.
    pub fn is_custom(&self) -> bool {
        self.chime == CUSTOM_CHIME
    }

    /// Parse the configured timezone. An unrecognized identifier is a
    /// configuration error propagated to the caller, not swallowed.
    pub fn parse_timezone(&self) -> Result<Timezone, ScheduleError> {
        self.timezone.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    #[test]
    fn empty_record_yields_defaults() {
        let settings = Settings::from_record(&Record::new());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn out_of_range_volume_normalizes_to_default() {
        let mut record = Record::new();
        record.insert("volume".into(), json!(5));

        let settings = Settings::from_record(&record);
        assert_eq!(settings.chime, "default");
        assert_eq!(settings.volume, 1.0);
        assert_eq!(settings.timezone, "auto");
    }

    #[test]
    fn wrong_types_normalize_to_defaults() {
        let mut record = Record::new();
        record.insert("chime".into(), json!(42));
        record.insert("volume".into(), json!("loud"));
        record.insert("timezone".into(), json!(["UTC"]));

        assert_eq!(Settings::from_record(&record), Settings::default());
    }

    #[test]
    fn valid_fields_pass_through() {
        let mut record = Record::new();
        record.insert("chime".into(), json!("custom"));
        record.insert("volume".into(), json!(0.4));
        record.insert("timezone".into(), json!("Europe/Berlin"));

        let settings = Settings::from_record(&record);
        assert!(settings.is_custom());
        assert_eq!(settings.volume, 0.4);
        assert_eq!(settings.timezone, "Europe/Berlin");
        assert!(matches!(
            settings.parse_timezone().unwrap(),
            Timezone::Named(_)
        ));
    }

    #[test]
    fn volume_boundaries_are_valid() {
        for volume in [0.0, 1.0] {
            let mut record = Record::new();
            record.insert("volume".into(), json!(volume));
            assert_eq!(Settings::from_record(&record).volume, volume);
        }
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = MemoryStore::new();
        let settings = Settings {
            chime: "westminster".to_string(),
            volume: 0.7,
            timezone: "America/New_York".to_string(),
        };
        settings.save(&store).await.unwrap();

        let loaded = Settings::load(&store).await.unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        let settings = Settings {
            timezone: "Not/A_Zone".to_string(),
            ..Settings::default()
        };
        assert!(settings.parse_timezone().is_err());
    }
}
