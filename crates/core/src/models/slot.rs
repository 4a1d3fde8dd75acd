use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A single time interval inside a schedule.
///
/// Times are wall-clock values interpreted in the owning schedule's time zone.
/// Fields the client sends that are not modelled here (a `description`, for
/// example) are carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Empty until one is assigned on save or import.
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Slot {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            id: String::new(),
            title: None,
            start_date,
            end_date,
            start_time,
            end_time,
            extra: Map::new(),
        }
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Assigns a fresh id if the slot has none. Returns true when one was assigned.
    pub fn ensure_id(&mut self) -> bool {
        if self.has_id() {
            return false;
        }
        self.id = new_slot_id();
        true
    }
}

/// Generates a collision-resistant slot identifier.
pub fn new_slot_id() -> String {
    Uuid::new_v4().to_string()
}

/// `HH:MM` wall-clock times. Input must already be in that exact shape, so a
/// stored time always serializes back to the string it was read from.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let time = NaiveTime::parse_from_str(&raw, FORMAT)
            .map_err(|e| D::Error::custom(format!("invalid time of day {raw:?}: {e}")))?;
        if time.format(FORMAT).to_string() != raw {
            return Err(D::Error::custom(format!(
                "invalid time of day {raw:?}: expected HH:MM"
            )));
        }
        Ok(time)
    }
}
