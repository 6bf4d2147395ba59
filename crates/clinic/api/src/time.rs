use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone};

/// Labels a locally selected wall-clock time with a fixed UTC offset.
///
/// The wall-clock value is kept as-is; only the offset label is attached,
/// so `2024-01-01 10:00` under `+03:00` becomes `2024-01-01T10:00:00+03:00`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AppointmentClock {
    offset: FixedOffset,
}

impl Default for AppointmentClock {
    fn default() -> Self {
        Self::with_offset_hours(Self::DEFAULT_OFFSET_HOURS).unwrap()
    }
}

impl AppointmentClock {
    pub const DEFAULT_OFFSET_HOURS: i32 = 3;

    pub const fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn with_offset_hours(hours: i32) -> Option<Self> {
        hours
            .checked_mul(60 * 60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
    }

    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn label(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        self.offset.from_local_datetime(&local).single()
    }

    pub fn encode(&self, local: NaiveDateTime) -> Option<String> {
        self.label(local).map(|date_time| format_rfc3339(&date_time))
    }
}

pub fn format_rfc3339(date_time: &DateTime<FixedOffset>) -> String {
    date_time.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Parses a wall-clock time typed by a user, e.g. `2024-01-01 10:00`.
pub fn parse_wall_clock(input: &str) -> Result<NaiveDateTime, ::chrono::ParseError> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];

    let input = input.trim();
    FORMATS
        .iter()
        .map(|format| NaiveDateTime::parse_from_str(input, format))
        .find(Result::is_ok)
        .unwrap_or_else(|| NaiveDateTime::parse_from_str(input, FORMATS[0]))
}

pub mod rfc3339 {
    use chrono::{DateTime, FixedOffset};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_rfc3339(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&value).map_err(de::Error::custom)
    }
}
