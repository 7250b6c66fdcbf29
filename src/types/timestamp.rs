use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Anything that can be resolved to a single UTC instant.
///
/// Text inputs are tried against the formats the data sources actually emit:
/// RFC 3339, the OpenWeatherMap `dt_txt` layout (`2024-05-01 15:00:00`), and
/// plain dates as found in ticker CSV files (read as midnight UTC).
pub trait IntoTimestamp {
    fn into_timestamp(self) -> Option<DateTime<Utc>>;
}

impl IntoTimestamp for NaiveDateTime {
    fn into_timestamp(self) -> Option<DateTime<Utc>> {
        Some(Utc.from_utc_datetime(&self))
    }
}

impl IntoTimestamp for DateTime<Local> {
    fn into_timestamp(self) -> Option<DateTime<Utc>> {
        Some(self.with_timezone(&Utc))
    }
}

impl IntoTimestamp for DateTime<Utc> {
    fn into_timestamp(self) -> Option<DateTime<Utc>> {
        Some(self)
    }
}

impl IntoTimestamp for DateTime<FixedOffset> {
    fn into_timestamp(self) -> Option<DateTime<Utc>> {
        Some(self.with_timezone(&Utc))
    }
}

impl IntoTimestamp for NaiveDate {
    fn into_timestamp(self) -> Option<DateTime<Utc>> {
        self.and_hms_opt(0, 0, 0)?.into_timestamp()
    }
}

impl IntoTimestamp for &str {
    fn into_timestamp(self) -> Option<DateTime<Utc>> {
        let text = self.trim();
        if let Ok(dt) = text.parse::<DateTime<Utc>>() {
            return Some(dt);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return dt.into_timestamp();
        }
        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(naive_dt) = NaiveDateTime::parse_from_str(text, format) {
                return naive_dt.into_timestamp();
            }
        }
        if let Ok(naive_date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return naive_date.into_timestamp();
        }
        None
    }
}

impl IntoTimestamp for String {
    fn into_timestamp(self) -> Option<DateTime<Utc>> {
        self.as_str().into_timestamp()
    }
}

/// Resolves a unix timestamp in seconds, as carried in the `dt` field of weather payloads.
pub(crate) fn from_unix_seconds(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}
