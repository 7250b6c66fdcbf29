//! Typed models of the OpenWeatherMap `forecast` and `weather` payloads.
//!
//! Every field the API may omit is an `Option`. Turning a payload into
//! [`TimeSeriesPoint`]s or a [`CurrentConditions`] snapshot is the validation
//! step: anything missing or non-numeric surfaces as
//! [`SeriesError::MalformedInput`] instead of leaking into the trend pipeline.

use crate::series::error::SeriesError;
use crate::sources::error::SourceError;
use crate::types::point::TimeSeriesPoint;
use crate::types::temperature_alert::TemperatureAlert;
use crate::types::timestamp::{from_unix_seconds, IntoTimestamp};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One match of the geocoding `direct` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: Option<String>,
}

impl GeoLocation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lon: self.lon,
        }
    }

    /// Parses a geocoding body and returns its best match for `city`.
    ///
    /// # Errors
    ///
    /// [`SourceError::CityNotFound`] if the match list is empty,
    /// [`SourceError::JsonParse`] if the body is not a list of locations.
    pub fn first_from_json(body: &str, city: &str) -> Result<Self, SourceError> {
        let matches: Vec<GeoLocation> = serde_json::from_str(body)?;
        matches
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::CityNotFound(city.to_string()))
    }
}

/// The `main` block shared by forecast entries and current weather.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MainReadings {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConditionDescriptor {
    /// Coarse group such as "Rain" or "Clouds".
    pub main: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Wind {
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SunTimes {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct City {
    pub name: Option<String>,
    pub country: Option<String>,
    pub coord: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastEntry {
    pub dt: Option<i64>,
    #[serde(default)]
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<ConditionDescriptor>,
    pub dt_txt: Option<String>,
}

/// Response of the 5 day / 3 hour `forecast` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastResponse {
    /// Sent as a string by this endpoint ("200"), but tolerated as a number too.
    pub cod: Value,
    pub message: Option<Value>,
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
    pub city: Option<City>,
}

/// Response of the current `weather` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentWeather {
    pub cod: Value,
    pub message: Option<Value>,
    pub name: Option<String>,
    pub coord: Option<Coordinates>,
    #[serde(default)]
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<ConditionDescriptor>,
    pub wind: Option<Wind>,
    pub sys: Option<SunTimes>,
    pub dt: Option<i64>,
    /// Metres.
    pub visibility: Option<f64>,
}

/// Validated snapshot of current conditions, see [`CurrentWeather::conditions`].
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub name: Option<String>,
    pub observed_at: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub humidity: f64,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub visibility_km: Option<f64>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub location: Option<Coordinates>,
}

impl CurrentConditions {
    /// True once the observation time is past today's sunset.
    pub fn is_night(&self) -> bool {
        self.sunset.is_some_and(|sunset| self.observed_at > sunset)
    }

    pub fn alert(&self, high_threshold: f64) -> TemperatureAlert {
        TemperatureAlert::classify(self.temperature, high_threshold)
    }
}

/// Interprets the `cod` field, which the API sends as a string on some
/// endpoints and as a number on others.
fn status_code(cod: &Value) -> Option<u16> {
    match cod {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        _ => None,
    }
}

pub(crate) fn check_status(cod: &Value, message: Option<&Value>) -> Result<(), SourceError> {
    match status_code(cod) {
        Some(200) => Ok(()),
        status => Err(SourceError::ApiStatus {
            status: status.unwrap_or_default(),
            message: match message {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => format!("unexpected status code {cod}"),
            },
        }),
    }
}

impl ForecastResponse {
    /// Parses a forecast body and checks its embedded status code.
    ///
    /// # Errors
    ///
    /// [`SourceError::JsonParse`] for invalid JSON, [`SourceError::ApiStatus`] if
    /// `cod` is anything but 200 (e.g. `{"cod":"404","message":"city not found"}`).
    pub fn from_json(body: &str) -> Result<Self, SourceError> {
        let response: ForecastResponse = serde_json::from_str(body)?;
        check_status(&response.cod, response.message.as_ref())?;
        Ok(response)
    }

    pub fn city_name(&self) -> Option<&str> {
        self.city.as_ref().and_then(|c| c.name.as_deref())
    }

    /// Converts every forecast entry into a point: temperature is the
    /// measurement, humidity the auxiliary feature. The timestamp comes from
    /// `dt_txt`, falling back to the unix `dt`.
    ///
    /// # Errors
    ///
    /// [`SeriesError::MalformedInput`] naming the first offending entry.
    pub fn to_points(&self, group: &str) -> Result<Vec<TimeSeriesPoint>, SeriesError> {
        self.list
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let timestamp = entry
                    .dt_txt
                    .as_deref()
                    .and_then(|text| text.into_timestamp())
                    .or_else(|| entry.dt.and_then(from_unix_seconds))
                    .ok_or_else(|| {
                        SeriesError::malformed(format!(
                            "forecast entry {index} has no usable timestamp"
                        ))
                    })?;
                TimeSeriesPoint::try_new(timestamp, group, entry.main.temp, entry.main.humidity)
                    .map_err(|e| e.with_context(format!("forecast entry {index}")))
            })
            .collect()
    }
}

impl CurrentWeather {
    /// Parses a current-weather body and checks its embedded status code.
    pub fn from_json(body: &str) -> Result<Self, SourceError> {
        let response: CurrentWeather = serde_json::from_str(body)?;
        check_status(&response.cod, response.message.as_ref())?;
        Ok(response)
    }

    /// Validates the payload into a [`CurrentConditions`] snapshot.
    ///
    /// # Errors
    ///
    /// [`SeriesError::MalformedInput`] if temperature, humidity or the
    /// observation time is missing.
    pub fn conditions(&self) -> Result<CurrentConditions, SeriesError> {
        let temperature = self
            .main
            .temp
            .filter(|t| t.is_finite())
            .ok_or_else(|| SeriesError::malformed("current weather has no temperature"))?;
        let humidity = self
            .main
            .humidity
            .filter(|h| h.is_finite())
            .ok_or_else(|| SeriesError::malformed("current weather has no humidity"))?;
        let observed_at = self
            .dt
            .and_then(from_unix_seconds)
            .ok_or_else(|| SeriesError::malformed("current weather has no observation time"))?;

        let descriptor = self.weather.first();
        let sys = self.sys.as_ref();
        Ok(CurrentConditions {
            name: self.name.clone(),
            observed_at,
            temperature,
            feels_like: self.main.feels_like,
            humidity,
            pressure: self.main.pressure,
            wind_speed: self.wind.as_ref().and_then(|w| w.speed),
            visibility_km: self.visibility.map(|metres| metres / 1000.0),
            condition: descriptor.and_then(|d| d.main.clone()),
            description: descriptor.and_then(|d| d.description.clone()),
            country: sys.and_then(|s| s.country.clone()),
            sunrise: sys.and_then(|s| s.sunrise).and_then(from_unix_seconds),
            sunset: sys.and_then(|s| s.sunset).and_then(from_unix_seconds),
            location: self.coord,
        })
    }
}
