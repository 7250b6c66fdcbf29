//! Async client for the OpenWeatherMap current-weather and forecast endpoints.

use crate::series::error::SeriesError;
use crate::sources::error::SourceError;
use crate::sources::openweather::{Coordinates, CurrentWeather, ForecastResponse, GeoLocation};
use crate::types::point::TimeSeriesPoint;
use bon::bon;
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::Value;
use std::fmt;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";

/// Environment variable holding the API key, optionally provided through a `.env` file.
pub const API_KEY_VAR: &str = "API_KEY";

/// Unit system requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Units {
    /// Celsius, metres per second.
    #[default]
    Metric,
    /// Fahrenheit, miles per hour.
    Imperial,
    /// Kelvin, metres per second.
    Standard,
}

impl Units {
    pub(crate) fn query_value(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.query_value())
    }
}

/// Fetches current conditions and the 5 day / 3 hour forecast, either by
/// city name or at coordinates resolved through the geocoding endpoint.
///
/// # Examples
///
/// ```no_run
/// # use trendline::{ForecastClient, SourceError, Units};
/// # #[tokio::main]
/// # async fn main() -> Result<(), SourceError> {
/// let client = ForecastClient::builder()
///     .api_key("my-key")
///     .units(Units::Metric)
///     .build();
///
/// let location = client.locate("Karachi").await?;
/// let points = client
///     .forecast_points_at(location.coordinates(), &location.name)
///     .await?;
/// println!("{} forecast points", points.len());
/// # Ok(())
/// # }
/// ```
pub struct ForecastClient {
    http: Client,
    api_key: String,
    base_url: String,
    geo_url: String,
    units: Units,
}

#[bon]
impl ForecastClient {
    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenWeatherMap application key.
    /// * `base_url` - API root, defaults to [`DEFAULT_BASE_URL`].
    /// * `geo_url` - Geocoding API root, defaults to [`DEFAULT_GEO_URL`].
    /// * `units` - Unit system, defaults to [`Units::Metric`].
    #[builder]
    pub fn new(
        #[builder(into)] api_key: String,
        #[builder(into)] base_url: Option<String>,
        #[builder(into)] geo_url: Option<String>,
        #[builder(default)] units: Units,
    ) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            geo_url: geo_url.unwrap_or_else(|| DEFAULT_GEO_URL.to_string()),
            units,
        }
    }

    /// Creates a client whose key is read from [`API_KEY_VAR`], loading a `.env`
    /// file from the working directory first if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingApiKey`] if the variable is not set.
    pub fn from_env() -> Result<Self, SourceError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }
        let api_key = std::env::var(API_KEY_VAR).map_err(SourceError::MissingApiKey)?;
        Ok(Self::builder().api_key(api_key).build())
    }

    pub fn units(&self) -> Units {
        self.units
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    fn geocoding_url(&self) -> String {
        format!("{}/direct", self.geo_url.trim_end_matches('/'))
    }

    fn key_and_units(&self) -> [(&'static str, String); 2] {
        [
            ("appid", self.api_key.clone()),
            ("units", self.units.query_value().to_string()),
        ]
    }

    /// Performs the GET request and returns the raw body.
    ///
    /// Non-success statuses are mapped to [`SourceError::ApiStatus`], using the
    /// `message` of the JSON error body when the API sent one.
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String, SourceError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| SourceError::NetworkRequest(url.to_string(), e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::NetworkRequest(url.to_string(), e))?;

        if !status.is_success() {
            warn!("HTTP error {} for {}", status, url);
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(SourceError::ApiStatus {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Received {} bytes from {}", body.len(), url);
        Ok(body)
    }

    async fn fetch(&self, endpoint: &str, city: &str) -> Result<String, SourceError> {
        let city = checked_city(city)?;
        let url = self.endpoint_url(endpoint);
        info!("Requesting {} for city '{}' ({} units)", url, city, self.units);

        let mut query = vec![("q", city.to_string())];
        query.extend(self.key_and_units());
        self.get(&url, &query).await
    }

    async fn fetch_at(&self, endpoint: &str, coords: Coordinates) -> Result<String, SourceError> {
        let url = self.endpoint_url(endpoint);
        info!(
            "Requesting {} at ({}, {}) ({} units)",
            url, coords.lat, coords.lon, self.units
        );
        let mut query = coordinate_query(coords).to_vec();
        query.extend(self.key_and_units());
        self.get(&url, &query).await
    }

    /// Resolves `city` to its best match through the geocoding endpoint.
    ///
    /// # Errors
    ///
    /// [`SourceError::CityNotFound`] if the API knows no place by that name.
    pub async fn locate(&self, city: &str) -> Result<GeoLocation, SourceError> {
        let city = checked_city(city)?;
        let url = self.geocoding_url();
        info!("Geocoding city '{}'", city);
        let query = [
            ("q", city.to_string()),
            ("limit", "1".to_string()),
            ("appid", self.api_key.clone()),
        ];
        let body = self.get(&url, &query).await?;
        GeoLocation::first_from_json(&body, city)
    }

    /// Resolves `city` to coordinates, see [`ForecastClient::locate`].
    pub async fn geocode(&self, city: &str) -> Result<Coordinates, SourceError> {
        Ok(self.locate(city).await?.coordinates())
    }

    /// Fetches the 5 day / 3 hour forecast for `city`.
    pub async fn forecast(&self, city: &str) -> Result<ForecastResponse, SourceError> {
        let body = self.fetch("forecast", city).await?;
        ForecastResponse::from_json(&body)
    }

    /// Fetches the 5 day / 3 hour forecast at `coords`.
    pub async fn forecast_at(&self, coords: Coordinates) -> Result<ForecastResponse, SourceError> {
        let body = self.fetch_at("forecast", coords).await?;
        ForecastResponse::from_json(&body)
    }

    /// Fetches the current conditions for `city`.
    pub async fn current(&self, city: &str) -> Result<CurrentWeather, SourceError> {
        let body = self.fetch("weather", city).await?;
        CurrentWeather::from_json(&body)
    }

    /// Fetches the current conditions at `coords`.
    pub async fn current_at(&self, coords: Coordinates) -> Result<CurrentWeather, SourceError> {
        let body = self.fetch_at("weather", coords).await?;
        CurrentWeather::from_json(&body)
    }

    /// Fetches the forecast and validates it into points, grouped under the
    /// city name reported by the API (falling back to `city`).
    pub async fn forecast_points(&self, city: &str) -> Result<Vec<TimeSeriesPoint>, SourceError> {
        let forecast = self.forecast(city).await?;
        let group = forecast.city_name().unwrap_or(city.trim()).to_string();
        let points = forecast.to_points(&group)?;
        info!("Validated {} forecast points for '{}'", points.len(), group);
        Ok(points)
    }

    /// Fetches the forecast at `coords` and validates it into points grouped under `group`.
    pub async fn forecast_points_at(
        &self,
        coords: Coordinates,
        group: &str,
    ) -> Result<Vec<TimeSeriesPoint>, SourceError> {
        let points = self.forecast_at(coords).await?.to_points(group)?;
        info!("Validated {} forecast points for '{}'", points.len(), group);
        Ok(points)
    }
}

fn checked_city(city: &str) -> Result<&str, SourceError> {
    let city = city.trim();
    if city.is_empty() {
        return Err(SeriesError::malformed("city name is empty").into());
    }
    Ok(city)
}

fn coordinate_query(coords: Coordinates) -> [(&'static str, String); 2] {
    [("lat", coords.lat.to_string()), ("lon", coords.lon.to_string())]
}
