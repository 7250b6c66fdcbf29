//! Defines the `TemperatureAlert` enum, classifying a current temperature reading
//! against a user-chosen upper threshold and a fixed cold threshold.

use std::fmt;

/// Temperatures at or below this value (°C) always raise [`TemperatureAlert::Low`].
pub const LOW_TEMPERATURE_THRESHOLD: f64 = 5.0;

/// Classification of a current temperature reading.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum TemperatureAlert {
    /// Reading is at or above the configured high threshold.
    High,
    /// Reading is at or below [`LOW_TEMPERATURE_THRESHOLD`].
    Low,
    /// Anything in between.
    Normal,
}

impl TemperatureAlert {
    /// Classifies `temperature` against `high_threshold`.
    ///
    /// The high check wins when both apply, which only happens for a threshold
    /// at or below [`LOW_TEMPERATURE_THRESHOLD`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trendline::TemperatureAlert;
    ///
    /// assert_eq!(TemperatureAlert::classify(36.0, 35.0), TemperatureAlert::High);
    /// assert_eq!(TemperatureAlert::classify(4.0, 35.0), TemperatureAlert::Low);
    /// assert_eq!(TemperatureAlert::classify(20.0, 35.0), TemperatureAlert::Normal);
    /// ```
    pub fn classify(temperature: f64, high_threshold: f64) -> Self {
        if temperature >= high_threshold {
            TemperatureAlert::High
        } else if temperature <= LOW_TEMPERATURE_THRESHOLD {
            TemperatureAlert::Low
        } else {
            TemperatureAlert::Normal
        }
    }
}

impl fmt::Display for TemperatureAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TemperatureAlert::High => "high temperature",
            TemperatureAlert::Low => "low temperature",
            TemperatureAlert::Normal => "normal temperature",
        };
        write!(f, "{label}")
    }
}
