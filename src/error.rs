//! Error types for sun-band chart generation.

use chrono::NaiveDate;

use crate::types::{Horizon, PolarKind};

/// Result type alias for operations in this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Broad category of an [`Error`].
///
/// Configuration errors are detected before any ephemeris query runs; the other kinds
/// abort a run that is already computing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid user input (coordinates, dates, zone, layout, colors, config file).
    Configuration,
    /// The sun does not cross a requested horizon on some day.
    PolarEvent,
    /// The ephemeris backend failed.
    OracleUnavailable,
    /// The rendered chart could not be written.
    Output,
}

/// Errors that can occur while computing sun events or building a chart.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Invalid latitude value (must be between -90 and +90 degrees).
    #[error("invalid latitude {value}° (must be between -90° and +90°)")]
    InvalidLatitude {
        /// The invalid latitude value provided.
        value: f64,
    },
    /// Invalid longitude value (must be between -180 and +180 degrees).
    #[error("invalid longitude {value}° (must be between -180° and +180°)")]
    InvalidLongitude {
        /// The invalid longitude value provided.
        value: f64,
    },
    /// Invalid horizon altitude.
    #[error("invalid horizon altitude {value}° (must be between -90° and +90°)")]
    InvalidAltitude {
        /// The invalid altitude value provided.
        value: f64,
    },
    /// The end of the date range is not after its start.
    #[error("invalid date range: end {end} is not after start {start}")]
    InvalidDateRange {
        /// Start of the range, as written by the caller.
        start: String,
        /// End of the range, as written by the caller.
        end: String,
    },
    /// The timezone name is not in the timezone database.
    #[error("unknown timezone '{name}'")]
    UnknownTimezone {
        /// The name that failed to resolve.
        name: String,
    },
    /// A local date/time does not exist in the chart's timezone.
    #[error("local time {time} does not exist in timezone {zone}")]
    NonexistentLocalTime {
        /// The local time that could not be placed.
        time: String,
        /// Timezone name.
        zone: String,
    },
    /// A scale factor is zero, negative or not finite.
    #[error("invalid {name} scale {value} (must be positive and finite)")]
    InvalidScale {
        /// Which scale was rejected.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// A padding value is negative or not finite.
    #[error("invalid {side} padding {value} (must be non-negative and finite)")]
    InvalidPadding {
        /// Which side was rejected.
        side: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// A color string could not be parsed.
    #[error("invalid {name} color '{value}'")]
    InvalidColor {
        /// Which palette entry was rejected.
        name: &'static str,
        /// The string that failed to parse.
        value: String,
    },
    /// The configuration file could not be read or parsed.
    #[error("configuration error: {message}")]
    ConfigFile {
        /// Description of the failure.
        message: String,
    },
    /// Layout was requested for a series without records.
    #[error("cannot lay out an empty event series")]
    EmptySeries,
    /// The sun does not cross the requested horizon around the given day.
    #[error(
        "sun {kind} the {horizon} horizon on {date} at latitude {latitude}°, longitude {longitude}°"
    )]
    PolarEvent {
        /// Local calendar day being computed.
        date: NaiveDate,
        /// Horizon that was not crossed.
        horizon: Horizon,
        /// Whether the sun stayed above or below.
        kind: PolarKind,
        /// Observer latitude.
        latitude: f64,
        /// Observer longitude.
        longitude: f64,
    },
    /// The ephemeris backend could not answer a query.
    #[error("ephemeris unavailable: {message}")]
    OracleUnavailable {
        /// Description of the failure.
        message: String,
    },
    /// The chart could not be written.
    #[error("failed to write chart: {message}")]
    Output {
        /// Description of the failure.
        message: String,
    },
}

impl Error {
    /// Creates an invalid latitude error.
    #[must_use]
    pub const fn invalid_latitude(value: f64) -> Self {
        Self::InvalidLatitude { value }
    }

    /// Creates an invalid longitude error.
    #[must_use]
    pub const fn invalid_longitude(value: f64) -> Self {
        Self::InvalidLongitude { value }
    }

    /// Creates an invalid horizon altitude error.
    #[must_use]
    pub const fn invalid_altitude(value: f64) -> Self {
        Self::InvalidAltitude { value }
    }

    /// Creates an invalid date range error.
    #[must_use]
    pub fn invalid_date_range(start: impl ToString, end: impl ToString) -> Self {
        Self::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// Creates an unknown timezone error.
    #[must_use]
    pub fn unknown_timezone(name: impl Into<String>) -> Self {
        Self::UnknownTimezone { name: name.into() }
    }

    /// Creates an invalid scale error.
    #[must_use]
    pub const fn invalid_scale(name: &'static str, value: f64) -> Self {
        Self::InvalidScale { name, value }
    }

    /// Creates an invalid padding error.
    #[must_use]
    pub const fn invalid_padding(side: &'static str, value: f64) -> Self {
        Self::InvalidPadding { side, value }
    }

    /// Creates a configuration file error.
    #[must_use]
    pub fn config_file(message: impl Into<String>) -> Self {
        Self::ConfigFile {
            message: message.into(),
        }
    }

    /// Creates an oracle failure error.
    #[must_use]
    pub fn oracle_unavailable(message: impl Into<String>) -> Self {
        Self::OracleUnavailable {
            message: message.into(),
        }
    }

    /// Creates an output error.
    #[must_use]
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PolarEvent { .. } => ErrorKind::PolarEvent,
            Self::OracleUnavailable { .. } => ErrorKind::OracleUnavailable,
            Self::Output { .. } => ErrorKind::Output,
            Self::InvalidLatitude { .. }
            | Self::InvalidLongitude { .. }
            | Self::InvalidAltitude { .. }
            | Self::InvalidDateRange { .. }
            | Self::UnknownTimezone { .. }
            | Self::NonexistentLocalTime { .. }
            | Self::InvalidScale { .. }
            | Self::InvalidPadding { .. }
            | Self::InvalidColor { .. }
            | Self::ConfigFile { .. }
            | Self::EmptySeries => ErrorKind::Configuration,
        }
    }
}

/// Validates latitude is within the valid range (-90 to +90 degrees).
///
/// # Errors
/// Returns `InvalidLatitude` if latitude is outside -90 to +90 degrees.
pub fn check_latitude(latitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(Error::invalid_latitude(latitude));
    }
    Ok(())
}

/// Validates longitude is within the valid range (-180 to +180 degrees).
///
/// # Errors
/// Returns `InvalidLongitude` if longitude is outside -180 to +180 degrees.
pub fn check_longitude(longitude: f64) -> Result<()> {
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::invalid_longitude(longitude));
    }
    Ok(())
}

/// Validates both latitude and longitude are within valid ranges.
///
/// # Errors
/// Returns `InvalidLatitude` or `InvalidLongitude` for out-of-range coordinates.
pub fn check_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    check_latitude(latitude)?;
    check_longitude(longitude)?;
    Ok(())
}

/// Validates a scale factor is positive and finite.
///
/// # Errors
/// Returns `InvalidScale` otherwise.
pub fn check_scale(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::invalid_scale(name, value));
    }
    Ok(())
}

/// Validates a padding value is non-negative and finite.
///
/// # Errors
/// Returns `InvalidPadding` otherwise.
pub fn check_padding(side: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid_padding(side, value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_validation() {
        assert!(check_latitude(0.0).is_ok());
        assert!(check_latitude(90.0).is_ok());
        assert!(check_latitude(-90.0).is_ok());
        assert!(check_latitude(-33.865143).is_ok());

        assert!(check_latitude(91.0).is_err());
        assert!(check_latitude(-91.0).is_err());
        assert!(check_latitude(f64::NAN).is_err());
        assert!(check_latitude(f64::INFINITY).is_err());
    }

    #[test]
    fn test_longitude_validation() {
        assert!(check_longitude(0.0).is_ok());
        assert!(check_longitude(180.0).is_ok());
        assert!(check_longitude(-180.0).is_ok());
        assert!(check_longitude(151.2099).is_ok());

        assert!(check_longitude(181.0).is_err());
        assert!(check_longitude(-181.0).is_err());
        assert!(check_longitude(f64::NAN).is_err());
        assert!(check_longitude(f64::INFINITY).is_err());
    }

    #[test]
    fn test_scale_and_padding_validation() {
        assert!(check_scale("hour", 10.0).is_ok());
        assert!(check_scale("hour", 0.0).is_err());
        assert!(check_scale("day", -1.0).is_err());
        assert!(check_scale("day", f64::NAN).is_err());

        assert!(check_padding("top", 0.0).is_ok());
        assert!(check_padding("top", 12.5).is_ok());
        assert!(check_padding("left", -0.5).is_err());
        assert!(check_padding("left", f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = Error::invalid_latitude(95.0);
        assert_eq!(
            err.to_string(),
            "invalid latitude 95° (must be between -90° and +90°)"
        );

        let err = Error::unknown_timezone("Mars/Olympus_Mons");
        assert_eq!(err.to_string(), "unknown timezone 'Mars/Olympus_Mons'");

        let err = Error::PolarEvent {
            date: NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
            horizon: Horizon::SUNRISE_SUNSET,
            kind: PolarKind::AlwaysAbove,
            latitude: 69.65,
            longitude: 18.96,
        };
        assert_eq!(
            err.to_string(),
            "sun stays above the sunrise/sunset horizon on 2024-06-21 at latitude 69.65°, longitude 18.96°"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::EmptySeries.kind(), ErrorKind::Configuration);
        assert_eq!(
            Error::invalid_date_range("2020-01-02", "2020-01-01").kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            Error::oracle_unavailable("delta T out of range").kind(),
            ErrorKind::OracleUnavailable
        );
        assert_eq!(Error::output("disk full").kind(), ErrorKind::Output);
    }
}
