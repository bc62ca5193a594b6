//! Chart configuration: TOML file format and its validated, resolved form.
//!
//! Every section has defaults (a year of Sydney charted at 10 units per hour and 2 per day),
//! so an empty file is a valid configuration:
//!
//! ```toml
//! [location]
//! latitude = -33.865143
//! longitude = 151.2099
//! timezone = "Australia/Sydney"
//!
//! [range]
//! start = "2018-01-02T00:00:00"
//! end = "2019-01-01T12:00:00"
//!
//! [layout.scale]
//! hour = 10.0
//! day = 2.0
//!
//! [colors]
//! day = "#ffe9a8"
//! night = "#0f1c3a"
//!
//! [stroke]
//! color = "black"
//! width = 0.5
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Serialize};

use crate::chart::{ChartStyle, Palette, Stroke};
use crate::error::check_scale;
use crate::layout::{LayoutStyle, Padding, Scale};
use crate::oracle::DeltaTSource;
use crate::time::TimeLocalizer;
use crate::types::Observer;
use crate::{Error, Result};

/// Observer location and chart timezone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocationConfig {
    /// Degrees, positive north.
    pub latitude: f64,
    /// Degrees, positive east.
    pub longitude: f64,
    /// IANA timezone name.
    pub timezone: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: -33.865_143,
            longitude: 151.209_9,
            timezone: "Australia/Sydney".to_string(),
        }
    }
}

/// Charted range as local date-times in the chart timezone; `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RangeConfig {
    /// First local date-time.
    pub start: NaiveDateTime,
    /// Local date-time the range stops before.
    pub end: NaiveDateTime,
}

impl Default for RangeConfig {
    fn default() -> Self {
        let at = |y, m, d, h| {
            NaiveDate::from_ymd_opt(y, m, d)
                .and_then(|date| date.and_hms_opt(h, 0, 0))
                .unwrap_or_default()
        };
        Self {
            start: at(2018, 1, 2, 0),
            end: at(2019, 1, 1, 12),
        }
    }
}

/// Scale factors and padding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Units per hour and per day.
    pub scale: Scale,
    /// Space around the plot.
    pub padding: Padding,
}

/// Palette as CSS color strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Background.
    pub day: String,
    /// Civil twilight.
    pub civil: String,
    /// Nautical twilight.
    pub nautical: String,
    /// Astronomical twilight.
    pub astro: String,
    /// Night.
    pub night: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            day: "#ffe9a8".to_string(),
            civil: "#9ec5e8".to_string(),
            nautical: "#5b8cc7".to_string(),
            astro: "#2c4f87".to_string(),
            night: "#0f1c3a".to_string(),
        }
    }
}

/// Band outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrokeConfig {
    /// CSS color string.
    pub color: String,
    /// Width in chart units.
    pub width: f64,
}

/// Complete chart configuration as read from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    /// Observer and timezone.
    pub location: LocationConfig,
    /// Date range.
    pub range: RangeConfig,
    /// Scales and padding.
    pub layout: LayoutConfig,
    /// Fill colors.
    pub colors: ColorConfig,
    /// Optional band outline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<StrokeConfig>,
    /// Fixed ΔT in seconds; estimated per day when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_t: Option<f64>,
    /// Where the SVG is written.
    pub output: PathBuf,
    /// Compute days concurrently when the `parallel` feature is enabled.
    pub parallel: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            location: LocationConfig::default(),
            range: RangeConfig::default(),
            layout: LayoutConfig::default(),
            colors: ColorConfig::default(),
            stroke: None,
            delta_t: None,
            output: PathBuf::from("sunbands.svg"),
            parallel: true,
        }
    }
}

impl ChartConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    /// `ConfigFile` if the document is malformed or has unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config_file(format!("failed to parse: {e}")))
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    /// `ConfigFile` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::config_file(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Serializes back to TOML.
    ///
    /// # Errors
    /// `ConfigFile` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config_file(e.to_string()))
    }

    /// Validates everything and resolves names, colors and local times.
    ///
    /// # Errors
    /// The first configuration error found: coordinates, timezone, nonexistent local times,
    /// an empty or inverted range, scales, padding, colors, stroke or ΔT.
    pub fn resolve(&self) -> Result<ChartSettings> {
        let observer = Observer::new(self.location.latitude, self.location.longitude)?;
        let timezone: Tz = self
            .location
            .timezone
            .parse()
            .map_err(|_| Error::unknown_timezone(&self.location.timezone))?;

        let localizer = TimeLocalizer::new(timezone);
        let start = localizer.localize_naive(self.range.start)?;
        let end = localizer.localize_naive(self.range.end)?;
        if start >= end {
            return Err(Error::invalid_date_range(self.range.start, self.range.end));
        }

        let layout = LayoutStyle::new(self.layout.scale, self.layout.padding)?;

        let palette = Palette {
            day: color("day", &self.colors.day)?,
            civil: color("civil", &self.colors.civil)?,
            nautical: color("nautical", &self.colors.nautical)?,
            astro: color("astro", &self.colors.astro)?,
            night: color("night", &self.colors.night)?,
        };
        let stroke = self
            .stroke
            .as_ref()
            .map(|s| -> Result<Stroke> {
                check_scale("stroke width", s.width)?;
                Ok(Stroke {
                    color: color("stroke", &s.color)?,
                    width: s.width,
                })
            })
            .transpose()?;

        let delta_t = match self.delta_t {
            None => DeltaTSource::Estimate,
            Some(seconds) if seconds.is_finite() => DeltaTSource::Fixed(seconds),
            Some(seconds) => {
                return Err(Error::config_file(format!("delta_t {seconds} is not finite")));
            }
        };

        Ok(ChartSettings {
            observer,
            timezone,
            start,
            end,
            layout,
            style: ChartStyle { palette, stroke },
            delta_t,
            output: self.output.clone(),
            parallel: self.parallel,
        })
    }
}

fn color(name: &'static str, value: &str) -> Result<Color> {
    parse_color(value)
        .map(|c| c.to_alpha_color::<Srgb>())
        .map_err(|_| Error::InvalidColor {
            name,
            value: value.to_string(),
        })
}

/// Validated configuration ready for chart generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    observer: Observer,
    timezone: Tz,
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    layout: LayoutStyle,
    style: ChartStyle,
    delta_t: DeltaTSource,
    output: PathBuf,
    parallel: bool,
}

impl ChartSettings {
    /// Observer location.
    #[must_use]
    pub const fn observer(&self) -> &Observer {
        &self.observer
    }

    /// Chart timezone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Start of the range.
    #[must_use]
    pub const fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    /// End of the range (exclusive).
    #[must_use]
    pub const fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    /// Scales and padding.
    #[must_use]
    pub const fn layout(&self) -> &LayoutStyle {
        &self.layout
    }

    /// Paint.
    #[must_use]
    pub const fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// ΔT source for the SPA oracle.
    #[must_use]
    pub const fn delta_t(&self) -> DeltaTSource {
        self.delta_t
    }

    /// Output path.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Whether days are computed concurrently.
    #[must_use]
    pub const fn parallel(&self) -> bool {
        self.parallel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ChartConfig::from_toml_str("").unwrap();
        assert_eq!(config, ChartConfig::default());

        let settings = config.resolve().unwrap();
        assert_eq!(settings.timezone(), Tz::Australia__Sydney);
        assert_eq!(settings.observer().latitude(), -33.865143);
        assert_eq!(
            settings.start().with_timezone(&Utc),
            Utc.with_ymd_and_hms(2018, 1, 1, 13, 0, 0).unwrap()
        );
        assert_eq!(settings.layout(), &LayoutStyle::default());
        let palette = settings.style().palette;
        let defaults = Palette::default();
        assert_eq!(palette.day.to_rgba8(), defaults.day.to_rgba8());
        assert_eq!(palette.night.to_rgba8(), defaults.night.to_rgba8());
        assert_eq!(settings.delta_t(), DeltaTSource::Estimate);
        assert_eq!(settings.output(), Path::new("sunbands.svg"));
    }

    #[test]
    fn test_partial_document() {
        let config = ChartConfig::from_toml_str(
            r##"
            output = "tromso.svg"
            delta_t = 69.2

            [location]
            latitude = 69.6496
            longitude = 18.956
            timezone = "Europe/Oslo"

            [range]
            start = "2018-09-01T00:00:00"
            end = "2018-10-01T00:00:00"

            [layout.scale]
            day = 5.0

            [colors]
            night = "black"

            [stroke]
            color = "#ffffff80"
            width = 0.25
            "##,
        )
        .unwrap();

        assert_eq!(config.layout.scale.hour, 10.0);
        assert_eq!(config.layout.scale.day, 5.0);
        assert_eq!(config.layout.padding, Padding::uniform(10.0));

        let settings = config.resolve().unwrap();
        assert_eq!(settings.timezone(), Tz::Europe__Oslo);
        assert_eq!(settings.delta_t(), DeltaTSource::Fixed(69.2));
        assert_eq!(
            settings.style().palette.night.to_rgba8(),
            Color::from_rgb8(0, 0, 0).to_rgba8()
        );
        let stroke = settings.style().stroke.unwrap();
        assert_eq!(stroke.width, 0.25);
        assert_eq!(stroke.color.to_rgba8().a, 0x80);
    }

    #[test]
    fn test_configuration_errors() {
        let mut config = ChartConfig::default();
        config.location.timezone = "Mars/Olympus_Mons".to_string();
        let err = config.resolve().unwrap_err();
        assert_eq!(err, Error::unknown_timezone("Mars/Olympus_Mons"));
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let mut config = ChartConfig::default();
        config.range.end = config.range.start;
        assert!(matches!(
            config.resolve().unwrap_err(),
            Error::InvalidDateRange { .. }
        ));

        let mut config = ChartConfig::default();
        config.colors.civil = "not-a-color".to_string();
        assert_eq!(
            config.resolve().unwrap_err(),
            Error::InvalidColor {
                name: "civil",
                value: "not-a-color".to_string()
            }
        );

        let mut config = ChartConfig::default();
        config.layout.scale.hour = -1.0;
        assert!(matches!(
            config.resolve().unwrap_err(),
            Error::InvalidScale { name: "hour", .. }
        ));

        let mut config = ChartConfig::default();
        config.location.latitude = 123.0;
        assert_eq!(config.resolve().unwrap_err(), Error::invalid_latitude(123.0));

        // 02:30 does not exist on the first day of Sydney daylight saving
        let mut config = ChartConfig::default();
        config.range.start = NaiveDate::from_ymd_opt(2018, 10, 7)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert!(matches!(
            config.resolve().unwrap_err(),
            Error::NonexistentLocalTime { .. }
        ));
    }

    #[test]
    fn test_malformed_documents() {
        let err = ChartConfig::from_toml_str("[location]\nlatitude = \"north\"").unwrap_err();
        assert!(matches!(err, Error::ConfigFile { .. }));

        let err = ChartConfig::from_toml_str("colour = \"red\"").unwrap_err();
        assert!(matches!(err, Error::ConfigFile { .. }));

        let err = ChartConfig::load("/nonexistent/sunbands.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sunbands.toml"));
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let config = ChartConfig::default();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("Australia/Sydney"));
        assert_eq!(ChartConfig::from_toml_str(&text).unwrap(), config);
    }
}
