//! Core data types for sun event calculations.

use core::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::error::check_coordinates;
use crate::{Error, Result};

/// Apparent depression of the upper limb at rise/set: standard refraction (34') plus the
/// solar semi-diameter (16').
pub const UPPER_LIMB_OFFSET: f64 = -0.83337;

/// Geographic observer location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    latitude: f64,
    longitude: f64,
}

impl Observer {
    /// Creates an observer at the given coordinates.
    ///
    /// # Errors
    /// Returns `InvalidLatitude` or `InvalidLongitude` for out-of-range coordinates.
    ///
    /// # Example
    /// ```
    /// # use sunbands::Observer;
    /// let sydney = Observer::new(-33.865143, 151.2099).unwrap();
    /// assert_eq!(sydney.latitude(), -33.865143);
    /// assert!(Observer::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        check_coordinates(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees, positive north.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees, positive east.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Which point of the solar disc a rise/set crossing is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscReference {
    /// Top edge of the disc, with standard refraction (regular sunrise/sunset).
    UpperLimb,
    /// Geometric center of the disc, no refraction (twilight boundaries).
    Center,
}

/// A rise/set horizon: altitude plus disc reference point.
///
/// Passed by value into every ephemeris query, so concurrent queries at different
/// horizons never share state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Horizon {
    altitude: f64,
    disc: DiscReference,
}

impl Horizon {
    /// Standard sunrise/sunset: upper limb at 0°.
    pub const SUNRISE_SUNSET: Self = Self {
        altitude: 0.0,
        disc: DiscReference::UpperLimb,
    };
    /// Civil twilight: center 6° below the horizon.
    pub const CIVIL: Self = Self {
        altitude: -6.0,
        disc: DiscReference::Center,
    };
    /// Nautical twilight: center 12° below the horizon.
    pub const NAUTICAL: Self = Self {
        altitude: -12.0,
        disc: DiscReference::Center,
    };
    /// Astronomical twilight: center 18° below the horizon.
    pub const ASTRONOMICAL: Self = Self {
        altitude: -18.0,
        disc: DiscReference::Center,
    };

    /// The four horizons of a sun-band chart, brightest first.
    pub const ALL: [Self; 4] = [
        Self::SUNRISE_SUNSET,
        Self::CIVIL,
        Self::NAUTICAL,
        Self::ASTRONOMICAL,
    ];

    /// Creates a custom horizon.
    ///
    /// # Errors
    /// Returns `InvalidAltitude` if altitude is outside -90 to +90 degrees.
    pub fn new(altitude: f64, disc: DiscReference) -> Result<Self> {
        if !(-90.0..=90.0).contains(&altitude) {
            return Err(Error::invalid_altitude(altitude));
        }
        Ok(Self { altitude, disc })
    }

    /// Geometric altitude of the horizon in degrees.
    #[must_use]
    pub const fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Disc reference point.
    #[must_use]
    pub const fn disc(&self) -> DiscReference {
        self.disc
    }

    /// Elevation angle of the sun's center at the crossing.
    ///
    /// Upper-limb horizons are shifted by [`UPPER_LIMB_OFFSET`].
    #[must_use]
    pub fn elevation_angle(&self) -> f64 {
        match self.disc {
            DiscReference::UpperLimb => self.altitude + UPPER_LIMB_OFFSET,
            DiscReference::Center => self.altitude,
        }
    }
}

impl Eq for Horizon {}

impl core::hash::Hash for Horizon {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        // -0.0 and +0.0 compare equal, so they must hash equal
        let normalized = if self.altitude == 0.0 {
            0.0
        } else {
            self.altitude
        };
        normalized.to_bits().hash(state);
        self.disc.hash(state);
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::SUNRISE_SUNSET {
            f.write_str("sunrise/sunset")
        } else if *self == Self::CIVIL {
            f.write_str("civil")
        } else if *self == Self::NAUTICAL {
            f.write_str("nautical")
        } else if *self == Self::ASTRONOMICAL {
            f.write_str("astronomical")
        } else {
            let disc = match self.disc {
                DiscReference::UpperLimb => "upper limb",
                DiscReference::Center => "center",
            };
            write!(f, "{}° ({disc})", self.altitude)
        }
    }
}

/// Why a horizon was not crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolarKind {
    /// The sun stays above the horizon (midnight sun for the standard horizon).
    AlwaysAbove,
    /// The sun stays below the horizon (polar night for the standard horizon).
    AlwaysBelow,
}

impl fmt::Display for PolarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlwaysAbove => f.write_str("stays above"),
            Self::AlwaysBelow => f.write_str("stays below"),
        }
    }
}

/// Solar events around one local calendar day boundary.
///
/// Evening events (`set`, `*_twilight_pm`) are the last crossings *before* the day's local
/// midnight; morning events (`rise`, `*_twilight_am`) are the first crossings *after* it.
/// Records are only built by [`crate::SolarEventCalculator`], always fully populated.
#[derive(Debug, Clone, PartialEq)]
pub struct SunEvents<Tz: TimeZone> {
    pub(crate) date: DateTime<Utc>,
    pub(crate) day: NaiveDate,
    pub(crate) set: DateTime<Tz>,
    pub(crate) rise: DateTime<Tz>,
    pub(crate) antitransit: DateTime<Tz>,
    pub(crate) civil_twilight_pm: DateTime<Tz>,
    pub(crate) nautical_twilight_pm: DateTime<Tz>,
    pub(crate) astro_twilight_pm: DateTime<Tz>,
    pub(crate) civil_twilight_am: DateTime<Tz>,
    pub(crate) nautical_twilight_am: DateTime<Tz>,
    pub(crate) astro_twilight_am: DateTime<Tz>,
}

impl<Tz: TimeZone> SunEvents<Tz> {
    /// UTC instant of the local day boundary this record represents.
    #[must_use]
    pub const fn date(&self) -> &DateTime<Utc> {
        &self.date
    }

    /// Local calendar day of this record.
    #[must_use]
    pub const fn day(&self) -> NaiveDate {
        self.day
    }

    /// Standard sunset before the day boundary.
    #[must_use]
    pub const fn set(&self) -> &DateTime<Tz> {
        &self.set
    }

    /// Standard sunrise after the day boundary.
    #[must_use]
    pub const fn rise(&self) -> &DateTime<Tz> {
        &self.rise
    }

    /// Solar midnight nearest to the local day boundary.
    #[must_use]
    pub const fn antitransit(&self) -> &DateTime<Tz> {
        &self.antitransit
    }

    /// End of evening civil twilight.
    #[must_use]
    pub const fn civil_twilight_pm(&self) -> &DateTime<Tz> {
        &self.civil_twilight_pm
    }

    /// End of evening nautical twilight.
    #[must_use]
    pub const fn nautical_twilight_pm(&self) -> &DateTime<Tz> {
        &self.nautical_twilight_pm
    }

    /// End of evening astronomical twilight.
    #[must_use]
    pub const fn astro_twilight_pm(&self) -> &DateTime<Tz> {
        &self.astro_twilight_pm
    }

    /// Start of morning civil twilight.
    #[must_use]
    pub const fn civil_twilight_am(&self) -> &DateTime<Tz> {
        &self.civil_twilight_am
    }

    /// Start of morning nautical twilight.
    #[must_use]
    pub const fn nautical_twilight_am(&self) -> &DateTime<Tz> {
        &self.nautical_twilight_am
    }

    /// Start of morning astronomical twilight.
    #[must_use]
    pub const fn astro_twilight_am(&self) -> &DateTime<Tz> {
        &self.astro_twilight_am
    }

    /// Evening crossing of the given standard horizon, if it is one of the four chart horizons.
    #[must_use]
    pub fn evening(&self, horizon: Horizon) -> Option<&DateTime<Tz>> {
        match horizon {
            h if h == Horizon::SUNRISE_SUNSET => Some(&self.set),
            h if h == Horizon::CIVIL => Some(&self.civil_twilight_pm),
            h if h == Horizon::NAUTICAL => Some(&self.nautical_twilight_pm),
            h if h == Horizon::ASTRONOMICAL => Some(&self.astro_twilight_pm),
            _ => None,
        }
    }

    /// Morning crossing of the given standard horizon, if it is one of the four chart horizons.
    #[must_use]
    pub fn morning(&self, horizon: Horizon) -> Option<&DateTime<Tz>> {
        match horizon {
            h if h == Horizon::SUNRISE_SUNSET => Some(&self.rise),
            h if h == Horizon::CIVIL => Some(&self.civil_twilight_am),
            h if h == Horizon::NAUTICAL => Some(&self.nautical_twilight_am),
            h if h == Horizon::ASTRONOMICAL => Some(&self.astro_twilight_am),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_elevation_angles() {
        assert_eq!(Horizon::SUNRISE_SUNSET.elevation_angle(), -0.83337);
        assert_eq!(Horizon::CIVIL.elevation_angle(), -6.0);
        assert_eq!(Horizon::NAUTICAL.elevation_angle(), -12.0);
        assert_eq!(Horizon::ASTRONOMICAL.elevation_angle(), -18.0);

        let custom = Horizon::new(-3.0, DiscReference::UpperLimb).unwrap();
        assert!((custom.elevation_angle() - (-3.83337)).abs() < 1e-12);

        assert!(Horizon::new(-95.0, DiscReference::Center).is_err());
        assert!(Horizon::new(95.0, DiscReference::Center).is_err());
    }

    #[test]
    fn test_horizon_hash_normalizes_zero_sign() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(Horizon::new(0.0, DiscReference::Center).unwrap());
        set.insert(Horizon::new(-0.0, DiscReference::Center).unwrap());
        set.insert(Horizon::new(0.0, DiscReference::UpperLimb).unwrap());

        assert_eq!(set.len(), 2, "hashing should treat +0.0 and -0.0 equally");
    }

    #[test]
    fn test_horizon_display() {
        assert_eq!(Horizon::SUNRISE_SUNSET.to_string(), "sunrise/sunset");
        assert_eq!(Horizon::ASTRONOMICAL.to_string(), "astronomical");
        assert_eq!(
            Horizon::new(-3.0, DiscReference::Center)
                .unwrap()
                .to_string(),
            "-3° (center)"
        );
    }

    #[test]
    fn test_observer_validation() {
        let observer = Observer::new(-33.865143, 151.2099).unwrap();
        assert_eq!(observer.longitude(), 151.2099);

        assert!(Observer::new(0.0, 181.0).is_err());
        assert!(Observer::new(f64::NAN, 0.0).is_err());
    }
}
