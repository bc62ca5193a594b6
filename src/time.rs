//! Timezone localization for chart instants.

use core::fmt;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use tracing::warn;

use crate::{Error, Result};

/// Step used when scanning forward for the first instant of a day whose midnight does not exist.
const GAP_SCAN_STEP_MINUTES: i64 = 15;

/// Converts between UTC instants and the chart's target timezone.
#[derive(Debug, Clone)]
pub struct TimeLocalizer<Tz: TimeZone> {
    timezone: Tz,
    zone_name: String,
}

impl<Tz: TimeZone> TimeLocalizer<Tz> {
    /// Creates a localizer for the given zone.
    pub fn new(timezone: Tz) -> Self
    where
        Tz: fmt::Debug,
    {
        let zone_name = format!("{timezone:?}");
        Self {
            timezone,
            zone_name,
        }
    }

    /// Target timezone.
    #[must_use]
    pub const fn timezone(&self) -> &Tz {
        &self.timezone
    }

    /// Name of the target timezone, as used in error messages.
    #[must_use]
    pub fn zone_name(&self) -> &str {
        &self.zone_name
    }

    /// Converts a UTC instant to the target zone. Never fails.
    #[must_use]
    pub fn localize(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.timezone)
    }

    /// Attaches the target zone to a naive local date-time.
    ///
    /// Ambiguous times (repeated by a DST fall-back) resolve to the earlier instant.
    ///
    /// # Errors
    /// Returns `NonexistentLocalTime` if the time falls in a DST gap.
    pub fn localize_naive(&self, local: NaiveDateTime) -> Result<DateTime<Tz>> {
        match self.timezone.from_local_datetime(&local) {
            LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => Ok(t),
            LocalResult::None => Err(Error::NonexistentLocalTime {
                time: local.to_string(),
                zone: self.zone_name.clone(),
            }),
        }
    }

    /// First instant of a local calendar day.
    ///
    /// Normally local midnight. When midnight falls in a DST gap the day starts at the first
    /// existing local time after it.
    ///
    /// # Errors
    /// Returns `NonexistentLocalTime` if no instant of the day exists in the zone.
    pub fn start_of_day(&self, day: NaiveDate) -> Result<DateTime<Tz>> {
        let midnight = day.and_time(chrono::NaiveTime::MIN);
        if let Ok(start) = self.localize_naive(midnight) {
            return Ok(start);
        }

        let step = Duration::minutes(GAP_SCAN_STEP_MINUTES);
        let mut candidate = midnight + step;
        while candidate.date() == day {
            if let Ok(start) = self.localize_naive(candidate) {
                warn!(
                    %day,
                    zone = %self.zone_name,
                    start = %candidate.time(),
                    "local midnight does not exist, day starts later"
                );
                return Ok(start);
            }
            candidate += step;
        }

        Err(Error::NonexistentLocalTime {
            time: midnight.to_string(),
            zone: self.zone_name.clone(),
        })
    }
}

/// Fractional hours elapsed since local midnight (wall clock), in `[0, 24)`.
#[must_use]
pub fn hours_since_midnight<Tz: TimeZone>(instant: &DateTime<Tz>) -> f64 {
    let seconds = f64::from(instant.num_seconds_from_midnight());
    let nanos = f64::from(instant.nanosecond() % 1_000_000_000);
    (seconds + nanos / 1e9) / 3600.0
}
