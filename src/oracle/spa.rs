//! SPA-backed oracle built on the `solar-positioning` crate.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use solar_positioning::{SunriseResult, spa, time::DeltaT};
use tracing::trace;

use super::{EphemerisOracle, OracleError, OracleResult};
use crate::types::{Horizon, Observer, PolarKind};

/// Solar days computed on each side of the query's UTC day.
const WINDOW_DAYS: i64 = 2;

/// A crossing further than this from the query instant means the sun skipped a day.
const MAX_CROSSING_GAP_HOURS: i64 = 26;

type SolarDay = SunriseResult<DateTime<Utc>>;

/// Where the SPA oracle takes ΔT (TT − UT1, seconds) from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DeltaTSource {
    /// Espenak & Meeus polynomial estimate for each computed day.
    #[default]
    Estimate,
    /// A fixed value in seconds for every day.
    Fixed(f64),
}

impl DeltaTSource {
    fn for_day(self, day: NaiveDate) -> OracleResult<f64> {
        match self {
            Self::Estimate => DeltaT::estimate_from_date_like(day).map_err(unavailable),
            Self::Fixed(seconds) => Ok(seconds),
        }
    }
}

/// Ephemeris oracle backed by NREL's SPA rise/set algorithm.
///
/// Each query evaluates the solar days (transit plus surrounding rise and set) of the UTC days
/// around the query instant and picks the crossing on the requested side of it. Antitransit
/// is the midpoint between consecutive transits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaOracle {
    delta_t: DeltaTSource,
}

impl SpaOracle {
    /// Creates an oracle with the given ΔT source.
    #[must_use]
    pub const fn new(delta_t: DeltaTSource) -> Self {
        Self { delta_t }
    }

    /// ΔT source in use.
    #[must_use]
    pub const fn delta_t(&self) -> DeltaTSource {
        self.delta_t
    }

    fn solar_day(
        &self,
        observer: &Observer,
        day: NaiveDate,
        elevation: f64,
    ) -> OracleResult<SolarDay> {
        let delta_t = self.delta_t.for_day(day)?;
        let midnight = day.and_time(NaiveTime::MIN).and_utc();
        spa::sunrise_sunset(
            midnight,
            observer.latitude(),
            observer.longitude(),
            delta_t,
            elevation,
        )
        .map_err(unavailable)
    }

    fn solar_days(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
        elevation: f64,
    ) -> OracleResult<Vec<SolarDay>> {
        let center = at.date_naive();
        (-WINDOW_DAYS..=WINDOW_DAYS)
            .map(|offset| self.solar_day(observer, center + Duration::days(offset), elevation))
            .collect()
    }

    fn antitransits(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> OracleResult<Vec<DateTime<Utc>>> {
        // transit does not depend on the horizon
        let days = self.solar_days(observer, at, Horizon::SUNRISE_SUNSET.elevation_angle())?;
        Ok(days
            .windows(2)
            .map(|pair| {
                let (a, b) = (*pair[0].transit(), *pair[1].transit());
                a + (b - a) / 2
            })
            .collect())
    }
}

fn unavailable(err: impl ToString) -> OracleError {
    OracleError::Unavailable {
        message: err.to_string(),
    }
}

fn outside_window(at: DateTime<Utc>) -> OracleError {
    OracleError::Unavailable {
        message: format!("no solar day brackets {at}"),
    }
}

fn polar(day: &SolarDay) -> OracleError {
    let kind = if day.is_polar_day() {
        PolarKind::AlwaysAbove
    } else {
        PolarKind::AlwaysBelow
    };
    OracleError::NoCrossing { kind }
}

fn sunset(day: &SolarDay) -> Option<DateTime<Utc>> {
    match day {
        SunriseResult::RegularDay { sunset, .. } => Some(*sunset),
        _ => None,
    }
}

fn sunrise(day: &SolarDay) -> Option<DateTime<Utc>> {
    match day {
        SunriseResult::RegularDay { sunrise, .. } => Some(*sunrise),
        _ => None,
    }
}

/// Crossings of every solar day in the window, in time order.
///
/// A UTC day's rise and set need not straddle its transit (east of Greenwich the sunrise
/// reported for a UTC day can come after the transit), so they are never picked by day index.
fn crossings(
    days: &[SolarDay],
    pick: fn(&SolarDay) -> Option<DateTime<Utc>>,
) -> Vec<DateTime<Utc>> {
    let mut times: Vec<_> = days.iter().filter_map(pick).collect();
    times.sort_unstable();
    times
}

/// Error for a query with no crossing close enough to `at`: the polar state of the solar day
/// whose transit is nearest, or `Unavailable` if every day in the window had crossings.
fn missing_crossing(days: &[SolarDay], at: DateTime<Utc>) -> OracleError {
    days.iter()
        .filter(|day| !matches!(day, SunriseResult::RegularDay { .. }))
        .min_by_key(|day| (*day.transit() - at).abs())
        .map_or_else(|| outside_window(at), polar)
}

impl EphemerisOracle for SpaOracle {
    fn previous_setting(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
        horizon: Horizon,
    ) -> OracleResult<DateTime<Utc>> {
        let days = self.solar_days(observer, at, horizon.elevation_angle())?;
        let setting = crossings(&days, sunset)
            .into_iter()
            .rev()
            .find(|t| *t <= at)
            .filter(|t| at - *t < Duration::hours(MAX_CROSSING_GAP_HOURS))
            .ok_or_else(|| missing_crossing(&days, at))?;
        trace!(%at, %horizon, %setting, "previous setting");
        Ok(setting)
    }

    fn next_rising(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
        horizon: Horizon,
    ) -> OracleResult<DateTime<Utc>> {
        let days = self.solar_days(observer, at, horizon.elevation_angle())?;
        let rising = crossings(&days, sunrise)
            .into_iter()
            .find(|t| *t > at)
            .filter(|t| *t - at < Duration::hours(MAX_CROSSING_GAP_HOURS))
            .ok_or_else(|| missing_crossing(&days, at))?;
        trace!(%at, %horizon, %rising, "next rising");
        Ok(rising)
    }

    fn previous_antitransit(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> OracleResult<DateTime<Utc>> {
        self.antitransits(observer, at)?
            .into_iter()
            .rev()
            .find(|t| *t <= at)
            .ok_or_else(|| outside_window(at))
    }

    fn next_antitransit(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> OracleResult<DateTime<Utc>> {
        self.antitransits(observer, at)?
            .into_iter()
            .find(|t| *t > at)
            .ok_or_else(|| outside_window(at))
    }
}
