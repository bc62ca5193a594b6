//! Per-day solar event records and the daily series built from them.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info};

use crate::oracle::{EphemerisOracle, OracleError};
use crate::time::TimeLocalizer;
use crate::types::{Horizon, Observer, SunEvents};
use crate::{Error, Result};

/// Assembles one [`SunEvents`] record per local calendar day from an [`EphemerisOracle`].
#[derive(Debug)]
pub struct SolarEventCalculator<'a, O: ?Sized, Tz: TimeZone> {
    oracle: &'a O,
    observer: Observer,
    localizer: TimeLocalizer<Tz>,
}

impl<'a, O, Tz> SolarEventCalculator<'a, O, Tz>
where
    O: EphemerisOracle + ?Sized,
    Tz: TimeZone,
{
    /// Creates a calculator for one observer and target timezone.
    pub const fn new(oracle: &'a O, observer: Observer, localizer: TimeLocalizer<Tz>) -> Self {
        Self {
            oracle,
            observer,
            localizer,
        }
    }

    /// Observer location.
    #[must_use]
    pub const fn observer(&self) -> &Observer {
        &self.observer
    }

    /// Localizer for the target timezone.
    #[must_use]
    pub const fn localizer(&self) -> &TimeLocalizer<Tz> {
        &self.localizer
    }

    /// Computes the record for a local calendar day.
    ///
    /// Evening crossings are the last ones before the day's start, morning crossings the
    /// first ones after it, for each of the four chart horizons.
    ///
    /// # Errors
    /// `PolarEvent` when the sun does not cross one of the horizons, `OracleUnavailable`
    /// when the backend fails, `NonexistentLocalTime` when the day has no instants in the zone.
    pub fn sun_events_for_day(&self, day: NaiveDate) -> Result<SunEvents<Tz>> {
        let start = self.localizer.start_of_day(day)?;
        self.sun_events_at(day, start.with_timezone(&Utc))
    }

    fn sun_events_at(&self, day: NaiveDate, at: DateTime<Utc>) -> Result<SunEvents<Tz>> {
        let evening = |horizon: Horizon| {
            self.oracle
                .previous_setting(&self.observer, at, horizon)
                .map(|t| self.localizer.localize(t))
                .map_err(|err| self.lift(day, horizon, err))
        };
        let morning = |horizon: Horizon| {
            self.oracle
                .next_rising(&self.observer, at, horizon)
                .map(|t| self.localizer.localize(t))
                .map_err(|err| self.lift(day, horizon, err))
        };

        let antitransit = self.nearest_antitransit(day, at)?;

        let events = SunEvents {
            date: at,
            day,
            set: evening(Horizon::SUNRISE_SUNSET)?,
            rise: morning(Horizon::SUNRISE_SUNSET)?,
            antitransit: self.localizer.localize(antitransit),
            civil_twilight_pm: evening(Horizon::CIVIL)?,
            nautical_twilight_pm: evening(Horizon::NAUTICAL)?,
            astro_twilight_pm: evening(Horizon::ASTRONOMICAL)?,
            civil_twilight_am: morning(Horizon::CIVIL)?,
            nautical_twilight_am: morning(Horizon::NAUTICAL)?,
            astro_twilight_am: morning(Horizon::ASTRONOMICAL)?,
        };
        debug!(
            %day,
            set = ?events.set,
            rise = ?events.rise,
            antitransit = ?events.antitransit,
            "computed sun events"
        );
        Ok(events)
    }

    /// Antitransit closest to `at`; a tie goes to the earlier one.
    fn nearest_antitransit(&self, day: NaiveDate, at: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let previous = self
            .oracle
            .previous_antitransit(&self.observer, at)
            .map_err(|err| self.lift(day, Horizon::SUNRISE_SUNSET, err))?;
        let next = self
            .oracle
            .next_antitransit(&self.observer, at)
            .map_err(|err| self.lift(day, Horizon::SUNRISE_SUNSET, err))?;

        if (at - previous).abs() <= (next - at).abs() {
            Ok(previous)
        } else {
            Ok(next)
        }
    }

    fn lift(&self, day: NaiveDate, horizon: Horizon, err: OracleError) -> Error {
        match err {
            OracleError::NoCrossing { kind } => Error::PolarEvent {
                date: day,
                horizon,
                kind,
                latitude: self.observer.latitude(),
                longitude: self.observer.longitude(),
            },
            OracleError::Unavailable { message } => Error::oracle_unavailable(message),
        }
    }
}

/// Chronologically ordered [`SunEvents`], one per local calendar day in `[start, end)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyEventSeries<Tz: TimeZone> {
    pub(crate) start: DateTime<Tz>,
    pub(crate) end: DateTime<Tz>,
    pub(crate) events: Vec<SunEvents<Tz>>,
}

impl<Tz: TimeZone> DailyEventSeries<Tz> {
    /// Computes one record per local day from `start`'s date while the day starts before `end`.
    ///
    /// # Errors
    /// `InvalidDateRange` if `start >= end` (checked before any computation), otherwise the
    /// first error of any day, in chronological order.
    ///
    /// # Example
    /// ```no_run
    /// use chrono::TimeZone;
    /// use chrono_tz::Australia::Sydney;
    /// use sunbands::{DailyEventSeries, Observer, SolarEventCalculator, SpaOracle, TimeLocalizer};
    ///
    /// let oracle = SpaOracle::default();
    /// let observer = Observer::new(-33.865143, 151.2099).unwrap();
    /// let calculator = SolarEventCalculator::new(&oracle, observer, TimeLocalizer::new(Sydney));
    /// let start = Sydney.with_ymd_and_hms(2018, 1, 2, 0, 0, 0).unwrap();
    /// let end = Sydney.with_ymd_and_hms(2018, 2, 2, 0, 0, 0).unwrap();
    /// let series = DailyEventSeries::build(&calculator, start, end).unwrap();
    /// assert_eq!(series.len(), 31);
    /// ```
    pub fn build<O>(
        calculator: &SolarEventCalculator<'_, O, Tz>,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<Self>
    where
        O: EphemerisOracle + ?Sized,
    {
        let days = day_range(calculator.localizer(), &start, &end)?;
        let events = days
            .into_iter()
            .map(|day| calculator.sun_events_for_day(day))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::finish(start, end, events))
    }

    /// Like [`DailyEventSeries::build`], computing days concurrently.
    ///
    /// Records are reassembled in chronological order; the error reported is the one of
    /// the earliest failing day.
    ///
    /// # Errors
    /// Same as [`DailyEventSeries::build`].
    #[cfg(feature = "parallel")]
    pub fn build_parallel<O>(
        calculator: &SolarEventCalculator<'_, O, Tz>,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<Self>
    where
        O: EphemerisOracle + Sync + ?Sized,
        Tz: Send + Sync,
        Tz::Offset: Send + Sync,
    {
        let days = day_range(calculator.localizer(), &start, &end)?;
        let results: Vec<Result<SunEvents<Tz>>> = days
            .into_par_iter()
            .map(|day| calculator.sun_events_for_day(day))
            .collect();
        let events = results.into_iter().collect::<Result<Vec<_>>>()?;
        Ok(Self::finish(start, end, events))
    }

    fn finish(start: DateTime<Tz>, end: DateTime<Tz>, events: Vec<SunEvents<Tz>>) -> Self {
        info!(
            days = events.len(),
            start = ?start,
            end = ?end,
            "built daily event series"
        );
        Self { start, end, events }
    }

    /// Start of the requested range.
    #[must_use]
    pub const fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    /// End of the requested range (exclusive).
    #[must_use]
    pub const fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    /// Records in chronological order.
    #[must_use]
    pub fn events(&self) -> &[SunEvents<Tz>] {
        &self.events
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the series has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Whole days between `start` and `end`, which sets the chart width.
    ///
    /// Can be one less than `len() - 1` when the range crosses a 23-hour day and ends just
    /// after midnight.
    #[must_use]
    pub fn day_count(&self) -> i64 {
        self.end
            .clone()
            .signed_duration_since(self.start.clone())
            .num_days()
    }

    /// Iterates over the records in chronological order.
    pub fn iter(&self) -> core::slice::Iter<'_, SunEvents<Tz>> {
        self.events.iter()
    }
}

impl<'a, Tz: TimeZone> IntoIterator for &'a DailyEventSeries<Tz> {
    type Item = &'a SunEvents<Tz>;
    type IntoIter = core::slice::Iter<'a, SunEvents<Tz>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Local calendar days from `start`'s date whose first instant is before `end`.
fn day_range<Tz: TimeZone>(
    localizer: &TimeLocalizer<Tz>,
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
) -> Result<Vec<NaiveDate>> {
    if start >= end {
        return Err(Error::invalid_date_range(
            start.naive_local(),
            end.naive_local(),
        ));
    }

    let mut days = Vec::new();
    let mut day = start.date_naive();
    while localizer.start_of_day(day)? < *end {
        days.push(day);
        day = day
            .succ_opt()
            .ok_or_else(|| Error::invalid_date_range(start.naive_local(), end.naive_local()))?;
    }
    Ok(days)
}
