//! Deterministic oracle and fixtures for unit tests.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

use crate::events::{DailyEventSeries, SolarEventCalculator};
use crate::oracle::{EphemerisOracle, OracleError, OracleResult};
use crate::time::TimeLocalizer;
use crate::types::{Horizon, Observer, PolarKind};

pub const OFFSET_HOURS: i32 = 10;

pub fn zone() -> FixedOffset {
    FixedOffset::east_opt(OFFSET_HOURS * 3600).unwrap()
}

pub fn observer() -> Observer {
    Observer::new(-33.865143, 151.2099).unwrap()
}

/// Oracle with clock-regular events in [`zone`]: sunset at `set_hour`, sunrise at `rise_hour`,
/// each twilight horizon one hour further from the standard crossing. Both drift by
/// `drift_minutes` per day of the month, so the extremes fall on known days.
pub struct PatternOracle {
    pub set_hour: i64,
    pub rise_hour: i64,
    pub drift_minutes: i64,
    pub antitransit_offset: Duration,
    pub polar_below: Option<Horizon>,
}

impl PatternOracle {
    pub const fn regular() -> Self {
        Self {
            set_hour: 18,
            rise_hour: 6,
            drift_minutes: 0,
            antitransit_offset: Duration::zero(),
            polar_below: None,
        }
    }

    fn depth(horizon: Horizon) -> i64 {
        Horizon::ALL
            .iter()
            .position(|h| *h == horizon)
            .map_or(0, |i| i as i64)
    }

    fn local_day(at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&zone()).date_naive()
    }

    fn midnight(day: NaiveDate) -> DateTime<Utc> {
        zone()
            .from_local_datetime(&day.and_hms_opt(0, 0, 0).unwrap())
            .unwrap()
            .with_timezone(&Utc)
    }

    fn drift(&self, day: NaiveDate) -> Duration {
        use chrono::Datelike;
        Duration::minutes(self.drift_minutes * i64::from(day.day0()))
    }

    fn setting_on(&self, day: NaiveDate, horizon: Horizon) -> DateTime<Utc> {
        Self::midnight(day)
            + Duration::hours(self.set_hour + Self::depth(horizon))
            + self.drift(day)
    }

    fn rising_on(&self, day: NaiveDate, horizon: Horizon) -> DateTime<Utc> {
        Self::midnight(day) + Duration::hours(self.rise_hour - Self::depth(horizon))
            - self.drift(day)
    }

    fn check(&self, horizon: Horizon) -> OracleResult<()> {
        if self.polar_below == Some(horizon) {
            return Err(OracleError::NoCrossing {
                kind: PolarKind::AlwaysBelow,
            });
        }
        Ok(())
    }
}

impl EphemerisOracle for PatternOracle {
    fn previous_setting(
        &self,
        _observer: &Observer,
        at: DateTime<Utc>,
        horizon: Horizon,
    ) -> OracleResult<DateTime<Utc>> {
        self.check(horizon)?;
        let day = Self::local_day(at);
        let set = self.setting_on(day, horizon);
        if set <= at {
            Ok(set)
        } else {
            Ok(self.setting_on(day.pred_opt().unwrap(), horizon))
        }
    }

    fn next_rising(
        &self,
        _observer: &Observer,
        at: DateTime<Utc>,
        horizon: Horizon,
    ) -> OracleResult<DateTime<Utc>> {
        self.check(horizon)?;
        let day = Self::local_day(at);
        let rise = self.rising_on(day, horizon);
        if rise > at {
            Ok(rise)
        } else {
            Ok(self.rising_on(day.succ_opt().unwrap(), horizon))
        }
    }

    fn previous_antitransit(
        &self,
        _observer: &Observer,
        at: DateTime<Utc>,
    ) -> OracleResult<DateTime<Utc>> {
        let t = Self::midnight(Self::local_day(at)) + self.antitransit_offset;
        Ok(if t <= at { t } else { t - Duration::days(1) })
    }

    fn next_antitransit(
        &self,
        _observer: &Observer,
        at: DateTime<Utc>,
    ) -> OracleResult<DateTime<Utc>> {
        let t = Self::midnight(Self::local_day(at)) + self.antitransit_offset;
        Ok(if t > at { t } else { t + Duration::days(1) })
    }
}

/// Series from `oracle` over `[start, end)` local dates at midnight in [`zone`].
pub fn series(
    oracle: &PatternOracle,
    start: (i32, u32, u32),
    end: (i32, u32, u32),
) -> DailyEventSeries<FixedOffset> {
    let calculator = SolarEventCalculator::new(oracle, observer(), TimeLocalizer::new(zone()));
    let start = zone()
        .with_ymd_and_hms(start.0, start.1, start.2, 0, 0, 0)
        .unwrap();
    let end = zone().with_ymd_and_hms(end.0, end.1, end.2, 0, 0, 0).unwrap();
    DailyEventSeries::build(&calculator, start, end).unwrap()
}
