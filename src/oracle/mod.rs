//! Ephemeris oracle: the rise/set/antitransit queries the event calculator is built on.
//!
//! The trait takes the horizon as an explicit value on every query, so one oracle can be
//! shared by concurrent per-day computations.

mod spa;

pub use spa::{DeltaTSource, SpaOracle};

use chrono::{DateTime, Utc};

use crate::types::{Horizon, Observer, PolarKind};

/// Failure of a single oracle query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OracleError {
    /// The sun does not cross the horizon near the query instant.
    #[error("sun {kind} the horizon")]
    NoCrossing {
        /// Whether the sun stayed above or below.
        kind: PolarKind,
    },
    /// The backend could not compute the query.
    #[error("ephemeris unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}

/// Result type for oracle queries.
pub type OracleResult<T> = core::result::Result<T, OracleError>;

/// Lower-level astronomical rise/set oracle.
///
/// "Setting" is the sun's center (or upper limb, per the horizon) descending through the
/// horizon, "rising" ascending through it. Antitransit is the lower meridian crossing.
pub trait EphemerisOracle {
    /// Last setting at or before `at`.
    ///
    /// # Errors
    /// `NoCrossing` when the sun does not cross the horizon around `at`, `Unavailable` when
    /// the backend fails.
    fn previous_setting(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
        horizon: Horizon,
    ) -> OracleResult<DateTime<Utc>>;

    /// First rising strictly after `at`.
    ///
    /// # Errors
    /// `NoCrossing` when the sun does not cross the horizon around `at`, `Unavailable` when
    /// the backend fails.
    fn next_rising(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
        horizon: Horizon,
    ) -> OracleResult<DateTime<Utc>>;

    /// Last antitransit at or before `at`.
    ///
    /// # Errors
    /// `Unavailable` when the backend fails.
    fn previous_antitransit(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> OracleResult<DateTime<Utc>>;

    /// First antitransit strictly after `at`.
    ///
    /// # Errors
    /// `Unavailable` when the backend fails.
    fn next_antitransit(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> OracleResult<DateTime<Utc>>;
}

impl<O: EphemerisOracle + ?Sized> EphemerisOracle for &O {
    fn previous_setting(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
        horizon: Horizon,
    ) -> OracleResult<DateTime<Utc>> {
        (**self).previous_setting(observer, at, horizon)
    }

    fn next_rising(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
        horizon: Horizon,
    ) -> OracleResult<DateTime<Utc>> {
        (**self).next_rising(observer, at, horizon)
    }

    fn previous_antitransit(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> OracleResult<DateTime<Utc>> {
        (**self).previous_antitransit(observer, at)
    }

    fn next_antitransit(
        &self,
        observer: &Observer,
        at: DateTime<Utc>,
    ) -> OracleResult<DateTime<Utc>> {
        (**self).next_antitransit(observer, at)
    }
}
