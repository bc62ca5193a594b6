//! Closed band polygons bounded by two per-day event curves.

use chrono::{DateTime, TimeZone};
use kurbo::{BezPath, Point};

use crate::events::DailyEventSeries;
use crate::mapper::CoordinateMapper;
use crate::types::{Horizon, SunEvents};

/// Picks one event of a record as a band boundary.
pub type Selector<Tz> = for<'a> fn(&'a SunEvents<Tz>) -> &'a DateTime<Tz>;

/// The four bands of a sun-band chart, one per horizon.
///
/// Each band covers the time the sun is below its horizon: from the evening crossing down
/// through midnight to the morning crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandKind {
    /// Below the standard sunrise/sunset horizon.
    SunriseSunset,
    /// Below the civil twilight horizon.
    Civil,
    /// Below the nautical twilight horizon.
    Nautical,
    /// Below the astronomical twilight horizon.
    Astronomical,
}

impl BandKind {
    /// All bands in draw order; later bands are painted over earlier ones.
    pub const ALL: [Self; 4] = [
        Self::SunriseSunset,
        Self::Civil,
        Self::Nautical,
        Self::Astronomical,
    ];

    /// Horizon bounding this band.
    #[must_use]
    pub const fn horizon(self) -> Horizon {
        match self {
            Self::SunriseSunset => Horizon::SUNRISE_SUNSET,
            Self::Civil => Horizon::CIVIL,
            Self::Nautical => Horizon::NAUTICAL,
            Self::Astronomical => Horizon::ASTRONOMICAL,
        }
    }

    /// Morning boundary, traced left to right.
    #[must_use]
    pub fn lower<Tz: TimeZone>(self) -> Selector<Tz> {
        match self {
            Self::SunriseSunset => SunEvents::rise,
            Self::Civil => SunEvents::civil_twilight_am,
            Self::Nautical => SunEvents::nautical_twilight_am,
            Self::Astronomical => SunEvents::astro_twilight_am,
        }
    }

    /// Evening boundary, traced right to left.
    #[must_use]
    pub fn upper<Tz: TimeZone>(self) -> Selector<Tz> {
        match self {
            Self::SunriseSunset => SunEvents::set,
            Self::Civil => SunEvents::civil_twilight_pm,
            Self::Nautical => SunEvents::nautical_twilight_pm,
            Self::Astronomical => SunEvents::astro_twilight_pm,
        }
    }

    /// Short lowercase name, used as the SVG element id.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SunriseSunset => "sunrise-sunset",
            Self::Civil => "civil",
            Self::Nautical => "nautical",
            Self::Astronomical => "astronomical",
        }
    }
}

/// A closed polygon in chart space.
///
/// Holds the first boundary forward, the second boundary backward and then a copy of the
/// first point, so a non-empty path over `n` records has `2n + 1` points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BandPath {
    points: Vec<Point>,
}

impl BandPath {
    /// Points in drawing order, including the closing point.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True for the path of an empty series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True if the last point equals the first.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!((self.points.first(), self.points.last()), (Some(a), Some(b)) if a == b)
    }

    /// Converts to a fillable kurbo path.
    #[must_use]
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some((&first, rest)) = self.points.split_first() else {
            return path;
        };
        path.move_to(first);
        for &pt in rest {
            path.line_to(pt);
        }
        path.close_path();
        path
    }
}

/// Builds the polygon between two boundaries of every record in the series.
#[must_use]
pub fn build_band_path<Tz, L, U>(
    series: &DailyEventSeries<Tz>,
    mapper: &CoordinateMapper<'_>,
    lower: L,
    upper: U,
) -> BandPath
where
    Tz: TimeZone,
    L: Fn(&SunEvents<Tz>) -> &DateTime<Tz>,
    U: Fn(&SunEvents<Tz>) -> &DateTime<Tz>,
{
    let events = series.events();
    if events.is_empty() {
        return BandPath::default();
    }

    let mut points = Vec::with_capacity(events.len() * 2 + 1);
    points.extend(events.iter().map(|e| mapper.map(lower(e))));
    points.extend(events.iter().rev().map(|e| mapper.map(upper(e))));
    points.push(points[0]);
    BandPath { points }
}
