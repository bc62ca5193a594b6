//! Instant to chart-point mapping.

use chrono::{DateTime, TimeZone, Timelike};
use kurbo::Point;

use crate::layout::LayoutParameters;
use crate::time::hours_since_midnight;

/// Position of an instant in chart space before scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartCoordinate {
    /// Column index, days after the layout's start day.
    pub day: i64,
    /// Hours below the top of the plot.
    pub hours: f64,
}

/// Maps instants to chart points for one layout.
///
/// Afternoon and evening instants (local hour 12 or later) belong to the night that starts
/// on that day, so they move one column right and 24 hours down; this puts an evening
/// crossing in the same column as the following morning's.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper<'a> {
    layout: &'a LayoutParameters,
}

impl<'a> CoordinateMapper<'a> {
    /// Creates a mapper for the given layout.
    #[must_use]
    pub const fn new(layout: &'a LayoutParameters) -> Self {
        Self { layout }
    }

    /// Layout this mapper projects into.
    #[must_use]
    pub const fn layout(&self) -> &'a LayoutParameters {
        self.layout
    }

    /// Unscaled column and hour position of an instant, using its local wall-clock time.
    #[must_use]
    pub fn coordinate<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> ChartCoordinate {
        let mut day = (instant.date_naive() - self.layout.start_day()).num_days();
        let mut hours = self.layout.latest_rise_offset() - hours_since_midnight(instant);
        if instant.hour() >= 12 {
            day += 1;
            hours += 24.0;
        }
        ChartCoordinate { day, hours }
    }

    /// Chart point of an instant, scaled and padded.
    #[must_use]
    pub fn map<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> Point {
        let ChartCoordinate { day, hours } = self.coordinate(instant);
        let style = self.layout.style();
        let (scale, padding) = (style.scale(), style.padding());
        #[allow(clippy::cast_precision_loss)]
        let x = (day as f64).mul_add(scale.day, padding.left);
        let y = hours.mul_add(scale.hour, padding.top);
        Point::new(x, y)
    }
}
