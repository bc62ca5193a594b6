//! Canvas layout: static scales and padding plus the offsets derived from the data.

use chrono::{NaiveDate, TimeZone};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{check_padding, check_scale};
use crate::events::DailyEventSeries;
use crate::time::hours_since_midnight;
use crate::{Error, Result};

/// Chart units per hour (vertical) and per day (horizontal).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scale {
    /// Units per hour of the day.
    pub hour: f64,
    /// Units per calendar day.
    pub day: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            hour: 10.0,
            day: 2.0,
        }
    }
}

/// Empty space around the plot, in chart units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    /// Space above the plot.
    pub top: f64,
    /// Space left of the plot.
    pub left: f64,
    /// Space below the plot.
    pub bottom: f64,
    /// Space right of the plot.
    pub right: f64,
}

impl Padding {
    /// The same padding on every side.
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            left: value,
            bottom: value,
            right: value,
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::uniform(10.0)
    }
}

/// Validated static layout configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutStyle {
    scale: Scale,
    padding: Padding,
}

impl LayoutStyle {
    /// Creates a layout style.
    ///
    /// # Errors
    /// `InvalidScale` for a non-positive scale, `InvalidPadding` for negative padding.
    pub fn new(scale: Scale, padding: Padding) -> Result<Self> {
        check_scale("hour", scale.hour)?;
        check_scale("day", scale.day)?;
        check_padding("top", padding.top)?;
        check_padding("left", padding.left)?;
        check_padding("bottom", padding.bottom)?;
        check_padding("right", padding.right)?;
        Ok(Self { scale, padding })
    }

    /// Scale factors.
    #[must_use]
    pub const fn scale(&self) -> Scale {
        self.scale
    }

    /// Padding.
    #[must_use]
    pub const fn padding(&self) -> Padding {
        self.padding
    }
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            scale: Scale::default(),
            padding: Padding::default(),
        }
    }
}

/// Layout derived from a [`DailyEventSeries`]: the vertical extent of the plot and the canvas size.
///
/// The plot's top edge is the latest sunrise of the range, in hours after midnight; its bottom
/// edge the earliest sunset, in hours before the following midnight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParameters {
    start_day: NaiveDate,
    earliest_set_offset: f64,
    latest_rise_offset: f64,
    size: Size,
    style: LayoutStyle,
}

impl LayoutParameters {
    /// Computes the layout for a series.
    ///
    /// The plot spans [`DailyEventSeries::day_count`] columns, widened to the last record's
    /// column when a short DST day leaves the range with more records than whole days.
    ///
    /// # Errors
    /// `EmptySeries` if the series has no records.
    pub fn compute<Tz: TimeZone>(
        series: &DailyEventSeries<Tz>,
        style: &LayoutStyle,
    ) -> Result<Self> {
        let earliest_set = series
            .iter()
            .map(|events| hours_since_midnight(events.set()))
            .reduce(f64::min)
            .ok_or(Error::EmptySeries)?;
        let latest_rise = series
            .iter()
            .map(|events| hours_since_midnight(events.rise()))
            .reduce(f64::max)
            .ok_or(Error::EmptySeries)?;

        let earliest_set_offset = 24.0 - earliest_set;
        let latest_rise_offset = latest_rise;

        let scale = style.scale();
        let padding = style.padding();
        // a range ending just after a short DST day can hold one more record than whole days
        let last_column = i64::try_from(series.len()).map_or(i64::MAX, |n| n - 1);
        #[allow(clippy::cast_precision_loss)]
        let days = series.day_count().max(last_column) as f64;
        let width = days.mul_add(scale.day, padding.left + padding.right);
        let height = (earliest_set_offset + latest_rise_offset)
            .mul_add(scale.hour, padding.top + padding.bottom);
        let size = Size::new(width, height);

        info!(
            earliest_set_offset,
            latest_rise_offset,
            width = size.width,
            height = size.height,
            "computed chart layout"
        );

        Ok(Self {
            start_day: series.start().date_naive(),
            earliest_set_offset,
            latest_rise_offset,
            size,
            style: *style,
        })
    }

    /// Local calendar day of the first column.
    #[must_use]
    pub const fn start_day(&self) -> NaiveDate {
        self.start_day
    }

    /// Hours from the earliest sunset to the following midnight.
    #[must_use]
    pub const fn earliest_set_offset(&self) -> f64 {
        self.earliest_set_offset
    }

    /// Hours from midnight to the latest sunrise.
    #[must_use]
    pub const fn latest_rise_offset(&self) -> f64 {
        self.latest_rise_offset
    }

    /// Canvas size including padding.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Canvas width.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.size.width
    }

    /// Canvas height.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.size.height
    }

    /// Static style the layout was computed with.
    #[must_use]
    pub const fn style(&self) -> &LayoutStyle {
        &self.style
    }
}
