//! Chart assembly: background, band polygons and paint.

use chrono::TimeZone;
use kurbo::{Rect, Size};
use peniko::Color;
use tracing::{debug, info};

use crate::band::{BandKind, BandPath, build_band_path};
use crate::config::ChartSettings;
use crate::events::{DailyEventSeries, SolarEventCalculator};
use crate::layout::LayoutParameters;
use crate::mapper::CoordinateMapper;
use crate::oracle::EphemerisOracle;
use crate::time::TimeLocalizer;
use crate::Result;

/// Fill colors, from full daylight to full night.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Background: sun above the horizon.
    pub day: Color,
    /// Between sunset and the end of civil twilight.
    pub civil: Color,
    /// Nautical twilight.
    pub nautical: Color,
    /// Astronomical twilight.
    pub astro: Color,
    /// Sun more than 18° below the horizon.
    pub night: Color,
}

impl Palette {
    /// Fill for a band: the color of the twilight phase that starts at its horizon.
    #[must_use]
    pub const fn band_fill(&self, kind: BandKind) -> Color {
        match kind {
            BandKind::SunriseSunset => self.civil,
            BandKind::Civil => self.nautical,
            BandKind::Nautical => self.astro,
            BandKind::Astronomical => self.night,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            day: Color::from_rgb8(0xff, 0xe9, 0xa8),
            civil: Color::from_rgb8(0x9e, 0xc5, 0xe8),
            nautical: Color::from_rgb8(0x5b, 0x8c, 0xc7),
            astro: Color::from_rgb8(0x2c, 0x4f, 0x87),
            night: Color::from_rgb8(0x0f, 0x1c, 0x3a),
        }
    }
}

/// Outline drawn around every band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Line color.
    pub color: Color,
    /// Line width in chart units.
    pub width: f64,
}

/// Paint settings for a chart.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartStyle {
    /// Fill colors.
    pub palette: Palette,
    /// Optional band outline; bands are unstroked when `None`.
    pub stroke: Option<Stroke>,
}

/// One filled band of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    kind: BandKind,
    path: BandPath,
    fill: Color,
    stroke: Option<Stroke>,
}

impl Band {
    /// Which horizon this band is bounded by.
    #[must_use]
    pub const fn kind(&self) -> BandKind {
        self.kind
    }

    /// Closed polygon.
    #[must_use]
    pub const fn path(&self) -> &BandPath {
        &self.path
    }

    /// Fill color.
    #[must_use]
    pub const fn fill(&self) -> Color {
        self.fill
    }

    /// Outline, if any.
    #[must_use]
    pub const fn stroke(&self) -> Option<Stroke> {
        self.stroke
    }
}

/// A complete sun-band chart, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct SunChart {
    size: Size,
    background: Color,
    bands: Vec<Band>,
}

impl SunChart {
    /// Lays the bands of a series out on a canvas sized by `layout`.
    #[must_use]
    pub fn assemble<Tz: TimeZone>(
        series: &DailyEventSeries<Tz>,
        layout: &LayoutParameters,
        style: &ChartStyle,
    ) -> Self {
        let mapper = CoordinateMapper::new(layout);
        let bands = BandKind::ALL
            .into_iter()
            .map(|kind| {
                let path = build_band_path(series, &mapper, kind.lower(), kind.upper());
                debug!(band = kind.name(), points = path.len(), "built band path");
                Band {
                    kind,
                    path,
                    fill: style.palette.band_fill(kind),
                    stroke: style.stroke,
                }
            })
            .collect();

        Self {
            size: layout.size(),
            background: style.palette.day,
            bands,
        }
    }

    /// Canvas size.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Background fill.
    #[must_use]
    pub const fn background(&self) -> Color {
        self.background
    }

    /// Rectangle covering the whole canvas.
    #[must_use]
    pub fn background_rect(&self) -> Rect {
        Rect::from_origin_size((0.0, 0.0), self.size)
    }

    /// Bands in draw order.
    #[must_use]
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }
}

/// Runs the whole pipeline for resolved settings: events, layout and band assembly.
///
/// # Errors
/// Any error from building the series (`InvalidDateRange`, `PolarEvent`,
/// `OracleUnavailable`); no chart is produced in that case.
pub fn generate_chart<O>(settings: &ChartSettings, oracle: &O) -> Result<SunChart>
where
    O: EphemerisOracle + Sync + ?Sized,
{
    let localizer = TimeLocalizer::new(settings.timezone());
    let calculator = SolarEventCalculator::new(oracle, *settings.observer(), localizer);
    let (start, end) = (*settings.start(), *settings.end());

    #[cfg(feature = "parallel")]
    let series = if settings.parallel() {
        DailyEventSeries::build_parallel(&calculator, start, end)?
    } else {
        DailyEventSeries::build(&calculator, start, end)?
    };
    #[cfg(not(feature = "parallel"))]
    let series = DailyEventSeries::build(&calculator, start, end)?;

    let layout = LayoutParameters::compute(&series, settings.layout())?;
    let chart = SunChart::assemble(&series, &layout, settings.style());
    info!(
        width = chart.size.width,
        height = chart.size.height,
        bands = chart.bands.len(),
        "assembled chart"
    );
    Ok(chart)
}
