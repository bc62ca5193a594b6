//! # sunbands
//!
//! Daily sunrise, sunset and twilight events for one location, laid out as a stacked
//! "sun-band" chart: each calendar day is a column, and nested bands show the time the sun
//! spends below the standard, civil, nautical and astronomical horizons.
//!
//! ## Pipeline
//!
//! 1. [`SolarEventCalculator`] asks an [`EphemerisOracle`] for the crossings around each local
//!    midnight and builds one [`SunEvents`] record per day.
//! 2. [`DailyEventSeries`] collects the records for a date range.
//! 3. [`LayoutParameters`] sizes the canvas from the latest sunrise and earliest sunset.
//! 4. [`CoordinateMapper`] and [`build_band_path`] turn each pair of boundaries into a closed
//!    polygon.
//! 5. [`SunChart`] holds the background and the four bands, and renders to SVG.
//!
//! The default oracle, [`SpaOracle`], runs NREL's Solar Position Algorithm from the
//! `solar-positioning` crate.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sunbands::{ChartConfig, SpaOracle, generate_chart, write_svg};
//!
//! let settings = ChartConfig::default().resolve().unwrap();
//! let oracle = SpaOracle::new(settings.delta_t());
//! let chart = generate_chart(&settings, &oracle).unwrap();
//! write_svg(&chart, settings.output()).unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default): compute days concurrently with `rayon`
//!
//! ## Chart geometry
//!
//! - **x**: days after the first day of the range, times the day scale
//! - **y**: hours below the latest sunrise of the range, times the hour scale; instants at
//!   or after local noon move one column right and 24 hours down, so a night's evening and
//!   morning crossings share a column

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery, clippy::cargo, clippy::all)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cargo_common_metadata,
    clippy::multiple_crate_versions, // Acceptable for dev-dependencies
    clippy::float_cmp, // Exact comparisons of chart coordinates in tests
)]

// Public API exports
pub use crate::band::{BandKind, BandPath, Selector, build_band_path};
pub use crate::chart::{Band, ChartStyle, Palette, Stroke, SunChart, generate_chart};
pub use crate::config::{ChartConfig, ChartSettings};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::events::{DailyEventSeries, SolarEventCalculator};
pub use crate::layout::{LayoutParameters, LayoutStyle, Padding, Scale};
pub use crate::mapper::{ChartCoordinate, CoordinateMapper};
pub use crate::oracle::{DeltaTSource, EphemerisOracle, OracleError, OracleResult, SpaOracle};
pub use crate::svg::write_svg;
pub use crate::time::{TimeLocalizer, hours_since_midnight};
pub use crate::types::{DiscReference, Horizon, Observer, PolarKind, SunEvents};

// Core modules
pub mod error;
pub mod types;

// Event computation
pub mod events;
pub mod oracle;
pub mod time;

// Geometry and rendering
pub mod band;
pub mod chart;
pub mod layout;
pub mod mapper;
pub mod svg;

pub mod config;

#[cfg(test)]
mod testing;
