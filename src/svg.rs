//! SVG rendering of a [`SunChart`].

use std::io::Write;
use std::path::Path;

use peniko::Color;
use tempfile::NamedTempFile;
use tracing::info;

use crate::chart::SunChart;
use crate::{Error, Result};

impl SunChart {
    /// Renders the chart as an SVG Tiny document: a background rectangle followed by one
    /// filled path per band, in draw order.
    #[must_use]
    pub fn to_svg_string(&self) -> String {
        let size = self.size();
        let mut out = String::new();

        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.2" baseProfile="tiny" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = size.width,
            h = size.height,
        ));
        out.push('\n');

        let rect = self.background_rect();
        out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}""#,
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height(),
        ));
        write_paint_attr(&mut out, "fill", self.background());
        out.push_str("/>\n");

        for band in self.bands() {
            if band.path().is_empty() {
                continue;
            }
            let d = band.path().to_bez_path().to_svg();
            out.push_str(&format!(r#"<path id="{}" d="{d}""#, band.kind().name()));
            write_paint_attr(&mut out, "fill", band.fill());
            if let Some(stroke) = band.stroke() {
                write_paint_attr(&mut out, "stroke", stroke.color);
                out.push_str(&format!(r#" stroke-width="{}""#, stroke.width));
            } else {
                out.push_str(r#" stroke="none""#);
            }
            out.push_str("/>\n");
        }

        out.push_str("</svg>\n");
        out
    }
}

fn svg_paint(color: Color) -> (String, Option<f64>) {
    let rgba = color.to_rgba8();
    let value = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
    let opacity = if rgba.a == 255 {
        None
    } else {
        Some(f64::from(rgba.a) / 255.0)
    };
    (value, opacity)
}

fn write_paint_attr(out: &mut String, name: &str, color: Color) {
    let (value, opacity) = svg_paint(color);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

/// Writes the chart to `path` as SVG.
///
/// The document goes to a uniquely named temporary file in the target directory that is then
/// renamed over `path`, so a failed write never leaves a partial chart behind.
///
/// # Errors
/// `Output` if the file cannot be written or moved into place.
pub fn write_svg(chart: &SunChart, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let document = chart.to_svg_string();

    let mut staging = NamedTempFile::new_in(dir)
        .map_err(|e| Error::output(format!("{}: {e}", dir.display())))?;
    staging
        .write_all(document.as_bytes())
        .and_then(|()| staging.flush())
        .map_err(|e| Error::output(format!("{}: {e}", staging.path().display())))?;
    staging
        .persist(path)
        .map_err(|e| Error::output(format!("{}: {}", path.display(), e.error)))?;

    info!(path = %path.display(), bytes = document.len(), "wrote chart");
    Ok(())
}
