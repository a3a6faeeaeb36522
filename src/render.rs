//! # Figure rendering
//!
//! Rasterizes the two output figures as PNG files with the [`image`] crate:
//!
//! * [`render_orbit_plot`] – the trajectory in the orbital plane, the attracting focus at the
//!   origin and the major axis from apoapsis `x = −(1+e)` to periapsis `x = 1−e`.
//! * [`render_raan_plot`] – RAAN (degrees) against time.
//!
//! Both figures share the same [`PlotStyle`]. World coordinates are mapped into the area left
//! inside the margins; the orbit plot keeps equal scales on both axes so the ellipse is not
//! distorted.
use camino::Utf8Path;
use image::{Rgb, RgbImage};
use itertools::{Itertools, MinMaxResult};
use nalgebra::Vector2;

use crate::keplot_errors::KeplotError;
use crate::pipeline::OrbitTrack;
use crate::raan::RaanSample;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    /// Blank border in pixels around the plotting area
    pub margin: u32,
    pub background: Rgb<u8>,
    pub axis: Rgb<u8>,
    pub trace: Rgb<u8>,
    pub reference: Rgb<u8>,
    pub marker: Rgb<u8>,
    /// Radius in pixels of the focus marker
    pub marker_radius: u32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        PlotStyle {
            width: 800,
            height: 600,
            margin: 40,
            background: Rgb([255, 255, 255]),
            axis: Rgb([0, 0, 0]),
            trace: Rgb([31, 119, 180]),
            reference: Rgb([127, 127, 127]),
            marker: Rgb([214, 39, 40]),
            marker_radius: 4,
        }
    }
}

/// World-space rectangle shown by a figure.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

fn span(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    match values.filter(|v| v.is_finite()).minmax() {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
    }
}

impl Bounds {
    fn around(points: &[Vector2<f64>]) -> Option<Self> {
        let (x_min, x_max) = span(points.iter().map(|p| p.x))?;
        let (y_min, y_max) = span(points.iter().map(|p| p.y))?;
        Some(
            Bounds {
                x_min,
                x_max,
                y_min,
                y_max,
            }
            .padded(0.05),
        )
    }

    /// Grow each side by `ratio` of the extent; a degenerate extent becomes one unit wide.
    fn padded(self, ratio: f64) -> Self {
        let grow = |lo: f64, hi: f64| {
            let d = if hi > lo { (hi - lo) * ratio } else { 0.5 };
            (lo - d, hi + d)
        };
        let (x_min, x_max) = grow(self.x_min, self.x_max);
        let (y_min, y_max) = grow(self.y_min, self.y_max);
        Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Widen the shorter side so one world unit spans the same number of pixels on both axes.
    fn equal_aspect(self, plot_w: f64, plot_h: f64) -> Self {
        let w = self.x_max - self.x_min;
        let h = self.y_max - self.y_min;
        let scale = (plot_w / w).min(plot_h / h);
        let (cx, cy) = (
            0.5 * (self.x_min + self.x_max),
            0.5 * (self.y_min + self.y_max),
        );
        let (half_w, half_h) = (0.5 * plot_w / scale, 0.5 * plot_h / scale);
        Bounds {
            x_min: cx - half_w,
            x_max: cx + half_w,
            y_min: cy - half_h,
            y_max: cy + half_h,
        }
    }
}

struct Canvas {
    image: RgbImage,
    bounds: Bounds,
    margin: f64,
}

impl Canvas {
    fn new(style: &PlotStyle, bounds: Bounds) -> Self {
        Canvas {
            image: RgbImage::from_pixel(style.width, style.height, style.background),
            bounds,
            margin: style.margin as f64,
        }
    }

    fn plot_size(style: &PlotStyle) -> (f64, f64) {
        let w = style.width.saturating_sub(2 * style.margin).max(1) as f64;
        let h = style.height.saturating_sub(2 * style.margin).max(1) as f64;
        (w, h)
    }

    /// World → pixel, with the y axis pointing up.
    fn to_pixel(&self, p: Vector2<f64>) -> (f64, f64) {
        let (w, h) = (
            self.image.width() as f64 - 2.0 * self.margin,
            self.image.height() as f64 - 2.0 * self.margin,
        );
        let b = &self.bounds;
        let u = self.margin + (p.x - b.x_min) / (b.x_max - b.x_min) * w;
        let v = self.margin + (b.y_max - p.y) / (b.y_max - b.y_min) * h;
        (u, v)
    }

    fn put(&mut self, u: f64, v: f64, color: Rgb<u8>) {
        let (u, v) = (u.round(), v.round());
        if u >= 0.0 && v >= 0.0 && u < self.image.width() as f64 && v < self.image.height() as f64
        {
            self.image.put_pixel(u as u32, v as u32, color);
        }
    }

    fn segment(&mut self, a: Vector2<f64>, b: Vector2<f64>, color: Rgb<u8>) {
        let (u0, v0) = self.to_pixel(a);
        let (u1, v1) = self.to_pixel(b);
        if !(u0.is_finite() && v0.is_finite() && u1.is_finite() && v1.is_finite()) {
            return;
        }
        let steps = (u1 - u0).abs().max((v1 - v0).abs()).ceil().max(1.0);
        // Segments far outside the image would only burn cycles.
        if steps > 1e5 {
            return;
        }
        let n = steps as usize;
        for i in 0..=n {
            let t = i as f64 / steps;
            self.put(u0 + t * (u1 - u0), v0 + t * (v1 - v0), color);
        }
    }

    fn polyline(&mut self, points: &[Vector2<f64>], color: Rgb<u8>) {
        for (a, b) in points.iter().tuple_windows() {
            self.segment(*a, *b, color);
        }
        if let [single] = points {
            self.segment(*single, *single, color);
        }
    }

    fn disc(&mut self, center: Vector2<f64>, radius: u32, color: Rgb<u8>) {
        let (cu, cv) = self.to_pixel(center);
        let r = radius as i64;
        for du in -r..=r {
            for dv in -r..=r {
                if du * du + dv * dv <= r * r {
                    self.put(cu + du as f64, cv + dv as f64, color);
                }
            }
        }
    }

    /// Box around the plotting area.
    fn frame(&mut self, color: Rgb<u8>) {
        let b = self.bounds;
        let corners = [
            Vector2::new(b.x_min, b.y_min),
            Vector2::new(b.x_max, b.y_min),
            Vector2::new(b.x_max, b.y_max),
            Vector2::new(b.x_min, b.y_max),
            Vector2::new(b.x_min, b.y_min),
        ];
        self.polyline(&corners, color);
    }

    fn save(self, path: &Utf8Path) -> Result<(), KeplotError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        self.image.save(path)?;
        tracing::info!(%path, "figure written");
        Ok(())
    }
}

/// Draw the orbit: focus, major-axis reference line and trajectory.
///
/// Return
/// ----------
/// * `Err(KeplotError::EmptySeries)` if the track has no solved point.
/// * I/O or encoding errors from writing `path`; missing parent directories are created.
pub fn render_orbit_plot(
    track: &OrbitTrack,
    path: &Utf8Path,
    style: &PlotStyle,
) -> Result<(), KeplotError> {
    let trajectory: Vec<Vector2<f64>> = track.positions().collect();
    if trajectory.is_empty() {
        return Err(KeplotError::EmptySeries("orbit track has no point".into()));
    }

    let e = track.eccentricity;
    let focus = Vector2::new(0.0, 0.0);
    let major_axis = [Vector2::new(-(1.0 + e), 0.0), Vector2::new(1.0 - e, 0.0)];

    let mut extent = trajectory.clone();
    extent.push(focus);
    extent.extend_from_slice(&major_axis);

    let (w, h) = Canvas::plot_size(style);
    let bounds = Bounds::around(&extent)
        .ok_or_else(|| KeplotError::EmptySeries("orbit track has no finite point".into()))?
        .equal_aspect(w, h);

    let mut canvas = Canvas::new(style, bounds);
    canvas.frame(style.axis);
    canvas.polyline(&major_axis, style.reference);
    canvas.polyline(&trajectory, style.trace);
    canvas.disc(focus, style.marker_radius, style.marker);
    canvas.save(path)
}

/// Draw RAAN against time as a single line.
pub fn render_raan_plot(
    samples: &[RaanSample],
    path: &Utf8Path,
    style: &PlotStyle,
) -> Result<(), KeplotError> {
    let line: Vec<Vector2<f64>> = samples
        .iter()
        .map(|s| Vector2::new(s.time, s.raan))
        .collect();
    let bounds = Bounds::around(&line)
        .ok_or_else(|| KeplotError::EmptySeries("RAAN series has no point".into()))?;

    let mut canvas = Canvas::new(style, bounds);
    canvas.frame(style.axis);
    canvas.polyline(&line, style.trace);
    canvas.save(path)
}
