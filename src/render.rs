//! SVG plot rendering
//!
//! Draws control polygons and evaluated points of curves and surfaces.
//! Three-dimensional shapes are drawn with an isometric projection (z up).

use std::fmt::Write;

use crate::domain::{Resolved, Shape};
use crate::error::{CliError, Result};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;
const MARGIN: f64 = 40.0;
const PALETTE: [&str; 6] = ["#1f77b4", "#d62728", "#2ca02c", "#9467bd", "#ff7f0e", "#17becf"];

/// What to draw, from `--vis="ctrlpts:on;evalpts:off;legend:on"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisOptions {
    pub ctrlpts: bool,
    pub evalpts: bool,
    pub legend: bool,
}

impl Default for VisOptions {
    fn default() -> Self {
        Self {
            ctrlpts: true,
            evalpts: true,
            legend: true,
        }
    }
}

impl VisOptions {
    /// Parses `key:on|off` pairs separated by `;`. Malformed entries and
    /// unknown keys are skipped.
    pub fn parse(spec: &str) -> Self {
        let mut options = Self::default();
        for entry in spec.split(';') {
            let Some((key, value)) = entry.split_once(':') else {
                continue;
            };
            let enabled = match value.trim() {
                "on" => true,
                "off" => false,
                _ => continue,
            };
            match key.trim() {
                "ctrlpts" => options.ctrlpts = enabled,
                "evalpts" => options.evalpts = enabled,
                "legend" => options.legend = enabled,
                _ => {}
            }
        }
        options
    }
}

/// A projected point in plot space
#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Copy)]
struct BoundingBox {
    min: Point,
    max: Point,
}

impl BoundingBox {
    fn new() -> Self {
        Self {
            min: Point { x: f64::MAX, y: f64::MAX },
            max: Point { x: f64::MIN, y: f64::MIN },
        }
    }

    fn expand(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }
}

fn project(point: &[f64]) -> Point {
    match point {
        [x, y] => Point { x: *x, y: *y },
        [x, y, z, ..] => {
            let (sin, cos) = 30f64.to_radians().sin_cos();
            Point {
                x: (x - y) * cos,
                y: z + (x + y) * sin,
            }
        }
        _ => Point { x: 0.0, y: 0.0 },
    }
}

/// Polylines of one shape, ready to draw
struct Layer {
    label: String,
    ctrl: Vec<Vec<Point>>,
    eval: Vec<Vec<Point>>,
}

fn rows_and_columns(points: Vec<Point>, rows: usize, cols: usize) -> Vec<Vec<Point>> {
    if cols == 0 {
        return Vec::new();
    }
    let mut lines: Vec<Vec<Point>> = points.chunks(cols).map(<[Point]>::to_vec).collect();
    lines.extend((0..cols).map(|c| (0..rows).map(|r| points[r * cols + c]).collect()));
    lines
}

fn layer(index: usize, shape: &Shape) -> Result<Layer> {
    let dimension = shape.dimension();
    if !(2..=3).contains(&dimension) {
        return Err(CliError::Unsupported(format!(
            "Can only plot 2- or 3-dimensional shapes, got {dimension} dimensions"
        )));
    }

    let ctrl_points: Vec<Point> = shape.ctrlpts().iter().map(|p| project(p)).collect();
    let layer = match shape {
        Shape::Curve(curve) => Layer {
            label: format!("Curve {}", index + 1),
            ctrl: vec![ctrl_points],
            eval: vec![curve.evalpts().iter().map(|p| project(p)).collect()],
        },
        Shape::Surface(surface) => {
            let (size_u, size_v) = surface.sizes();
            let grid = surface.eval_grid();
            let eval_points = grid.points.iter().map(|p| project(p)).collect();
            Layer {
                label: format!("Surface {}", index + 1),
                ctrl: rows_and_columns(ctrl_points, size_u, size_v),
                eval: rows_and_columns(eval_points, grid.rows, grid.cols),
            }
        }
    };
    Ok(layer)
}

/// Renders the shapes as an SVG document
pub fn plot(resolved: &Resolved, vis: &VisOptions) -> Result<String> {
    let layers = resolved
        .shapes()
        .iter()
        .enumerate()
        .map(|(i, shape)| layer(i, shape))
        .collect::<Result<Vec<_>>>()?;

    let mut bbox = BoundingBox::new();
    for layer in &layers {
        let drawn = vis.ctrlpts.then_some(&layer.ctrl).into_iter().chain(vis.evalpts.then_some(&layer.eval));
        for p in drawn.flatten().flatten() {
            bbox.expand(*p);
        }
    }
    if bbox.is_empty() {
        bbox.expand(Point { x: 0.0, y: 0.0 });
    }

    let span_x = (bbox.max.x - bbox.min.x).max(f64::EPSILON);
    let span_y = (bbox.max.y - bbox.min.y).max(f64::EPSILON);
    let scale = ((WIDTH - 2.0 * MARGIN) / span_x).min((HEIGHT - 2.0 * MARGIN) / span_y);
    let to_screen = |p: &Point| {
        (
            MARGIN + (p.x - bbox.min.x) * scale,
            HEIGHT - MARGIN - (p.y - bbox.min.y) * scale,
        )
    };
    let polyline = |svg: &mut String, line: &[Point], style: &str| {
        let coords: Vec<String> = line
            .iter()
            .map(|p| {
                let (x, y) = to_screen(p);
                format!("{x:.2},{y:.2}")
            })
            .collect();
        let _ = writeln!(svg, r#"  <polyline points="{}" fill="none" {style}/>"#, coords.join(" "));
    };

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#);

    for (i, layer) in layers.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        if vis.ctrlpts {
            let style = format!(r#"stroke="{color}" stroke-width="1" stroke-dasharray="4 3" class="ctrlpts""#);
            for line in &layer.ctrl {
                polyline(&mut svg, line, &style);
            }
            for p in layer.ctrl.iter().flatten() {
                let (x, y) = to_screen(p);
                let _ = writeln!(svg, r#"  <circle cx="{x:.2}" cy="{y:.2}" r="3" fill="{color}"/>"#);
            }
        }
        if vis.evalpts {
            let style = format!(r#"stroke="{color}" stroke-width="2" class="evalpts""#);
            for line in &layer.eval {
                polyline(&mut svg, line, &style);
            }
        }
    }

    if vis.legend {
        for (i, layer) in layers.iter().enumerate() {
            let color = PALETTE[i % PALETTE.len()];
            let y = MARGIN / 2.0 + 16.0 * i as f64;
            let _ = writeln!(
                svg,
                r#"  <text x="{MARGIN}" y="{y}" font-family="sans-serif" font-size="12" fill="{color}" class="legend">{}</text>"#,
                layer.label
            );
        }
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}
