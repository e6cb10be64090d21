//! NURBS surfaces
//!
//! Control points are stored as a flat list ordered v-fastest: the point at
//! `(u, v)` lives at index `u * size_v + v`.

use serde_json::{json, Value};

use super::curve::knot_error;
use super::fields;
use super::knots;
use crate::error::{CliError, Result};

/// Evaluation delta used when the input data does not set one
pub const DEFAULT_SURFACE_DELTA: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    degree_u: usize,
    degree_v: usize,
    size_u: usize,
    size_v: usize,
    knotvector_u: Vec<f64>,
    knotvector_v: Vec<f64>,
    ctrlpts: Vec<Vec<f64>>,
    weights: Option<Vec<f64>>,
    delta: f64,
}

/// Evaluated points laid out on the `rows x cols` parameter grid
#[derive(Debug, Clone, PartialEq)]
pub struct PointGrid {
    pub rows: usize,
    pub cols: usize,
    pub points: Vec<Vec<f64>>,
}

impl PointGrid {
    pub fn at(&self, row: usize, col: usize) -> &[f64] {
        &self.points[row * self.cols + col]
    }

    /// Two triangles per grid cell, as indices into `points`
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        let mut tris = Vec::with_capacity(2 * self.rows.saturating_sub(1) * self.cols.saturating_sub(1));
        for r in 0..self.rows.saturating_sub(1) {
            for c in 0..self.cols.saturating_sub(1) {
                let a = r * self.cols + c;
                let b = a + 1;
                let d = a + self.cols;
                let e = d + 1;
                tris.push([a, d, b]);
                tris.push([b, d, e]);
            }
        }
        tris
    }
}

impl Surface {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        degree_u: usize,
        degree_v: usize,
        size_u: usize,
        size_v: usize,
        knotvector_u: Vec<f64>,
        knotvector_v: Vec<f64>,
        ctrlpts: Vec<Vec<f64>>,
        weights: Option<Vec<f64>>,
    ) -> Result<Self> {
        if size_u * size_v != ctrlpts.len() {
            return Err(CliError::invalid_shape(format!(
                "size_u x size_v is {} but {} control points were given",
                size_u * size_v,
                ctrlpts.len()
            )));
        }
        knots::validate(degree_u, &knotvector_u, size_u).map_err(knot_error)?;
        knots::validate(degree_v, &knotvector_v, size_v).map_err(knot_error)?;

        if let Some(w) = &weights {
            if w.len() != ctrlpts.len() {
                return Err(CliError::invalid_shape(format!(
                    "expected {} weights, got {}",
                    ctrlpts.len(),
                    w.len()
                )));
            }
        }

        Ok(Self {
            degree_u,
            degree_v,
            size_u,
            size_v,
            knotvector_u,
            knotvector_v,
            ctrlpts,
            weights,
            delta: DEFAULT_SURFACE_DELTA,
        })
    }

    pub fn from_value(data: &Value) -> Result<Self> {
        let degree_u = fields::usize_field(data, "degree_u")?;
        let degree_v = fields::usize_field(data, "degree_v")?;
        let size_u = fields::usize_field(data, "size_u")?;
        let size_v = fields::usize_field(data, "size_v")?;
        let (ctrlpts, weights) = fields::control_points(data)?;
        let knotvector_u = fields::numbers(fields::field(data, "knotvector_u")?, "knotvector_u")?;
        let knotvector_v = fields::numbers(fields::field(data, "knotvector_v")?, "knotvector_v")?;

        let mut surface = Self::new(
            degree_u,
            degree_v,
            size_u,
            size_v,
            knotvector_u,
            knotvector_v,
            ctrlpts,
            weights,
        )?;
        if let Some(delta) = fields::optional_f64(data, "delta")? {
            surface.set_delta(knots::check_delta(delta).map_err(knot_error)?);
        }
        Ok(surface)
    }

    pub fn to_value(&self) -> Value {
        let mut ctrl = json!({ "points": self.ctrlpts });
        if let Some(w) = &self.weights {
            ctrl["weights"] = json!(w);
        }

        json!({
            "degree_u": self.degree_u,
            "degree_v": self.degree_v,
            "size_u": self.size_u,
            "size_v": self.size_v,
            "knotvector_u": self.knotvector_u,
            "knotvector_v": self.knotvector_v,
            "control_points": ctrl,
            "delta": self.delta,
        })
    }

    pub fn degrees(&self) -> (usize, usize) {
        (self.degree_u, self.degree_v)
    }

    pub fn sizes(&self) -> (usize, usize) {
        (self.size_u, self.size_v)
    }

    pub fn knotvectors(&self) -> (&[f64], &[f64]) {
        (&self.knotvector_u, &self.knotvector_v)
    }

    pub fn ctrlpts(&self) -> &[Vec<f64>] {
        &self.ctrlpts
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    pub fn dimension(&self) -> usize {
        self.ctrlpts.first().map(Vec::len).unwrap_or(0)
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn set_delta(&mut self, delta: f64) {
        self.delta = delta;
    }

    pub fn point_at(&self, u: f64, v: f64) -> Vec<f64> {
        let dim = self.dimension();
        let span_u = knots::find_span(self.degree_u, &self.knotvector_u, self.size_u, u);
        let span_v = knots::find_span(self.degree_v, &self.knotvector_v, self.size_v, v);
        let basis_u = knots::basis_functions(self.degree_u, &self.knotvector_u, span_u, u);
        let basis_v = knots::basis_functions(self.degree_v, &self.knotvector_v, span_v, v);

        let mut homogeneous = vec![0.0; dim + 1];
        for (k, nu) in basis_u.iter().enumerate() {
            let iu = span_u - self.degree_u + k;
            for (l, nv) in basis_v.iter().enumerate() {
                let idx = iu * self.size_v + span_v - self.degree_v + l;
                let w = self.weights.as_ref().map(|w| w[idx]).unwrap_or(1.0);
                let factor = nu * nv * w;
                for (acc, c) in homogeneous.iter_mut().zip(&self.ctrlpts[idx]) {
                    *acc += factor * c;
                }
                homogeneous[dim] += factor;
            }
        }

        let w = homogeneous[dim];
        homogeneous.truncate(dim);
        homogeneous.iter().map(|c| c / w).collect()
    }

    /// Evaluates the surface on a uniform grid, rows along u
    pub fn eval_grid(&self) -> PointGrid {
        let samples = knots::sample_size(self.delta);
        let (u0, u1) = knots::domain(self.degree_u, &self.knotvector_u);
        let (v0, v1) = knots::domain(self.degree_v, &self.knotvector_v);
        let us = knots::linspace(u0, u1, samples);
        let vs = knots::linspace(v0, v1, samples);

        let mut points = Vec::with_capacity(samples * samples);
        for &u in &us {
            for &v in &vs {
                points.push(self.point_at(u, v));
            }
        }

        PointGrid {
            rows: us.len(),
            cols: vs.len(),
            points,
        }
    }

    pub fn evalpts(&self) -> Vec<Vec<f64>> {
        self.eval_grid().points
    }
}
