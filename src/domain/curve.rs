//! NURBS curves

use serde_json::{json, Value};

use super::fields;
use super::knots::{self, KnotError};
use crate::error::{CliError, Result};

/// Evaluation delta used when the input data does not set one
pub const DEFAULT_CURVE_DELTA: f64 = 0.01;

/// A (possibly rational) B-spline curve
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    degree: usize,
    knotvector: Vec<f64>,
    ctrlpts: Vec<Vec<f64>>,
    weights: Option<Vec<f64>>,
    delta: f64,
}

impl Curve {
    pub fn new(
        degree: usize,
        knotvector: Vec<f64>,
        ctrlpts: Vec<Vec<f64>>,
        weights: Option<Vec<f64>>,
    ) -> Result<Self> {
        knots::validate(degree, &knotvector, ctrlpts.len()).map_err(knot_error)?;

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
            degree,
            knotvector,
            ctrlpts,
            weights,
            delta: DEFAULT_CURVE_DELTA,
        })
    }

    /// Builds a curve from one element of the `shape.data` section
    pub fn from_value(data: &Value) -> Result<Self> {
        let degree = fields::usize_field(data, "degree")?;
        let (ctrlpts, weights) = fields::control_points(data)?;
        let knotvector = fields::numbers(fields::field(data, "knotvector")?, "knotvector")?;

        let mut curve = Self::new(degree, knotvector, ctrlpts, weights)?;
        if let Some(delta) = fields::optional_f64(data, "delta")? {
            curve.set_delta(knots::check_delta(delta).map_err(knot_error)?);
        }
        Ok(curve)
    }

    /// The inverse of [`Curve::from_value`]
    pub fn to_value(&self) -> Value {
        let mut ctrl = json!({ "points": self.ctrlpts });
        if let Some(w) = &self.weights {
            ctrl["weights"] = json!(w);
        }

        json!({
            "degree": self.degree,
            "knotvector": self.knotvector,
            "control_points": ctrl,
            "delta": self.delta,
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knotvector(&self) -> &[f64] {
        &self.knotvector
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

    /// Evaluates the curve at `u`
    pub fn point_at(&self, u: f64) -> Vec<f64> {
        let dim = self.dimension();
        let span = knots::find_span(self.degree, &self.knotvector, self.ctrlpts.len(), u);
        let basis = knots::basis_functions(self.degree, &self.knotvector, span, u);

        let mut homogeneous = vec![0.0; dim + 1];
        for (k, n) in basis.iter().enumerate() {
            let idx = span - self.degree + k;
            let w = self.weight(idx);
            for (acc, c) in homogeneous.iter_mut().zip(&self.ctrlpts[idx]) {
                *acc += n * c * w;
            }
            homogeneous[dim] += n * w;
        }

        let w = homogeneous[dim];
        homogeneous.truncate(dim);
        homogeneous.iter().map(|c| c / w).collect()
    }

    /// Points sampled uniformly over the parameter domain
    pub fn evalpts(&self) -> Vec<Vec<f64>> {
        let (start, stop) = knots::domain(self.degree, &self.knotvector);
        knots::linspace(start, stop, knots::sample_size(self.delta))
            .into_iter()
            .map(|u| self.point_at(u))
            .collect()
    }

    fn weight(&self, idx: usize) -> f64 {
        self.weights.as_ref().map(|w| w[idx]).unwrap_or(1.0)
    }
}

pub(crate) fn knot_error(err: KnotError) -> CliError {
    CliError::invalid_shape(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    fn quadratic() -> Curve {
        Curve::from_value(&json!({
            "degree": 2,
            "knotvector": [0, 0, 0, 1, 1, 1],
            "control_points": {"points": [[0, 0], [1, 2], [2, 0]]}
        }))
        .unwrap()
    }

    #[test]
    fn endpoints_interpolate_control_polygon() {
        let curve = quadratic();
        assert!(close(&curve.point_at(0.0), &[0.0, 0.0]));
        assert!(close(&curve.point_at(1.0), &[2.0, 0.0]));
        assert!(close(&curve.point_at(0.5), &[1.0, 1.0]));
    }

    #[test]
    fn evalpts_follows_delta() {
        let mut curve = quadratic();
        curve.set_delta(0.25);
        let pts = curve.evalpts();
        assert_eq!(pts.len(), 5);
        assert!(close(&pts[2], &[1.0, 1.0]));
    }

    #[test]
    fn rational_quarter_circle() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let curve = Curve::from_value(&json!({
            "degree": 2,
            "knotvector": [0, 0, 0, 1, 1, 1],
            "control_points": {"points": [[1, 0], [1, 1], [0, 1]], "weights": [1, h, 1]}
        }))
        .unwrap();

        for p in curve.evalpts() {
            let r = (p[0] * p[0] + p[1] * p[1]).sqrt();
            assert!((r - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn out_of_range_delta_in_data_rejected() {
        for delta in [0.0, -0.5, 1e-12, 1.5] {
            let err = Curve::from_value(&json!({
                "degree": 1,
                "knotvector": [0, 0, 1, 1],
                "control_points": {"points": [[0, 0], [1, 1]]},
                "delta": delta
            }))
            .unwrap_err();
            assert!(matches!(err, CliError::InvalidShape(_)), "{delta}: {err}");
        }
    }

    #[test]
    fn delta_from_data() {
        let curve = Curve::from_value(&json!({
            "degree": 1,
            "knotvector": [0, 0, 1, 1],
            "control_points": {"points": [[0, 0], [1, 1]]},
            "delta": 0.5
        }))
        .unwrap();
        assert_eq!(curve.delta(), 0.5);
        assert_eq!(curve.evalpts().len(), 3);
    }

    #[test]
    fn missing_knotvector() {
        let err = Curve::from_value(&json!({
            "degree": 1,
            "control_points": {"points": [[0, 0], [1, 1]]}
        }))
        .unwrap_err();
        assert!(matches!(err, CliError::MissingField(ref k) if k == "knotvector"));
    }

    #[test]
    fn weight_count_mismatch() {
        let err = Curve::new(1, vec![0.0, 0.0, 1.0, 1.0], vec![vec![0.0], vec![1.0]], Some(vec![1.0]))
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidShape(_)));
    }

    #[test]
    fn value_round_trip_keeps_weights() {
        let curve = quadratic();
        let rebuilt = Curve::from_value(&curve.to_value()).unwrap();
        assert_eq!(rebuilt, curve);
    }
}
