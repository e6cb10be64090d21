//! Knot vectors and B-spline basis functions

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum KnotError {
    #[error("Degree must be at least 1, got {0}")]
    InvalidDegree(usize),

    #[error("A degree {degree} shape needs at least {} control points, got {count}", degree + 1)]
    TooFewControlPoints { degree: usize, count: usize },

    #[error("Expected {expected} knots for {count} control points of degree {degree}, got {actual}")]
    WrongLength {
        degree: usize,
        count: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Knot vector must be non-decreasing")]
    Decreasing,

    #[error("Evaluation delta must satisfy 0.001 <= delta < 1.0, got {0}")]
    InvalidDelta(f64),
}

/// Smallest accepted evaluation delta. Keeps a sample run at 1001 points.
pub const MIN_DELTA: f64 = 1e-3;

/// Accepts `delta` when `MIN_DELTA <= delta < 1`
pub fn check_delta(delta: f64) -> Result<f64, KnotError> {
    if (MIN_DELTA..1.0).contains(&delta) {
        Ok(delta)
    } else {
        Err(KnotError::InvalidDelta(delta))
    }
}

/// Generates a uniform knot vector.
///
/// Clamped vectors repeat the end knots `degree` extra times so the shape
/// interpolates its first and last control points.
pub fn generate(degree: usize, num_ctrlpts: usize, clamped: bool) -> Result<Vec<f64>, KnotError> {
    if degree == 0 {
        return Err(KnotError::InvalidDegree(degree));
    }
    if num_ctrlpts < degree + 1 {
        return Err(KnotError::TooFewControlPoints {
            degree,
            count: num_ctrlpts,
        });
    }

    let (repeat, segments) = if clamped {
        (degree, num_ctrlpts - (degree + 1))
    } else {
        (0, degree + num_ctrlpts - 1)
    };

    let mut knots = vec![0.0; repeat];
    knots.extend(linspace(0.0, 1.0, segments + 2));
    knots.extend(std::iter::repeat(1.0).take(repeat));
    Ok(knots)
}

/// Checks a knot vector against the degree and control point count
pub fn validate(degree: usize, knots: &[f64], num_ctrlpts: usize) -> Result<(), KnotError> {
    if degree == 0 {
        return Err(KnotError::InvalidDegree(degree));
    }
    if num_ctrlpts < degree + 1 {
        return Err(KnotError::TooFewControlPoints {
            degree,
            count: num_ctrlpts,
        });
    }

    let expected = degree + num_ctrlpts + 1;
    if knots.len() != expected {
        return Err(KnotError::WrongLength {
            degree,
            count: num_ctrlpts,
            expected,
            actual: knots.len(),
        });
    }

    if knots.windows(2).any(|pair| pair[1] < pair[0]) {
        return Err(KnotError::Decreasing);
    }

    Ok(())
}

/// `count` evenly spaced values from `start` to `stop`, both inclusive
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Number of samples for an evaluation delta (`1 / delta + 1`, truncated).
///
/// Deltas below [`MIN_DELTA`], including zero, negative and NaN, sample as
/// `MIN_DELTA`.
pub fn sample_size(delta: f64) -> usize {
    let delta = delta.max(MIN_DELTA);
    ((1.0 / delta) + 1e-9).floor() as usize + 1
}

/// Parameter range covered by the shape: `[knots[p], knots[m - p - 1]]`
pub fn domain(degree: usize, knots: &[f64]) -> (f64, f64) {
    (knots[degree], knots[knots.len() - degree - 1])
}

/// Index of the knot span containing `u`
pub fn find_span(degree: usize, knots: &[f64], num_ctrlpts: usize, u: f64) -> usize {
    let n = num_ctrlpts - 1;
    if u >= knots[n + 1] {
        return n;
    }
    if u <= knots[degree] {
        return degree;
    }

    let (mut low, mut high) = (degree, n + 1);
    let mut mid = (low + high) / 2;
    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// Non-vanishing basis functions `N[span - degree ..= span]` at `u`
pub fn basis_functions(degree: usize, knots: &[f64], span: usize, u: f64) -> Vec<f64> {
    let mut values = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    values[0] = 1.0;

    for j in 1..=degree {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let temp = if denom == 0.0 { 0.0 } else { values[r] / denom };
            values[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        values[j] = saved;
    }

    values
}
