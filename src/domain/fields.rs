//! Typed access to structured shape data
//!
//! Readers hand shapes over as `serde_json::Value` regardless of the input
//! format. These helpers turn absent keys into `MissingField` and malformed
//! values into `InvalidShape`.

use serde_json::Value;

use crate::error::{CliError, Result};

pub(crate) fn field<'a>(data: &'a Value, key: &str) -> Result<&'a Value> {
    data.get(key).ok_or_else(|| CliError::missing(key))
}

pub(crate) fn usize_field(data: &Value, key: &str) -> Result<usize> {
    let value = field(data, key)?;
    value
        .as_u64()
        .map(|v| v as usize)
        .ok_or_else(|| CliError::invalid_shape(format!("'{}' must be a non-negative integer, got {}", key, value)))
}

pub(crate) fn optional_f64(data: &Value, key: &str) -> Result<Option<f64>> {
    match data.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => number(value, key).map(Some),
    }
}

pub(crate) fn number(value: &Value, key: &str) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| CliError::invalid_shape(format!("'{}' must be numeric, got {}", key, value)))
}

pub(crate) fn numbers(value: &Value, key: &str) -> Result<Vec<f64>> {
    value
        .as_array()
        .ok_or_else(|| CliError::invalid_shape(format!("'{}' must be a list of numbers", key)))?
        .iter()
        .map(|v| number(v, key))
        .collect()
}

pub(crate) fn points(value: &Value, key: &str) -> Result<Vec<Vec<f64>>> {
    let rows = value
        .as_array()
        .ok_or_else(|| CliError::invalid_shape(format!("'{}' must be a list of points", key)))?;

    let points = rows
        .iter()
        .map(|row| numbers(row, key))
        .collect::<Result<Vec<_>>>()?;

    if let Some(first) = points.first() {
        if first.is_empty() || points.iter().any(|p| p.len() != first.len()) {
            return Err(CliError::invalid_shape(format!(
                "all points in '{}' must have the same, non-zero dimension",
                key
            )));
        }
    }

    Ok(points)
}

/// Control points with optional weights.
///
/// `control_points` is either `{points: [...], weights: [...]}` or a plain
/// list of weighted points `[x*w, y*w, ..., w]`.
pub(crate) fn control_points(data: &Value) -> Result<(Vec<Vec<f64>>, Option<Vec<f64>>)> {
    let ctrl = field(data, "control_points")?;

    if ctrl.is_object() {
        let pts = points(field(ctrl, "points")?, "points")?;
        let weights = match ctrl.get("weights") {
            Some(w) => Some(numbers(w, "weights")?),
            None => None,
        };
        return Ok((pts, weights));
    }

    let weighted = points(ctrl, "control_points")?;
    if weighted.first().map(|p| p.len() < 2).unwrap_or(false) {
        return Err(CliError::invalid_shape(
            "weighted control points need at least one coordinate and a weight",
        ));
    }

    let mut pts = Vec::with_capacity(weighted.len());
    let mut weights = Vec::with_capacity(weighted.len());
    for p in weighted {
        let (coords, w) = p.split_at(p.len() - 1);
        let w = w[0];
        if w == 0.0 {
            return Err(CliError::invalid_shape("control point weights must be non-zero"));
        }
        pts.push(coords.iter().map(|c| c / w).collect());
        weights.push(w);
    }
    Ok((pts, Some(weights)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_key_is_missing_field() {
        let err = usize_field(&json!({}), "degree").unwrap_err();
        assert!(matches!(err, CliError::MissingField(ref k) if k == "degree"));
    }

    #[test]
    fn wrong_type_is_invalid_shape() {
        let err = usize_field(&json!({"degree": "two"}), "degree").unwrap_err();
        assert!(matches!(err, CliError::InvalidShape(_)));
    }

    #[test]
    fn control_points_mapping() {
        let data = json!({"control_points": {"points": [[0, 0], [1, 1]], "weights": [1, 2]}});
        let (pts, weights) = control_points(&data).unwrap();
        assert_eq!(pts, vec![vec![0.0, 0.0], vec![1.0, 1.0]]);
        assert_eq!(weights, Some(vec![1.0, 2.0]));
    }

    #[test]
    fn control_points_weighted_list() {
        let data = json!({"control_points": [[2, 4, 2], [1, 1, 1]]});
        let (pts, weights) = control_points(&data).unwrap();
        assert_eq!(pts, vec![vec![1.0, 2.0], vec![1.0, 1.0]]);
        assert_eq!(weights, Some(vec![2.0, 1.0]));
    }

    #[test]
    fn control_points_missing_points_key() {
        let data = json!({"control_points": {"weights": [1]}});
        let err = control_points(&data).unwrap_err();
        assert!(matches!(err, CliError::MissingField(ref k) if k == "points"));
    }

    #[test]
    fn ragged_points_rejected() {
        let err = points(&json!([[0, 0], [1, 1, 1]]), "points").unwrap_err();
        assert!(matches!(err, CliError::InvalidShape(_)));
    }
}
