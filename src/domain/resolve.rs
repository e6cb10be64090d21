//! Shape resolution
//!
//! Turns the `shape.data` section of an input document into a [`Resolved`]
//! shape. The decision only looks at the shape of the data and the
//! requested overrides:
//!
//! | data | index | result |
//! |------|-------|--------|
//! | mapping | any | `single(mapping)` |
//! | sequence of 1 | any | `single(data[0])` |
//! | sequence of n >= 2 | `i < n` | `single(data[i])` |
//! | sequence of n >= 2 | `i >= n` | `IndexOutOfRange` |
//! | sequence of n >= 2 | none | `multi(data)` |
//!
//! A positive delta override is applied to whatever was built. The shape
//! kind only decides which [`ShapeBuilder`] is used.

use serde_json::Value;

use super::{Collection, Resolved, Shape, ShapeKind};
use crate::error::{CliError, Result};

/// The `shape.data` section: one mapping or an ordered list of mappings
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeData {
    Single(Value),
    Sequence(Vec<Value>),
}

impl ShapeData {
    pub fn len(&self) -> usize {
        match self {
            ShapeData::Single(_) => 1,
            ShapeData::Sequence(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Value> for ShapeData {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => ShapeData::Sequence(items),
            other => ShapeData::Single(other),
        }
    }
}

/// Constructs shapes of one kind from structured data
pub trait ShapeBuilder {
    fn single(&self, data: &Value) -> Result<Shape>;

    fn multi(&self, data: &[Value]) -> Result<Collection>;
}

impl ShapeBuilder for ShapeKind {
    fn single(&self, data: &Value) -> Result<Shape> {
        self.build(data)
    }

    fn multi(&self, data: &[Value]) -> Result<Collection> {
        let shapes = data
            .iter()
            .map(|item| self.build(item))
            .collect::<Result<Vec<_>>>()?;
        Collection::new(*self, shapes)
    }
}

/// User-requested index and delta
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overrides {
    pub index: Option<usize>,
    pub delta: Option<f64>,
}

impl Overrides {
    /// Builds overrides from raw option values.
    ///
    /// A negative index means "no index", a non-positive delta means "keep
    /// the value from the input data".
    pub fn from_raw(index: i64, delta: f64) -> Self {
        Self {
            index: usize::try_from(index).ok(),
            delta: (delta > 0.0).then_some(delta),
        }
    }
}

pub fn resolve(data: &ShapeData, builder: &impl ShapeBuilder, overrides: Overrides) -> Result<Resolved> {
    let mut resolved = match data {
        ShapeData::Single(item) => Resolved::Single(builder.single(item)?),
        ShapeData::Sequence(items) => match (items.as_slice(), overrides.index) {
            ([], _) => return Err(CliError::invalid_shape("the input data does not define any shapes")),
            ([only], _) => Resolved::Single(builder.single(only)?),
            (all, Some(index)) => {
                let item = all.get(index).ok_or(CliError::IndexOutOfRange {
                    index,
                    count: all.len(),
                })?;
                Resolved::Single(builder.single(item)?)
            }
            (all, None) => Resolved::Collection(builder.multi(all)?),
        },
    };

    if let Some(delta) = overrides.delta {
        resolved.set_delta(delta);
    }

    Ok(resolved)
}
