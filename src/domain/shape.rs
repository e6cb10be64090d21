//! Shapes, collections and the resolved result of an input document

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::{Curve, Surface};
use crate::error::{CliError, Result};

/// The kinds of shape an input document can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Curve,
    Surface,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 2] = [ShapeKind::Curve, ShapeKind::Surface];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Curve => "curve",
            ShapeKind::Surface => "surface",
        }
    }

    pub fn build(&self, data: &Value) -> Result<Shape> {
        match self {
            ShapeKind::Curve => Curve::from_value(data).map(Shape::Curve),
            ShapeKind::Surface => Surface::from_value(data).map(Shape::Surface),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| CliError::UnsupportedShape {
                kind: s.to_string(),
                allowed: Self::ALL.iter().map(|k| k.to_string()).collect(),
            })
    }
}

/// A single constructed shape
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Curve(Curve),
    Surface(Surface),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Curve(_) => ShapeKind::Curve,
            Shape::Surface(_) => ShapeKind::Surface,
        }
    }

    pub fn delta(&self) -> f64 {
        match self {
            Shape::Curve(c) => c.delta(),
            Shape::Surface(s) => s.delta(),
        }
    }

    pub fn set_delta(&mut self, delta: f64) {
        match self {
            Shape::Curve(c) => c.set_delta(delta),
            Shape::Surface(s) => s.set_delta(delta),
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            Shape::Curve(c) => c.dimension(),
            Shape::Surface(s) => s.dimension(),
        }
    }

    pub fn ctrlpts(&self) -> &[Vec<f64>] {
        match self {
            Shape::Curve(c) => c.ctrlpts(),
            Shape::Surface(s) => s.ctrlpts(),
        }
    }

    pub fn evalpts(&self) -> Vec<Vec<f64>> {
        match self {
            Shape::Curve(c) => c.evalpts(),
            Shape::Surface(s) => s.evalpts(),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Shape::Curve(c) => c.to_value(),
            Shape::Surface(s) => s.to_value(),
        }
    }
}

/// Ordered shapes of one kind sharing an evaluation delta
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    kind: ShapeKind,
    shapes: Vec<Shape>,
    delta: f64,
}

impl Collection {
    pub fn new(kind: ShapeKind, shapes: Vec<Shape>) -> Result<Self> {
        let first = shapes
            .first()
            .ok_or_else(|| CliError::invalid_shape("a collection needs at least one shape"))?;

        if let Some(other) = shapes.iter().find(|s| s.kind() != kind) {
            return Err(CliError::invalid_shape(format!(
                "cannot mix a {} into a {} collection",
                other.kind(),
                kind
            )));
        }

        let delta = first.delta();
        Ok(Self { kind, shapes, delta })
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Sets the collection delta and propagates it to every member
    pub fn set_delta(&mut self, delta: f64) {
        self.delta = delta;
        for shape in &mut self.shapes {
            shape.set_delta(delta);
        }
    }
}

/// What the resolver produced: one shape or a collection
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Single(Shape),
    Collection(Collection),
}

impl Resolved {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Resolved::Single(s) => s.kind(),
            Resolved::Collection(c) => c.kind(),
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        match self {
            Resolved::Single(s) => std::slice::from_ref(s),
            Resolved::Collection(c) => c.shapes(),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Resolved::Collection(_))
    }

    pub fn delta(&self) -> f64 {
        match self {
            Resolved::Single(s) => s.delta(),
            Resolved::Collection(c) => c.delta(),
        }
    }

    pub fn set_delta(&mut self, delta: f64) {
        match self {
            Resolved::Single(s) => s.set_delta(delta),
            Resolved::Collection(c) => c.set_delta(delta),
        }
    }
}
