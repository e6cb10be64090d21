//! Geometry model and shape resolution
//!
//! Contains the shapes the CLI works with and the rules for turning parsed
//! input data into them, without any I/O concerns.

mod curve;
mod fields;
pub mod knots;
mod resolve;
mod shape;
mod surface;

pub use curve::{Curve, DEFAULT_CURVE_DELTA};
pub use resolve::{resolve, Overrides, ShapeBuilder, ShapeData};
pub use shape::{Collection, Resolved, Shape, ShapeKind};
pub use surface::{PointGrid, Surface, DEFAULT_SURFACE_DELTA};
