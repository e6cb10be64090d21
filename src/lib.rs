//! nurbs-cli - NURBS shapes from the command line
//!
//! Reads curve and surface descriptions from YAML, JSON or libconfig files,
//! optionally written as templates, and evaluates, plots or exports them.
//! Commands come from a registry that user configuration can extend with
//! external programs.

pub mod cli;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod plugin;
pub mod render;
pub mod storage;
pub mod template;

pub use domain::{Collection, Curve, Resolved, Shape, ShapeKind, Surface};
pub use error::{CliError, Result};
