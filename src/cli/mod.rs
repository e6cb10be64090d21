//! # Command-Line Interface
//!
//! Argument parsing, command dispatch and the built-in commands.
//!
//! ## Commands
//!
//! | Command | Arguments | Purpose |
//! |---------|-----------|---------|
//! | `help` | | usage and the list of commands |
//! | `version` | | package version |
//! | `plot` | `{file}` | SVG figure of the shapes |
//! | `eval` | `{file}` | evaluated points on screen or in a file |
//! | `export` | `{file}` | shape in an exchange format |
//!
//! User configuration may add commands backed by external programs, or
//! replace built-in ones by name.
//!
//! ## Exit Codes
//!
//! `0` for success and help output, `1` for every error.
//!
//! ## Entry Point
//!
//! Call [`run()`] with the process arguments.

mod app;
mod args;
mod builtin;
mod output;
mod shape_cmd;

/// Name of the installed binary
pub const BIN_NAME: &str = "nurbs";

pub use app::{run, Session};
pub use args::{Invocation, OptionSet, OptionValue};
pub use builtin::BuiltinCommand;
pub use output::Output;
