//! # Storage Layer
//!
//! Everything nurbs-cli reads from or writes to its own directories.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Config | JSON | `.nurbs-cli/config.json` in the working and home directories |
//! | Staged input | rendered template | system temp directory, removed on drop |
//!
//! ## Key Types
//!
//! - [`Config`] - Command registry and option defaults, built once at startup
//! - [`Registry`] - Built-in and user commands by name
//! - [`StagedFile`] - Temporary copy of a rendered input file

mod config;
mod registry;
mod staged;

pub use config::{Config, ConfigBuilder, ConfigError, LoadOutcome, Settings, CONFIG_DIR, CONFIG_FILE};
pub use registry::{CommandDescriptor, CommandSource, Handler, Registry};
pub use staged::StagedFile;
