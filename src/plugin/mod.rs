//! # Plugin System
//!
//! User configuration can declare extra commands backed by external
//! programs. Programs are language-agnostic and talk to nurbs-cli via JSON
//! over stdin/stdout.
//!
//! ## Protocol
//!
//! ```text
//! CLI                          Program
//!  │                               │
//!  ├── Spawn: .nurbs-cli/stats.py  │
//!  │                               │
//!  ├── Stdin: {"operation": "run", "params": {"command": ..., "args": [...], "options": {...}}}
//!  │                               │
//!  └── Stdout: {"success": true, "data": ...}
//! ```
//!
//! ## Key Types
//!
//! - [`ExternalCommand`] - Validated program path, runs requests
//! - [`PluginRequest`] / [`PluginResponse`] - Wire messages

mod loader;
mod protocol;

pub use loader::ExternalCommand;
pub use protocol::{PluginRequest, PluginResponse, RUN_OPERATION};
