//! Configuration handling for nurbs-cli
//!
//! Configuration is read from `.nurbs-cli/config.json` in the current
//! directory, then in the home directory. Each file may carry a `commands`
//! section (external commands merged into the registry) and a
//! `configuration` section (option defaults). Layers are applied in that
//! order and later layers win.
//!
//! ```json
//! {
//!   "commands": {
//!     "stats": { "description": "prints shape statistics", "program": "stats.py", "args": 1 }
//!   },
//!   "configuration": { "eval_format": "csv", "delta": 0.02 }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::registry::{CommandDescriptor, CommandSource, Handler, Registry};
use crate::plugin::ExternalCommand;

/// Name of the per-directory configuration folder
pub const CONFIG_DIR: &str = ".nurbs-cli";

/// Name of the configuration file inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error while reading custom configuration file {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid command '{name}' in {}: {reason}", .path.display())]
    InvalidCommand {
        path: PathBuf,
        name: String,
        reason: String,
    },
}

/// Default option values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Default `--format` for `eval`
    pub eval_format: String,

    /// Default `--format` for `export`
    pub export_format: String,

    /// Default `--vis` for `plot`
    pub plot_vis: String,

    /// Default `--delta`; non-positive keeps the value from the input file
    pub delta: f64,

    /// Set once any user layer overrides a value
    pub user_override: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            eval_format: "screen".to_string(),
            export_format: "json".to_string(),
            plot_vis: "legend:off".to_string(),
            delta: -1.0,
            user_override: false,
        }
    }
}

impl Settings {
    fn apply(&mut self, layer: SettingsLayer) {
        let SettingsLayer {
            eval_format,
            export_format,
            plot_vis,
            delta,
        } = layer;

        let mut touched = false;
        if let Some(v) = eval_format {
            self.eval_format = v;
            touched = true;
        }
        if let Some(v) = export_format {
            self.export_format = v;
            touched = true;
        }
        if let Some(v) = plot_vis {
            self.plot_vis = v;
            touched = true;
        }
        if let Some(v) = delta {
            self.delta = v;
            touched = true;
        }
        self.user_override |= touched;
    }
}

/// `configuration` section of a config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsLayer {
    eval_format: Option<String>,
    export_format: Option<String>,
    plot_vis: Option<String>,
    delta: Option<f64>,
}

/// One entry of the `commands` section
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommandEntry {
    description: String,
    program: PathBuf,
    #[serde(default)]
    args: usize,
    #[serde(default)]
    help: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    commands: BTreeMap<String, CommandEntry>,
    #[serde(default)]
    configuration: Option<SettingsLayer>,
}

/// Result of looking for a configuration file in one directory
#[derive(Debug)]
pub enum LoadOutcome {
    /// No configuration file in this directory
    Missing,

    /// The file was applied
    Loaded(PathBuf),

    /// The file exists but could not be read; it was skipped
    Unreadable(PathBuf, io::Error),
}

/// Startup configuration, read-only once built
#[derive(Debug, Clone)]
pub struct Config {
    registry: Registry,
    settings: Settings,
    sources: Vec<PathBuf>,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Configuration files that were applied, in load order
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Directories searched for configuration: working directory, then home
    pub fn search_dirs() -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            dirs.push(cwd);
        }
        if let Some(base) = BaseDirs::new() {
            let home = base.home_dir().to_path_buf();
            if !dirs.contains(&home) {
                dirs.push(home);
            }
        }
        dirs
    }

    /// Path of the configuration file for a search directory
    pub fn file_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_DIR).join(CONFIG_FILE)
    }
}

/// Folds configuration layers on top of the built-in defaults
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    registry: Registry,
    settings: Settings,
    sources: Vec<PathBuf>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            registry: Registry::builtin(),
            settings: Settings::default(),
            sources: Vec::new(),
        }
    }

    /// Adds or replaces a command
    pub fn register(&mut self, descriptor: CommandDescriptor) -> &mut Self {
        self.registry.register(descriptor);
        self
    }

    /// Applies `<dir>/.nurbs-cli/config.json` if it exists.
    ///
    /// An unreadable file is skipped and reported through the outcome. A
    /// file that cannot be parsed or declares an invalid command is fatal.
    pub fn load_dir(&mut self, dir: &Path) -> Result<LoadOutcome, ConfigError> {
        let path = Config::file_in(dir);
        if !path.is_file() {
            return Ok(LoadOutcome::Missing);
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => return Ok(LoadOutcome::Unreadable(path, e)),
        };

        self.apply_str(&path, &content)?;
        Ok(LoadOutcome::Loaded(path))
    }

    /// Applies configuration text as if it was read from `path`
    pub fn apply_str(&mut self, path: &Path, content: &str) -> Result<(), ConfigError> {
        let file: ConfigFile = serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut descriptors = Vec::with_capacity(file.commands.len());
        for (name, entry) in file.commands {
            descriptors.push(Self::external_descriptor(path, config_dir, name, entry)?);
        }

        for descriptor in descriptors {
            self.registry.register(descriptor);
        }
        if let Some(layer) = file.configuration {
            self.settings.apply(layer);
        }
        self.sources.push(path.to_path_buf());
        Ok(())
    }

    fn external_descriptor(
        path: &Path,
        config_dir: &Path,
        name: String,
        entry: CommandEntry,
    ) -> Result<CommandDescriptor, ConfigError> {
        let invalid = |name: &str, reason: String| ConfigError::InvalidCommand {
            path: path.to_path_buf(),
            name: name.to_string(),
            reason,
        };

        if name.is_empty() || name.starts_with('-') || name.chars().any(char::is_whitespace) {
            return Err(invalid(&name, "command names must be non-empty words".to_string()));
        }

        let program = ExternalCommand::resolve(config_dir, &entry.program)
            .map_err(|e| invalid(&name, e.to_string()))?;

        Ok(CommandDescriptor {
            name,
            description: entry.description,
            help: entry.help,
            arity: entry.args,
            source: CommandSource::User(path.to_path_buf()),
            handler: Handler::External(program),
        })
    }

    pub fn build(self) -> Config {
        Config {
            registry: self.registry,
            settings: self.settings,
            sources: self.sources,
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
