//! Error kinds surfaced at the command boundary
//!
//! Every failure a command can produce is one of these variants. The
//! dispatcher translates them to a one-line message and an exit code in a
//! single place ([`CliError::exit_code`]).

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot open file '{}' for reading: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template error in '{}': {source}", .path.display())]
    TemplateSyntax {
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    #[error("The command '{name}' is not available. Known commands: {}", .known.join(", "))]
    UnknownCommand { name: String, known: Vec<String> },

    #[error("Cannot use '{token}' format. Possible types: {}", .allowed.join(", "))]
    UnknownFormat { token: String, allowed: Vec<String> },

    #[error("Required key does not exist in the input data: {0}")]
    MissingField(String),

    #[error("Shape index {index} is out of range, the input defines {count} shape(s)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("The '{command}' command expects {expected} argument(s), got {got}")]
    ArgumentArity {
        command: String,
        expected: usize,
        got: usize,
    },

    #[error("Invalid value for --{name}: {reason}")]
    InvalidOption { name: String, reason: String },

    #[error("The input file type '{0}' is not supported")]
    UnsupportedInput(String),

    #[error("Unsupported shape type '{kind}'. Possible values are: {}", .allowed.join(", "))]
    UnsupportedShape { kind: String, allowed: Vec<String> },

    #[error("Invalid shape data: {0}")]
    InvalidShape(String),

    #[error("Cannot parse '{}': {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("{0}")]
    Unsupported(String),

    #[error("Refusing to overwrite the input file '{}', use --name to set a destination", .0.display())]
    DestinationConflict(PathBuf),

    #[error("Cannot write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Plugin command failed: {0}")]
    Plugin(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CliError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> u8 {
        1
    }

    pub fn missing(key: impl Into<String>) -> Self {
        Self::MissingField(key.into())
    }

    pub fn invalid_shape(reason: impl Into<String>) -> Self {
        Self::InvalidShape(reason.into())
    }

    pub fn invalid_option(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_format_lists_allowed_set() {
        let err = CliError::UnknownFormat {
            token: "bogus".to_string(),
            allowed: vec!["csv".to_string(), "txt".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "Cannot use 'bogus' format. Possible types: csv, txt"
        );
    }

    #[test]
    fn missing_field_names_key() {
        let err = CliError::missing("knotvector");
        assert!(err.to_string().ends_with(": knotvector"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn unknown_command_lists_known_names() {
        let err = CliError::UnknownCommand {
            name: "nope".to_string(),
            known: vec!["eval".to_string(), "help".to_string()],
        };

        let message = err.to_string();
        assert!(message.contains("'nope'"));
        assert!(message.contains("eval, help"));
    }
}
