//! Structured input readers

use std::path::Path;

use clap::ValueEnum;
use serde_json::Value;

use super::libconfig;
use crate::domain::{ShapeData, ShapeKind};
use crate::error::{CliError, Result};

/// Input file types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputType {
    #[value(alias = "yml")]
    Yaml,
    Json,
    Cfg,
    Conf,
}

impl InputType {
    /// Picks the reader from `--type`, falling back to the file extension
    pub fn detect(path: &Path, explicit: Option<&str>) -> Result<Self> {
        let token = match explicit {
            Some(token) => token.to_string(),
            None => path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(str::to_lowercase)
                .unwrap_or_default(),
        };

        Self::from_str(token.trim(), true).map_err(|_| CliError::UnsupportedInput(token))
    }

    /// Parses file contents into a generic document tree
    pub fn parse(&self, path: &Path, text: &str) -> Result<Value> {
        let parse_error = |reason: String| CliError::Parse {
            path: path.to_path_buf(),
            reason,
        };

        match self {
            InputType::Yaml => serde_yaml::from_str(text).map_err(|e| parse_error(e.to_string())),
            InputType::Json => serde_json::from_str(text).map_err(|e| parse_error(e.to_string())),
            InputType::Cfg | InputType::Conf => libconfig::parse(text).map_err(|e| parse_error(e.to_string())),
        }
    }
}

/// The `shape` section of an input document
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDocument {
    pub kind: ShapeKind,
    pub data: ShapeData,
}

impl ShapeDocument {
    pub fn from_value(root: &Value) -> Result<Self> {
        let shape = root.get("shape").ok_or_else(|| CliError::missing("shape"))?;
        let kind = shape
            .get("type")
            .ok_or_else(|| CliError::missing("type"))?
            .as_str()
            .ok_or_else(|| CliError::invalid_shape("'type' must be a string"))?
            .parse::<ShapeKind>()?;
        let data = shape.get("data").ok_or_else(|| CliError::missing("data"))?;

        Ok(Self {
            kind,
            data: ShapeData::from(data.clone()),
        })
    }
}
