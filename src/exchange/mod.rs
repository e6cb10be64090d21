//! # Exchange Layer
//!
//! Reading input documents and writing resolved shapes.
//!
//! ## Formats
//!
//! | Token | Command | Output |
//! |-------|---------|--------|
//! | `screen` | eval | evaluated points on stdout |
//! | `csv`, `txt`, `vtk` | eval | evaluated point file |
//! | `cfg`, `json`, `yaml` | export | shape description, readable as input |
//! | `obj`, `stl`, `off` | export | triangulated surface mesh |
//! | `smesh` | export | surface control net |
//!
//! A format token is validated against the command's allowed set before the
//! input file is touched, so a bad token never leaves a file behind.

mod libconfig;
mod mesh;
mod points;
mod reader;
mod serialize;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::domain::Resolved;
use crate::error::{CliError, Result};

pub use points::SHAPE_SEPARATOR;
pub use reader::{InputType, ShapeDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Screen,
    Csv,
    Txt,
    Vtk,
    Cfg,
    Json,
    Yaml,
    Obj,
    Stl,
    Off,
    Smesh,
}

impl Format {
    /// Formats accepted by `eval`
    pub const POINTS: &'static [Format] = &[Format::Screen, Format::Csv, Format::Txt, Format::Vtk];

    /// Formats accepted by `export`
    pub const EXCHANGE: &'static [Format] = &[
        Format::Cfg,
        Format::Json,
        Format::Yaml,
        Format::Obj,
        Format::Stl,
        Format::Off,
        Format::Smesh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Screen => "screen",
            Format::Csv => "csv",
            Format::Txt => "txt",
            Format::Vtk => "vtk",
            Format::Cfg => "cfg",
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Obj => "obj",
            Format::Stl => "stl",
            Format::Off => "off",
            Format::Smesh => "smesh",
        }
    }

    /// Parses a `--format` token, accepting only members of `allowed`
    pub fn parse(token: &str, allowed: &[Format]) -> Result<Self> {
        Self::from_str(token.trim(), true)
            .ok()
            .filter(|format| allowed.contains(format))
            .ok_or_else(|| CliError::UnknownFormat {
                token: token.to_string(),
                allowed: allowed.iter().map(|f| f.as_str().to_string()).collect(),
            })
    }

    /// Whether the output goes to stdout instead of a file
    pub fn is_screen(&self) -> bool {
        *self == Format::Screen
    }
}

/// A validated export: the format plus where it goes
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub format: Format,
    pub destination: Option<PathBuf>,
}

impl ExportRequest {
    /// Builds the request for `input`. Screen output has no destination;
    /// otherwise `name` wins, else the input path with the format token as
    /// its extension.
    pub fn new(format: Format, input: &Path, name: Option<&str>) -> Result<Self> {
        if format.is_screen() {
            return Ok(Self {
                format,
                destination: None,
            });
        }

        let destination = match name {
            Some(name) => PathBuf::from(name),
            None => {
                let derived = input.with_extension(format.as_str());
                if derived == input {
                    return Err(CliError::DestinationConflict(derived));
                }
                derived
            }
        };

        Ok(Self {
            format,
            destination: Some(destination),
        })
    }

    /// Writes `resolved`; screen output goes to `out`
    pub fn write(&self, resolved: &Resolved, out: &mut impl io::Write) -> Result<()> {
        let destination = match (&self.destination, self.format) {
            (_, Format::Screen) => {
                return points::write_screen(resolved, out).map_err(|e| CliError::write("<stdout>", e));
            }
            (Some(path), _) => path,
            (None, format) => {
                return Err(CliError::invalid_option(
                    "name",
                    format!("a file name is needed to write '{}' output", format.as_str()),
                ));
            }
        };

        let bytes = encode(self.format, resolved, destination)?;
        fs::write(destination, bytes).map_err(|e| CliError::write(destination, e))
    }
}

fn encode(format: Format, resolved: &Resolved, destination: &Path) -> Result<Vec<u8>> {
    let encode_error = |reason: String| CliError::write(destination, io::Error::other(reason));

    let bytes = match format {
        Format::Screen => Vec::new(),
        Format::Csv => points::csv(resolved).map_err(|e| encode_error(e.to_string()))?,
        Format::Txt => points::txt(resolved).map_err(|e| encode_error(e.to_string()))?,
        Format::Vtk => points::vtk(resolved).into_bytes(),
        Format::Cfg => serialize::cfg(resolved).into_bytes(),
        Format::Json => serialize::json(resolved)
            .map_err(|e| encode_error(e.to_string()))?
            .into_bytes(),
        Format::Yaml => serialize::yaml(resolved)
            .map_err(|e| encode_error(e.to_string()))?
            .into_bytes(),
        Format::Obj => mesh::obj(resolved)?,
        Format::Stl => mesh::stl(resolved)?,
        Format::Off => mesh::off(resolved)?,
        Format::Smesh => mesh::smesh(resolved)?,
    };
    Ok(bytes)
}
