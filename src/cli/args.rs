//! Process argument parsing
//!
//! Arguments follow `nurbs <command> [positional...] [--option[=value]...]`.
//! Options may appear anywhere; they are pulled out of the positional stream
//! in order. A lone `--` ends option parsing.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::domain::knots::MIN_DELTA;
use crate::domain::Overrides;
use crate::error::{CliError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// `--name`
    Flag,
    /// `--name=value`
    Value(String),
}

/// Options given on the command line, last occurrence wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    values: BTreeMap<String, OptionValue>,
}

impl OptionSet {
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Value of an option that requires one; a bare flag is an error
    pub fn value(&self, name: &str) -> Result<Option<&str>> {
        match self.values.get(name) {
            None => Ok(None),
            Some(OptionValue::Value(v)) => Ok(Some(v)),
            Some(OptionValue::Flag) => Err(CliError::invalid_option(name, "expects a value, e.g. --name=value")),
        }
    }

    /// `--index` and `--delta`, with `default_delta` used when `--delta` is absent
    pub fn overrides(&self, default_delta: f64) -> Result<Overrides> {
        let index = match self.value("index")? {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| CliError::invalid_option("index", format!("'{raw}' is not an integer")))?,
            None => -1,
        };

        let delta = match self.value("delta")? {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| CliError::invalid_option("delta", format!("'{raw}' is not a number")))?,
            None => default_delta,
        };
        if delta >= 1.0 || delta.is_nan() || (delta > 0.0 && delta < MIN_DELTA) {
            return Err(CliError::invalid_option(
                "delta",
                format!("{delta} is outside {MIN_DELTA} <= d < 1.0"),
            ));
        }

        Ok(Overrides::from_raw(index, delta))
    }

    /// Options as a JSON object: flags become `true`
    pub fn to_json(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    OptionValue::Flag => Value::Bool(true),
                    OptionValue::Value(v) => Value::String(v.clone()),
                };
                (name.clone(), value)
            })
            .collect()
    }
}

/// A parsed command line. `positional[0]` is the program name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub positional: Vec<String>,
    pub options: OptionSet,
}

impl Invocation {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut invocation = Self::default();
        let mut options_done = false;

        for arg in args {
            if options_done {
                invocation.positional.push(arg);
                continue;
            }
            if arg == "--" {
                options_done = true;
                continue;
            }
            match arg.strip_prefix("--") {
                Some(option) => {
                    let (name, value) = match option.split_once('=') {
                        Some((name, value)) => (name, OptionValue::Value(value.to_string())),
                        None => (option, OptionValue::Flag),
                    };
                    invocation.options.values.insert(name.to_string(), value);
                }
                None => invocation.positional.push(arg),
            }
        }

        invocation
    }

    /// The command token, if any
    pub fn command(&self) -> Option<&str> {
        self.positional.get(1).map(String::as_str)
    }

    /// Positional arguments after the command
    pub fn args(&self) -> &[String] {
        self.positional.get(2..).unwrap_or(&[])
    }
}
