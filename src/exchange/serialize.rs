//! Shape description writers
//!
//! Exported descriptions use the same `shape: {type, data}` layout as input
//! files, so every exported document can be read back by the CLI.

use serde_json::{json, Value};

use super::libconfig;
use crate::domain::{Resolved, Shape};

/// Builds the input document layout for a resolved shape
pub fn document(resolved: &Resolved) -> Value {
    let data = match resolved {
        Resolved::Single(shape) => shape.to_value(),
        Resolved::Collection(collection) => {
            Value::Array(collection.shapes().iter().map(Shape::to_value).collect())
        }
    };

    json!({
        "shape": {
            "type": resolved.kind().as_str(),
            "data": data,
        }
    })
}

pub fn json(resolved: &Resolved) -> Result<String, serde_json::Error> {
    let mut text = serde_json::to_string_pretty(&document(resolved))?;
    text.push('\n');
    Ok(text)
}

pub fn yaml(resolved: &Resolved) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&document(resolved))
}

pub fn cfg(resolved: &Resolved) -> String {
    match document(resolved) {
        Value::Object(root) => libconfig::to_string(&root),
        _ => String::new(),
    }
}
