use crate::config::FlattenConfig;
use crate::error::{FlattenError, Result};
use serde_json::{Map, Value};
use tracing::debug;

/// A flattened record: flat key -> scalar, null, or the empty-list marker.
///
/// Keys keep the enumeration order of the input document.
pub type FlatMap = Map<String, Value>;

/// Separator placed between path segments of a flat key
pub const KEY_SEPARATOR: &str = "_";

/// Flattens nested JSON trees into single-level maps
#[derive(Debug, Clone, Copy, Default)]
pub struct Flattener {
    config: FlattenConfig,
}

impl Flattener {
    pub fn new(config: FlattenConfig) -> Self {
        Flattener { config }
    }

    pub fn config(&self) -> FlattenConfig {
        self.config
    }

    /// Flatten a JSON value into a single-level map
    ///
    /// Only a non-empty object or list is descended into. Any other root
    /// (a scalar, null, `{}` or `[]`) yields an empty map rather than an error.
    pub fn flatten(&self, value: Value) -> Result<FlatMap> {
        self.flatten_with_prefix(value, "")
    }

    /// Flatten a JSON value, prepending `prefix` to every produced key
    pub fn flatten_with_prefix(&self, value: Value, prefix: &str) -> Result<FlatMap> {
        let mut flat = Map::new();

        match value {
            Value::Object(obj) if !obj.is_empty() => {
                flatten_object(obj, prefix, self.config, &mut flat)?;
            }
            Value::Array(arr) if !arr.is_empty() => {
                flatten_array(arr, prefix, self.config, &mut flat)?;
            }
            _ => {
                // Root scalars and empty containers produce nothing
            }
        }

        Ok(flat)
    }
}

/// Flatten `value` with the given configuration
pub fn flatten(value: Value, config: FlattenConfig) -> Result<FlatMap> {
    Flattener::new(config).flatten(value)
}

/// Flatten `value` under an existing key path
pub fn flatten_with_prefix(value: Value, prefix: &str, config: FlattenConfig) -> Result<FlatMap> {
    Flattener::new(config).flatten_with_prefix(value, prefix)
}

fn flatten_object(
    obj: Map<String, Value>,
    prefix: &str,
    config: FlattenConfig,
    flat: &mut FlatMap,
) -> Result<()> {
    // An empty nested object has no leaves to contribute
    if obj.is_empty() {
        return Ok(());
    }
    check_depth(prefix, config)?;

    for (field, member) in obj {
        let key = if prefix.is_empty() {
            field
        } else {
            format!("{}{}{}", prefix, KEY_SEPARATOR, field)
        };
        flatten_member(member, key, config, flat)?;
    }

    Ok(())
}

fn flatten_array(
    arr: Vec<Value>,
    prefix: &str,
    config: FlattenConfig,
    flat: &mut FlatMap,
) -> Result<()> {
    // An empty nested list is itself a leaf
    if arr.is_empty() {
        flat.insert(prefix.to_string(), Value::Array(arr));
        return Ok(());
    }
    check_depth(prefix, config)?;

    for (idx, item) in arr.into_iter().enumerate() {
        let key = format!("{}{}{}", prefix, KEY_SEPARATOR, idx);
        flatten_member(item, key, config, flat)?;
    }

    Ok(())
}

/// Place one object member or list item under `key`
fn flatten_member(
    member: Value,
    key: String,
    config: FlattenConfig,
    flat: &mut FlatMap,
) -> Result<()> {
    match member {
        Value::Null => {
            if !config.ignore_null {
                flat.insert(key, Value::Null);
            }
        }
        Value::Object(obj) => flatten_object(obj, &key, config.descend(), flat)?,
        Value::Array(arr) => flatten_array(arr, &key, config.descend(), flat)?,
        scalar => {
            flat.insert(key, scalar);
        }
    }

    Ok(())
}

fn check_depth(prefix: &str, config: FlattenConfig) -> Result<()> {
    if config.is_exhausted() {
        debug!(path = prefix, "depth budget exhausted while flattening");
        return Err(FlattenError::DepthExceeded {
            path: prefix.to_string(),
        });
    }
    Ok(())
}
