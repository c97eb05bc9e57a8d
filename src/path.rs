//! Dot-path navigation over decoded response trees.
//!
//! Paths are dot-separated mapping keys, e.g.
//! `"Envelope.Body.GetHostnameResponse.HostnameInformation"`. Every step
//! must land on a mapping; lists are never indexed into.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::coerce::as_string;
use crate::error::DeviceError;
use crate::types::DynamicValue;

/// Return the node at `path`.
///
/// An empty path returns `root` itself.
///
/// # Errors
///
/// Returns `DeviceError::NotFound` when a segment is missing or an
/// intermediate node is not a mapping.
pub fn value_at<'a>(root: &'a DynamicValue, path: &str) -> Result<&'a DynamicValue, DeviceError> {
    if path.is_empty() {
        return Ok(root);
    }

    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment),
            _ => None,
        }
        .ok_or_else(|| DeviceError::not_found(path, segment))?;
    }
    Ok(current)
}

/// Return the string at `path`.
///
/// A node that exists but is not a string yields `""`. Callers that don't
/// care whether the path exists discard the error with `unwrap_or_default`.
pub fn string_at(root: &DynamicValue, path: &str) -> Result<String, DeviceError> {
    value_at(root, path).map(as_string)
}

/// Return the elements at `path`.
///
/// A single mapping counts as a one-element list, since a lone repeated XML
/// element decodes without the surrounding list. Null and scalars yield an
/// empty list.
pub fn list_at(root: &DynamicValue, path: &str) -> Result<Vec<DynamicValue>, DeviceError> {
    let items = match value_at(root, path)? {
        Value::Array(items) => items.clone(),
        node @ Value::Object(_) => vec![node.clone()],
        _ => Vec::new(),
    };
    Ok(items)
}

/// Deserialize the subtree at `path` into `T`, matching fields by name.
///
/// # Errors
///
/// Returns `DeviceError::NotFound` if the path is absent, or
/// `DeviceError::Shape` if the subtree doesn't fit `T`.
pub fn value_as<T: DeserializeOwned>(root: &DynamicValue, path: &str) -> Result<T, DeviceError> {
    let node = value_at(root, path)?;
    T::deserialize(node).map_err(|source| DeviceError::Shape {
        path: path.to_string(),
        source,
    })
}
