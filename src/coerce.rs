//! Total scalar coercions for decoded values.
//!
//! ONVIF devices send flags as the text `"true"`/`"false"` with inconsistent
//! casing. These helpers never fail: anything unexpected becomes `""` or
//! `false`.

use serde_json::Value;

use crate::types::DynamicValue;

/// The string content of `value`, or `""` if it isn't a string.
pub fn as_string(value: &DynamicValue) -> String {
    match value {
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

/// True iff `value` is a string equal to `"true"`, ignoring case.
///
/// `"1"`, `"yes"`, native booleans and missing values are all false.
pub fn as_bool(value: &DynamicValue) -> bool {
    as_string(value).to_lowercase() == "true"
}
