// ABOUTME: Helpers for reading path and query parameters
// ABOUTME: Parses ids and list parameters, recording bad integers on the validator

use std::collections::HashMap;

use todoinfo_core::Validator;

use crate::error::AppError;

/// Parse a record id from the path. Anything but a positive integer is a 404.
pub fn read_id_param(raw: &str) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::NotFound),
    }
}

/// Query string value for `key`, or `default` when absent or empty
pub fn read_string(qs: &HashMap<String, String>, key: &str, default: &str) -> String {
    match qs.get(key) {
        Some(value) if !value.is_empty() => value.clone(),
        _ => default.to_string(),
    }
}

/// Integer query value for `key`, or `default` when absent or empty.
/// A value that does not parse is recorded on `v` and `default` returned.
pub fn read_int(qs: &HashMap<String, String>, key: &str, default: i64, v: &mut Validator) -> i64 {
    let Some(value) = qs.get(key).filter(|value| !value.is_empty()) else {
        return default;
    };

    match value.parse::<i64>() {
        Ok(i) => i,
        Err(_) => {
            v.add_error(key, "must be an integer value");
            default
        }
    }
}
