/// Filters operating on string
use std::collections::HashMap;

use serde_json::value::{to_value, Value};
use unic_segment::GraphemeIndices;

use crate::errors::{Error, Result};
use crate::utils;

/// Runs `transform` on a string value, anything else is an error naming `filter`
fn map_str<F>(filter: &str, value: &Value, transform: F) -> Result<Value>
where
    F: FnOnce(&str) -> String,
{
    let s = try_get_value!(filter, "value", String, value);
    Ok(Value::String(transform(&s)))
}

pub fn upper(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    map_str("upper", value, str::to_uppercase)
}

pub fn lower(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    map_str("lower", value, str::to_lowercase)
}

/// Strips leading and trailing whitespace
pub fn trim(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    map_str("trim", value, |s| s.trim().to_string())
}

/// Escapes HTML markup and quotes, see `utils::escape_html`
pub fn escape_html(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    map_str("escape", value, utils::escape_html)
}

/// Cuts a string after `length` graphemes (255 by default) and appends `end`
/// ("…" by default). Strings that fit are returned as they are.
pub fn truncate(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let s = try_get_value!("truncate", "value", String, value);
    let length = match args.get("length") {
        Some(l) => try_get_value!("truncate", "length", usize, l),
        None => 255,
    };
    let end = match args.get("end") {
        Some(e) => try_get_value!("truncate", "end", String, e),
        None => "…".to_string(),
    };

    match GraphemeIndices::new(&s).nth(length) {
        Some((cut, _)) => to_value(format!("{}{}", &s[..cut], end)).map_err(Error::json),
        None => Ok(Value::String(s)),
    }
}
