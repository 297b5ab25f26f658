/// Filters operating on multiple types
use std::collections::HashMap;

use serde_json::value::{to_value, Value};

use crate::errors::{Error, Result};

/// Returns the number of items in an array or object, or the number of characters in a string.
pub fn length(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    match value {
        Value::Array(arr) => to_value(arr.len()).map_err(Error::json),
        Value::Object(m) => to_value(m.len()).map_err(Error::json),
        Value::String(s) => to_value(s.chars().count()).map_err(Error::json),
        _ => Err(Error::msg(format!(
            "Filter `length` was used on a value that isn't an array, an object, or a string: got `{}`",
            value
        ))),
    }
}

/// Returns the `value` argument when the input is null or undefined
pub fn default(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    match args.get("value") {
        Some(fallback) if value.is_null() => Ok(fallback.clone()),
        Some(_) => Ok(value.clone()),
        None => Err(Error::msg("Filter `default` expected an arg called `value`")),
    }
}

/// Marks the value as safe, the output will not be escaped
pub fn safe(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    Ok(value.clone())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;
    use serde_json::value::to_value;

    use super::*;

    #[test]
    fn length_of_strings_counts_chars() {
        let result = length(&to_value("日本語").unwrap(), &HashMap::new());
        assert_eq!(result.unwrap(), to_value(3).unwrap());
    }

    #[test]
    fn length_of_collections() {
        assert_eq!(length(&json!([1, 2, 3]), &HashMap::new()).unwrap(), json!(3));
        assert_eq!(length(&json!({"a": 1}), &HashMap::new()).unwrap(), json!(1));
    }

    #[test]
    fn length_of_number_fails() {
        assert!(length(&json!(12), &HashMap::new()).is_err());
    }

    #[test]
    fn default_only_replaces_null() {
        let mut args = HashMap::new();
        args.insert("value".to_string(), json!("fallback"));

        assert_eq!(default(&Value::Null, &args).unwrap(), json!("fallback"));
        assert_eq!(default(&json!(""), &args).unwrap(), json!(""));
        assert_eq!(default(&json!("set"), &args).unwrap(), json!("set"));
    }

    #[test]
    fn default_requires_value_arg() {
        assert!(default(&Value::Null, &HashMap::new()).is_err());
    }
}
