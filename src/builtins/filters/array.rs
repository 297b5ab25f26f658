/// Filters operating on array
use std::collections::HashMap;

use serde_json::value::{to_value, Value};

use crate::errors::{Error, Result};
use crate::variables::ValueRender;

/// Joins all values in the array by the `sep` argument given
/// If no separator is given, it will use `""` (empty string) as separator
/// If the array is empty, returns empty string
pub fn join(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let arr = try_get_value!("join", "value", Vec<Value>, value);
    let sep = match args.get("sep") {
        Some(val) => {
            let s = try_get_value!("join", "sep", String, val);
            // Escaped `\n` and `\t` coming from template files are turned back into the real thing
            s.replace("\\n", "\n").replace("\\t", "\t")
        }
        None => String::new(),
    };

    let rendered = arr.iter().map(|v| v.render()).collect::<Vec<_>>();
    to_value(rendered.join(&sep)).map_err(Error::json)
}
