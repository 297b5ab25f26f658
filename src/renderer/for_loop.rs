use std::borrow::Cow;

use serde_json::Value;

use crate::renderer::stack_frame::Val;

/// Enumerates the two types of for loops
#[derive(Debug, PartialEq)]
pub enum ForLoopKind {
    /// Loop over values, eg an `Array`
    Value,
    /// Loop over key value pairs, eg a `HashMap` or `Object` style iteration
    KeyValue,
}

/// Enumerates on the two types of values to be iterated, scalars and pairs
#[derive(Debug)]
enum ForLoopValues<'a> {
    /// Values for an array style iteration
    Array(Vec<Val<'a>>),
    /// Values for an object style iteration
    Object(Vec<(String, Val<'a>)>),
}

/// Tracks the state of one `{% for %}` while its body renders
#[derive(Debug)]
pub struct ForLoop<'a> {
    /// The key name when iterate as a Key-Value, ie in `{% for i, person in people %}` it would be `i`
    pub key_name: Option<&'a str>,
    /// The value name, ie in `{% for person in people %}` it would be `person`
    pub value_name: &'a str,
    /// What's the current loop index (0-indexed)
    pub current: usize,
    /// Kind of for loop
    pub kind: ForLoopKind,
    /// Values to iterate on
    values: ForLoopValues<'a>,
}

impl<'a> ForLoop<'a> {
    /// Iterates on the elements of an array, anything else gives an empty loop
    pub fn from_array(value_name: &'a str, container: Val<'a>) -> Self {
        let values = match container {
            Cow::Borrowed(Value::Array(arr)) => arr.iter().map(Cow::Borrowed).collect(),
            Cow::Owned(Value::Array(arr)) => arr.into_iter().map(Cow::Owned).collect(),
            _ => Vec::new(),
        };

        ForLoop {
            key_name: None,
            value_name,
            current: 0,
            kind: ForLoopKind::Value,
            values: ForLoopValues::Array(values),
        }
    }

    /// Iterates on the entries of an object, anything else gives an empty loop
    pub fn from_object(key_name: &'a str, value_name: &'a str, container: Val<'a>) -> Self {
        let values = match container {
            Cow::Borrowed(Value::Object(map)) => {
                map.iter().map(|(k, v)| (k.clone(), Cow::Borrowed(v))).collect()
            }
            Cow::Owned(Value::Object(map)) => {
                map.into_iter().map(|(k, v)| (k, Cow::Owned(v))).collect()
            }
            _ => Vec::new(),
        };

        ForLoop {
            key_name: Some(key_name),
            value_name,
            current: 0,
            kind: ForLoopKind::KeyValue,
            values: ForLoopValues::Object(values),
        }
    }

    #[inline]
    pub fn increment(&mut self) {
        self.current += 1;
    }

    pub fn len(&self) -> usize {
        match self.values {
            ForLoopValues::Array(ref values) => values.len(),
            ForLoopValues::Object(ref values) => values.len(),
        }
    }

    /// Whether we are on the last iteration
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.len()
    }

    /// The value of the current iteration, `null` once the loop is exhausted
    pub fn get_current_value(&self) -> Val<'a> {
        let found = match self.values {
            ForLoopValues::Array(ref values) => values.get(self.current),
            ForLoopValues::Object(ref values) => values.get(self.current).map(|(_, v)| v),
        };
        found.cloned().unwrap_or(Cow::Owned(Value::Null))
    }

    /// The key of the current iteration; array loops have none
    pub fn get_current_key(&self) -> Option<&str> {
        match self.values {
            ForLoopValues::Array(_) => None,
            ForLoopValues::Object(ref values) => {
                values.get(self.current).map(|(k, _)| k.as_str())
            }
        }
    }

    /// Checks whether the key string given is the variable used as key for
    /// the current forloop
    pub fn is_key(&self, name: &str) -> bool {
        self.kind == ForLoopKind::KeyValue && self.key_name == Some(name)
    }
}
