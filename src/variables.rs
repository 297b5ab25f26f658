use std::collections::btree_map;
use std::collections::BTreeMap;
use std::io::Write;

use serde::ser::Serialize;
use serde_json::value::{to_value, Map, Value};

use crate::errors::{Error, Result};

/// The variables a template is rendered with.
///
/// A view keeps one set of ambient `Variables`; a partial rendered with an explicit
/// data context gets a fresh set built from that context instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variables {
    data: BTreeMap<String, Value>,
    strict: bool,
}

impl Variables {
    /// Initializes an empty, non-strict set of variables
    pub fn new() -> Self {
        Variables { data: BTreeMap::new(), strict: false }
    }

    /// Converts the `val` parameter to `Value` and insert it into the variables.
    ///
    /// Panics if the serialization fails.
    ///
    /// ```rust
    /// # use vignette::Variables;
    /// let mut vars = Variables::new();
    /// vars.insert("message", "hello");
    /// ```
    pub fn insert<T: Serialize + ?Sized, S: Into<String>>(&mut self, key: S, val: &T) {
        self.data.insert(key.into(), to_value(val).unwrap());
    }

    /// Converts the `val` parameter to `Value` and insert it into the variables.
    ///
    /// Returns an error if the serialization fails.
    pub fn try_insert<T: Serialize + ?Sized, S: Into<String>>(
        &mut self,
        key: S,
        val: &T,
    ) -> Result<()> {
        self.data.insert(key.into(), to_value(val)?);

        Ok(())
    }

    /// Appends the data of the `source` parameter to `self`, overwriting existing keys.
    pub fn extend(&mut self, mut source: Variables) {
        self.data.append(&mut source.data);
    }

    /// Converts the variables to a JSON object
    pub fn into_json(self) -> Value {
        let mut m = Map::new();
        for (key, value) in self.data {
            m.insert(key, value);
        }
        Value::Object(m)
    }

    /// Takes a serde-json `Value` and convert it into `Variables` with no overhead/cloning.
    pub fn from_value(obj: Value) -> Result<Self> {
        match obj {
            Value::Object(m) => Ok(Self::from_map(m)),
            _ => Err(Error::msg(
                "Creating variables from JSON is only possible from a JSON object",
            )),
        }
    }

    /// Builds variables out of an already built JSON map
    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut data = BTreeMap::new();
        for (key, value) in map {
            data.insert(key, value);
        }
        Variables { data, strict: false }
    }

    /// Takes something that impl Serialize and create variables with it.
    /// Meant to be used if you have a hashmap or a struct and don't want to insert values
    /// one by one in the variables.
    pub fn from_serialize(value: impl Serialize) -> Result<Self> {
        let obj = to_value(value).map_err(Error::json)?;
        Variables::from_value(obj)
    }

    /// Returns the value at a given key index.
    pub fn get(&self, index: &str) -> Option<&Value> {
        self.data.get(index)
    }

    /// Remove a key from the variables, returning the value at the key if the key was previously inserted.
    pub fn remove(&mut self, index: &str) -> Option<Value> {
        self.data.remove(index)
    }

    /// Checks if a value exists at a specific index.
    pub fn contains_key(&self, index: &str) -> bool {
        self.data.contains_key(index)
    }

    /// Removes every variable, keeping the strict flag
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Number of variables set
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no variable is set
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterates over the variables in key order
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.data.iter()
    }

    /// Whether looking up an undefined variable is an error
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// When strict, rendering an undefined variable fails instead of producing an empty value
    pub fn set_strict(&mut self, strict: bool) -> &mut Self {
        self.strict = strict;
        self
    }
}

impl From<Map<String, Value>> for Variables {
    fn from(map: Map<String, Value>) -> Self {
        Variables::from_map(map)
    }
}

impl<'a> IntoIterator for &'a Variables {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

pub trait ValueRender {
    fn render(&self) -> String;
}

// Convert serde Value to String.
impl ValueRender for Value {
    fn render(&self) -> String {
        match *self {
            Value::String(ref s) => s.clone(),
            Value::Number(ref i) => i.to_string(),
            Value::Bool(i) => i.to_string(),
            Value::Null => String::new(),
            Value::Array(ref a) => {
                let mut buf: Vec<u8> = Vec::new();
                buf.push(b'[');
                let mut first = true;
                for i in a.iter() {
                    if !first {
                        buf.extend_from_slice(b", ");
                    }
                    first = false;
                    // writing to a Vec can't fail
                    let _ = write!(buf, "{}", i.render());
                }
                buf.push(b']');
                String::from_utf8(buf).unwrap_or_default()
            }
            Value::Object(_) => "[object]".to_owned(),
        }
    }
}

pub trait ValueTruthy {
    fn is_truthy(&self) -> bool;
}

impl ValueTruthy for Value {
    fn is_truthy(&self) -> bool {
        match *self {
            Value::Number(ref i) => {
                if i.is_i64() {
                    return i.as_i64().unwrap() != 0;
                }
                if i.is_u64() {
                    return i.as_u64().unwrap() != 0;
                }
                let f = i.as_f64().unwrap();
                f != 0.0 && !f.is_nan()
            }
            Value::Bool(ref i) => *i,
            Value::Null => false,
            Value::String(ref i) => !i.is_empty(),
            Value::Array(ref i) => !i.is_empty(),
            Value::Object(ref i) => !i.is_empty(),
        }
    }
}

/// Lookups a dotted path in a json value
/// contrary to the json slash pointer it's not allowed to begin with a dot
#[inline]
pub fn dotted_pointer<'a>(value: &'a Value, pointer: &str) -> Option<&'a Value> {
    if pointer.is_empty() {
        return Some(value);
    }

    pointer.split('.').try_fold(value, |target, token| match target {
        Value::Object(map) => map.get(token),
        Value::Array(list) => token.parse::<usize>().ok().and_then(|idx| list.get(idx)),
        _ => None,
    })
}
