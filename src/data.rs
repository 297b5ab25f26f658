//! The data a partial can be rendered with
use std::fmt;

use serde::ser::Serialize;
use serde_json::value::{to_value, Map, Value};

use crate::errors::Result;
use crate::model::ViewModel;
use crate::variables::Variables;

/// Implemented by objects that know how to turn themselves into template variables.
///
/// ```rust
/// # use vignette::{Map, ToVariables, Value};
/// struct Aggregate;
///
/// impl ToVariables for Aggregate {
///     fn to_variables(&self) -> Map<String, Value> {
///         let mut vars = Map::new();
///         vars.insert("foo".to_string(), Value::from("bar"));
///         vars
///     }
/// }
/// ```
pub trait ToVariables {
    /// Produces the name to value mapping exposed to the template
    fn to_variables(&self) -> Map<String, Value>;
}

impl<F> ToVariables for F
where
    F: Fn() -> Map<String, Value>,
{
    fn to_variables(&self) -> Map<String, Value> {
        self()
    }
}

/// What a partial receives besides its template name
pub enum DataContext {
    /// Plain key/value pairs, always merged flatly into the new scope
    Mapping(Map<String, Value>),
    /// The public fields of an object, as produced by its `Serialize` impl
    Fields(Map<String, Value>),
    /// An object converting itself into variables
    Convertible(Box<dyn ToVariables>),
    /// The variables of a view model
    Model(ViewModel),
    /// Anything that isn't shaped like an object; contributes nothing
    Scalar(Value),
}

impl DataContext {
    /// Builds a mapping context out of key/value pairs
    pub fn mapping<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        DataContext::Mapping(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Serializes `object` and uses its fields.
    /// Values not serializing to an object end up as `DataContext::Scalar`.
    pub fn fields<T: Serialize + ?Sized>(object: &T) -> Result<Self> {
        Ok(match to_value(object)? {
            Value::Object(map) => DataContext::Fields(map),
            other => DataContext::Scalar(other),
        })
    }

    /// Wraps an object implementing `ToVariables`
    pub fn convertible<T: ToVariables + 'static>(object: T) -> Self {
        DataContext::Convertible(Box::new(object))
    }

    /// Whether the context stands for a single object, which an object key can nest
    pub fn is_object(&self) -> bool {
        matches!(self, DataContext::Fields(_) | DataContext::Convertible(_))
    }

    /// Reduces the context to the variables of a fresh scope.
    ///
    /// With an `object_key`, object shaped contexts become a single variable of that name.
    pub fn into_variables(self, object_key: Option<&str>) -> Variables {
        if let Some(key) = object_key {
            if self.is_object() {
                let mut nested = Map::new();
                nested.insert(key.to_string(), Value::Object(self.into_map()));
                return Variables::from_map(nested);
            }
        }

        match self {
            DataContext::Model(model) => model.into_variables(),
            other => Variables::from_map(other.into_map()),
        }
    }

    fn into_map(self) -> Map<String, Value> {
        match self {
            DataContext::Mapping(map) | DataContext::Fields(map) => map,
            DataContext::Convertible(object) => object.to_variables(),
            DataContext::Model(model) => match model.into_variables().into_json() {
                Value::Object(map) => map,
                _ => Map::new(),
            },
            DataContext::Scalar(_) => Map::new(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            DataContext::Mapping(_) => "mapping",
            DataContext::Fields(_) => "fields",
            DataContext::Convertible(_) => "convertible",
            DataContext::Model(_) => "model",
            DataContext::Scalar(_) => "scalar",
        }
    }
}

impl fmt::Debug for DataContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataContext::Mapping(map) | DataContext::Fields(map) => {
                f.debug_tuple(self.kind()).field(map).finish()
            }
            DataContext::Convertible(_) => f.write_str("convertible"),
            DataContext::Model(model) => f.debug_tuple("model").field(model).finish(),
            DataContext::Scalar(value) => f.debug_tuple("scalar").field(value).finish(),
        }
    }
}

impl fmt::Display for DataContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

impl From<Map<String, Value>> for DataContext {
    fn from(map: Map<String, Value>) -> Self {
        DataContext::Mapping(map)
    }
}

impl From<Variables> for DataContext {
    fn from(vars: Variables) -> Self {
        match vars.into_json() {
            Value::Object(map) => DataContext::Mapping(map),
            _ => DataContext::Mapping(Map::new()),
        }
    }
}

impl From<ViewModel> for DataContext {
    fn from(model: ViewModel) -> Self {
        DataContext::Model(model)
    }
}

/// JSON objects count as objects; anything else is a scalar
impl From<Value> for DataContext {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => DataContext::Fields(map),
            other => DataContext::Scalar(other),
        }
    }
}
