use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::data::DataContext;
use crate::errors::{Error, Result};
use crate::helpers::{Helper, Partial};
use crate::view::View;

/// Renders the same partial once per item and concatenates the results.
#[derive(Debug, Default, Clone)]
pub struct PartialLoop {
    partial: Partial,
    counter: usize,
}

impl PartialLoop {
    pub fn new() -> Self {
        PartialLoop::default()
    }

    pub fn invoke(&mut self) -> &mut Self {
        self
    }

    /// See `Partial::set_object_key`
    pub fn set_object_key(&mut self, key: Option<&str>) -> &mut Self {
        self.partial.set_object_key(key);
        self
    }

    pub fn object_key(&self) -> Option<&str> {
        self.partial.object_key()
    }

    /// Renders `name` once for every item, each item being the only data of its render
    pub fn render_loop<I, D>(&mut self, name: &str, items: I) -> Result<String>
    where
        I: IntoIterator<Item = D>,
        D: Into<DataContext>,
    {
        self.counter = 0;
        let mut output = String::new();

        for item in items {
            self.counter += 1;
            output.push_str(&self.partial.render_with(name, item)?);
        }
        debug!(template = name, items = self.counter, "rendered partial loop");

        Ok(output)
    }

    /// Loops over the elements of an array or the values of an object
    pub fn render_loop_value(&mut self, name: &str, items: &Value) -> Result<String> {
        match *items {
            Value::Array(ref list) => self.render_loop(name, list.iter().cloned()),
            Value::Object(ref map) => self.render_loop(name, map.values().cloned()),
            _ => Err(Error::msg(format!(
                "PartialLoop helper requires iterable data, got `{}` for '{}'",
                items, name
            ))),
        }
    }

    /// How many items the last loop rendered
    pub fn partial_counter(&self) -> usize {
        self.counter
    }
}

impl Helper for PartialLoop {
    fn set_view(&mut self, view: Rc<View>) -> &mut Self {
        self.partial.set_view(view);
        self
    }

    fn view(&self) -> Option<&Rc<View>> {
        self.partial.view()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn renders_every_item_and_counts_them() {
        let view = View::new();
        view.add_raw_template("row", "[{{ id }}]").unwrap();
        let mut partial_loop = PartialLoop::new();
        partial_loop.set_view(view);

        let rows = vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})];
        assert_eq!(partial_loop.render_loop("row", rows).unwrap(), "[1][2][3]");
        assert_eq!(partial_loop.partial_counter(), 3);

        assert_eq!(partial_loop.render_loop("row", Vec::<Value>::new()).unwrap(), "");
        assert_eq!(partial_loop.partial_counter(), 0);
    }

    #[test]
    fn objects_loop_over_their_values() {
        let view = View::new();
        view.add_raw_template("row", "{{ row.id }};").unwrap();
        let mut partial_loop = PartialLoop::new();
        partial_loop.set_view(view).set_object_key(Some("row"));

        let rows = json!({"first": {"id": "a"}, "second": {"id": "b"}});
        assert_eq!(partial_loop.render_loop_value("row", &rows).unwrap(), "a;b;");
        assert_eq!(partial_loop.partial_counter(), 2);
    }

    #[test]
    fn scalars_are_not_iterable() {
        let view = View::new();
        let mut partial_loop = PartialLoop::new();
        partial_loop.set_view(view);

        let err = partial_loop.render_loop_value("row", &json!("nope")).unwrap_err();
        assert!(err.to_string().starts_with("PartialLoop helper requires iterable data"));
    }
}
