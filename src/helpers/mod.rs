//! View helpers: objects bound to a `View` that render templates on behalf of their caller.
//!
//! Both helpers are also reachable from templates as the `partial(..)` and
//! `partial_loop(..)` functions.
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::errors::{Error, Result};
use crate::view::View;

mod partial;
mod partial_loop;

pub use self::partial::Partial;
pub use self::partial_loop::PartialLoop;

/// Something that gets bound to a view before it can do its job
pub trait Helper {
    /// Binds the helper to `view`, replacing a previous one
    fn set_view(&mut self, view: Rc<View>) -> &mut Self
    where
        Self: Sized;

    /// The view last given to `set_view`
    fn view(&self) -> Option<&Rc<View>>;
}

/// Names of the helpers templates can call as functions
const VIEW_HELPERS: [&str; 2] = ["partial", "partial_loop"];

/// Whether `name` is a helper callable from templates
pub fn is_view_helper(name: &str) -> bool {
    VIEW_HELPERS.contains(&name)
}

fn string_arg<'a>(
    helper: &str,
    arg: &str,
    args: &'a HashMap<String, Value>,
) -> Result<Option<&'a str>> {
    match args.get(arg) {
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        None | Some(Value::Null) => Ok(None),
        Some(val) => Err(Error::msg(format!(
            "Function `{}` received {}={} but `{}` can only be a string",
            helper, arg, val, arg
        ))),
    }
}

/// Runs the helper `name` on behalf of a template, with the template's arguments.
///
/// * `name`: the template to render, required
/// * `values` (`partial`) / `items` (`partial_loop`): the data to render with
/// * `object_key`: nests object shaped data under that variable
pub fn call_view_helper(view: &View, name: &str, args: &HashMap<String, Value>) -> Result<String> {
    let handle = view.handle().ok_or_else(Error::missing_view)?;
    let template = match string_arg(name, "name", args)? {
        Some(template) => template,
        None => {
            return Err(Error::msg(format!(
                "Function `{}` was called without a `name` argument",
                name
            )));
        }
    };
    let object_key = string_arg(name, "object_key", args)?;

    match name {
        "partial" => {
            let mut partial = Partial::new();
            partial.set_view(handle).set_object_key(object_key);
            match args.get("values") {
                // an undefined variable passed as `values` behaves like no values at all
                None | Some(Value::Null) => partial.render(template),
                Some(values) => partial.render_with(template, values.clone()),
            }
        }
        "partial_loop" => {
            let items = args.get("items").ok_or_else(|| {
                Error::msg("Function `partial_loop` was called without an `items` argument")
            })?;
            let mut partial_loop = PartialLoop::new();
            partial_loop.set_view(handle).set_object_key(object_key);
            partial_loop.render_loop_value(template, items)
        }
        _ => Err(Error::function_not_found(name)),
    }
}
