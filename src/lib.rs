#![doc(html_root_url = "https://docs.rs/vignette")]
//! # Vignette
//!
//! Server-side view rendering built around *partials*: template fragments
//! rendered in their own variable scope.
//!
//! A [`View`] finds templates by name (an explicit [`TemplateMapResolver`] first,
//! then a [`TemplatePathStack`] of directories), keeps the ambient variables and
//! renders. A [`Partial`] bound to a view renders one template with the data it is
//! given and nothing else; a [`PartialLoop`] does the same once per item.
//!
//! ## Example
//!
//! ```rust
//! use vignette::{DataContext, Helper, Partial, View};
//!
//! let view = View::new();
//! view.add_raw_template("row", "{{ row.name }} ({{ row.role | upper }})").unwrap();
//! view.vars_mut().insert("row", &"ambient, never seen by the partial");
//!
//! let mut partial = Partial::new();
//! partial.set_view(view.clone()).set_object_key(Some("row"));
//!
//! let user = serde_json::json!({"name": "Ada", "role": "admin"});
//! assert_eq!(partial.render_with("row", user).unwrap(), "Ada (ADMIN)");
//! ```
//!
//! ## Templates
//!
//! Templates use a small Jinja-like language: `{{ expr }}`, `{% if %}`,
//! `{% for %}`, `{% set %}` and `{# comments #}`, with filters (`{{ name | upper }}`)
//! and functions called with keyword arguments. Templates can render partials
//! themselves with `partial(name="row", values=user, object_key="row")` and
//! `partial_loop(name="row", items=users)`, and see their whole scope with `vars()`.

#[macro_use]
mod macros;
mod builtins;
mod constraints;
mod data;
mod errors;
mod helpers;
mod model;
mod parser;
mod renderer;
mod resolver;
mod template;
mod utils;
mod variables;
mod view;

// Library exports.

pub use crate::builtins::filters::Filter;
pub use crate::builtins::functions::Function;
pub use crate::data::{DataContext, ToVariables};
pub use crate::errors::{Error, ErrorKind, Result};
pub use crate::helpers::{Helper, Partial, PartialLoop};
pub use crate::model::ViewModel;
pub use crate::resolver::{Resolver, TemplateMapResolver, TemplatePathStack};
pub use crate::utils::escape_html;
pub use crate::variables::Variables;
pub use crate::view::View;
// Template and dotted_pointer are meant to be used internally only but are exported for tests.
#[doc(hidden)]
pub use crate::template::Template;
#[doc(hidden)]
pub use crate::variables::dotted_pointer;
// Re-export Value and other useful things from serde
// so apps/tools can encode data in template types
pub use serde_json::value::{from_value, to_value, Map, Number, Value};

// Exposes the AST if one needs it but changing the AST is not considered
// a breaking change so it isn't public
#[doc(hidden)]
pub use crate::parser::ast;
