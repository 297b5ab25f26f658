use std::path::PathBuf;
use std::rc::Rc;

use serde_derive::Serialize;
use vignette::{Map, ToVariables, Value, View};

/// Directory holding the fixture templates
#[allow(dead_code)]
pub fn templates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("templates")
}

/// Where the application templates live
#[allow(dead_code)]
pub fn scripts_dir() -> PathBuf {
    templates_dir().join("application").join("views").join("scripts")
}

/// A view resolving templates from the application scripts directory
#[allow(dead_code)]
pub fn view() -> Rc<View> {
    let view = View::new();
    view.resolver().add_path(scripts_dir());
    view
}

/// A plain object with public fields
#[derive(Debug, Serialize)]
pub struct Model {
    pub foo: String,
    pub bar: String,
}

impl Model {
    #[allow(dead_code)]
    pub fn new() -> Model {
        Model { foo: "bar".to_owned(), bar: "baz".to_owned() }
    }
}

/// An object converting itself into variables
#[derive(Debug)]
pub struct Aggregate {
    pub vars: Vec<(String, String)>,
}

impl Aggregate {
    #[allow(dead_code)]
    pub fn new() -> Aggregate {
        Aggregate {
            vars: vec![
                ("foo".to_owned(), "bar".to_owned()),
                ("bar".to_owned(), "baz".to_owned()),
            ],
        }
    }
}

impl ToVariables for Aggregate {
    fn to_variables(&self) -> Map<String, Value> {
        self.vars.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect()
    }
}
