use std::path::PathBuf;

use crate::errors::{Error, Result};
use crate::parser::ast::Node;
use crate::parser::parse;

/// This is the parsed equivalent of a template file.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Name of the template, as it was requested
    pub name: String,
    /// Original path of the file, if it came from one
    pub path: Option<PathBuf>,
    /// Parsed AST
    pub ast: Vec<Node>,
}

impl Template {
    /// Parse the template string given
    pub fn new(tpl_name: &str, tpl_path: Option<PathBuf>, input: &str) -> Result<Template> {
        let ast = parse(input)
            .map_err(|e| Error::chain(format!("Failed to parse '{}'", tpl_name), e))?;

        Ok(Template { name: tpl_name.to_string(), path: tpl_path, ast })
    }
}
