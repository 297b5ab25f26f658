use std::path::{Component, Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use crate::errors::{Error, Result};
use crate::resolver::Resolver;

lazy_static! {
    static ref PARENT_DIR_SEGMENT: Regex = Regex::new(r"(^|[/\\])\.\.([/\\]|$)").unwrap();
}

/// Suffix appended to names without an extension
pub const DEFAULT_SUFFIX: &str = "phtml";

/// Looks templates up in a stack of directories, the last added directory first.
#[derive(Debug, Clone)]
pub struct TemplatePathStack {
    paths: Vec<PathBuf>,
    default_suffix: String,
    lfi_protection: bool,
}

impl Default for TemplatePathStack {
    fn default() -> Self {
        TemplatePathStack {
            paths: Vec::new(),
            default_suffix: DEFAULT_SUFFIX.to_string(),
            lfi_protection: true,
        }
    }
}

impl TemplatePathStack {
    pub fn new() -> Self {
        TemplatePathStack::default()
    }

    /// Pushes a directory on the stack; it will be searched before the ones added earlier
    pub fn add_path<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
        self.paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Pushes several directories, in order
    pub fn add_paths<I, P>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.add_path(path);
        }
        self
    }

    /// Empties the stack
    pub fn clear_paths(&mut self) -> &mut Self {
        self.paths.clear();
        self
    }

    /// The directories in search order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().rev().map(PathBuf::as_path)
    }

    /// Sets the suffix added to names without an extension, a leading dot is dropped
    pub fn set_default_suffix(&mut self, suffix: &str) -> &mut Self {
        self.default_suffix = suffix.trim_start_matches('.').to_string();
        self
    }

    pub fn default_suffix(&self) -> &str {
        &self.default_suffix
    }

    /// Whether names containing a `..` segment or an absolute path are refused
    pub fn set_lfi_protection(&mut self, enabled: bool) -> &mut Self {
        self.lfi_protection = enabled;
        self
    }

    pub fn is_lfi_protection_on(&self) -> bool {
        self.lfi_protection
    }

    fn file_name(&self, name: &str) -> String {
        if Path::new(name).extension().is_some() || self.default_suffix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", name, self.default_suffix)
        }
    }
}

/// Joining an absolute name onto a search path replaces the search path entirely
fn leaves_search_paths(name: &str) -> bool {
    let path = Path::new(name);
    PARENT_DIR_SEGMENT.is_match(name)
        || path.has_root()
        || path.components().any(|c| matches!(c, Component::Prefix(_)))
}

impl Resolver for TemplatePathStack {
    fn resolve(&self, name: &str) -> Result<Option<PathBuf>> {
        if self.lfi_protection && leaves_search_paths(name) {
            return Err(Error::invalid_template_name(name));
        }

        let file_name = self.file_name(name);
        for dir in self.paths() {
            let candidate = dir.join(&file_name);
            trace!(template = name, candidate = %candidate.display(), "trying path");
            if candidate.is_file() {
                debug!(template = name, path = %candidate.display(), "resolved from path stack");
                return Ok(Some(candidate));
            }
        }

        Ok(None)
    }
}
