//! Turning template names into files
use std::path::PathBuf;

use crate::errors::Result;

mod path_stack;
mod template_map;

pub use self::path_stack::TemplatePathStack;
pub use self::template_map::TemplateMapResolver;

/// Maps a template name to the file holding its source.
///
/// `Ok(None)` means the resolver doesn't know the name and the next one can be asked,
/// errors are reserved for names the resolver refuses outright.
pub trait Resolver {
    /// Finds the file for `name`
    fn resolve(&self, name: &str) -> Result<Option<PathBuf>>;
}

impl<R: Resolver + ?Sized> Resolver for Box<R> {
    fn resolve(&self, name: &str) -> Result<Option<PathBuf>> {
        (**self).resolve(name)
    }
}
