use std::collections::HashMap;
use std::path::{Path, PathBuf};

use globwalk::GlobWalkerBuilder;
use tracing::debug;

use crate::errors::{Error, Result};
use crate::resolver::Resolver;

/// Resolves templates from an explicit name to file map
#[derive(Debug, Clone, Default)]
pub struct TemplateMapResolver {
    map: HashMap<String, PathBuf>,
}

impl TemplateMapResolver {
    pub fn new() -> Self {
        TemplateMapResolver::default()
    }

    /// Maps every file matching `pattern` below `dir` under its `/` separated path relative
    /// to `dir`, eg. `partials/row.phtml`.
    ///
    /// ```no_run
    /// # use vignette::TemplateMapResolver;
    /// let map = TemplateMapResolver::from_glob("views", "**/*.phtml").unwrap();
    /// ```
    pub fn from_glob<P: AsRef<Path>>(dir: P, pattern: &str) -> Result<Self> {
        let mut resolver = TemplateMapResolver::new();
        resolver.add_glob(dir, pattern)?;
        Ok(resolver)
    }

    /// Same as `from_glob` but adds to the existing entries
    pub fn add_glob<P: AsRef<Path>>(&mut self, dir: P, pattern: &str) -> Result<&mut Self> {
        // walked entries are prefixed with the canonical form of the directory
        let dir = std::fs::canonicalize(dir.as_ref()).map_err(|e| {
            Error::chain(format!("Couldn't open template directory {:?}", dir.as_ref()), e)
        })?;
        let walker = GlobWalkerBuilder::from_patterns(&dir, &[pattern])
            .follow_links(true)
            .build()
            .map_err(|e| Error::msg(format!("Invalid glob pattern '{}': {}", pattern, e)))?;

        for entry in walker.filter_map(std::result::Result::ok) {
            let path = entry.into_path();
            if !path.is_file() {
                continue;
            }
            let name = match path.strip_prefix(&dir) {
                Ok(relative) => relative.to_string_lossy().replace('\\', "/"),
                Err(_) => continue,
            };
            debug!(template = %name, path = %path.display(), "mapped template");
            self.map.insert(name, path);
        }

        Ok(self)
    }

    /// Maps one name to a file, replacing a previous entry
    pub fn add<S: Into<String>, P: Into<PathBuf>>(&mut self, name: S, path: P) -> &mut Self {
        self.map.insert(name.into(), path.into());
        self
    }

    /// Adds every entry of `other`, its entries winning on conflicts
    pub fn merge(&mut self, other: TemplateMapResolver) -> &mut Self {
        self.map.extend(other.map);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.map.get(name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Resolver for TemplateMapResolver {
    fn resolve(&self, name: &str) -> Result<Option<PathBuf>> {
        Ok(self.map.get(name).cloned())
    }
}
