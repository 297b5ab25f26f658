use tracing::trace;

use crate::errors::{Error, Result};
use crate::renderer::processor::Processor;
use crate::template::Template;
use crate::variables::Variables;
use crate::view::View;

/// Given a `View`, a `Template` and the variables of the scope, renders text
#[derive(Debug)]
pub struct Renderer<'a> {
    /// Template to render
    template: &'a Template,
    /// Houses filters, functions and the other templates
    view: &'a View,
    /// Read-only scope the template sees
    context: &'a Variables,
    /// If set rendering should be escaped
    should_escape: bool,
}

impl<'a> Renderer<'a> {
    /// Create a new `Renderer`
    #[inline]
    pub fn new(template: &'a Template, view: &'a View, context: &'a Variables) -> Renderer<'a> {
        let should_escape = view.should_escape(template);
        Renderer { template, view, context, should_escape }
    }

    /// Combines the scope with the Template to generate text results
    pub fn render(&self) -> Result<String> {
        trace!(template = %self.template.name, escape = self.should_escape, "processing template");
        let mut processor =
            Processor::new(self.template, self.view, self.context, self.should_escape);

        processor
            .render()
            .map_err(|e| Error::chain(format!("Failed to render '{}'", self.template.name), e))
    }
}
