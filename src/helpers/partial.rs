use std::rc::Rc;

use tracing::debug;

use crate::data::DataContext;
use crate::errors::{Error, Result};
use crate::helpers::Helper;
use crate::model::ViewModel;
use crate::view::View;

/// Renders a template in its own variable scope.
///
/// ```
/// # use vignette::{DataContext, Helper, Partial, View};
/// let view = View::new();
/// view.add_raw_template("greeting", "Hello {{ name }}").unwrap();
/// view.vars_mut().insert("name", &"nobody");
///
/// let mut partial = Partial::new();
/// partial.set_view(view.clone());
///
/// let out = partial.render_with("greeting", DataContext::mapping(vec![("name", "Ada")])).unwrap();
/// assert_eq!(out, "Hello Ada");
/// ```
#[derive(Debug, Default, Clone)]
pub struct Partial {
    view: Option<Rc<View>>,
    object_key: Option<String>,
}

impl Partial {
    pub fn new() -> Self {
        Partial::default()
    }

    /// Calling the helper without a template gives the helper back, for chaining
    pub fn invoke(&mut self) -> &mut Self {
        self
    }

    /// Renders `name` with the ambient variables of the view
    pub fn render(&self, name: &str) -> Result<String> {
        let view = self.bound_view()?;
        debug!(template = name, "rendering partial with the view variables");
        view.render(name, None)
    }

    /// Renders `name` with `data` as the only variables.
    ///
    /// Object shaped data (`DataContext::Fields`, `DataContext::Convertible`) is
    /// flattened into variables, or nested under the object key when one is set.
    pub fn render_with<D: Into<DataContext>>(&self, name: &str, data: D) -> Result<String> {
        let view = self.bound_view()?;
        let data = data.into();
        debug!(template = name, context = %data, object_key = ?self.object_key, "rendering partial");

        let mut scope = data.into_variables(self.object_key());
        let strict = view.vars().is_strict();
        scope.set_strict(strict);

        view.render(name, Some(scope))
    }

    /// Renders the model's template with the model's variables
    pub fn render_model(&self, model: &ViewModel) -> Result<String> {
        self.bound_view()?.render_model(model)
    }

    /// Sets the variable name object shaped data gets nested under, `None` to flatten it
    pub fn set_object_key(&mut self, key: Option<&str>) -> &mut Self {
        self.object_key = key.map(str::to_string);
        self
    }

    pub fn object_key(&self) -> Option<&str> {
        self.object_key.as_deref()
    }

    fn bound_view(&self) -> Result<&Rc<View>> {
        self.view.as_ref().ok_or_else(Error::missing_view)
    }
}

impl Helper for Partial {
    fn set_view(&mut self, view: Rc<View>) -> &mut Self {
        self.view = Some(view);
        self
    }

    fn view(&self) -> Option<&Rc<View>> {
        self.view.as_ref()
    }
}
