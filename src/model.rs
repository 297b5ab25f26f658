use serde::ser::Serialize;
use serde_json::Value;

use crate::errors::Result;
use crate::variables::Variables;

/// A template name paired with the variables it should be rendered with.
///
/// Handing a `ViewModel` to a helper renders the model's own template; handing it as a
/// data context only contributes its variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    template: Option<String>,
    variables: Variables,
}

impl ViewModel {
    /// A model without template and without variables
    pub fn new() -> Self {
        ViewModel::default()
    }

    /// Sets the template rendered for this model
    pub fn set_template<S: Into<String>>(&mut self, template: S) -> &mut Self {
        self.template = Some(template.into());
        self
    }

    /// The template rendered for this model, if any
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// Sets one variable, serializing the value
    pub fn set_variable<T: Serialize + ?Sized, S: Into<String>>(
        &mut self,
        key: S,
        value: &T,
    ) -> Result<&mut Self> {
        self.variables.try_insert(key, value)?;
        Ok(self)
    }

    /// Looks up one variable
    pub fn variable(&self, key: &str) -> Option<&Value> {
        self.variables.get(key)
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut Variables {
        &mut self.variables
    }

    pub fn into_variables(self) -> Variables {
        self.variables
    }
}

#[cfg(test)]
mod tests {
    use super::ViewModel;
    use serde_json::json;

    #[test]
    fn setters_chain() {
        let mut model = ViewModel::new();
        model.set_template("partialOne.phtml").set_variable("foo", "bar").unwrap();

        assert_eq!(model.template(), Some("partialOne.phtml"));
        assert_eq!(model.variable("foo"), Some(&json!("bar")));
        assert_eq!(model.variables().len(), 1);

        model.variables_mut().remove("foo");
        assert!(model.variables().is_empty());
    }
}
