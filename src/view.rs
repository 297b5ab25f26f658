//! The view: where templates are found, cached and rendered
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::builtins::filters::{array, common, string, Filter};
use crate::builtins::functions::Function;
use crate::constraints::RENDER_MAX_DEPTH;
use crate::errors::{Error, Result};
use crate::model::ViewModel;
use crate::renderer::Renderer;
use crate::resolver::{Resolver, TemplateMapResolver, TemplatePathStack};
use crate::template::Template;
use crate::variables::Variables;

/// Default template suffixes that get HTML escaped
const DEFAULT_AUTOESCAPE_SUFFIXES: [&str; 3] = [".html", ".htm", ".xml"];

/// Finds templates by name, holds the ambient variables and renders.
///
/// A view is always handled through an `Rc` so helpers can hold on to it:
///
/// ```no_run
/// use vignette::View;
///
/// let view = View::new();
/// view.resolver().add_path("templates/views");
/// view.vars_mut().insert("title", &"Home");
///
/// let html = view.render("index", None).unwrap();
/// ```
///
/// Configuration goes through `RefCell`s: don't keep the `RefMut` given by
/// `resolver()`, `template_map()` or `vars_mut()` alive across a render.
pub struct View {
    me: Weak<View>,
    resolver: RefCell<TemplatePathStack>,
    template_map: RefCell<TemplateMapResolver>,
    raw_templates: RefCell<HashMap<String, Rc<Template>>>,
    cache: RefCell<HashMap<PathBuf, Rc<Template>>>,
    vars: RefCell<Variables>,
    filters: RefCell<HashMap<String, Rc<dyn Filter>>>,
    functions: RefCell<HashMap<String, Rc<dyn Function>>>,
    autoescape_suffixes: RefCell<Vec<String>>,
    depth: Cell<usize>,
}

impl View {
    /// Creates a view with empty resolvers and variables and the builtin filters
    pub fn new() -> Rc<View> {
        let view = Rc::new_cyclic(|me| View {
            me: me.clone(),
            resolver: RefCell::new(TemplatePathStack::new()),
            template_map: RefCell::new(TemplateMapResolver::new()),
            raw_templates: RefCell::new(HashMap::new()),
            cache: RefCell::new(HashMap::new()),
            vars: RefCell::new(Variables::new()),
            filters: RefCell::new(HashMap::new()),
            functions: RefCell::new(HashMap::new()),
            autoescape_suffixes: RefCell::new(
                DEFAULT_AUTOESCAPE_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            ),
            depth: Cell::new(0),
        });
        view.register_builtin_filters();
        view
    }

    fn register_builtin_filters(&self) {
        self.register_filter("upper", string::upper);
        self.register_filter("lower", string::lower);
        self.register_filter("trim", string::trim);
        self.register_filter("truncate", string::truncate);
        self.register_filter("escape", string::escape_html);

        self.register_filter("join", array::join);

        self.register_filter("length", common::length);
        self.register_filter("default", common::default);
        self.register_filter("safe", common::safe);
    }

    /// The `Rc` this view lives in
    pub fn handle(&self) -> Option<Rc<View>> {
        self.me.upgrade()
    }

    /// The path stack, searched after the template map
    pub fn resolver(&self) -> RefMut<'_, TemplatePathStack> {
        self.resolver.borrow_mut()
    }

    /// The explicit name to file map, searched before the path stack
    pub fn template_map(&self) -> RefMut<'_, TemplateMapResolver> {
        self.template_map.borrow_mut()
    }

    /// The ambient variables, used when a render gets no variables of its own
    pub fn vars(&self) -> Ref<'_, Variables> {
        self.vars.borrow()
    }

    pub fn vars_mut(&self) -> RefMut<'_, Variables> {
        self.vars.borrow_mut()
    }

    /// Replaces the ambient variables
    pub fn set_vars(&self, vars: Variables) {
        *self.vars.borrow_mut() = vars;
    }

    /// Registers an in-memory template, looked up before any resolver
    ///
    /// ```
    /// # use vignette::View;
    /// let view = View::new();
    /// view.add_raw_template("hello", "Hello {{ name }}!").unwrap();
    /// ```
    pub fn add_raw_template(&self, name: &str, content: &str) -> Result<()> {
        let template = Template::new(name, None, content)?;
        self.raw_templates.borrow_mut().insert(name.to_string(), Rc::new(template));
        Ok(())
    }

    /// Finds the file backing `name`: the template map first, then the path stack
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        if let Some(path) = self.template_map.borrow().resolve(name)? {
            return Ok(path);
        }
        if let Some(path) = self.resolver.borrow().resolve(name)? {
            return Ok(path);
        }

        debug!(template = name, "template not found");
        Err(Error::template_not_found(name))
    }

    /// Gets the parsed template, reading and caching it on first use
    pub fn get_template(&self, name: &str) -> Result<Rc<Template>> {
        if let Some(template) = self.raw_templates.borrow().get(name) {
            return Ok(Rc::clone(template));
        }

        let path = self.resolve(name)?;
        if let Some(template) = self.cache.borrow().get(&path) {
            trace!(template = name, "template cache hit");
            return Ok(Rc::clone(template));
        }

        let source = std::fs::read_to_string(&path).map_err(|e| {
            Error::chain(format!("Couldn't read template '{}' from {:?}", name, path), e)
        })?;
        let template = Rc::new(Template::new(name, Some(path.clone()), &source)?);
        debug!(template = name, path = %path.display(), "template cached");
        self.cache.borrow_mut().insert(path, Rc::clone(&template));

        Ok(template)
    }

    /// Renders a template.
    ///
    /// Without `values` the template sees the ambient variables; with them it
    /// sees exactly those and nothing of the ambient scope.
    ///
    /// ```
    /// # use vignette::{Variables, View};
    /// let view = View::new();
    /// view.add_raw_template("hello", "Hello {{ name }}!").unwrap();
    /// view.vars_mut().insert("name", &"ambient");
    ///
    /// let mut values = Variables::new();
    /// values.insert("name", &"world");
    /// assert_eq!(view.render("hello", Some(values)).unwrap(), "Hello world!");
    /// assert_eq!(view.render("hello", None).unwrap(), "Hello ambient!");
    /// ```
    pub fn render(&self, name: &str, values: Option<Variables>) -> Result<String> {
        let depth = self.depth.get();
        if depth >= RENDER_MAX_DEPTH {
            return Err(Error::msg(format!(
                "Max render depth ({}) exceeded while rendering '{}'",
                RENDER_MAX_DEPTH, name
            )));
        }

        let template = self.get_template(name)?;
        let scope = match values {
            Some(vars) => vars,
            None => self.vars.borrow().clone(),
        };
        debug!(template = name, variables = scope.len(), depth, "rendering");

        self.depth.set(depth + 1);
        let res = Renderer::new(&template, self, &scope).render();
        self.depth.set(depth);

        res
    }

    /// Renders the template of a view model with the model's variables, strict when the view is
    pub fn render_model(&self, model: &ViewModel) -> Result<String> {
        let template = match model.template() {
            Some(template) => template,
            None => return Err(Error::msg("Can't render a view model without a template")),
        };
        let mut scope = model.variables().clone();
        scope.set_strict(self.vars().is_strict());

        self.render(template, Some(scope))
    }

    /// Register a filter, replacing any filter of the same name
    ///
    /// ```
    /// # use std::collections::HashMap;
    /// # use vignette::{to_value, Result, Value, View};
    /// fn shout(value: &Value, _: &HashMap<String, Value>) -> Result<Value> {
    ///     Ok(to_value(format!("{}!", value.as_str().unwrap_or_default()))?)
    /// }
    ///
    /// let view = View::new();
    /// view.register_filter("shout", shout);
    /// ```
    pub fn register_filter<F: Filter + 'static>(&self, name: &str, filter: F) {
        self.filters.borrow_mut().insert(name.to_string(), Rc::new(filter));
    }

    /// Register a function callable from templates, replacing any function of the same name
    pub fn register_function<F: Function + 'static>(&self, name: &str, function: F) {
        self.functions.borrow_mut().insert(name.to_string(), Rc::new(function));
    }

    pub fn get_filter(&self, name: &str) -> Result<Rc<dyn Filter>> {
        match self.filters.borrow().get(name) {
            Some(filter) => Ok(Rc::clone(filter)),
            None => Err(Error::filter_not_found(name)),
        }
    }

    pub fn get_function(&self, name: &str) -> Result<Rc<dyn Function>> {
        match self.functions.borrow().get(name) {
            Some(function) => Ok(Rc::clone(function)),
            None => Err(Error::function_not_found(name)),
        }
    }

    /// Select which suffix(es) to automatically do HTML escaping on,
    /// `[".html", ".htm", ".xml"]` by default.
    ///
    /// An empty list turns escaping off.
    pub fn autoescape_on(&self, suffixes: Vec<&str>) {
        *self.autoescape_suffixes.borrow_mut() = suffixes.iter().map(|s| s.to_string()).collect();
    }

    /// Whether the output of `template` gets escaped, based on its path or else its name
    pub(crate) fn should_escape(&self, template: &Template) -> bool {
        let target = match template.path {
            Some(ref path) => path.to_string_lossy().into_owned(),
            None => template.name.clone(),
        };
        self.autoescape_suffixes.borrow().iter().any(|ext| target.ends_with(ext.as_str()))
    }

    /// Forgets every parsed template read from a file
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "View {{")?;
        write!(f, "\n\tresolver: {:?}", self.resolver.borrow())?;
        write!(f, "\n\ttemplate_map: {:?}", self.template_map.borrow())?;
        write!(f, "\n\traw_templates: [")?;
        for name in self.raw_templates.borrow().keys() {
            write!(f, "\n\t\t{},", name)?;
        }
        write!(f, "\n\t]")?;
        write!(f, "\n\tfilters: [")?;
        for filter in self.filters.borrow().keys() {
            write!(f, "\n\t\t{},", filter)?;
        }
        write!(f, "\n\t]")?;
        write!(f, "\n\tfunctions: [")?;
        for function in self.functions.borrow().keys() {
            write!(f, "\n\t\t{},", function)?;
        }
        write!(f, "\n\t]")?;
        write!(f, "\n}}")
    }
}
