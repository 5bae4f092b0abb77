use crate::{
    compile::{Parser, Template},
    helper::Helper,
    loader::{Loader, StringLoader},
    log::{Error, ErrorKind, INVALID_HELPER},
    render::{each, if_, unless, with, Renderer},
    Cache, Context, Store,
};
use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
};

/// Compiles and renders templates.
///
/// An [`Engine`] owns the registered helpers, the loaders that resolve
/// template and partial names to source text, and an optional compilation
/// cache. It is the intended entry point for most use:
///
/// ```
/// use vellum::{Engine, Store};
///
/// let engine = Engine::default();
/// let store = Store::new().with_must("name", "taylor");
///
/// let result = engine.render("hello, {{name}}!", &store);
/// assert_eq!(result.unwrap(), "hello, taylor!");
/// ```
///
/// The default [`Engine`] resolves template names with a
/// [`StringLoader`], meaning `render` accepts template text directly.
/// Swap in a [`FilesystemLoader`][`crate::FilesystemLoader`] to render by
/// file name instead.
pub struct Engine {
    /// Registered helpers by name.
    helpers: HashMap<String, Box<dyn Helper>>,
    /// Resolves the names given to `render`.
    loader: Box<dyn Loader>,
    /// Resolves `{{>name}}` inclusions, falling back to `loader` when
    /// unset.
    partials_loader: Option<Box<dyn Loader>>,
    /// Stores compiled templates between renders.
    cache: Option<Box<dyn Cache>>,
    /// When true, unresolvable variables abort the render.
    strict: bool,
}

impl Default for Engine {
    fn default() -> Self {
        let mut engine = Self {
            helpers: HashMap::new(),
            loader: Box::new(StringLoader),
            partials_loader: None,
            cache: None,
            strict: false,
        };
        engine.add_helper_must("if", if_);
        engine.add_helper_must("unless", unless);
        engine.add_helper_must("with", with);
        engine.add_helper_must("each", each);

        engine
    }
}

impl Engine {
    /// Create a new [`Engine`] with the built-in block helpers registered.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a [`Helper`] with the given name.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a helper with that name is already
    /// registered.
    pub fn add_helper<S, H>(&mut self, name: S, helper: H) -> Result<(), Error>
    where
        S: Into<String>,
        H: Helper + 'static,
    {
        let name = name.into();
        if self.helpers.contains_key(&name) {
            return Err(Error::build(ErrorKind::Configuration, INVALID_HELPER)
                .with_help(format!("a helper named `{name}` is already registered")));
        }
        self.helpers.insert(name, Box::new(helper));

        Ok(())
    }

    /// Register a [`Helper`] with the given name.
    ///
    /// # Panics
    ///
    /// Panics when a helper with that name is already registered.
    #[inline]
    pub fn add_helper_must<S, H>(&mut self, name: S, helper: H)
    where
        S: Into<String>,
        H: Helper + 'static,
    {
        self.add_helper(name, helper).unwrap();
    }

    /// Register a [`Helper`] with the given name, and return the [`Engine`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a helper with that name is already
    /// registered.
    #[inline]
    pub fn with_helper<S, H>(mut self, name: S, helper: H) -> Result<Self, Error>
    where
        S: Into<String>,
        H: Helper + 'static,
    {
        self.add_helper(name, helper)?;

        Ok(self)
    }

    /// Register a [`Helper`] with the given name, and return the [`Engine`].
    ///
    /// # Panics
    ///
    /// Panics when a helper with that name is already registered.
    #[inline]
    pub fn with_helper_must<S, H>(mut self, name: S, helper: H) -> Self
    where
        S: Into<String>,
        H: Helper + 'static,
    {
        self.add_helper_must(name, helper);
        self
    }

    /// Return the [`Helper`] with the given name, if it exists.
    #[inline]
    pub fn get_helper(&self, name: &str) -> Option<&dyn Helper> {
        self.helpers.get(name).map(Box::as_ref)
    }

    /// Return true when a [`Helper`] with the given name is registered.
    #[inline]
    pub fn has_helper(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    /// Unregister the [`Helper`] with the given name.
    #[inline]
    pub fn remove_helper(&mut self, name: &str) {
        self.helpers.remove(name);
    }

    /// Set the [`Loader`] used to resolve the names given to `render`.
    #[inline]
    pub fn set_loader<L: Loader + 'static>(&mut self, loader: L) {
        self.loader = Box::new(loader);
    }

    /// Set the [`Loader`] used to resolve the names given to `render`, and
    /// return the [`Engine`].
    #[inline]
    pub fn with_loader<L: Loader + 'static>(mut self, loader: L) -> Self {
        self.set_loader(loader);
        self
    }

    /// Set the [`Loader`] used to resolve `{{>name}}` inclusions.
    ///
    /// Partials fall back to the main loader when no partials loader is
    /// set.
    #[inline]
    pub fn set_partials_loader<L: Loader + 'static>(&mut self, loader: L) {
        self.partials_loader = Some(Box::new(loader));
    }

    /// Set the [`Loader`] used to resolve `{{>name}}` inclusions, and
    /// return the [`Engine`].
    #[inline]
    pub fn with_partials_loader<L: Loader + 'static>(mut self, loader: L) -> Self {
        self.set_partials_loader(loader);
        self
    }

    /// Set the [`Cache`] used to store compiled templates.
    #[inline]
    pub fn set_cache<C: Cache + 'static>(&mut self, cache: C) {
        self.cache = Some(Box::new(cache));
    }

    /// Set the [`Cache`] used to store compiled templates, and return the
    /// [`Engine`].
    #[inline]
    pub fn with_cache<C: Cache + 'static>(mut self, cache: C) -> Self {
        self.set_cache(cache);
        self
    }

    /// Enable or disable strict rendering.
    ///
    /// In strict mode, a variable that cannot be resolved aborts the render
    /// instead of producing empty output.
    #[inline]
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Enable or disable strict rendering, and return the [`Engine`].
    #[inline]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.set_strict(strict);
        self
    }

    /// Return true when strict rendering is enabled.
    #[inline]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Compile the given text into a [`Template`].
    ///
    /// When a [`Cache`] is set, the compiled template is stored under a key
    /// derived from the text, and later compilations of the same text skip
    /// parsing entirely.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the text is not a valid template.
    #[inline]
    pub fn compile(&self, text: &str) -> Result<Template, Error> {
        self.compile_named(text, None)
    }

    pub(crate) fn compile_named(&self, text: &str, name: Option<&str>) -> Result<Template, Error> {
        let cache = match &self.cache {
            Some(cache) => cache,
            None => return Parser::new(text).compile(name),
        };

        let key = artifact_key(text);
        if let Some(artifact) = cache.get(&key) {
            // A stale or corrupt artifact is a miss, not an error.
            if let Ok(template) = serde_json::from_str::<Template>(&artifact) {
                return Ok(template);
            }
        }

        let template = Parser::new(text).compile(name)?;
        if let Ok(artifact) = serde_json::to_string(&template) {
            cache.set(&key, artifact);
        }

        Ok(template)
    }

    /// Render the template with the given name against the given [`Store`].
    ///
    /// The name is resolved through the configured [`Loader`], so with the
    /// default [`StringLoader`] the name is the template text itself.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the template cannot be loaded or compiled,
    /// or when rendering fails.
    pub fn render(&self, name: &str, store: &Store) -> Result<String, Error> {
        let text = self.loader.load(name)?;
        let template = self.compile_named(&text, None)?;
        let mut context = Context::new(store.to_value());

        Renderer::new(self, &template).render(&mut context)
    }

    /// Render an already compiled [`Template`] against the given [`Store`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when rendering fails.
    pub fn render_template(&self, template: &Template, store: &Store) -> Result<String, Error> {
        let mut context = Context::new(store.to_value());

        Renderer::new(self, template).render(&mut context)
    }

    /// Load the source text of the partial with the given name.
    pub(crate) fn load_partial(&self, name: &str) -> Result<String, Error> {
        match &self.partials_loader {
            Some(loader) => loader.load(name),
            None => self.loader.load(name),
        }
    }
}

/// Derive a cache key from template source text.
fn artifact_key(text: &str) -> String {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    text.hash(&mut hasher);

    format!("{:016x}", hasher.finish())
}
