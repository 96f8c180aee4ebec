//! Route definitions
//!
//! A [`Route`] owns one template, the methods it accepts, per-parameter rules, an optional
//! name and the handler it dispatches to. The template is compiled into a regex the first
//! time the route is matched and the result is cached for the life of the route.

pub mod compiler;
pub mod pattern;

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::error::RouteError;
use crate::handler::{Handler, HandlerRegistry};
use crate::method::{contains_method, normalize_methods, ANY_METHODS};
use compiler::{compile, CompiledPattern, PatternOptions};
use pattern::{tokenize, TemplateSegment};

// ============================================================================
// Core Types
// ============================================================================

/// A single route: template, accepted methods, rules, name and handler
///
/// # Examples
///
/// ```
/// use rhtmx_dispatch::Route;
///
/// let route = Route::get("/news/{section}/{id}", "NewsController@show")
///     .unwrap()
///     .with_rule("id", "[0-9]+")
///     .with_name("news.show");
///
/// assert!(route.matches("/news/it/16").unwrap());
/// assert!(!route.matches("/news/it/latest").unwrap());
/// assert_eq!(route.get_name(), Some("news.show"));
/// ```
#[derive(Debug, Clone)]
pub struct Route {
    template: String,
    methods: Vec<String>,
    rules: HashMap<String, String>,
    name: Option<String>,
    id: String,
    handler: Handler,
    options: PatternOptions,
    compiled: OnceCell<CompiledPattern>,
}

/// Identity of a template + method combination: md5 hex of the template followed by the methods
fn route_id(template: &str, methods: &[String]) -> String {
    format!("{:x}", md5::compute(format!("{}{}", template, methods.concat())))
}

// ============================================================================
// Constructors
// ============================================================================

impl Route {
    /// Creates a route accepting `methods`
    ///
    /// Methods are trimmed and uppercased. Fails with [`RouteError::EmptyRoute`] when the
    /// template is empty or whitespace only.
    pub fn new<I, S>(methods: I, template: &str, handler: impl Into<Handler>) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if template.trim().is_empty() {
            return Err(RouteError::EmptyRoute);
        }

        let methods = normalize_methods(methods);
        let id = route_id(template, &methods);

        Ok(Self {
            template: template.to_string(),
            methods,
            rules: HashMap::new(),
            name: None,
            id,
            handler: handler.into(),
            options: PatternOptions::default(),
            compiled: OnceCell::new(),
        })
    }

    pub fn get(template: &str, handler: impl Into<Handler>) -> Result<Self, RouteError> {
        Self::new(["GET"], template, handler)
    }

    pub fn post(template: &str, handler: impl Into<Handler>) -> Result<Self, RouteError> {
        Self::new(["POST"], template, handler)
    }

    pub fn put(template: &str, handler: impl Into<Handler>) -> Result<Self, RouteError> {
        Self::new(["PUT"], template, handler)
    }

    pub fn delete(template: &str, handler: impl Into<Handler>) -> Result<Self, RouteError> {
        Self::new(["DELETE"], template, handler)
    }

    /// Creates a route accepting every standard method
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_dispatch::Route;
    ///
    /// let route = Route::any("/ping", "ping").unwrap();
    /// assert!(route.is_available_method("patch"));
    /// assert_eq!(route.methods().len(), 9);
    /// ```
    pub fn any(template: &str, handler: impl Into<Handler>) -> Result<Self, RouteError> {
        Self::new(ANY_METHODS, template, handler)
    }

    /// Creates a route accepting an explicit set of methods
    pub fn some<I, S>(methods: I, template: &str, handler: impl Into<Handler>) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(methods, template, handler)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Constrains a parameter with a regex fragment; later rules for the same name win
    ///
    /// Rules added after the pattern has been compiled are stored but do not change it.
    pub fn rule(&mut self, param: impl Into<String>, rule: impl Into<String>) -> &mut Self {
        self.rules.insert(param.into(), rule.into());
        self
    }

    /// Adds several rules at once
    pub fn rules<I, K, V>(&mut self, rules: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.rules
            .extend(rules.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Names the route for reverse lookup
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_rule(mut self, param: impl Into<String>, rule: impl Into<String>) -> Self {
        self.rule(param, rule);
        self
    }

    pub fn with_rules<I, K, V>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.rules(rules);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name(name);
        self
    }

    /// Sets compile options (case sensitivity, default rule)
    ///
    /// Has no effect once the pattern has been compiled.
    pub fn with_options(mut self, options: PatternOptions) -> Self {
        self.options = options;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// Registry key shared by every route with the same template and methods
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn declared_rules(&self) -> &HashMap<String, String> {
        &self.rules
    }

    /// Compiled pattern, built on first call and cached
    pub fn compiled(&self) -> Result<&CompiledPattern, RouteError> {
        self.compiled
            .get_or_try_init(|| compile(&self.template, &self.rules, &self.options))
    }

    /// Synthesized regex source, without anchors
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_dispatch::Route;
    ///
    /// let route = Route::get("/posts/{section}/{?page}", "posts")
    ///     .unwrap()
    ///     .with_rule("page", "[0-9]+");
    /// assert_eq!(route.pattern().unwrap(), r"/posts/(?P<section>\w+)/(?P<page>[0-9]+)?");
    /// ```
    pub fn pattern(&self) -> Result<&str, RouteError> {
        Ok(self.compiled()?.source())
    }

    /// Rule in effect for every placeholder, defaults filled in
    pub fn effective_rules(&self) -> Result<&HashMap<String, String>, RouteError> {
        Ok(self.compiled()?.rules())
    }

    // ========================================================================
    // Matching
    // ========================================================================

    /// True when the route accepts `method` (case-insensitive)
    pub fn is_available_method(&self, method: &str) -> bool {
        contains_method(&self.methods, method)
    }

    /// True when the whole of `path` matches the compiled pattern
    pub fn matches(&self, path: &str) -> Result<bool, RouteError> {
        Ok(self.compiled()?.is_match(path))
    }

    /// Named parameters captured from `path`
    ///
    /// Optional parameters absent from the path are left out. A path that does not match
    /// yields an empty map.
    pub fn extract_arguments(&self, path: &str) -> Result<HashMap<String, String>, RouteError> {
        Ok(self.compiled()?.captures(path))
    }

    // ========================================================================
    // URL Generation
    // ========================================================================

    /// Builds a URL by substituting `params` into the template
    ///
    /// Values are inserted verbatim. A missing required parameter is an error; a missing
    /// optional one becomes an empty string.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use rhtmx_dispatch::Route;
    ///
    /// let route = Route::get("/blog/{section}/{id}", "blog").unwrap();
    ///
    /// let mut params = HashMap::new();
    /// params.insert("section".to_string(), "it".to_string());
    /// params.insert("id".to_string(), "16".to_string());
    ///
    /// assert_eq!(route.generate_url(&params).unwrap(), "/blog/it/16");
    /// ```
    pub fn generate_url(&self, params: &HashMap<String, String>) -> Result<String, RouteError> {
        tokenize(&self.template)
            .into_iter()
            .try_fold(String::new(), |mut url, segment| {
                match segment {
                    TemplateSegment::Literal(text) => url.push_str(&text),
                    TemplateSegment::Placeholder { name, optional } => match params.get(&name) {
                        Some(value) => url.push_str(value),
                        None if optional => {}
                        None => return Err(RouteError::MissingParameter(name)),
                    },
                }
                Ok(url)
            })
    }

    /// [`generate_url`](Self::generate_url) from key/value pairs
    pub fn generate_url_with(&self, params: &[(&str, &str)]) -> Result<String, RouteError> {
        let params: HashMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.generate_url(&params)
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Extracts arguments from `path` and invokes the handler through `registry`
    pub fn execute(&self, path: &str, registry: &HandlerRegistry) -> Result<Value, RouteError> {
        let args = self.extract_arguments(path)?;
        tracing::debug!(route = %self.template, path, params = args.len(), "executing route handler");
        registry.invoke(&self.handler, &self.template, &args)
    }
}
