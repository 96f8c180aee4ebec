//! # RHTMX Dispatch
//!
//! A named-route registry and dispatcher:
//! - Templates with placeholders (`/news/{section}/{id}`)
//! - Optional placeholders (`/posts/{section}/{page?}`)
//! - Per-parameter regex rules (`id -> [0-9]+`)
//! - Reverse URL generation from route names
//! - Handler invocation with arguments bound by parameter name
//!
//! ## Matching
//!
//! Routes are tried in registration order and the first route that accepts the method and
//! fully matches the path wins. There is no specificity ranking. Each template is compiled to
//! an anchored regex the first time it is needed and the compiled form is cached per route.
//!
//! ## Identity
//!
//! A route's identity is the md5 of its template plus its methods. Registering a second route
//! with the same identity replaces the first one in place.
//!
//! ## Example
//!
//! ```
//! use rhtmx_dispatch::{HandlerRegistry, Router, Signature};
//! use serde_json::json;
//!
//! #[derive(Default)]
//! struct NewsController;
//!
//! let mut router = Router::new();
//! router
//!     .get("/news/{section}/{id}", "NewsController@show")
//!     .unwrap()
//!     .rule("id", "[0-9]+")
//!     .name("news.show");
//!
//! let mut handlers = HandlerRegistry::new();
//! handlers
//!     .controller::<NewsController>("NewsController")
//!     .method("show", Signature::of(["id", "section"]), |_news, args| {
//!         Ok(json!({ "section": args.text("section")?, "id": args.text("id")? }))
//!     });
//!
//! let output = router.dispatch("/news/development/86", "GET", &handlers).unwrap();
//! assert_eq!(output, json!({ "section": "development", "id": "86" }));
//!
//! let url = router.url_for_params("news.show", &[("section", "it"), ("id", "16")]).unwrap();
//! assert_eq!(url, "/news/it/16");
//! ```

use std::collections::HashMap;

use serde_json::Value;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod error;
pub mod handler;
pub mod method;
pub mod route;

pub use config::{Config, RoutingConfig};
pub use error::{ErrorKind, RouteError};
pub use handler::{
    bind, Action, Argument, BoundArguments, Dependencies, DependencyKey, Handler,
    HandlerRegistry, Signature,
};
pub use route::compiler::PatternOptions;
pub use route::Route;

// ============================================================================
// Router
// ============================================================================

/// Ordered collection of routes keyed by identity
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
    index: HashMap<String, usize>,
    config: RoutingConfig,
}

impl Router {
    /// Creates an empty router with default routing settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty router whose constructors apply `config`
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_dispatch::{Router, RoutingConfig};
    ///
    /// let mut router = Router::with_config(RoutingConfig {
    ///     case_insensitive: false,
    ///     ..RoutingConfig::default()
    /// });
    /// router.get("/About", "about").unwrap();
    ///
    /// assert!(router.match_route("/About", "GET").is_ok());
    /// assert!(router.match_route("/about", "GET").is_err());
    /// ```
    pub fn with_config(config: RoutingConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Adds a route, replacing any route with the same identity
    ///
    /// The route keeps its own compile options; only the router's constructors apply the
    /// router's configuration.
    pub fn register(&mut self, route: Route) {
        self.insert(route);
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_route(mut self, route: Route) -> Self {
        self.register(route);
        self
    }

    fn insert(&mut self, route: Route) -> &mut Route {
        let position = match self.index.get(route.id()) {
            Some(&position) => {
                tracing::debug!(id = route.id(), template = route.template(), "route replaced");
                self.routes[position] = route;
                position
            }
            None => {
                tracing::debug!(
                    id = route.id(),
                    template = route.template(),
                    methods = ?route.methods(),
                    "route registered"
                );
                let position = self.routes.len();
                self.index.insert(route.id().to_string(), position);
                self.routes.push(route);
                position
            }
        };

        &mut self.routes[position]
    }

    fn build(&mut self, route: Route) -> &mut Route {
        let options = PatternOptions::from(&self.config);
        self.insert(route.with_options(options))
    }

    pub fn get(&mut self, template: &str, handler: impl Into<Handler>) -> Result<&mut Route, RouteError> {
        Ok(self.build(Route::get(template, handler)?))
    }

    pub fn post(&mut self, template: &str, handler: impl Into<Handler>) -> Result<&mut Route, RouteError> {
        Ok(self.build(Route::post(template, handler)?))
    }

    pub fn put(&mut self, template: &str, handler: impl Into<Handler>) -> Result<&mut Route, RouteError> {
        Ok(self.build(Route::put(template, handler)?))
    }

    pub fn delete(&mut self, template: &str, handler: impl Into<Handler>) -> Result<&mut Route, RouteError> {
        Ok(self.build(Route::delete(template, handler)?))
    }

    /// Registers a route for every method in the configured `any_methods` list
    pub fn any(&mut self, template: &str, handler: impl Into<Handler>) -> Result<&mut Route, RouteError> {
        let route = Route::new(&self.config.any_methods, template, handler)?;
        Ok(self.build(route))
    }

    /// Registers a route for an explicit set of methods
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_dispatch::Router;
    ///
    /// let mut router = Router::new();
    /// router.some(["get", "post"], "/contact", "contact").unwrap();
    ///
    /// assert!(router.match_route("/contact", "POST").is_ok());
    /// assert!(router.match_route("/contact", "PUT").is_err());
    /// ```
    pub fn some<I, S>(
        &mut self,
        methods: I,
        template: &str,
        handler: impl Into<Handler>,
    ) -> Result<&mut Route, RouteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.build(Route::some(methods, template, handler)?))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Finds the first route, in registration order, accepting `method` and matching `path`
    ///
    /// Routes are compiled as the scan reaches them. A route accepting `method` whose rules do
    /// not compile stops the scan with [`RouteError::InvalidPattern`], even if a later route
    /// would match.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_dispatch::Router;
    ///
    /// let mut router = Router::new();
    /// router.get("/news/{id}", "news").unwrap().rule("id", "[0-9]{3,6}");
    ///
    /// assert!(router.match_route("/news/865", "GET").is_ok());
    ///
    /// let err = router.match_route("/news/86", "GET").unwrap_err();
    /// assert!(err.is_not_matched());
    /// assert_eq!(err.request_path(), Some("/news/86"));
    /// ```
    pub fn match_route(&self, path: &str, method: &str) -> Result<&Route, RouteError> {
        for route in &self.routes {
            if route.is_available_method(method) && route.matches(path)? {
                return Ok(route);
            }
        }

        Err(RouteError::RequestNotMatched {
            path: path.to_string(),
            method: method.to_string(),
        })
    }

    /// First route registered under `name`
    pub fn route_by_name(&self, name: &str) -> Result<&Route, RouteError> {
        self.routes
            .iter()
            .find(|route| route.get_name() == Some(name))
            .ok_or_else(|| RouteError::RouteNotDefined(name.to_string()))
    }

    /// Generates the URL of the route called `name`
    pub fn url_for(&self, name: &str, params: &HashMap<String, String>) -> Result<String, RouteError> {
        self.route_by_name(name)?.generate_url(params)
    }

    /// Convenience method for generating URLs with an array of parameter tuples
    pub fn url_for_params(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        self.route_by_name(name)?.generate_url_with(params)
    }

    /// Matches `path` and `method`, then executes the route's handler
    pub fn dispatch(
        &self,
        path: &str,
        method: &str,
        registry: &HandlerRegistry,
    ) -> Result<Value, RouteError> {
        let route = self.match_route(path, method)?;
        tracing::debug!(path, method, route = route.template(), "request dispatched");
        route.execute(path, registry)
    }

    /// Registered routes, in registration order
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
