//! Handler references and invocation
//!
//! A route points at its handler in one of three ways:
//! - `"Controller@method"`: a method on a registered controller, constructed per call
//! - `"function"`: a registered free function
//! - an [`Action`] value invoked directly
//!
//! Named references are resolved through a [`HandlerRegistry`]; arguments are bound by
//! parameter name via [`bind`].

pub mod arguments;
pub mod dependencies;
pub mod registry;
pub mod signature;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

pub use arguments::{bind, Argument, BoundArguments};
pub use dependencies::Dependencies;
pub use registry::{ControllerBuilder, HandlerRegistry};
pub use signature::{DependencyKey, Parameter, Signature};

use crate::error::RouteError;

type ActionFn = dyn Fn(BoundArguments) -> anyhow::Result<Value> + Send + Sync;

/// A directly invocable handler: a closure plus its declared parameters
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use rhtmx_dispatch::{Action, Dependencies, Signature};
/// use serde_json::json;
///
/// let action = Action::new(Signature::of(["id"]), |args| {
///     Ok(json!({ "id": args.text("id")? }))
/// });
///
/// let mut path_args = HashMap::new();
/// path_args.insert("id".to_string(), "42".to_string());
///
/// let output = action.invoke(&path_args, &Dependencies::new()).unwrap();
/// assert_eq!(output, json!({ "id": "42" }));
/// ```
#[derive(Clone)]
pub struct Action {
    signature: Signature,
    func: Arc<ActionFn>,
}

impl Action {
    pub fn new<F>(signature: Signature, func: F) -> Self
    where
        F: Fn(BoundArguments) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            signature,
            func: Arc::new(func),
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Calls the closure with already-bound arguments; gaps are rejected
    pub fn call(&self, args: BoundArguments) -> Result<Value, RouteError> {
        ensure_complete(&args)?;
        (self.func)(args).map_err(RouteError::Handler)
    }

    /// Binds `path_args` against the signature, then calls
    pub fn invoke(
        &self,
        path_args: &HashMap<String, String>,
        dependencies: &Dependencies,
    ) -> Result<Value, RouteError> {
        self.call(bind(&self.signature, path_args, dependencies))
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("signature", &self.signature.names())
            .finish()
    }
}

/// What a route invokes once it matches
#[derive(Debug, Clone)]
pub enum Handler {
    /// `"Controller@method"`
    Controller { controller: String, method: String },
    /// Bare function name
    Function(String),
    /// Directly invocable value
    Action(Action),
}

impl Handler {
    /// Parses a string reference: `"Controller@method"` or a bare function name
    ///
    /// Parsing never fails; malformed references are rejected when the route executes.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_dispatch::Handler;
    ///
    /// assert!(matches!(
    ///     Handler::parse("NewsController@show"),
    ///     Handler::Controller { ref controller, ref method }
    ///         if controller == "NewsController" && method == "show"
    /// ));
    /// assert!(matches!(Handler::parse("home"), Handler::Function(ref name) if name == "home"));
    /// ```
    pub fn parse(reference: &str) -> Self {
        match reference.split_once('@') {
            Some((controller, method)) => Handler::Controller {
                controller: controller.to_string(),
                method: method.to_string(),
            },
            None => Handler::Function(reference.to_string()),
        }
    }

    /// True when a named reference has the `Identifier@Identifier` or `Identifier` shape
    pub fn is_well_formed(&self) -> bool {
        match self {
            Handler::Controller { controller, method } => {
                is_identifier(controller) && is_identifier(method)
            }
            Handler::Function(name) => is_identifier(name),
            Handler::Action(_) => true,
        }
    }
}

impl From<&str> for Handler {
    fn from(reference: &str) -> Self {
        Handler::parse(reference)
    }
}

impl From<String> for Handler {
    fn from(reference: String) -> Self {
        Handler::parse(&reference)
    }
}

impl From<Action> for Handler {
    fn from(action: Action) -> Self {
        Handler::Action(action)
    }
}

/// Identifier characters, including `::` and `\` namespace separators
fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '\\'))
}

pub(crate) fn ensure_complete(args: &BoundArguments) -> Result<(), RouteError> {
    match args.first_gap() {
        Some((position, name)) => Err(RouteError::UnboundArgument {
            position,
            name: name.to_string(),
        }),
        None => Ok(()),
    }
}
