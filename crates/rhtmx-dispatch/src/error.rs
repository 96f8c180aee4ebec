//! Error types for route registration, matching and dispatch
//!
//! Every failure is returned to the caller as a typed [`RouteError`]. Callers that
//! only care about the broad category (bad input vs. "no route for this request")
//! can branch on [`RouteError::kind`].

use thiserror::Error;

/// Broad classification of a [`RouteError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input: empty template, missing parameter, unknown handler, undefined name...
    InvalidArgument,
    /// No registered route accepts the requested path and method
    RequestNotMatched,
    /// The handler itself returned an error
    Handler,
}

/// Errors produced by routes, the router and handler dispatch
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("The route can't be empty")]
    EmptyRoute,

    #[error("Missing required parameter [{0}]")]
    MissingParameter(String),

    #[error("Route [{0}] not defined")]
    RouteNotDefined(String),

    #[error("Controller [{0}] not found")]
    ControllerNotFound(String),

    #[error("Method [{method}] in controller [{controller}] not found")]
    MethodNotFound { controller: String, method: String },

    #[error("Function [{0}] not found")]
    FunctionNotFound(String),

    #[error("Action for route [{0}] is not valid")]
    InvalidAction(String),

    #[error("Invalid pattern for route [{template}]: {source}")]
    InvalidPattern {
        template: String,
        #[source]
        source: regex::Error,
    },

    #[error("Argument [{name}] at position {position} is not bound")]
    UnboundArgument { position: usize, name: String },

    #[error("Argument [{name}] is not a {expected}")]
    ArgumentType { name: String, expected: &'static str },

    #[error("Request not matched: {method} {path}")]
    RequestNotMatched { path: String, method: String },

    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

impl RouteError {
    /// Returns the broad category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouteError::RequestNotMatched { .. } => ErrorKind::RequestNotMatched,
            RouteError::Handler(_) => ErrorKind::Handler,
            _ => ErrorKind::InvalidArgument,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    pub fn is_not_matched(&self) -> bool {
        self.kind() == ErrorKind::RequestNotMatched
    }

    /// The request path carried by a `RequestNotMatched` error
    pub fn request_path(&self) -> Option<&str> {
        match self {
            RouteError::RequestNotMatched { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The request method carried by a `RequestNotMatched` error
    pub fn request_method(&self) -> Option<&str> {
        match self {
            RouteError::RequestNotMatched { method, .. } => Some(method),
            _ => None,
        }
    }
}
