//! Binding path arguments to a handler's declared parameters

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::dependencies::Dependencies;
use super::signature::Signature;
use crate::error::RouteError;

/// A value bound to one handler parameter
#[derive(Clone)]
pub enum Argument {
    /// Text captured from the request path
    Path(String),
    /// The parameter's declared default
    Default(Value),
    /// A value built by the dependency factory for the parameter's type
    Dependency(Arc<dyn Any + Send + Sync>),
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Path(text) => f.debug_tuple("Path").field(text).finish(),
            Argument::Default(value) => f.debug_tuple("Default").field(value).finish(),
            Argument::Dependency(_) => f.write_str("Dependency(..)"),
        }
    }
}

/// Positional argument list produced by [`bind`]
///
/// Positions follow the signature's declaration order; a position nothing could fill is
/// kept as a gap (`None`) so later positions stay aligned.
#[derive(Debug, Clone, Default)]
pub struct BoundArguments {
    names: Vec<String>,
    values: Vec<Option<Argument>>,
}

impl BoundArguments {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when every position is filled
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    /// First unfilled position, if any
    pub fn first_gap(&self) -> Option<(usize, &str)> {
        self.values
            .iter()
            .position(Option::is_none)
            .map(|position| (position, self.names[position].as_str()))
    }

    /// Argument at `position`, `None` for gaps and out-of-range positions
    pub fn get(&self, position: usize) -> Option<&Argument> {
        self.values.get(position).and_then(Option::as_ref)
    }

    /// Argument bound to the parameter called `name`
    pub fn named(&self, name: &str) -> Option<&Argument> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|position| self.get(position))
    }

    /// Text of a path argument or of a string default
    pub fn text(&self, name: &str) -> Result<&str, RouteError> {
        match self.require(name)? {
            Argument::Path(text) => Ok(text.as_str()),
            Argument::Default(Value::String(text)) => Ok(text.as_str()),
            _ => Err(RouteError::ArgumentType {
                name: name.to_string(),
                expected: "string",
            }),
        }
    }

    /// JSON view of a path argument (always a string) or of a default
    pub fn value(&self, name: &str) -> Result<Value, RouteError> {
        match self.require(name)? {
            Argument::Path(text) => Ok(Value::String(text.clone())),
            Argument::Default(value) => Ok(value.clone()),
            Argument::Dependency(_) => Err(RouteError::ArgumentType {
                name: name.to_string(),
                expected: "value",
            }),
        }
    }

    /// Dependency bound to `name`, downcast to `T`
    pub fn dependency<T>(&self, name: &str) -> Result<Arc<T>, RouteError>
    where
        T: Any + Send + Sync,
    {
        let type_error = || RouteError::ArgumentType {
            name: name.to_string(),
            expected: std::any::type_name::<T>(),
        };

        match self.require(name)? {
            Argument::Dependency(value) => value.clone().downcast::<T>().map_err(|_| type_error()),
            _ => Err(type_error()),
        }
    }

    /// Consumes the list, yielding positions in declaration order
    pub fn into_values(self) -> Vec<Option<Argument>> {
        self.values
    }

    fn require(&self, name: &str) -> Result<&Argument, RouteError> {
        let position = self.names.iter().position(|n| n == name).ok_or_else(|| {
            RouteError::UnboundArgument {
                position: self.names.len(),
                name: name.to_string(),
            }
        })?;

        self.get(position).ok_or_else(|| RouteError::UnboundArgument {
            position,
            name: name.to_string(),
        })
    }
}

/// Resolves the argument for every declared parameter, by name
///
/// For each parameter in declaration order:
/// 1. a path argument of the same name,
/// 2. else a fresh value from the factory registered for the parameter's dependency type,
/// 3. else the declared default,
/// 4. else a gap.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use rhtmx_dispatch::{bind, Dependencies, Signature};
///
/// let mut path_args = HashMap::new();
/// path_args.insert("section".to_string(), "development".to_string());
/// path_args.insert("id".to_string(), "86".to_string());
///
/// // Declared in the opposite order from the template
/// let signature = Signature::of(["id", "section"]);
/// let args = bind(&signature, &path_args, &Dependencies::new());
///
/// assert_eq!(args.text("id").unwrap(), "86");
/// assert_eq!(args.text("section").unwrap(), "development");
/// ```
pub fn bind(
    signature: &Signature,
    path_args: &HashMap<String, String>,
    dependencies: &Dependencies,
) -> BoundArguments {
    let (names, values): (Vec<String>, Vec<Option<Argument>>) = signature
        .params()
        .iter()
        .map(|param| {
            let value = path_args
                .get(&param.name)
                .map(|text| Argument::Path(text.clone()))
                .or_else(|| {
                    param
                        .dependency
                        .as_ref()
                        .and_then(|key| dependencies.construct(key))
                        .map(Argument::Dependency)
                })
                .or_else(|| param.default.clone().map(Argument::Default));
            (param.name.clone(), value)
        })
        .unzip();

    BoundArguments { names, values }
}
