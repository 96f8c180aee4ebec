//! Declared parameter lists for handlers
//!
//! A [`Signature`] is the explicit stand-in for a handler's parameter list: names in
//! declaration order, optional default values, and optional dependency types that can be
//! constructed on demand.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use serde_json::Value;

/// Identifies a dependency type that binding may construct through a registered factory
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DependencyKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl DependencyKey {
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// One declared handler parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub default: Option<Value>,
    pub dependency: Option<DependencyKey>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            dependency: None,
        }
    }
}

/// Ordered parameter list of a handler
///
/// # Examples
///
/// ```
/// use rhtmx_dispatch::Signature;
/// use serde_json::json;
///
/// #[derive(Default)]
/// struct Mailer;
///
/// let signature = Signature::new()
///     .param("section")
///     .param_or("page", json!(1))
///     .inject::<Mailer>("mailer");
///
/// assert_eq!(signature.names(), vec!["section", "page", "mailer"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    params: Vec<Parameter>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a signature of plain parameters from their names
    pub fn of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            params: names.into_iter().map(Parameter::new).collect(),
        }
    }

    /// Adds a parameter filled only from the path
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Parameter::new(name));
        self
    }

    /// Adds a parameter that falls back to `default` when the path does not supply it
    pub fn param_or(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        let mut param = Parameter::new(name);
        param.default = Some(default.into());
        self.params.push(param);
        self
    }

    /// Adds a parameter whose value is constructed from the registered factory for `T`
    pub fn inject<T: Any>(mut self, name: impl Into<String>) -> Self {
        let mut param = Parameter::new(name);
        param.dependency = Some(DependencyKey::of::<T>());
        self.params.push(param);
        self
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
