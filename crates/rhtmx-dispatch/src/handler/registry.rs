//! Registry resolving named handler references
//!
//! Stands in for symbol lookup: controllers and functions are registered by the name a
//! route's `"Controller@method"` / `"function"` reference uses.

use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::anyhow;
use serde_json::Value;

use super::arguments::{bind, BoundArguments};
use super::dependencies::Dependencies;
use super::signature::Signature;
use super::{ensure_complete, Action, Handler};
use crate::error::RouteError;

type Constructor = Arc<dyn Fn() -> Box<dyn Any> + Send + Sync>;
type MethodFn = Arc<dyn Fn(&dyn Any, BoundArguments) -> anyhow::Result<Value> + Send + Sync>;

#[derive(Clone)]
struct ControllerMethod {
    signature: Signature,
    func: MethodFn,
}

#[derive(Clone)]
struct Controller {
    construct: Constructor,
    methods: HashMap<String, ControllerMethod>,
}

/// Controllers, functions and dependency factories available to routes
///
/// # Examples
///
/// ```
/// use rhtmx_dispatch::{HandlerRegistry, Signature};
/// use serde_json::json;
///
/// #[derive(Default)]
/// struct NewsController;
///
/// let mut handlers = HandlerRegistry::new();
/// handlers
///     .controller::<NewsController>("NewsController")
///     .method("show", Signature::of(["id"]), |_news, args| {
///         Ok(json!({ "id": args.text("id")? }))
///     });
///
/// assert!(handlers.has_controller("NewsController"));
/// ```
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    functions: HashMap<String, Action>,
    controllers: HashMap<String, Controller>,
    dependencies: Dependencies,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Registers a free function under `name`; replaces any earlier one
    pub fn function<F>(&mut self, name: impl Into<String>, signature: Signature, func: F) -> &mut Self
    where
        F: Fn(BoundArguments) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Action::new(signature, func));
        self
    }

    /// Registers a controller constructed with `T::default()` for every call
    pub fn controller<T>(&mut self, name: impl Into<String>) -> ControllerBuilder<'_, T>
    where
        T: Default + 'static,
    {
        self.controller_with(name, T::default)
    }

    /// Registers a controller with a custom zero-argument constructor
    pub fn controller_with<T, F>(&mut self, name: impl Into<String>, construct: F) -> ControllerBuilder<'_, T>
    where
        T: 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let construct: Constructor = Arc::new(move || Box::new(construct()) as Box<dyn Any>);
        let entry = self
            .controllers
            .entry(name.into())
            .and_modify(|existing| existing.construct = construct.clone())
            .or_insert_with(|| Controller {
                construct,
                methods: HashMap::new(),
            });

        ControllerBuilder {
            entry,
            marker: PhantomData,
        }
    }

    /// Registers `T::default` as the factory for injected `T` parameters
    pub fn dependency<T>(&mut self) -> &mut Self
    where
        T: Default + Send + Sync + 'static,
    {
        self.dependencies.register::<T>();
        self
    }

    /// Registers a custom factory for injected `T` parameters
    pub fn dependency_with<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.dependencies.register_with(factory);
        self
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn has_controller(&self, name: &str) -> bool {
        self.controllers.contains_key(name)
    }

    // ========================================================================
    // Invocation
    // ========================================================================

    /// Invokes `handler` for a route defined by `template` with the extracted path arguments
    pub fn invoke(
        &self,
        handler: &Handler,
        template: &str,
        path_args: &HashMap<String, String>,
    ) -> Result<Value, RouteError> {
        if !handler.is_well_formed() {
            return Err(RouteError::InvalidAction(template.to_string()));
        }

        match handler {
            Handler::Controller { controller, method } => {
                self.call_method(controller, method, path_args)
            }
            Handler::Function(name) => self.call_function(name, path_args),
            Handler::Action(action) => action.invoke(path_args, &self.dependencies),
        }
    }

    /// Resolves and calls a registered function
    pub fn call_function(
        &self,
        name: &str,
        path_args: &HashMap<String, String>,
    ) -> Result<Value, RouteError> {
        let action = self
            .functions
            .get(name)
            .ok_or_else(|| RouteError::FunctionNotFound(name.to_string()))?;

        action.invoke(path_args, &self.dependencies)
    }

    /// Constructs a fresh controller instance and calls `method` on it
    pub fn call_method(
        &self,
        controller: &str,
        method: &str,
        path_args: &HashMap<String, String>,
    ) -> Result<Value, RouteError> {
        let entry = self
            .controllers
            .get(controller)
            .ok_or_else(|| RouteError::ControllerNotFound(controller.to_string()))?;

        let instance = (entry.construct)();

        let target = entry
            .methods
            .get(method)
            .ok_or_else(|| RouteError::MethodNotFound {
                controller: controller.to_string(),
                method: method.to_string(),
            })?;

        let args = bind(&target.signature, path_args, &self.dependencies);
        ensure_complete(&args)?;

        (target.func)(&*instance, args).map_err(RouteError::Handler)
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("controllers", &self.controllers.keys().collect::<Vec<_>>())
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

/// Adds methods to a registered controller
pub struct ControllerBuilder<'a, T> {
    entry: &'a mut Controller,
    marker: PhantomData<fn() -> T>,
}

impl<'a, T: 'static> ControllerBuilder<'a, T> {
    /// Registers `name` as a method taking the controller instance and bound arguments
    pub fn method<F>(self, name: impl Into<String>, signature: Signature, func: F) -> Self
    where
        F: Fn(&T, BoundArguments) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        let func: MethodFn = Arc::new(move |instance: &dyn Any, args: BoundArguments| {
            let target = instance
                .downcast_ref::<T>()
                .ok_or_else(|| anyhow!("controller instance is not a {}", std::any::type_name::<T>()))?;
            func(target, args)
        });

        self.entry
            .methods
            .insert(name.into(), ControllerMethod { signature, func });
        self
    }
}
