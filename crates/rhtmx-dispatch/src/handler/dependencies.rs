//! Factories for values handlers receive without the path supplying them

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use super::signature::DependencyKey;

type Factory = Arc<dyn Fn() -> Arc<dyn Any + Send + Sync> + Send + Sync>;

/// Map from dependency type to a zero-argument constructor
///
/// # Examples
///
/// ```
/// use rhtmx_dispatch::{DependencyKey, Dependencies};
///
/// #[derive(Default)]
/// struct Mailer { sent: usize }
///
/// let mut deps = Dependencies::new();
/// deps.register::<Mailer>();
///
/// let value = deps.construct(&DependencyKey::of::<Mailer>()).unwrap();
/// assert_eq!(value.downcast::<Mailer>().unwrap().sent, 0);
/// ```
#[derive(Clone, Default)]
pub struct Dependencies {
    factories: HashMap<TypeId, Factory>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T::default` as the constructor for `T`
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: Default + Send + Sync + 'static,
    {
        self.register_with(T::default)
    }

    /// Registers a custom constructor for `T`; replaces any earlier one
    pub fn register_with<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move || Arc::new(factory()) as Arc<dyn Any + Send + Sync>);
        self.factories.insert(TypeId::of::<T>(), factory);
        self
    }

    pub fn contains(&self, key: &DependencyKey) -> bool {
        self.factories.contains_key(&key.type_id())
    }

    /// Builds a fresh value for `key`, or `None` when no factory is registered
    pub fn construct(&self, key: &DependencyKey) -> Option<Arc<dyn Any + Send + Sync>> {
        self.factories.get(&key.type_id()).map(|factory| factory())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dependencies")
            .field("factories", &self.factories.len())
            .finish()
    }
}
