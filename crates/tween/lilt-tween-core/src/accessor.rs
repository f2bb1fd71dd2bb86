//! Member accessors: typed read/write handles resolved from a property path.
//!
//! Resolution happens once, when a tween is built. The default resolver probes
//! the target's `get_property` to learn the declared value kind; a
//! [`ResolverRegistry`] layers named custom accessors on top of it.

use hashbrown::HashMap;
use lilt_api_core::{PropertyPath, Value, ValueKind};
use log::debug;
use std::rc::Rc;

use crate::error::TweenError;
use crate::target::Tweenable;

pub trait MemberAccessor {
    /// Path text used in errors and logs.
    fn describe(&self) -> String;
    /// Declared kind of the member; tween endpoints are coerced into it.
    fn kind(&self) -> ValueKind;
    fn get(&self, target: &dyn Tweenable) -> Result<Value, TweenError>;
    fn set(&self, target: &dyn Tweenable, value: Value) -> Result<(), TweenError>;
}

pub trait AccessorResolver {
    fn resolve(
        &self,
        target: &dyn Tweenable,
        path: &PropertyPath,
    ) -> Result<Rc<dyn MemberAccessor>, TweenError>;
}

/// Accessor backed directly by `Tweenable::get_property`/`set_property`.
#[derive(Debug, Clone)]
pub struct PropertyAccessor {
    path: PropertyPath,
    kind: ValueKind,
}

impl PropertyAccessor {
    pub fn new(path: PropertyPath, kind: ValueKind) -> Self {
        Self { path, kind }
    }
}

impl MemberAccessor for PropertyAccessor {
    fn describe(&self) -> String {
        self.path.to_string()
    }

    fn kind(&self) -> ValueKind {
        self.kind
    }

    fn get(&self, target: &dyn Tweenable) -> Result<Value, TweenError> {
        match target.get_property(&self.path) {
            Some(v) if v.kind() == self.kind => Ok(v),
            Some(v) => Err(TweenError::TypeMismatch {
                path: self.describe(),
                expected: self.kind,
                actual: v.kind(),
            }),
            None => Err(TweenError::Apply {
                path: self.describe(),
                reason: "property disappeared".to_string(),
            }),
        }
    }

    fn set(&self, target: &dyn Tweenable, value: Value) -> Result<(), TweenError> {
        if target.set_property(&self.path, value) {
            Ok(())
        } else {
            Err(TweenError::Apply {
                path: self.describe(),
                reason: "target rejected the value".to_string(),
            })
        }
    }
}

/// Default resolver.
#[derive(Debug, Default, Clone, Copy)]
pub struct PropertyResolver;

impl AccessorResolver for PropertyResolver {
    fn resolve(
        &self,
        target: &dyn Tweenable,
        path: &PropertyPath,
    ) -> Result<Rc<dyn MemberAccessor>, TweenError> {
        let current = target
            .get_property(path)
            .ok_or_else(|| TweenError::UnresolvedProperty {
                path: path.to_string(),
            })?;
        Ok(Rc::new(PropertyAccessor::new(path.clone(), current.kind())))
    }
}

type AccessorFactory = Box<dyn Fn(&dyn Tweenable, &PropertyPath) -> Option<Rc<dyn MemberAccessor>>>;

/// Named custom accessors, consulted before a fallback resolver.
///
/// Factories are keyed by the path's root member; a factory returning None
/// defers to the fallback.
pub struct ResolverRegistry {
    custom: HashMap<String, AccessorFactory>,
    fallback: Box<dyn AccessorResolver>,
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::with_fallback(PropertyResolver)
    }

    pub fn with_fallback(fallback: impl AccessorResolver + 'static) -> Self {
        Self {
            custom: HashMap::new(),
            fallback: Box::new(fallback),
        }
    }

    pub fn register<F>(&mut self, member: impl Into<String>, factory: F)
    where
        F: Fn(&dyn Tweenable, &PropertyPath) -> Option<Rc<dyn MemberAccessor>> + 'static,
    {
        let member = member.into();
        if self.custom.insert(member.clone(), Box::new(factory)).is_some() {
            debug!("resolver: replaced custom accessor for '{member}'");
        }
    }

    pub fn is_registered(&self, member: &str) -> bool {
        self.custom.contains_key(member)
    }
}

impl AccessorResolver for ResolverRegistry {
    fn resolve(
        &self,
        target: &dyn Tweenable,
        path: &PropertyPath,
    ) -> Result<Rc<dyn MemberAccessor>, TweenError> {
        if let Some(factory) = self.custom.get(path.root()) {
            if let Some(accessor) = factory(target, path) {
                return Ok(accessor);
            }
        }
        self.fallback.resolve(target, path)
    }
}
