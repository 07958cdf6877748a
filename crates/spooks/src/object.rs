//! Object spies
//!
//! Provides [`SpyObject`], an ordered set of named members, and [`object`],
//! the factory that fills one with a spy per archetype method.

use crate::archetype::{Archetype, Template};
use crate::error::{SpyError, SpyResult};
use crate::function::{Returns, Spy};
use crate::log::CallLog;
use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// An object whose methods are spies
///
/// Cloning a `SpyObject` yields another handle to the same object; equality
/// of [`Value::Object`] is identity of the underlying object.
#[derive(Clone, Default)]
pub struct SpyObject {
    inner: Arc<Mutex<IndexMap<String, Value>>>,
}

impl SpyObject {
    /// Create empty object
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Member stored under `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.inner.lock().get(name).cloned()
    }

    /// Store a member, returning the previous one
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.inner.lock().insert(name.into(), value.into())
    }

    /// Remove a member
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.inner.lock().shift_remove(name)
    }

    /// Check if a member exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().contains_key(name)
    }

    /// Spy stored under `name`, if that member is callable
    #[must_use]
    pub fn method(&self, name: &str) -> Option<Spy> {
        match self.inner.lock().get(name) {
            Some(Value::Function(spy)) => Some(spy.clone()),
            _ => None,
        }
    }

    /// Member names in insertion order
    #[must_use]
    pub fn member_names(&self) -> Vec<String> {
        self.inner.lock().keys().cloned().collect()
    }

    /// Copy of all members in insertion order
    #[must_use]
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.inner
            .lock()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Number of members
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the object has no members
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Call a method with this object as receiver
    ///
    /// # Errors
    /// [`SpyError::NotCallable`] if the member is missing or is not a spy.
    pub fn call<I>(&self, name: &str, args: I) -> SpyResult<Value>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        // Lock released before dispatch: a chained spy hands this object back.
        let spy = self
            .method(name)
            .ok_or_else(|| SpyError::NotCallable(name.to_string()))?;
        Ok(spy.call_on(Value::Object(self.clone()), args))
    }

    /// Check if both handles point at the same object
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &SpyObject) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for SpyObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("SpyObject");
        match self.inner.try_lock() {
            Some(members) => debug.field("members", &members.keys().collect::<Vec<_>>()),
            None => debug.field("members", &"<locked>"),
        };
        debug.finish()
    }
}

/// Per-method behavior shared by object and constructor spies
#[derive(Debug, Clone, Default)]
pub(crate) struct MethodBehavior {
    pub(crate) chains: IndexMap<String, bool>,
    pub(crate) results: IndexMap<String, Value>,
}

impl MethodBehavior {
    fn returns(&self, name: &str) -> Returns {
        if self.chains.get(name).copied().unwrap_or(false) {
            Returns::Receiver
        } else {
            Returns::Value(self.results.get(name).cloned().unwrap_or_default())
        }
    }

    /// Install a spy for every method of `template` onto `spook`
    pub(crate) fn install(&self, template: &Template, spook: SpyObject, log: &CallLog) -> SpyObject {
        for name in template.method_names() {
            let spy = Spy::build(name.to_string(), log.clone(), self.returns(name));
            spook.set(name, spy);
        }
        spook
    }
}

/// Options for [`object`]
#[derive(Debug, Clone, Default)]
pub struct ObjectOptions {
    archetype: Option<Template>,
    log: Option<CallLog>,
    spook: Option<SpyObject>,
    behavior: MethodBehavior,
}

impl ObjectOptions {
    /// Create options for an object shaped like `archetype`
    #[inline]
    #[must_use]
    pub fn new(archetype: impl Archetype) -> Self {
        Self::default().with_archetype(archetype)
    }

    /// With archetype
    #[inline]
    #[must_use]
    pub fn with_archetype(mut self, archetype: impl Archetype) -> Self {
        self.archetype = Some(archetype.template());
        self
    }

    /// With log to record into
    #[inline]
    #[must_use]
    pub fn with_log(mut self, log: &CallLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    /// With base object to install the spies on
    #[inline]
    #[must_use]
    pub fn with_spook(mut self, spook: &SpyObject) -> Self {
        self.spook = Some(spook.clone());
        self
    }

    /// With chaining for one method
    #[inline]
    #[must_use]
    pub fn with_chain(mut self, method: impl Into<String>, chain: bool) -> Self {
        self.behavior.chains.insert(method.into(), chain);
        self
    }

    /// With chaining for several methods
    #[must_use]
    pub fn with_chains<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.behavior
            .chains
            .extend(methods.into_iter().map(|m| (m.into(), true)));
        self
    }

    /// With result for one method
    #[inline]
    #[must_use]
    pub fn with_result(mut self, method: impl Into<String>, result: impl Into<Value>) -> Self {
        self.behavior.results.insert(method.into(), result.into());
        self
    }
}

/// Create an object spy
///
/// Every method of the archetype becomes a spy named after the method, on the
/// supplied spook or on a new object. Data fields are not copied. Supplying
/// the same spook twice replaces its spies; their log entries carry on.
///
/// # Errors
/// - [`SpyError::InvalidArchetype`] if no archetype was supplied
/// - [`SpyError::InvalidLog`] if no log was supplied
pub fn object(options: ObjectOptions) -> SpyResult<SpyObject> {
    let ObjectOptions {
        archetype,
        log,
        spook,
        behavior,
    } = options;

    let template = archetype.ok_or_else(|| SpyError::invalid_archetype("missing archetype"))?;
    let log = log.ok_or(SpyError::InvalidLog)?;

    let spook = behavior.install(&template, spook.unwrap_or_default(), &log);
    tracing::debug!("Created spy object with members {:?}", spook.member_names());
    Ok(spook)
}
