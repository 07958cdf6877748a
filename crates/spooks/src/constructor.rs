//! Constructor spies
//!
//! A constructor spy is a function spy whose result is a spy object built
//! from an [`ArchetypeSource`]. By default every invocation returns the same
//! object; [`InstanceMode::Fresh`] builds a new one per call.

use crate::archetype::ArchetypeSource;
use crate::config::InstanceMode;
use crate::error::{SpyError, SpyResult};
use crate::function::{Returns, Spy};
use crate::log::CallLog;
use crate::object::{MethodBehavior, SpyObject};
use crate::value::Value;

/// Options for [`constructor`]
#[derive(Debug, Clone, Default)]
pub struct ConstructorOptions {
    name: Option<String>,
    log: Option<CallLog>,
    archetype: Option<ArchetypeSource>,
    behavior: MethodBehavior,
    instances: InstanceMode,
}

impl ConstructorOptions {
    /// Create options for a constructor spy called `name`
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// With name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// With log to record into
    #[inline]
    #[must_use]
    pub fn with_log(mut self, log: &CallLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    /// With source of the instance shape
    #[inline]
    #[must_use]
    pub fn with_archetype(mut self, archetype: ArchetypeSource) -> Self {
        self.archetype = Some(archetype);
        self
    }

    /// With chaining for one instance method
    #[inline]
    #[must_use]
    pub fn with_chain(mut self, method: impl Into<String>, chain: bool) -> Self {
        self.behavior.chains.insert(method.into(), chain);
        self
    }

    /// With chaining for several instance methods
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

    /// With result for one instance method
    #[inline]
    #[must_use]
    pub fn with_result(mut self, method: impl Into<String>, result: impl Into<Value>) -> Self {
        self.behavior.results.insert(method.into(), result.into());
        self
    }

    /// With instance mode
    #[inline]
    #[must_use]
    pub fn with_instances(mut self, instances: InstanceMode) -> Self {
        self.instances = instances;
        self
    }
}

/// Create a constructor spy
///
/// The archetype is resolved once, here. Invocations are logged under the
/// constructor's name; instance method calls are logged under the method
/// names, in the same log.
///
/// # Errors
/// - [`SpyError::InvalidArchetype`] if no archetype was supplied or its
///   constructor declined
/// - [`SpyError::InvalidLog`] if no log was supplied
/// - [`SpyError::InvalidFunctionName`] if no name was supplied
pub fn constructor(options: ConstructorOptions) -> SpyResult<Spy> {
    let ConstructorOptions {
        name,
        log,
        archetype,
        behavior,
        instances,
    } = options;

    let template = archetype
        .ok_or_else(|| SpyError::invalid_archetype("missing archetype"))?
        .resolve()?;
    let log = log.ok_or(SpyError::InvalidLog)?;

    let returns = match instances {
        InstanceMode::Shared => {
            let instance = behavior.install(&template, SpyObject::new(), &log);
            Returns::Value(Value::Object(instance))
        }
        InstanceMode::Fresh => {
            for method in template.method_names() {
                log.ensure_entry(method);
            }
            let instance_log = log.clone();
            Returns::Produce(Box::new(move || {
                Value::Object(behavior.install(&template, SpyObject::new(), &instance_log))
            }))
        }
    };

    Spy::create(name, Some(log), returns)
}

impl Spy {
    /// Invoke as a constructor and return the spy object it hands back
    ///
    /// `None` if this spy does not produce objects.
    pub fn construct<I>(&self, args: I) -> Option<SpyObject>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        match self.call(args) {
            Value::Object(instance) => Some(instance),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::Template;
    use crate::args;

    fn widget() -> ArchetypeSource {
        ArchetypeSource::instance(Template::new().method("render").field("id", 7))
    }

    #[test]
    fn missing_archetype_fails() {
        let log = CallLog::new();
        let err = constructor(ConstructorOptions::new("Widget").with_log(&log)).unwrap_err();
        assert!(matches!(err, SpyError::InvalidArchetype(_)));
    }

    #[test]
    fn declining_factory_fails() {
        let log = CallLog::new();
        let err = constructor(
            ConstructorOptions::new("Widget")
                .with_log(&log)
                .with_archetype(ArchetypeSource::try_factory(|_| None)),
        )
        .unwrap_err();
        assert!(matches!(err, SpyError::InvalidArchetype(_)));
    }

    #[test]
    fn missing_log_fails() {
        let err = constructor(ConstructorOptions::new("Widget").with_archetype(widget())).unwrap_err();
        assert_eq!(err, SpyError::InvalidLog);
    }

    #[test]
    fn missing_name_fails() {
        let log = CallLog::new();
        let err = constructor(
            ConstructorOptions::default()
                .with_log(&log)
                .with_archetype(widget()),
        )
        .unwrap_err();
        assert!(matches!(err, SpyError::InvalidFunctionName(_)));
    }

    #[test]
    fn shared_instance_on_every_call() {
        let log = CallLog::new();
        let ctor = constructor(
            ConstructorOptions::new("Widget")
                .with_log(&log)
                .with_archetype(widget()),
        )
        .unwrap();

        let first = ctor.construct(args!["a"]).unwrap();
        let second = ctor.construct(args!["b"]).unwrap();

        assert!(first.ptr_eq(&second));
        assert!(first.method("render").is_some());
        assert!(!first.contains("id"));
        assert_eq!(log.count("Widget"), Some(2));
        assert_eq!(log.args("Widget").unwrap(), vec![args!["a"], args!["b"]]);
    }

    #[test]
    fn method_entries_exist_before_first_call() {
        for mode in [InstanceMode::Shared, InstanceMode::Fresh] {
            let log = CallLog::new();
            constructor(
                ConstructorOptions::new("Widget")
                    .with_log(&log)
                    .with_archetype(widget())
                    .with_instances(mode),
            )
            .unwrap();

            assert_eq!(log.count("Widget"), Some(0));
            assert_eq!(log.count("render"), Some(0));
        }
    }

    #[test]
    fn fresh_instance_per_call() {
        let log = CallLog::new();
        let ctor = constructor(
            ConstructorOptions::new("Widget")
                .with_log(&log)
                .with_archetype(widget())
                .with_instances(InstanceMode::Fresh),
        )
        .unwrap();

        let first = ctor.construct(args![]).unwrap();
        let second = ctor.construct(args![]).unwrap();
        assert!(!first.ptr_eq(&second));

        first.call("render", args![1]).unwrap();
        second.call("render", args![2]).unwrap();
        assert_eq!(log.args("render").unwrap(), vec![args![1], args![2]]);
        assert_eq!(
            log.these("render").unwrap(),
            vec![Value::from(first), Value::from(second)]
        );
    }

    #[test]
    fn instance_methods_follow_behavior() {
        let log = CallLog::new();
        let ctor = constructor(
            ConstructorOptions::new("Query")
                .with_log(&log)
                .with_archetype(ArchetypeSource::instance(["filter", "limit", "run"]))
                .with_chains(["filter", "limit"])
                .with_result("run", "rows"),
        )
        .unwrap();

        let query = ctor.construct(args![]).unwrap();
        let chained = query.call("filter", args!["x"]).unwrap();
        let chained = chained.as_object().unwrap().call("limit", args![10]).unwrap();

        assert_eq!(chained, Value::from(query.clone()));
        assert_eq!(query.call("run", args![]).unwrap(), "rows");
    }

    #[test]
    fn factory_archetype_is_resolved_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let log = CallLog::new();
        let ctor = constructor(
            ConstructorOptions::new("Widget")
                .with_log(&log)
                .with_archetype(ArchetypeSource::factory(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Template::new().method("render")
                }))
                .with_instances(InstanceMode::Fresh),
        )
        .unwrap();

        ctor.construct(args![]);
        ctor.construct(args![]);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn construct_on_plain_spy_is_none() {
        let log = CallLog::new();
        let spy = crate::function(crate::FunctionOptions::new("foo").with_log(&log)).unwrap();
        assert!(spy.construct(args![]).is_none());
    }
}
