//! Function spies
//!
//! Provides [`Spy`], a callable that records every invocation into a
//! [`CallLog`], and [`function`], the factory that creates one.

use crate::error::{SpyError, SpyResult};
use crate::log::CallLog;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Options for [`function`]
#[derive(Debug, Clone, Default)]
pub struct FunctionOptions {
    name: Option<String>,
    log: Option<CallLog>,
    chain: bool,
    result: Value,
}

impl FunctionOptions {
    /// Create options for a spy called `name`
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

    /// With chaining: the spy returns its receiver
    #[inline]
    #[must_use]
    pub fn with_chain(mut self, chain: bool) -> Self {
        self.chain = chain;
        self
    }

    /// With result returned from every call
    #[inline]
    #[must_use]
    pub fn with_result(mut self, result: impl Into<Value>) -> Self {
        self.result = result.into();
        self
    }
}

/// What a spy hands back once a call is recorded
pub(crate) enum Returns {
    /// The call-time receiver
    Receiver,

    /// A fixed value
    Value(Value),

    /// A value computed per call
    Produce(Box<dyn Fn() -> Value + Send + Sync>),
}

impl fmt::Debug for Returns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Receiver => f.write_str("Receiver"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Produce(_) => f.write_str("Produce(..)"),
        }
    }
}

#[derive(Debug)]
struct SpyInner {
    name: String,
    log: CallLog,
    returns: Returns,
}

/// A callable that records its invocations
///
/// Cloning a `Spy` yields another handle to the same spy. Calls never fail,
/// whatever the number or type of arguments.
#[derive(Clone)]
pub struct Spy {
    inner: Arc<SpyInner>,
}

impl Spy {
    pub(crate) fn create(
        name: Option<String>,
        log: Option<CallLog>,
        returns: Returns,
    ) -> SpyResult<Self> {
        let name = name.ok_or_else(|| SpyError::InvalidFunctionName(String::new()))?;
        let log = log.ok_or(SpyError::InvalidLog)?;
        Ok(Self::build(name, log, returns))
    }

    /// Create from already validated parts
    pub(crate) fn build(name: String, log: CallLog, returns: Returns) -> Self {
        log.ensure_entry(&name);
        tracing::debug!("Created spy '{}' ({:?})", name, returns);

        Self {
            inner: Arc::new(SpyInner { name, log, returns }),
        }
    }

    /// Name the spy records under
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Log the spy records into
    #[inline]
    #[must_use]
    pub fn log(&self) -> &CallLog {
        &self.inner.log
    }

    /// Returns true if the spy hands back its receiver
    #[inline]
    #[must_use]
    pub fn is_chained(&self) -> bool {
        matches!(self.inner.returns, Returns::Receiver)
    }

    /// Invoke without a receiver
    pub fn call<I>(&self, args: I) -> Value
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.call_on(Value::Undefined, args)
    }

    /// Invoke with an explicit receiver
    ///
    /// The receiver is recorded in `these[name]` and is what a chained spy
    /// returns.
    pub fn call_on<I>(&self, receiver: Value, args: I) -> Value
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let args: Vec<Value> = args.into_iter().map(Into::into).collect();
        let count = self.inner.log.record(&self.inner.name, &receiver, args);
        tracing::trace!("Spy '{}' called ({} so far)", self.inner.name, count);

        match &self.inner.returns {
            Returns::Receiver => receiver,
            Returns::Value(value) => value.clone(),
            Returns::Produce(produce) => produce(),
        }
    }

    /// Check if both handles point at the same spy
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Spy) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Spy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spy")
            .field("name", &self.inner.name)
            .field("returns", &self.inner.returns)
            .finish()
    }
}

/// Create a function spy
///
/// Ensures `log` has an entry for the spy's name, then returns a spy that
/// appends each call's arguments and receiver to it.
///
/// # Errors
/// - [`SpyError::InvalidFunctionName`] if no name was supplied
/// - [`SpyError::InvalidLog`] if no log was supplied
pub fn function(options: FunctionOptions) -> SpyResult<Spy> {
    let FunctionOptions {
        name,
        log,
        chain,
        result,
    } = options;

    let returns = if chain {
        Returns::Receiver
    } else {
        Returns::Value(result)
    };
    Spy::create(name, log, returns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::object::SpyObject;

    fn spy(options: FunctionOptions, log: &CallLog) -> Spy {
        function(options.with_log(log)).unwrap()
    }

    #[test]
    fn missing_name_fails() {
        let log = CallLog::new();
        let err = function(FunctionOptions::default().with_log(&log)).unwrap_err();
        assert_eq!(err, SpyError::InvalidFunctionName(String::new()));
        assert!(log.names().is_empty());
    }

    #[test]
    fn empty_name_is_a_valid_name() {
        let log = CallLog::new();
        let spy = function(FunctionOptions::new("").with_log(&log)).unwrap();
        spy.call(["x"]);

        assert_eq!(spy.name(), "");
        assert_eq!(log.count(""), Some(1));
        assert_eq!(log.args("").unwrap(), vec![args!["x"]]);
    }

    #[test]
    fn missing_log_fails() {
        let err = function(FunctionOptions::new("foo")).unwrap_err();
        assert_eq!(err, SpyError::InvalidLog);
    }

    #[test]
    fn creation_initializes_entry() {
        let log = CallLog::new();
        let _spy = spy(FunctionOptions::new("foo"), &log);

        assert_eq!(log.count("foo"), Some(0));
        assert_eq!(log.args("foo"), Some(vec![]));
    }

    #[test]
    fn records_each_call() {
        let log = CallLog::new();
        let foo = spy(FunctionOptions::new("foo"), &log);

        foo.call(["a", "b"]);
        foo.call(["c"]);

        assert_eq!(log.count("foo"), Some(2));
        assert_eq!(log.args("foo").unwrap(), vec![args!["a", "b"], args!["c"]]);
        assert_eq!(
            log.these("foo").unwrap(),
            vec![Value::Undefined, Value::Undefined]
        );
    }

    #[test]
    fn returns_undefined_by_default() {
        let log = CallLog::new();
        let foo = spy(FunctionOptions::new("foo"), &log);
        assert!(foo.call(args![]).is_undefined());
    }

    #[test]
    fn returns_configured_result() {
        let log = CallLog::new();
        let baz = spy(FunctionOptions::new("baz").with_result("foo"), &log);

        assert_eq!(baz.call(args![]), "foo");
        assert_eq!(log.count("foo"), None);
    }

    #[test]
    fn chain_returns_receiver() {
        let log = CallLog::new();
        let foo = spy(
            FunctionOptions::new("foo").with_chain(true).with_result("bar"),
            &log,
        );
        let receiver = SpyObject::new();

        let returned = foo.call_on(Value::from(receiver.clone()), args![]);
        assert_eq!(returned, Value::from(receiver));
        assert!(foo.is_chained());
    }

    #[test]
    fn chain_false_returns_result() {
        let log = CallLog::new();
        let foo = spy(FunctionOptions::new("foo").with_chain(false), &log);
        assert!(foo.call_on(Value::from("ctx"), args![]).is_undefined());
    }

    #[test]
    fn second_spy_with_same_name_shares_entry() {
        let log = CallLog::new();
        let first = spy(FunctionOptions::new("foo"), &log);
        first.call(["a"]);

        let second = spy(FunctionOptions::new("foo"), &log);
        second.call(["b"]);

        assert_eq!(log.count("foo"), Some(2));
        assert!(!first.ptr_eq(&second));
    }

    #[test]
    fn accessors() {
        let log = CallLog::new();
        let foo = spy(FunctionOptions::default().with_name("foo"), &log);

        assert_eq!(foo.name(), "foo");
        assert!(foo.log().ptr_eq(&log));
        assert!(foo.ptr_eq(&foo.clone()));
    }
}
