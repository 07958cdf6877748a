//! Testing utilities for the spooks workspace
//!
//! Shared fixtures: sample archetypes, logs and tracing setup.

#![allow(missing_docs)]

use serde_json::json;
use spooks::{ArchetypeSource, CallLog, LogConfig, Template, Value};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Route spy tracing to the test writer, filtered by `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn create_log() -> CallLog {
    init_tracing();
    CallLog::new()
}

pub fn create_log_without_receivers() -> CallLog {
    init_tracing();
    CallLog::with_config(LogConfig::new().with_track_receivers(false))
}

/// Two methods and one data field
pub fn create_foo_bar_template() -> Template {
    Template::new().method("foo").method("bar").field("baz", 1)
}

pub fn create_greeter_template() -> Template {
    Template::new().method("greet")
}

/// A fluent query builder: `filter` and `limit` chain, `run` returns rows
pub fn create_query_template() -> Template {
    Template::new()
        .method("filter")
        .method("limit")
        .method("run")
        .field("table", "users")
}

pub fn query_rows() -> Value {
    Value::from(json!([{"id": 1}, {"id": 2}]))
}

/// Constructor whose instance shape depends on its arguments
///
/// String arguments become method names; anything else is declined.
pub fn create_dynamic_factory() -> ArchetypeSource {
    ArchetypeSource::try_factory(|args| {
        args.iter()
            .map(|arg| arg.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(|names| Template::new().methods(names))
    })
}
