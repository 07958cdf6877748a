//! spooks - Unit test spies
//!
//! Substitute functions and objects that record how they were invoked, for
//! isolating code under test from its collaborators.
//!
//! # Overview
//!
//! - [`function`]: a [`Spy`] that logs each call's arguments and receiver
//! - [`object`]: a [`SpyObject`] with a spy for every method of an archetype
//! - [`constructor`]: a spy that hands back spy objects built from an
//!   [`ArchetypeSource`]
//!
//! All of them record into a [`CallLog`] owned by the test. Per name the log
//! keeps a call count, the argument list of each call and the receiver of
//! each call, in lockstep.
//!
//! # Example
//!
//! ```rust
//! use spooks::{args, object, CallLog, ObjectOptions, Template, Value};
//!
//! let log = CallLog::new();
//! let greeter = object(
//!     ObjectOptions::new(Template::new().method("greet").field("language", "en"))
//!         .with_log(&log),
//! )
//! .unwrap();
//!
//! let returned = greeter.call("greet", args!["hi"]).unwrap();
//!
//! assert!(returned.is_undefined());
//! assert!(!greeter.contains("language"));
//! assert_eq!(log.count("greet"), Some(1));
//! assert_eq!(log.args("greet").unwrap(), vec![args!["hi"]]);
//! assert_eq!(log.these("greet").unwrap(), vec![Value::from(greeter.clone())]);
//! ```

#![warn(missing_docs)]

pub mod archetype;
pub mod config;
pub mod constructor;
pub mod error;
pub mod function;
pub mod log;
pub mod object;
pub mod value;

// Re-exports
pub use archetype::{Archetype, ArchetypeSource, Member, Template, TemplateFactory};
pub use config::{InstanceMode, LogConfig};
pub use constructor::{constructor, ConstructorOptions};
pub use error::{SpyError, SpyResult};
pub use function::{function, FunctionOptions, Spy};
pub use log::{CallLog, LogEntry, LogSnapshot};
pub use object::{object, ObjectOptions, SpyObject};
pub use value::Value;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for writing spies
    pub use crate::{
        args, constructor, function, object, Archetype, ArchetypeSource, CallLog,
        ConstructorOptions, FunctionOptions, InstanceMode, LogConfig, ObjectOptions, Spy,
        SpyError, SpyObject, SpyResult, Template, Value,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
