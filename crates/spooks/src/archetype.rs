//! Archetypes - the method shape a spy imitates
//!
//! A [`Template`] declares members in order, each either a method or a data
//! field. Only methods are turned into spies. Anything that can describe its
//! shape as a template implements [`Archetype`].
//!
//! Constructor spies take an [`ArchetypeSource`], which is either a ready
//! template or a factory that produces one.

use crate::error::{SpyError, SpyResult};
use crate::object::SpyObject;
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// A declared member of a template
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// Callable member, replaced by a spy
    Method,

    /// Data member, never copied onto a spy object
    Field(Value),
}

impl Member {
    /// Returns true for [`Member::Method`]
    #[inline]
    #[must_use]
    pub fn is_method(&self) -> bool {
        matches!(self, Self::Method)
    }
}

/// Ordered declaration of an object's members
///
/// # Example
/// ```
/// use spooks::Template;
///
/// let template = Template::new().method("foo").method("bar").field("baz", 1);
/// assert_eq!(template.method_names().collect::<Vec<_>>(), vec!["foo", "bar"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    members: IndexMap<String, Member>,
}

impl Template {
    /// Create empty template
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a method
    #[inline]
    #[must_use]
    pub fn method(mut self, name: impl Into<String>) -> Self {
        self.members.insert(name.into(), Member::Method);
        self
    }

    /// Declare several methods
    #[must_use]
    pub fn methods<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        for name in names {
            self.members.insert(name.into(), Member::Method);
        }
        self
    }

    /// Declare a data field
    #[inline]
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.insert(name.into(), Member::Field(value.into()));
        self
    }

    /// Member declared under `name`
    #[inline]
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    /// Method names in declaration order
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.members
            .iter()
            .filter(|(_, member)| member.is_method())
            .map(|(name, _)| name.as_str())
    }

    /// Number of declared members
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if nothing is declared
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Anything that can describe the shape of the object a spy imitates
pub trait Archetype {
    /// Shape of the imitated object
    fn template(&self) -> Template;
}

impl Archetype for Template {
    fn template(&self) -> Template {
        self.clone()
    }
}

impl Archetype for SpyObject {
    fn template(&self) -> Template {
        self.entries()
            .into_iter()
            .fold(Template::new(), |template, (name, value)| {
                if value.is_callable() {
                    template.method(name)
                } else {
                    template.field(name, value)
                }
            })
    }
}

impl Archetype for [&str] {
    fn template(&self) -> Template {
        Template::new().methods(self.iter().copied())
    }
}

impl<const N: usize> Archetype for [&str; N] {
    fn template(&self) -> Template {
        self.as_slice().template()
    }
}

impl<A: Archetype + ?Sized> Archetype for &A {
    fn template(&self) -> Template {
        (**self).template()
    }
}

/// Produces a template from constructor arguments, or declines with `None`
pub type TemplateFactory = Arc<dyn Fn(&[Value]) -> Option<Template> + Send + Sync>;

/// Where a constructor spy gets its instance shape from
#[derive(Clone)]
pub enum ArchetypeSource {
    /// A ready template
    Instance(Template),

    /// A constructor run once to obtain the template
    Factory {
        /// The constructor
        ctor: TemplateFactory,
        /// Arguments for the constructor, none if unset
        args: Option<Vec<Value>>,
    },
}

impl ArchetypeSource {
    /// Use an existing archetype as the instance shape
    #[inline]
    #[must_use]
    pub fn instance(archetype: impl Archetype) -> Self {
        Self::Instance(archetype.template())
    }

    /// Obtain the instance shape from a constructor
    #[must_use]
    pub fn factory<F>(ctor: F) -> Self
    where
        F: Fn(&[Value]) -> Template + Send + Sync + 'static,
    {
        Self::Factory {
            ctor: Arc::new(move |args| Some(ctor(args))),
            args: None,
        }
    }

    /// Obtain the instance shape from a constructor that may decline
    #[must_use]
    pub fn try_factory<F>(ctor: F) -> Self
    where
        F: Fn(&[Value]) -> Option<Template> + Send + Sync + 'static,
    {
        Self::Factory {
            ctor: Arc::new(ctor),
            args: None,
        }
    }

    /// Set constructor arguments (no effect on an instance source)
    #[must_use]
    pub fn with_args<I>(self, new_args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        match self {
            Self::Factory { ctor, .. } => Self::Factory {
                ctor,
                args: Some(new_args.into_iter().map(Into::into).collect()),
            },
            instance @ Self::Instance(_) => instance,
        }
    }

    /// Assemble a source from optional parts
    ///
    /// An instance takes precedence over a constructor.
    ///
    /// # Errors
    /// [`SpyError::InvalidArchetype`] if neither part is present.
    pub fn probe(
        instance: Option<Template>,
        ctor: Option<TemplateFactory>,
        args: Option<Vec<Value>>,
    ) -> SpyResult<Self> {
        match (instance, ctor) {
            (Some(template), _) => Ok(Self::Instance(template)),
            (None, Some(ctor)) => Ok(Self::Factory { ctor, args }),
            (None, None) => Err(SpyError::invalid_archetype(
                "expected an instance or a constructor",
            )),
        }
    }

    /// Resolve to a concrete template
    ///
    /// # Errors
    /// [`SpyError::InvalidArchetype`] if the constructor declines.
    pub fn resolve(&self) -> SpyResult<Template> {
        match self {
            Self::Instance(template) => Ok(template.clone()),
            Self::Factory { ctor, args } => {
                let args = args.as_deref().unwrap_or_default();
                ctor(args).ok_or_else(|| {
                    tracing::warn!("Archetype constructor declined {} arguments", args.len());
                    SpyError::invalid_archetype("constructor produced no instance")
                })
            }
        }
    }
}

impl fmt::Debug for ArchetypeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(template) => f.debug_tuple("Instance").field(template).finish(),
            Self::Factory { args, .. } => f
                .debug_struct("Factory")
                .field("args", args)
                .finish_non_exhaustive(),
        }
    }
}
