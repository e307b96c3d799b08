//! Server-side page props and partial-reload resolution.
//!
//! Partial-reload directives only narrow the props when the component being
//! rendered is the component the client has mounted. A redirect to any other
//! component always gets that component's full prop set.

use indexmap::IndexMap;
use protocol::PartialReload;
use serde_json::{Map, Value};
use tracing::debug;

pub type PropFn = Box<dyn FnOnce() -> Value + Send>;

pub enum Prop {
    /// Evaluated eagerly and sent unless a partial reload leaves it out
    Value(Value),
    /// Evaluated only when the prop is actually sent
    Lazy(PropFn),
    /// Sent only when a partial reload names it in `only`
    Optional(PropFn),
    /// Sent on every response, partial or not
    Always(Value),
}

impl Prop {
    pub fn lazy<F>(f: F) -> Self
    where
        F: FnOnce() -> Value + Send + 'static,
    {
        Prop::Lazy(Box::new(f))
    }

    pub fn optional<F>(f: F) -> Self
    where
        F: FnOnce() -> Value + Send + 'static,
    {
        Prop::Optional(Box::new(f))
    }

    pub fn always(value: impl Into<Value>) -> Self {
        Prop::Always(value.into())
    }

    fn into_value(self) -> Value {
        match self {
            Prop::Value(value) | Prop::Always(value) => value,
            Prop::Lazy(f) | Prop::Optional(f) => f(),
        }
    }
}

impl std::fmt::Debug for Prop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Prop::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Prop::Lazy(_) => f.write_str("Lazy(..)"),
            Prop::Optional(_) => f.write_str("Optional(..)"),
            Prop::Always(value) => f.debug_tuple("Always").field(value).finish(),
        }
    }
}

impl From<Value> for Prop {
    fn from(value: Value) -> Self {
        Prop::Value(value)
    }
}

/// Ordered prop set for one page render
#[derive(Debug, Default)]
pub struct Props {
    entries: IndexMap<String, Prop>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, prop: impl Into<Prop>) -> Self {
        self.insert(key, prop);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, prop: impl Into<Prop>) {
        self.entries.insert(key.into(), prop.into());
    }

    /// Put `shared` props underneath these ones; page props win on collision
    pub fn with_shared(self, shared: &Map<String, Value>) -> Self {
        let mut entries: IndexMap<String, Prop> = shared
            .iter()
            .map(|(key, value)| (key.clone(), Prop::Value(value.clone())))
            .collect();
        entries.extend(self.entries);
        Self { entries }
    }

    /// Evaluate the props to send for `component` under `partial` directives.
    ///
    /// Names in the directives that match no prop are ignored.
    pub fn resolve(self, component: &str, partial: Option<&PartialReload>) -> Map<String, Value> {
        let partial = partial.filter(|p| {
            let applies = p.applies_to(component);
            if !applies {
                debug!(
                    requested = %p.component,
                    rendered = %component,
                    "Partial reload targets another component, sending full props"
                );
            }
            applies && (!p.only.is_empty() || !p.except.is_empty())
        });

        let mut resolved = Map::new();
        for (key, prop) in self.entries {
            let include = match (&prop, partial) {
                (Prop::Always(_), _) => true,
                (Prop::Optional(_), None) => false,
                (Prop::Optional(_), Some(p)) => {
                    p.only.contains(&key) && !p.except.contains(&key)
                }
                (_, None) => true,
                (_, Some(p)) => {
                    (p.only.is_empty() || p.only.contains(&key)) && !p.except.contains(&key)
                }
            };

            if include {
                resolved.insert(key, prop.into_value());
            }
        }

        resolved
    }
}
