//! Component-name dispatch for validated page renderers.

use std::collections::HashMap;

use protocol::PageObject;
use thiserror::Error;
use tracing::debug;

use super::props_validator::RenderPage;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no page registered for component {0}")]
    UnknownComponent(String),
}

/// Renderers keyed by the `component` name of incoming page objects
pub struct PageRegistry<O> {
    pages: HashMap<String, Box<dyn RenderPage<O>>>,
}

impl<O> Default for PageRegistry<O> {
    fn default() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }
}

impl<O> PageRegistry<O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `renderer` for `component`, replacing any earlier one
    pub fn register<R>(mut self, component: impl Into<String>, renderer: R) -> Self
    where
        R: RenderPage<O> + 'static,
    {
        self.pages.insert(component.into(), Box::new(renderer));
        self
    }

    pub fn contains(&self, component: &str) -> bool {
        self.pages.contains_key(component)
    }

    /// Render `page` with the renderer registered for its component.
    ///
    /// Invalid props are not an error here; the renderer's fallback handles them.
    pub fn render(&self, page: &PageObject) -> Result<O, RegistryError> {
        let renderer = self
            .pages
            .get(&page.component)
            .ok_or_else(|| RegistryError::UnknownComponent(page.component.clone()))?;

        debug!(component = %page.component, url = %page.url, "Rendering page");
        Ok(renderer.render_page(&page.props_value()))
    }
}

#[cfg(test)]
mod tests {
    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::{Map, json};

    use super::*;
    use crate::services::{
        props_validator::{Retry, SchemaValidationError, wrap},
        schema::PropsSchema,
    };

    #[derive(Deserialize, JsonSchema)]
    struct EventsProps {
        events: Vec<String>,
        filter: Option<String>,
    }

    fn registry() -> PageRegistry<String> {
        let events = wrap(
            PropsSchema::of::<EventsProps>().unwrap(),
            |props: EventsProps| {
                format!(
                    "{} events{}",
                    props.events.len(),
                    props
                        .filter
                        .map(|f| format!(" matching {f}"))
                        .unwrap_or_default()
                )
            },
            |err: &SchemaValidationError, _retry: Retry<'_, EventsProps, String>| {
                format!("error: {}", err.errors.len())
            },
        );

        PageRegistry::new().register("Events", events)
    }

    fn page(component: &str, props: serde_json::Value) -> PageObject {
        let Some(props) = props.as_object().cloned() else {
            return PageObject::new(component, Map::new(), "/", "v1");
        };
        PageObject::new(component, props, "/", "v1")
    }

    #[test]
    fn test_renders_registered_component() {
        let out = registry()
            .render(&page("Events", json!({"events": ["a", "b"], "filter": "rust"})))
            .unwrap();
        assert_eq!(out, "2 events matching rust");
    }

    #[test]
    fn test_invalid_props_use_fallback_not_error() {
        let out = registry()
            .render(&page("Events", json!({"events": "nope"})))
            .unwrap();
        assert_eq!(out, "error: 1");
    }

    #[test]
    fn test_unknown_component() {
        let registry = registry();
        assert!(registry.contains("Events"));

        let err = registry.render(&page("Users", json!({}))).unwrap_err();
        assert_eq!(err, RegistryError::UnknownComponent("Users".to_string()));
    }
}
