//! HTML shell served on first load, with the page object embedded in `data-page`.

use std::{fs, sync::Arc};

use protocol::PageObject;
use thiserror::Error;
use utils::html::{DATA_PAGE_ATTR, escape_attr};

/// Placeholder replaced by the app root element
pub const INERTIA_MARKER: &str = "@inertia";

const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <script type="module" src="/assets/app.js" defer></script>
</head>
<body>
    @inertia
</body>
</html>
"#;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read root template {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("root template {0} has no @inertia marker")]
    MissingMarker(String),
}

#[derive(Debug, Clone)]
pub struct RootTemplate {
    html: Arc<str>,
}

impl Default for RootTemplate {
    fn default() -> Self {
        Self {
            html: Arc::from(DEFAULT_TEMPLATE),
        }
    }
}

impl RootTemplate {
    pub fn new(html: impl Into<String>) -> Result<Self, TemplateError> {
        let html = html.into();
        if !html.contains(INERTIA_MARKER) {
            return Err(TemplateError::MissingMarker("<inline>".to_string()));
        }
        Ok(Self {
            html: Arc::from(html),
        })
    }

    pub fn from_file(path: &str) -> Result<Self, TemplateError> {
        let html = fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_string(),
            source,
        })?;
        if !html.contains(INERTIA_MARKER) {
            return Err(TemplateError::MissingMarker(path.to_string()));
        }
        Ok(Self {
            html: Arc::from(html),
        })
    }

    pub fn render(&self, page: &PageObject) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(page)?;
        let root = format!(
            r#"<div id="app" {DATA_PAGE_ATTR}='{}'></div>"#,
            escape_attr(&json)
        );
        Ok(self.html.replacen(INERTIA_MARKER, &root, 1))
    }
}
