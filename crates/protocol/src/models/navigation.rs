use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString};
use ts_rs::TS;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum VisitMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl VisitMethod {
    pub fn is_get(self) -> bool {
        matches!(self, VisitMethod::Get)
    }
}

/// A client-side navigation, alive until its response has been applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct NavigationRequest {
    pub url: String,
    pub method: VisitMethod,
    /// JSON body for non-GET visits
    #[ts(type = "unknown")]
    pub data: Option<Value>,
    /// Prop names to fetch; empty means a full visit
    pub only: Vec<String>,
    /// Prop names to leave out of a partial visit
    pub except: Vec<String>,
}

impl NavigationRequest {
    pub fn new(method: VisitMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            data: None,
            only: Vec::new(),
            except: Vec::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(VisitMethod::Get, url)
    }

    pub fn post(url: impl Into<String>, data: Value) -> Self {
        Self::new(VisitMethod::Post, url).data(data)
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn only<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn except<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.except = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_partial(&self) -> bool {
        !self.only.is_empty() || !self.except.is_empty()
    }
}

/// Partial-reload directives as the server sees them
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
pub struct PartialReload {
    /// Component mounted on the client when the request was made
    pub component: String,
    pub only: Vec<String>,
    pub except: Vec<String>,
}

impl PartialReload {
    /// Directives only hold when the page being rendered is the mounted component
    pub fn applies_to(&self, component: &str) -> bool {
        self.component == component
    }
}
