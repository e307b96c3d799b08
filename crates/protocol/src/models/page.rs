use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

/// The unit exchanged between server and client on every navigation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct PageObject {
    /// Name of the UI component that renders this page
    pub component: String,
    #[ts(type = "Record<string, unknown>")]
    pub props: Map<String, Value>,
    pub url: String,
    /// Opaque asset version; only ever compared for equality
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub encrypt_history: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub clear_history: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl PageObject {
    pub fn new(
        component: impl Into<String>,
        props: Map<String, Value>,
        url: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            component: component.into(),
            props,
            url: url.into(),
            version: version.into(),
            encrypt_history: false,
            clear_history: false,
        }
    }

    pub fn with_encrypt_history(mut self, encrypt: bool) -> Self {
        self.encrypt_history = encrypt;
        self
    }

    /// Overlay the props of a partial response onto this page.
    ///
    /// Keys in `partial` replace existing ones in place; new keys are appended.
    pub fn merge_partial(&mut self, partial: PageObject) {
        for (key, value) in partial.props {
            self.props.insert(key, value);
        }
        self.url = partial.url;
        self.version = partial.version;
        self.encrypt_history = partial.encrypt_history;
        self.clear_history = partial.clear_history;
    }

    /// Props as a JSON object, the shape page renderers validate against
    pub fn props_value(&self) -> Value {
        Value::Object(self.props.clone())
    }
}
