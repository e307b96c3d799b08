//! Axum adapter for the page protocol.
//!
//! - [`middleware::version_middleware`] answers stale GET page-data requests with 409
//! - [`Inertia`] extracts the protocol headers and renders page objects
//! - [`InertiaResponse`] picks JSON, HTML or a location visit per request

use std::sync::Arc;

use serde_json::{Map, Value};
use services::services::flash::FlashStore;

pub mod middleware;
pub mod request;
pub mod response;
pub mod session;
pub mod template;

pub use request::{Inertia, InertiaRequest};
pub use response::InertiaResponse;

use template::RootTemplate;

/// Settings shared by every page render
#[derive(Debug, Clone)]
pub struct InertiaConfig {
    pub version: String,
    pub app_url: String,
    pub template: RootTemplate,
    /// Props merged under every page's own props
    pub shared: Map<String, Value>,
    pub encrypt_history: bool,
}

#[derive(Clone)]
pub struct InertiaState {
    pub config: Arc<InertiaConfig>,
    pub flash: Arc<dyn FlashStore>,
}
