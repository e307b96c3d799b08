use std::sync::Arc;

use axum::extract::FromRef;
use serde_json::{Map, Value};
use services::services::flash::{FlashStore, InMemoryFlashStore};
use tokio::sync::RwLock;

use crate::{
    config::Config,
    inertia::{InertiaConfig, InertiaState},
    routes::events::Event,
};

#[derive(Clone)]
pub struct AppState {
    pub inertia: InertiaState,
    pub events: Arc<RwLock<Vec<Event>>>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_flash_store(config, Arc::new(InMemoryFlashStore::new()))
    }

    pub fn with_flash_store(config: &Config, flash: Arc<dyn FlashStore>) -> Self {
        let mut shared = Map::new();
        shared.insert("appName".to_string(), Value::String(config.app_name.clone()));

        let inertia = InertiaState {
            config: Arc::new(InertiaConfig {
                version: config.version.clone(),
                app_url: config.app_url.clone(),
                template: config.root_template.clone(),
                shared,
                encrypt_history: config.encrypt_history,
            }),
            flash,
        };

        Self {
            inertia,
            events: Arc::new(RwLock::new(Event::seed())),
        }
    }
}

impl FromRef<AppState> for InertiaState {
    fn from_ref(state: &AppState) -> Self {
        state.inertia.clone()
    }
}
