//! Shared application state for all routes.

use crate::config::Settings;
use crate::service::ContactService;
use crate::store::ContactStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub service: ContactService,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(store: Arc<dyn ContactStore>, settings: Arc<Settings>) -> Self {
        AppState {
            service: ContactService::new(store),
            settings,
        }
    }
}
