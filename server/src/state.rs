use std::sync::Arc;

use crate::config::Config;
use crate::services::ServiceNowClient;
use crate::storage::{MemStorage, Storage};

/// Everything a handler needs, built once at startup and shared by clone.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub servicenow: Arc<ServiceNowClient>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, servicenow: ServiceNowClient) -> Self {
        Self {
            storage,
            servicenow: Arc::new(servicenow),
        }
    }

    /// In-memory storage, seeded according to `config`.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let storage = if config.seed_sample_data {
            MemStorage::with_sample_data()
        } else {
            MemStorage::new()
        };
        let servicenow = ServiceNowClient::new(config.servicenow.clone())?;
        Ok(Self::new(Arc::new(storage), servicenow))
    }
}
