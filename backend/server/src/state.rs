use std::sync::Arc;

use super::{config::Config, error::AppError, store::MessageStore};

pub struct AppState {
    pub config: Config,
    pub store: MessageStore,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>, AppError> {
        let store = MessageStore::load(&config.store_path).await?;

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: MessageStore) -> Arc<Self> {
        Arc::new(Self { config, store })
    }
}
