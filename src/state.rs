use std::sync::Arc;

use mongodb::Database;

use super::{config::Config, database::init_mongo};

pub struct AppState {
    pub config: Config,
    pub db: Database,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let db = init_mongo(&config).await;

        Arc::new(Self { config, db })
    }
}
