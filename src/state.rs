use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::db;
use crate::email::{LogMailer, Mailer};
use crate::storage::{LocalStorage, StorageClient};

/// Shared per-process resources, injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn StorageClient>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = db::connect(&config.database_url).await?;
        db::init_schema(&db).await?;

        let storage =
            Arc::new(LocalStorage::new(&config.upload_dir).await?) as Arc<dyn StorageClient>;
        let mailer = Arc::new(LogMailer) as Arc<dyn Mailer>;

        Ok(Self {
            db,
            config,
            storage,
            mailer,
        })
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        storage: Arc<dyn StorageClient>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            db,
            config,
            storage,
            mailer,
        }
    }
}
