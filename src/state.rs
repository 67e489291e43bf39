use crate::config::{AppConfig, StoreBackend};
use crate::students::memory::MemoryStudentStore;
use crate::students::repo::{PgStudentStore, StudentStore};
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StudentStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let store = match config.store_backend {
            StoreBackend::Postgres => {
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(&config.database_url)
                    .await
                    .context("connect to database")?;

                // The unique constraints live in the migration, so a failed
                // migration is fatal.
                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;

                Arc::new(PgStudentStore::new(db)) as Arc<dyn StudentStore>
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store; records are lost on restart");
                Arc::new(MemoryStudentStore::new()) as Arc<dyn StudentStore>
            }
        };

        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: Arc<dyn StudentStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::fake_with_store().0
    }

    /// Memory-backed state plus a handle on its store, for tests that need to
    /// reach into the store.
    #[cfg(test)]
    pub fn fake_with_store() -> (Self, Arc<MemoryStudentStore>) {
        let config = Arc::new(AppConfig {
            database_url: String::new(),
            host: "127.0.0.1".into(),
            port: 0,
            max_connections: 1,
            submit_precheck: true,
            store_backend: StoreBackend::Memory,
            cors_allow_origin: None,
        });
        let store = Arc::new(MemoryStudentStore::new());
        (
            Self::from_parts(store.clone() as Arc<dyn StudentStore>, config),
            store,
        )
    }
}
