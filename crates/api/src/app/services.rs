use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use storefront_infra::{InMemoryProductStore, PostgresProductStore, ProductCatalog, ProductStore};

use crate::config::{ApiConfig, Persistence};

pub type DynProductStore = Arc<dyn ProductStore>;

/// Services shared by every handler (via `Extension`).
pub struct AppServices {
    catalog: ProductCatalog<DynProductStore>,
}

impl AppServices {
    pub fn new(store: DynProductStore) -> Self {
        Self {
            catalog: ProductCatalog::new(store),
        }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductStore::new()))
    }

    pub fn catalog(&self) -> &ProductCatalog<DynProductStore> {
        &self.catalog
    }
}

pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    match &config.persistence {
        Persistence::InMemory => {
            tracing::info!("using in-memory product store");
            Ok(AppServices::in_memory())
        }
        Persistence::Postgres { database_url } => {
            let pool = PgPool::connect(database_url)
                .await
                .context("failed to connect to Postgres")?;
            let store = PostgresProductStore::new(pool);
            store
                .ensure_schema()
                .await
                .context("failed to prepare products schema")?;
            tracing::info!("using Postgres product store");
            Ok(AppServices::new(Arc::new(store)))
        }
    }
}
