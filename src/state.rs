//! Shared application state: pool, storage and the validated resource catalog.

use crate::config::{Catalog, Settings};
use crate::store::{PgStorage, Storage};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub storage: Arc<dyn Storage>,
    pub catalog: Arc<Catalog>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(pool: PgPool, catalog: Catalog, settings: Settings) -> Self {
        AppState {
            storage: Arc::new(PgStorage::new(pool.clone())),
            pool,
            catalog: Arc::new(catalog),
            settings: Arc::new(settings),
        }
    }
}
