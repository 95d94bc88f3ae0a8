//! Shared application state.

use gamereview_adapter_pg::{
    Connectivity, DemoStore, PgDemoStore, PgReviewStore, PgRunner, ReviewStore,
};
use gamereview_core::QueryConfig;
use gamereview_query::{QueryBuilder, SchemaCatalog};
use sqlx::PgPool;
use std::sync::Arc;

/// Everything a request handler needs. The catalog is immutable after
/// startup, so it is shared without locks.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<SchemaCatalog>,
    pub queries: QueryBuilder,
    pub reviews: Arc<dyn ReviewStore>,
    pub demo: Arc<dyn DemoStore>,
    pub health: Arc<dyn Connectivity>,
}

impl AppState {
    /// Wire every collaborator to the same Postgres pool.
    pub fn from_pool(pool: PgPool, catalog: SchemaCatalog, query: &QueryConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            queries: QueryBuilder::new(Arc::new(PgRunner::new(pool.clone())), query),
            reviews: Arc::new(PgReviewStore::new(pool.clone())),
            demo: Arc::new(PgDemoStore::new(pool.clone())),
            health: Arc::new(pool),
        }
    }
}
