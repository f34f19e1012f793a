use std::sync::Arc;

use axum::Router;
use cadastro_db::repositories::{
    CustomerRepository, ProductRepository, SqlCustomerRepository, SqlProductRepository,
};
use cadastro_db::DbPool;
use tower_http::trace::TraceLayer;

use crate::{customers, health, products};

/// Full HTTP surface backed by the SQL stores on `db_pool`.
pub fn app(db_pool: DbPool) -> Router {
    let customers: Arc<dyn CustomerRepository> =
        Arc::new(SqlCustomerRepository::new(db_pool.clone()));
    let products: Arc<dyn ProductRepository> = Arc::new(SqlProductRepository::new(db_pool.clone()));

    app_with(customers, products, db_pool)
}

pub fn app_with(
    customers: Arc<dyn CustomerRepository>,
    products: Arc<dyn ProductRepository>,
    db_pool: DbPool,
) -> Router {
    Router::new()
        .merge(customers::router(customers))
        .merge(products::router(products))
        .merge(health::router(db_pool))
        .layer(TraceLayer::new_for_http())
}
