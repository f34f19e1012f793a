//! Product routes.
//!
//! - `GET    /produtos`             list products, or one via `?idProduto=`
//! - `POST   /produtos`             register a product
//! - `PUT    /produto/{idProduto}`  partial update (also under `/produtos/`)
//! - `DELETE /produto/{idProduto}`  remove a product (also under `/produtos/`)

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use cadastro_core::domain::product::{NewProduct, Product, ProductId, ProductPatch};
use cadastro_core::domain::Resource;
use cadastro_core::errors::ApplicationError;
use cadastro_db::repositories::ProductRepository;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::error::{ApiError, MessageBody};

#[derive(Clone)]
pub struct ProductState {
    repository: Arc<dyn ProductRepository>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    #[serde(rename = "idProduto")]
    pub id: Option<String>,
}

/// `precoProduto` accepts a JSON number or a numeric string.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    #[serde(rename = "nomeProduto")]
    pub name: Option<String>,
    #[serde(rename = "precoProduto")]
    pub price: Option<Decimal>,
}

pub fn router(repository: Arc<dyn ProductRepository>) -> Router {
    Router::new()
        .route("/produtos", get(list_products).post(create_product))
        .route("/produto/{idProduto}", put(update_product).delete(delete_product))
        .route("/produtos/{idProduto}", put(update_product).delete(delete_product))
        .with_state(ProductState { repository })
}

pub async fn list_products(
    State(state): State<ProductState>,
    query: Result<Query<ListProductsQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let Query(query) = query?;
    let products: Vec<Product> = match query.id.filter(|raw| !raw.is_empty()) {
        Some(raw) => {
            let id = ProductId::parse(&raw)?;
            state.repository.find_by_id(&id).await?.into_iter().collect()
        }
        None => state.repository.list_all().await?,
    };

    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<ProductState>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(request) = payload?;
    let new_product = NewProduct::new(request.name, request.price)?;

    let product = state.repository.insert(new_product).await?;
    info!(event_name = "product.created", product_id = %product.id.as_str(), "product registered");

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<ProductState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = ProductId::parse(&raw_id)?;
    let Json(request) = payload?;
    let patch = ProductPatch::new(request.name, request.price)?;

    let current = state
        .repository
        .find_by_id(&id)
        .await?
        .ok_or(ApplicationError::NotFound(Resource::Product))?;

    let updated = patch.apply_to(current);
    if !state.repository.update(&updated).await? {
        return Err(ApplicationError::NotFound(Resource::Product).into());
    }

    info!(event_name = "product.updated", product_id = %id.as_str(), "product updated");
    Ok(Json(updated))
}

pub async fn delete_product(
    State(state): State<ProductState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = ProductId::parse(&raw_id)?;

    if state.repository.find_by_id(&id).await?.is_none() {
        return Err(ApplicationError::NotFound(Resource::Product).into());
    }
    if !state.repository.delete(&id).await? {
        return Err(ApplicationError::NotFound(Resource::Product).into());
    }

    info!(event_name = "product.deleted", product_id = %id.as_str(), "product deleted");
    Ok(Json(MessageBody::new("Produto deletado com sucesso!")))
}
