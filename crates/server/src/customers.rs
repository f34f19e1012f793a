//! Customer routes.
//!
//! - `GET    /clientes`              list customers, or one via `?idCliente=`
//! - `POST   /clientes`              register a customer
//! - `PUT    /clientes/{idCliente}`  partial update
//! - `DELETE /clientes/{idCliente}`  remove a customer

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
use cadastro_core::domain::customer::{Customer, CustomerId, CustomerPatch, NewCustomer};
use cadastro_core::domain::Resource;
use cadastro_core::errors::ApplicationError;
use cadastro_db::repositories::CustomerRepository;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{ApiError, MessageBody};

#[derive(Clone)]
pub struct CustomerState {
    repository: Arc<dyn CustomerRepository>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListCustomersQuery {
    #[serde(rename = "idCliente")]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    #[serde(rename = "nomeCliente")]
    pub name: Option<String>,
    #[serde(rename = "cpfCliente")]
    pub tax_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    #[serde(rename = "nomeCliente")]
    pub name: Option<String>,
    #[serde(rename = "cpfCliente")]
    pub tax_id: Option<String>,
}

pub fn router(repository: Arc<dyn CustomerRepository>) -> Router {
    Router::new()
        .route("/clientes", get(list_customers).post(create_customer))
        .route("/clientes/{idCliente}", put(update_customer).delete(delete_customer))
        .with_state(CustomerState { repository })
}

pub async fn list_customers(
    State(state): State<CustomerState>,
    query: Result<Query<ListCustomersQuery>, QueryRejection>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let Query(query) = query?;
    let customers: Vec<Customer> = match query.id.filter(|raw| !raw.is_empty()) {
        Some(raw) => {
            let id = CustomerId::parse(&raw)?;
            state.repository.find_by_id(&id).await?.into_iter().collect()
        }
        None => state.repository.list_all().await?,
    };

    Ok(Json(customers))
}

pub async fn create_customer(
    State(state): State<CustomerState>,
    payload: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let Json(request) = payload?;
    let new_customer = NewCustomer::new(request.name, request.tax_id)?;

    if state.repository.find_by_tax_id(&new_customer.tax_id).await?.is_some() {
        warn!(event_name = "customer.create.duplicate_tax_id", "tax id already registered");
        return Err(ApplicationError::DuplicateTaxId.into());
    }

    let customer = state.repository.insert(new_customer).await?;
    info!(
        event_name = "customer.created",
        customer_id = %customer.id.as_str(),
        "customer registered"
    );

    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn update_customer(
    State(state): State<CustomerState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateCustomerRequest>, JsonRejection>,
) -> Result<Json<Customer>, ApiError> {
    let id = CustomerId::parse(&raw_id)?;
    let Json(request) = payload?;
    let patch = CustomerPatch::new(request.name, request.tax_id)?;

    if let Some(tax_id) = &patch.tax_id {
        if let Some(holder) = state.repository.find_by_tax_id(tax_id).await? {
            if holder.id != id {
                warn!(
                    event_name = "customer.update.duplicate_tax_id",
                    customer_id = %id.as_str(),
                    "tax id belongs to another customer"
                );
                return Err(ApplicationError::DuplicateTaxId.into());
            }
        }
    }

    let current = state
        .repository
        .find_by_id(&id)
        .await?
        .ok_or(ApplicationError::NotFound(Resource::Customer))?;

    let updated = patch.apply_to(current);
    // The row can disappear between the read and the write.
    if !state.repository.update(&updated).await? {
        return Err(ApplicationError::NotFound(Resource::Customer).into());
    }

    info!(event_name = "customer.updated", customer_id = %id.as_str(), "customer updated");
    Ok(Json(updated))
}

pub async fn delete_customer(
    State(state): State<CustomerState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = CustomerId::parse(&raw_id)?;

    if state.repository.find_by_id(&id).await?.is_none() {
        return Err(ApplicationError::NotFound(Resource::Customer).into());
    }
    if !state.repository.delete(&id).await? {
        return Err(ApplicationError::NotFound(Resource::Customer).into());
    }

    info!(event_name = "customer.deleted", customer_id = %id.as_str(), "customer deleted");
    Ok(Json(MessageBody::new("Cliente deletado com sucesso!")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{http::StatusCode, Router};
    use cadastro_core::domain::customer::{Customer, CustomerId, NewCustomer, TaxId};
    use cadastro_db::repositories::{
        CustomerRepository, InMemoryCustomerRepository, RepositoryError,
    };
    use serde_json::{json, Value};

    use super::router;
    use crate::test_support::{send, send_raw};

    const UNKNOWN_ID: &str = "00000000-0000-4000-8000-000000000000";

    fn app() -> Router {
        router(Arc::new(InMemoryCustomerRepository::default()))
    }

    /// Store whose tax-id lookup never finds anything, so only the write sees duplicates.
    #[derive(Default)]
    struct LookupMissesStore {
        inner: InMemoryCustomerRepository,
    }

    #[async_trait]
    impl CustomerRepository for LookupMissesStore {
        async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
            self.inner.list_all().await
        }

        async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_tax_id(&self, _: &TaxId) -> Result<Option<Customer>, RepositoryError> {
            Ok(None)
        }

        async fn insert(&self, customer: NewCustomer) -> Result<Customer, RepositoryError> {
            self.inner.insert(customer).await
        }

        async fn update(&self, customer: &Customer) -> Result<bool, RepositoryError> {
            self.inner.update(customer).await
        }

        async fn delete(&self, id: &CustomerId) -> Result<bool, RepositoryError> {
            self.inner.delete(id).await
        }
    }

    async fn create_ana(app: &Router) -> Value {
        let (status, body) = send(
            app,
            "POST",
            "/clientes",
            Some(json!({"nomeCliente": "Ana", "cpfCliente": "12345678901"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[tokio::test]
    async fn create_returns_record_matching_input_and_listing_includes_it() {
        let app = app();
        let created = create_ana(&app).await;

        assert_eq!(created["nomeCliente"], "Ana");
        assert_eq!(created["cpfCliente"], "12345678901");
        assert_eq!(created["idCliente"].as_str().map(str::len), Some(36));

        let (status, listed) = send(&app, "GET", "/clientes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([created]));
    }

    #[tokio::test]
    async fn second_create_with_same_tax_id_conflicts() {
        let app = app();
        let first = create_ana(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            "/clientes",
            Some(json!({"nomeCliente": "Outra Ana", "cpfCliente": "12345678901"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({"erro": "Esse CPF já está cadastrado!"}));

        let (_, listed) = send(&app, "GET", "/clientes", None).await;
        assert_eq!(listed, json!([first]));
    }

    #[tokio::test]
    async fn duplicate_reported_by_store_after_lookup_passes_conflicts() {
        let app = router(Arc::new(LookupMissesStore::default()));
        create_ana(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            "/clientes",
            Some(json!({"nomeCliente": "Ana Clara", "cpfCliente": "12345678901"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({"erro": "Esse CPF já está cadastrado!"}));

        let (_, listed) = send(&app, "GET", "/clientes", None).await;
        assert_eq!(listed.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn create_rejects_missing_or_malformed_fields() {
        let app = app();

        let (status, body) =
            send(&app, "POST", "/clientes", Some(json!({"cpfCliente": "12345678901"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"erro": "Campos obrigatórios não preenchidos"}));

        let (status, body) = send(
            &app,
            "POST",
            "/clientes",
            Some(json!({"nomeCliente": "Ana", "cpfCliente": "123"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"erro": "CPF inválido!"}));

        let (status, body) = send_raw(&app, "POST", "/clientes", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"erro": "Corpo da requisição inválido!"}));
    }

    #[tokio::test]
    async fn list_by_query_id_returns_single_match_or_empty() {
        let app = app();
        let created = create_ana(&app).await;
        let id = created["idCliente"].as_str().expect("id").to_string();

        let (status, body) = send(&app, "GET", &format!("/clientes?idCliente={id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([created]));

        let (status, body) =
            send(&app, "GET", &format!("/clientes?idCliente={UNKNOWN_ID}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, body) = send(&app, "GET", "/clientes?idCliente=curto", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"erro": "Id do cliente inválido!"}));
    }

    #[tokio::test]
    async fn list_rejects_repeated_query_id_with_json_error() {
        let (status, body) =
            send(&app(), "GET", "/clientes?idCliente=a&idCliente=b", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"erro": "Parâmetros da consulta inválidos!"}));
    }

    #[tokio::test]
    async fn partial_update_keeps_omitted_fields() {
        let app = app();
        let created = create_ana(&app).await;
        let id = created["idCliente"].as_str().expect("id").to_string();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/clientes/{id}"),
            Some(json!({"nomeCliente": "Ana Maria"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nomeCliente"], "Ana Maria");
        assert_eq!(body["cpfCliente"], "12345678901");

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/clientes/{id}"),
            Some(json!({"cpfCliente": "10987654321"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nomeCliente"], "Ana Maria");
        assert_eq!(body["cpfCliente"], "10987654321");
    }

    #[tokio::test]
    async fn update_may_resubmit_own_tax_id_but_not_anothers() {
        let app = app();
        let ana = create_ana(&app).await;
        let ana_id = ana["idCliente"].as_str().expect("id").to_string();
        let (_, bruno) = send(
            &app,
            "POST",
            "/clientes",
            Some(json!({"nomeCliente": "Bruno", "cpfCliente": "10987654321"})),
        )
        .await;
        let bruno_id = bruno["idCliente"].as_str().expect("id").to_string();

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/clientes/{ana_id}"),
            Some(json!({"cpfCliente": "12345678901"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/clientes/{bruno_id}"),
            Some(json!({"cpfCliente": "12345678901"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({"erro": "Esse CPF já está cadastrado!"}));
    }

    #[tokio::test]
    async fn update_validates_id_and_tax_id_and_existence() {
        let app = app();

        let (status, body) =
            send(&app, "PUT", "/clientes/abc", Some(json!({"nomeCliente": "Ana"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"erro": "Id do cliente inválido!"}));

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/clientes/{UNKNOWN_ID}"),
            Some(json!({"cpfCliente": "1"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"erro": "CPF inválido!"}));

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/clientes/{UNKNOWN_ID}"),
            Some(json!({"nomeCliente": "Ninguém"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"erro": "Cliente não encontrado!"}));
    }

    #[tokio::test]
    async fn delete_validates_id_then_removes_record() {
        let app = app();
        let created = create_ana(&app).await;
        let id = created["idCliente"].as_str().expect("id").to_string();

        let (status, _) = send(&app, "DELETE", "/clientes/123", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "DELETE", &format!("/clientes/{UNKNOWN_ID}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"erro": "Cliente não encontrado!"}));

        let (status, body) = send(&app, "DELETE", &format!("/clientes/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"mensagem": "Cliente deletado com sucesso!"}));

        let (_, listed) = send(&app, "GET", "/clientes", None).await;
        assert_eq!(listed, json!([]));
    }
}
