use async_trait::async_trait;
use thiserror::Error;

use cadastro_core::domain::customer::{Customer, CustomerId, NewCustomer, TaxId};
use cadastro_core::domain::product::{NewProduct, Product, ProductId};
use cadastro_core::errors::ApplicationError;

pub mod customer;
pub mod memory;
pub mod product;

pub use customer::SqlCustomerRepository;
pub use memory::{InMemoryCustomerRepository, InMemoryProductRepository};
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("tax id `{0}` is already registered")]
    DuplicateTaxId(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::DuplicateTaxId(_) => Self::DuplicateTaxId,
            other => Self::Persistence(other.to_string()),
        }
    }
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError>;
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError>;
    async fn find_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Customer>, RepositoryError>;
    async fn insert(&self, customer: NewCustomer) -> Result<Customer, RepositoryError>;
    /// Overwrites name and tax id. Returns `false` when no row has that id.
    async fn update(&self, customer: &Customer) -> Result<bool, RepositoryError>;
    /// Returns `false` when no row has that id.
    async fn delete(&self, id: &CustomerId) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError>;
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;
    async fn insert(&self, product: NewProduct) -> Result<Product, RepositoryError>;
    async fn update(&self, product: &Product) -> Result<bool, RepositoryError>;
    async fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError>;
}
