use rust_decimal::Decimal;
use thiserror::Error;

use cadastro_core::domain::customer::{NewCustomer, TaxId};
use cadastro_core::domain::product::NewProduct;
use cadastro_core::errors::DomainError;

use crate::repositories::{CustomerRepository, ProductRepository, RepositoryError};

const DEMO_CUSTOMERS: &[(&str, &str)] = &[
    ("Ana Souza", "12345678901"),
    ("Bruno Lima", "23456789012"),
    ("Carla Mendes", "34567890123"),
];

/// (name, price in cents)
const DEMO_PRODUCTS: &[(&str, i64)] =
    &[("Caneta", 350), ("Caderno", 2490), ("Lápis", 150), ("Mochila", 12990)];

/// Small deterministic catalog for local demos. Loading twice is a no-op.
pub struct DemoCatalog;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub customers_inserted: usize,
    pub customers_skipped: usize,
    pub products_inserted: usize,
    pub products_skipped: usize,
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("demo record `{record}` is invalid: {source}")]
    InvalidRecord { record: String, source: DomainError },
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

fn invalid(record: &str) -> impl FnOnce(DomainError) -> SeedError + '_ {
    move |source| SeedError::InvalidRecord { record: record.to_string(), source }
}

impl DemoCatalog {
    pub async fn load(
        customers: &dyn CustomerRepository,
        products: &dyn ProductRepository,
    ) -> Result<SeedResult, SeedError> {
        seed(customers, products, DEMO_CUSTOMERS, DEMO_PRODUCTS).await
    }
}

async fn seed(
    customers: &dyn CustomerRepository,
    products: &dyn ProductRepository,
    customer_rows: &[(&str, &str)],
    product_rows: &[(&str, i64)],
) -> Result<SeedResult, SeedError> {
    let mut result = SeedResult::default();

    for (name, tax_id) in customer_rows {
        let parsed = TaxId::parse(tax_id).map_err(invalid(name))?;
        if customers.find_by_tax_id(&parsed).await?.is_some() {
            result.customers_skipped += 1;
            continue;
        }

        let customer = NewCustomer::new(Some(name.to_string()), Some(tax_id.to_string()))
            .map_err(invalid(name))?;
        match customers.insert(customer).await {
            Ok(_) => result.customers_inserted += 1,
            Err(RepositoryError::DuplicateTaxId(_)) => result.customers_skipped += 1,
            Err(other) => return Err(other.into()),
        }
    }

    // Products have no natural key, so an existing name counts as already seeded.
    let existing = products.list_all().await?;
    for (name, cents) in product_rows {
        if existing.iter().any(|product| product.name == *name) {
            result.products_skipped += 1;
            continue;
        }

        let product = NewProduct::new(Some(name.to_string()), Some(Decimal::new(*cents, 2)))
            .map_err(invalid(name))?;
        products.insert(product).await?;
        result.products_inserted += 1;
    }

    Ok(result)
}
