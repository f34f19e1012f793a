use sqlx::Row;

use cadastro_core::domain::customer::{Customer, CustomerId, NewCustomer, TaxId};

use super::{CustomerRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_customer(row: &sqlx::sqlite::SqliteRow) -> Result<Customer, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let tax_id: String =
        row.try_get("tax_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let tax_id = TaxId::parse(&tax_id)
        .map_err(|e| RepositoryError::Decode(format!("customer {id}: {e}")))?;

    Ok(Customer { id: CustomerId(id), name, tax_id })
}

/// The unique index on `tax_id` is the authoritative duplicate check; the
/// handler's lookup only gives an early answer.
fn map_write_error(error: sqlx::Error, tax_id: &TaxId) -> RepositoryError {
    match &error {
        sqlx::Error::Database(db_error)
            if db_error.is_unique_violation() && db_error.message().contains("tax_id") =>
        {
            RepositoryError::DuplicateTaxId(tax_id.as_str().to_string())
        }
        _ => RepositoryError::Database(error),
    }
}

#[async_trait::async_trait]
impl CustomerRepository for SqlCustomerRepository {
    async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, tax_id FROM customer ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_customer).collect::<Result<Vec<_>, _>>()
    }

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, tax_id FROM customer WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_customer).transpose()
    }

    async fn find_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, tax_id FROM customer WHERE tax_id = ?")
            .bind(tax_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_customer).transpose()
    }

    async fn insert(&self, customer: NewCustomer) -> Result<Customer, RepositoryError> {
        let customer = customer.into_customer(CustomerId::generate());

        sqlx::query("INSERT INTO customer (id, name, tax_id) VALUES (?, ?, ?)")
            .bind(customer.id.as_str())
            .bind(&customer.name)
            .bind(customer.tax_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|error| map_write_error(error, &customer.tax_id))?;

        Ok(customer)
    }

    async fn update(&self, customer: &Customer) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE customer SET name = ?, tax_id = ? WHERE id = ?")
            .bind(&customer.name)
            .bind(customer.tax_id.as_str())
            .bind(customer.id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|error| map_write_error(error, &customer.tax_id))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &CustomerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM customer WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
