use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::Row;

use cadastro_core::domain::product::{NewProduct, Product, ProductId};

use super::{ProductRepository, RepositoryError};
use crate::DbPool;

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

// Prices are stored as decimal text so no binary float rounding sneaks in.
fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price: String =
        row.try_get("price").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price = Decimal::from_str(&price)
        .map_err(|e| RepositoryError::Decode(format!("product {id} price `{price}`: {e}")))?;

    Ok(Product { id: ProductId(id), name, price })
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, price FROM product ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_product).collect::<Result<Vec<_>, _>>()
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, price FROM product WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_product).transpose()
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let product = product.into_product(ProductId::generate());

        sqlx::query("INSERT INTO product (id, name, price) VALUES (?, ?, ?)")
            .bind(product.id.as_str())
            .bind(&product.name)
            .bind(product.price.to_string())
            .execute(&self.pool)
            .await?;

        Ok(product)
    }

    async fn update(&self, product: &Product) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE product SET name = ?, price = ? WHERE id = ?")
            .bind(&product.name)
            .bind(product.price.to_string())
            .bind(product.id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
