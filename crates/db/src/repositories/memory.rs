use std::collections::HashMap;

use tokio::sync::RwLock;

use cadastro_core::domain::customer::{Customer, CustomerId, NewCustomer, TaxId};
use cadastro_core::domain::product::{NewProduct, Product, ProductId};

use super::{CustomerRepository, ProductRepository, RepositoryError};

/// Enforces the same tax id uniqueness as the SQL unique index.
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<HashMap<String, Customer>>,
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let customers = self.customers.read().await;
        let mut all: Vec<Customer> = customers.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.0.cmp(&b.id.0)));
        Ok(all)
    }

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customers = self.customers.read().await;
        Ok(customers.get(&id.0).cloned())
    }

    async fn find_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Customer>, RepositoryError> {
        let customers = self.customers.read().await;
        Ok(customers.values().find(|customer| &customer.tax_id == tax_id).cloned())
    }

    async fn insert(&self, customer: NewCustomer) -> Result<Customer, RepositoryError> {
        let mut customers = self.customers.write().await;
        if customers.values().any(|existing| existing.tax_id == customer.tax_id) {
            return Err(RepositoryError::DuplicateTaxId(customer.tax_id.as_str().to_string()));
        }

        let customer = customer.into_customer(CustomerId::generate());
        customers.insert(customer.id.0.clone(), customer.clone());
        Ok(customer)
    }

    async fn update(&self, customer: &Customer) -> Result<bool, RepositoryError> {
        let mut customers = self.customers.write().await;
        let taken = customers
            .values()
            .any(|existing| existing.id != customer.id && existing.tax_id == customer.tax_id);
        if taken {
            return Err(RepositoryError::DuplicateTaxId(customer.tax_id.as_str().to_string()));
        }

        match customers.get_mut(&customer.id.0) {
            Some(stored) => {
                *stored = customer.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &CustomerId) -> Result<bool, RepositoryError> {
        let mut customers = self.customers.write().await;
        Ok(customers.remove(&id.0).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<String, Product>>,
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.0.cmp(&b.id.0)));
        Ok(all)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.get(&id.0).cloned())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let product = product.into_product(ProductId::generate());
        let mut products = self.products.write().await;
        products.insert(product.id.0.clone(), product.clone());
        Ok(product)
    }

    async fn update(&self, product: &Product) -> Result<bool, RepositoryError> {
        let mut products = self.products.write().await;
        match products.get_mut(&product.id.0) {
            Some(stored) => {
                *stored = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError> {
        let mut products = self.products.write().await;
        Ok(products.remove(&id.0).is_some())
    }
}
