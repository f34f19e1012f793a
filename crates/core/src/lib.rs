pub mod config;
pub mod domain;
pub mod errors;

pub use domain::customer::{Customer, CustomerId, CustomerPatch, NewCustomer, TaxId};
pub use domain::product::{NewProduct, Product, ProductId, ProductPatch};
pub use domain::Resource;
pub use errors::{ApplicationError, DomainError, InterfaceError};
