use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{validate_name, validate_record_id, Resource};
use crate::errors::DomainError;

/// Brazilian CPF numbers are stored unformatted: eleven digits, no punctuation.
pub const TAX_ID_LEN: usize = 11;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub String);

impl CustomerId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        validate_record_id(raw, Resource::Customer)?;
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxId(String);

impl TaxId {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.len() != TAX_ID_LEN || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(DomainError::InvalidTaxId);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "idCliente")]
    pub id: CustomerId,
    #[serde(rename = "nomeCliente")]
    pub name: String,
    #[serde(rename = "cpfCliente")]
    pub tax_id: TaxId,
}

/// Validated input for a customer that does not exist yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub tax_id: TaxId,
}

impl NewCustomer {
    pub fn new(name: Option<String>, tax_id: Option<String>) -> Result<Self, DomainError> {
        let (Some(name), Some(tax_id)) = (name, tax_id) else {
            return Err(DomainError::MissingRequiredFields);
        };
        if name.trim().is_empty() || tax_id.is_empty() {
            return Err(DomainError::MissingRequiredFields);
        }

        let tax_id = TaxId::parse(&tax_id)?;
        Ok(Self { name, tax_id })
    }

    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer { id, name: self.name, tax_id: self.tax_id }
    }
}

/// Partial update: every field left as `None` keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub tax_id: Option<TaxId>,
}

impl CustomerPatch {
    pub fn new(name: Option<String>, tax_id: Option<String>) -> Result<Self, DomainError> {
        if let Some(name) = &name {
            validate_name(name, Resource::Customer)?;
        }
        let tax_id = tax_id.as_deref().map(TaxId::parse).transpose()?;
        Ok(Self { name, tax_id })
    }

    pub fn apply_to(self, current: Customer) -> Customer {
        Customer {
            id: current.id,
            name: self.name.unwrap_or(current.name),
            tax_id: self.tax_id.unwrap_or(current.tax_id),
        }
    }
}
