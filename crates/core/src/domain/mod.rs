use std::fmt;

use crate::errors::DomainError;

pub mod customer;
pub mod product;

/// Length of the UUID-shaped textual key every record is identified by.
pub const RECORD_ID_LEN: usize = 36;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Customer,
    Product,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => f.write_str("cliente"),
            Self::Product => f.write_str("produto"),
        }
    }
}

pub(crate) fn validate_record_id(raw: &str, resource: Resource) -> Result<(), DomainError> {
    if raw.chars().count() != RECORD_ID_LEN {
        return Err(DomainError::InvalidRecordId(resource));
    }
    Ok(())
}

pub(crate) fn validate_name(raw: &str, resource: Resource) -> Result<(), DomainError> {
    if raw.trim().is_empty() {
        return Err(DomainError::BlankName(resource));
    }
    Ok(())
}
