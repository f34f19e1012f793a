use thiserror::Error;

use crate::domain::Resource;

/// Input rejected before any data access happens.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Campos obrigatórios não preenchidos")]
    MissingRequiredFields,
    #[error("Id do {0} inválido!")]
    InvalidRecordId(Resource),
    #[error("Nome do {0} inválido!")]
    BlankName(Resource),
    #[error("CPF inválido!")]
    InvalidTaxId,
    #[error("Preço do produto inválido!")]
    InvalidPrice,
    #[error("Corpo da requisição inválido!")]
    MalformedBody(String),
    #[error("Parâmetros da consulta inválidos!")]
    MalformedQuery(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("{0} not found")]
    NotFound(Resource),
    #[error("tax id is already registered")]
    DuplicateTaxId,
    #[error("persistence failure: {0}")]
    Persistence(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String },
    #[error("not found: {message}")]
    NotFound { message: String },
    #[error("conflict: {message}")]
    Conflict { message: String },
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl InterfaceError {
    /// Text safe to hand back to the caller. Internal details never leave the process.
    pub fn user_message(&self) -> &str {
        match self {
            Self::BadRequest { message }
            | Self::NotFound { message }
            | Self::Conflict { message } => message,
            Self::Internal { .. } => "Erro interno no servidor.",
        }
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Domain(error) => Self::BadRequest { message: error.to_string() },
            ApplicationError::NotFound(Resource::Customer) => {
                Self::NotFound { message: "Cliente não encontrado!".to_owned() }
            }
            ApplicationError::NotFound(Resource::Product) => {
                Self::NotFound { message: "Produto não encontrado!".to_owned() }
            }
            ApplicationError::DuplicateTaxId => {
                Self::Conflict { message: "Esse CPF já está cadastrado!".to_owned() }
            }
            ApplicationError::Persistence(message) => Self::Internal { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::Resource;
    use crate::errors::{ApplicationError, DomainError, InterfaceError};

    #[test]
    fn domain_error_maps_to_bad_request_with_its_message() {
        let interface = InterfaceError::from(ApplicationError::from(DomainError::InvalidTaxId));

        assert!(matches!(interface, InterfaceError::BadRequest { .. }));
        assert_eq!(interface.user_message(), "CPF inválido!");
    }

    #[test]
    fn invalid_record_id_names_the_resource() {
        let interface = InterfaceError::from(ApplicationError::from(
            DomainError::InvalidRecordId(Resource::Product),
        ));

        assert_eq!(interface.user_message(), "Id do produto inválido!");
    }

    #[test]
    fn missing_records_map_to_not_found() {
        let interface = InterfaceError::from(ApplicationError::NotFound(Resource::Customer));

        assert!(matches!(interface, InterfaceError::NotFound { .. }));
        assert_eq!(interface.user_message(), "Cliente não encontrado!");
    }

    #[test]
    fn duplicate_tax_id_maps_to_conflict() {
        let interface = InterfaceError::from(ApplicationError::DuplicateTaxId);

        assert!(matches!(interface, InterfaceError::Conflict { .. }));
        assert_eq!(interface.user_message(), "Esse CPF já está cadastrado!");
    }

    #[test]
    fn persistence_error_does_not_leak_details() {
        let interface = InterfaceError::from(ApplicationError::Persistence(
            "database is locked".to_owned(),
        ));

        assert!(matches!(interface, InterfaceError::Internal { ref message } if message == "database is locked"));
        assert_eq!(interface.user_message(), "Erro interno no servidor.");
    }
}
