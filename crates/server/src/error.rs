use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cadastro_core::errors::{ApplicationError, DomainError, InterfaceError};
use cadastro_db::repositories::RepositoryError;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Body of every non-2xx response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub erro: String,
}

/// Body of responses that confirm an action without returning a record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub mensagem: String,
}

impl MessageBody {
    pub fn new(mensagem: impl Into<String>) -> Self {
        Self { mensagem: mensagem.into() }
    }
}

/// The single point where handler outcomes become HTTP status codes.
#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::Conflict { .. } => StatusCode::CONFLICT,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(value: ApplicationError) -> Self {
        Self(InterfaceError::from(value))
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        Self::from(ApplicationError::from(value))
    }
}

impl From<RepositoryError> for ApiError {
    fn from(value: RepositoryError) -> Self {
        Self::from(ApplicationError::from(value))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(
            event_name = "http.request.malformed_body",
            detail = %rejection.body_text(),
            "request body rejected"
        );
        Self::from(DomainError::MalformedBody(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        debug!(
            event_name = "http.request.malformed_query",
            detail = %rejection.body_text(),
            "query string rejected"
        );
        Self::from(DomainError::MalformedQuery(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let InterfaceError::Internal { message } = &self.0 {
            error!(
                event_name = "http.request.internal_error",
                error = %message,
                "request failed on data access"
            );
        }

        (status, Json(ErrorBody { erro: self.0.user_message().to_string() })).into_response()
    }
}
