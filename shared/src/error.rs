use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error(transparent)]
    ValidationError(#[from] garde::Report),
    #[error("{0}")]
    ConversionEntityError(String),
    #[error("database operation failed")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("failed to run transaction")]
    TransactionError(#[source] sqlx::Error),
    #[error("failed to run database query")]
    DbQueryError(#[source] sqlx::Error),
    #[error("unauthenticated")]
    UnauthenticatedError,
    #[error("operation not permitted")]
    ForbiddenOperation,
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match self {
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) | AppError::ConversionEntityError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::UnauthenticatedError => StatusCode::UNAUTHORIZED,
            AppError::ForbiddenOperation => StatusCode::FORBIDDEN,
            AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::TransactionError(_)
            | AppError::DbQueryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status_code.is_server_error() {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "unexpected error happened"
            );
        } else {
            tracing::warn!(
                error.cause_chain = ?self,
                error.message = %self,
                "request rejected"
            );
        }

        (status_code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_failures_map_to_internal_server_error() {
        for err in [
            AppError::DbQueryError(sqlx::Error::RowNotFound),
            AppError::SpecificOperationError(sqlx::Error::RowNotFound),
            AppError::TransactionError(sqlx::Error::RowNotFound),
        ] {
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn domain_rejections_map_to_client_errors() {
        assert_eq!(
            AppError::UnprocessableEntity("refused".into())
                .into_response()
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::EntityNotFound("missing".into())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ForbiddenOperation.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
