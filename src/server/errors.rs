use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// The only error kinds a client ever sees. Each renders as
/// `{"success": false, "error": <status>, "message": <text>}`.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Resource not found")]
    NotFound,
    #[error("Unprocessable entity")]
    Unprocessable,
    #[error("Bad request")]
    BadRequest,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> ApiError {
        match error {
            sqlx::Error::RowNotFound => {
                tracing::debug!("Row not found");
                ApiError::NotFound
            }
            error => {
                tracing::error!(%error, "Database error");
                ApiError::Unprocessable
            }
        }
    }
}

// JSON that parses but has the wrong shape is unprocessable, anything that
// doesn't parse at all is a bad request
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> ApiError {
        tracing::debug!(%rejection, "Rejected JSON body");
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::Unprocessable,
            _ => ApiError::BadRequest,
        }
    }
}

// ids in paths are integers, anything else doesn't name a resource
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> ApiError {
        tracing::debug!(%rejection, "Rejected path");
        ApiError::NotFound
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> ApiError {
        tracing::debug!(%rejection, "Rejected query string");
        ApiError::BadRequest
    }
}
