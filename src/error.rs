use crate::data_model::process_result::ProcessResult;
use crate::server::assign::AssignError;
use crate::state::store::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

pub const INTERNAL_ERROR_MSG: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid login/password")]
    InvalidCredentials,

    #[error("Not logged in")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("No mentors available for assignment. Please try again later.")]
    NoMentorAvailable,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AssignError> for AppError {
    fn from(err: AssignError) -> Self {
        match err {
            AssignError::NoMentorAvailable => AppError::NoMentorAvailable,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NoMentorAvailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let msg = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self);
            INTERNAL_ERROR_MSG.to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(ProcessResult::failed(&msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use std::io;

    async fn body_of(err: AppError) -> (StatusCode, ProcessResult) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn storage_details_stay_in_the_log() {
        let err = AppError::Store(StoreError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            "/srv/data/collection/mentor/cnt",
        )));
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.succeeded);
        assert_eq!(body.error, INTERNAL_ERROR_MSG);
        assert!(!body.error.contains("/srv/data"));
    }

    #[actix_web::test]
    async fn client_errors_keep_their_message() {
        let (status, body) = body_of(AppError::NoMentorAvailable).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.error.starts_with("No mentors available"));

        let (status, body) = body_of(AppError::BadRequest("All fields are required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "All fields are required");
    }
}
