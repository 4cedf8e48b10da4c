use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::booking::BookingError;

pub const LOGIN_PATH: &str = "/login";
pub const CHECKOUT_PATH: &str = "/checkout";

/// Ошибки обращения к внешнему backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 401: сессии нет или она истекла.
    #[error("not authenticated")]
    Unauthorized,
    /// Не-OK ответ с полем `error`, либо `success: false`.
    #[error("{0}")]
    Business(String),
    #[error("resource not found")]
    NotFound,
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("failed to encode query: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Ошибки HTTP-слоя фронта.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("authentication required")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("request already in progress")]
    Conflict,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("upstream failure: {0}")]
    Upstream(ApiError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => AppError::Unauthorized,
            other => AppError::Upstream(other),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::AlreadySubmitting => AppError::Conflict,
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => Redirect::to(LOGIN_PATH).into_response(),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Html("<div class=\"empty\"><p>Page introuvable.</p></div>".to_string()),
            )
                .into_response(),
            AppError::Conflict => (StatusCode::CONFLICT, self.to_string()).into_response(),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            AppError::Upstream(ref err) => {
                tracing::error!("Upstream request failed: {:?}", err);
                (StatusCode::BAD_GATEWAY, self.to_string()).into_response()
            }
            AppError::Internal(ref message) => {
                tracing::error!("Internal error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
        }
    }
}
