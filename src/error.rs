/*
 * Responsibility
 * - アプリ共通の AppError 定義 (admission の拒否理由を含む閉じた分類)
 * - IntoResponse 実装 (HTTP status / JSON `{ "message" }` body)
 * - TokenError / ResolveError / RepoError を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::identity::ResolveError;
use crate::services::auth::token::TokenError;

pub const MSG_NO_CREDENTIAL: &str = "No token, authorization denied";
pub const MSG_INVALID_TOKEN: &str = "Invalid Token";
pub const MSG_EXPIRED_TOKEN: &str = "Token Expired";
pub const MSG_USER_NOT_FOUND: &str = "User not found";
pub const MSG_ROUTE_NOT_FOUND: &str = "Route not found";
pub const MSG_INTERNAL: &str = "Internal Server Error";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: &'static str,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("origin not allowed: {origin}")]
    OriginRejected { origin: String },
    #[error("no credential")]
    NoCredential,
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    ExpiredToken,
    #[error("user not found")]
    UserNotFound,
    #[error("route not found")]
    RouteNotFound,
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // No body and no CORS headers: the browser must not see anything.
            AppError::OriginRejected { .. } => return StatusCode::FORBIDDEN.into_response(),
            AppError::NoCredential => (StatusCode::UNAUTHORIZED, MSG_NO_CREDENTIAL),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, MSG_INVALID_TOKEN),
            AppError::ExpiredToken => (StatusCode::UNAUTHORIZED, MSG_EXPIRED_TOKEN),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, MSG_USER_NOT_FOUND),
            AppError::RouteNotFound => (StatusCode::NOT_FOUND, MSG_ROUTE_NOT_FOUND),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Malformed(_) => AppError::InvalidToken,
            TokenError::Expired => AppError::ExpiredToken,
        }
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::SubjectNotFound => AppError::UserNotFound,
            ResolveError::Storage(e) => e.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        tracing::error!(error = ?e, "storage failure");
        AppError::Internal
    }
}
