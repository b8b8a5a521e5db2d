use thiserror::Error;

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{context::ContextError, pagination::ParamError, store::StoreError};

/// Error returned by handlers, translated into a JSON response
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed `limit` or `page`
    #[error(transparent)]
    Param(#[from] ParamError),
    /// Query string could not be decoded
    #[error(transparent)]
    Query(#[from] QueryRejection),
    /// Request url cannot serve as a template for navigation links
    #[error(transparent)]
    Context(#[from] ContextError),
    /// Storage failed or rejected the query, `what` names the resource for the client
    #[error("{source}")]
    Store {
        /// What was being fetched
        what: &'static str,
        /// Underlying failure
        source: StoreError,
    },
    /// Resource does not exist
    #[error("{0} not found.")]
    NotFound(&'static str),
    /// Client exceeded its request budget
    #[error("too many requests")]
    RateLimited,
    /// Anything else, e.g. a panicked blocking task
    #[error("generic")]
    Err(#[from] anyhow::Error),
}

impl ApiError {
    /// Attach what was being fetched to a storage error
    #[must_use]
    pub const fn store(what: &'static str, source: StoreError) -> Self {
        Self::Store { what, source }
    }

    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            Self::Param(e) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", e.to_string()),
            Self::Query(e) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", e.body_text()),
            Self::Context(e) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", e.to_string()),
            Self::Store { source: e @ StoreError::UnknownField(_), .. } => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", e.to_string())
            }
            Self::Store { what, source } => {
                tracing::error!(error = %source, what, "store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    format!("An error occurred while fetching {what}."),
                )
            }
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            Self::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "Too many requests, please try again later.".to_owned(),
            ),
            Self::Err(e) => {
                tracing::error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred.".to_owned(),
                )
            }
        }
    }
}

// Tell axum how to convert `ApiError` into a response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}

// Lets `RequestContext` be used directly as an extractor
impl IntoResponse for ContextError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
