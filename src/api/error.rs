// API error module
// Every per-request failure maps to one status code and a plain-text message

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW};
use hyper::{Response, StatusCode};

use super::response::text_response;
use crate::logger;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body is not a JSON dish
    #[error("Invalid input")]
    InvalidBody,

    /// Path suffix is not an integer
    #[error("Invalid dish ID")]
    InvalidId,

    #[error("Dish not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed { allow: &'static str },

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Failed to read request body")]
    BodyRead,

    /// The mutation was not persisted and has not been applied
    #[error("Failed to save data")]
    Persist(#[source] StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound,
            other => Self::Persist(other),
        }
    }
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody | Self::InvalidId | Self::BodyRead => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Persist(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        if let Self::Persist(ref source) = self {
            logger::log_error(&format!("Failed to persist dishes: {source}"));
        }

        let mut response = text_response(self.status(), &self.to_string());
        if let Self::MethodNotAllowed { allow } = self {
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static(allow));
        }
        response
    }
}
