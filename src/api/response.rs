// Response builder module

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::logger;

const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

/// Build JSON response: compact, newline-terminated
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(mut json) => {
            json.push(b'\n');
            build(status, Some(JSON), Bytes::from(json))
        }
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Plain-text response, used for every non-2xx status
pub fn text_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    build(status, Some(TEXT), Bytes::copy_from_slice(message.as_bytes()))
}

/// Response without a body (204, preflight)
pub fn empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    build(status, None, Bytes::new())
}

/// 404 for paths outside the registered routes
pub fn not_found() -> Response<Full<Bytes>> {
    text_response(StatusCode::NOT_FOUND, "404 page not found")
}

fn build(status: StatusCode, content_type: Option<&str>, body: Bytes) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(status);
    if let Some(content_type) = content_type {
        builder = builder.header("Content-Type", content_type);
    }
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to build {status} response: {e}"));
        Response::new(Full::new(Bytes::new()))
    })
}
