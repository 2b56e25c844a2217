// API module entry
// Routes `/api/dishes` and `/api/dishes/{id}` behind the CORS gate

mod cors;
mod error;
mod handlers;
mod response;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, HeaderValue, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::logger::{self, AccessLogEntry};

pub use error::ApiError;

/// Exact path of the collection route
pub const COLLECTION_PATH: &str = "/api/dishes";
/// Prefix of the item route, followed by the dish id
pub const ITEM_PREFIX: &str = "/api/dishes/";

/// Main entry point for HTTP request handling
///
/// Never fails: every error becomes a response here.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let access_entry = state
        .config
        .logging
        .access_log
        .then(|| access_entry(&req, peer_addr));

    let mut response = route(req, &state).await;

    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Which registered route a path belongs to
#[derive(Debug, PartialEq, Eq)]
enum Route<'a> {
    Collection,
    /// Remainder of the path after the item prefix
    Item(&'a str),
}

fn match_route(path: &str) -> Option<Route<'_>> {
    if path == COLLECTION_PATH {
        Some(Route::Collection)
    } else {
        path.strip_prefix(ITEM_PREFIX).map(Route::Item)
    }
}

async fn route<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = req.uri().path().to_string();
    let Some(route) = match_route(&path) else {
        return response::not_found();
    };

    if *req.method() == Method::OPTIONS {
        return cors::preflight();
    }

    let result = match route {
        Route::Collection => handlers::handle_collection(req, state).await,
        Route::Item(raw_id) => handlers::handle_item(req, raw_id, state).await,
    };

    let mut response = result.unwrap_or_else(ApiError::into_response);
    cors::apply(response.headers_mut());
    response
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}
