// Dish handlers module
// Collection-level (list/create) and item-level (read/replace/delete) operations

use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_LENGTH;
use hyper::{Method, Request, Response, StatusCode};

use super::error::ApiError;
use super::response::{empty_response, json_response};
use crate::config::AppState;
use crate::logger;
use crate::store::Dish;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const COLLECTION_METHODS: &str = "GET, POST, OPTIONS";
const ITEM_METHODS: &str = "GET, PUT, DELETE, OPTIONS";

/// `/api/dishes`: list all dishes or create one
pub async fn handle_collection<B>(
    req: Request<B>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, ApiError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    match *req.method() {
        Method::GET => Ok(json_response(StatusCode::OK, &state.store.list().await)),
        Method::POST => {
            let dish = read_dish(req, state.config.http.max_body_size).await?;
            let created = state.store.create(dish).await?;
            logger::log_debug(&format!("Created dish {}", created.id));
            Ok(json_response(StatusCode::CREATED, &created))
        }
        _ => Err(ApiError::MethodNotAllowed {
            allow: COLLECTION_METHODS,
        }),
    }
}

/// `/api/dishes/{id}`: the identifier is resolved before the method is looked at,
/// so an unknown id is a 404 whatever the verb
pub async fn handle_item<B>(
    req: Request<B>,
    raw_id: &str,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, ApiError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let id = parse_id(raw_id)?;
    let dish = state.store.get(id).await.ok_or(ApiError::NotFound)?;

    match *req.method() {
        Method::GET => Ok(json_response(StatusCode::OK, &dish)),
        Method::PUT => {
            let replacement = read_dish(req, state.config.http.max_body_size).await?;
            let updated = state.store.replace(id, replacement).await?;
            logger::log_debug(&format!("Replaced dish {id}"));
            Ok(json_response(StatusCode::OK, &updated))
        }
        Method::DELETE => {
            state.store.remove(id).await?;
            logger::log_debug(&format!("Deleted dish {id}"));
            Ok(empty_response(StatusCode::NO_CONTENT))
        }
        _ => Err(ApiError::MethodNotAllowed {
            allow: ITEM_METHODS,
        }),
    }
}

/// Signed decimal integer, optional leading sign, nothing else
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId)
}

/// Read the body and decode the first JSON value in it as a dish.
///
/// Anything after that first value is ignored.
async fn read_dish<B>(req: Request<B>, max_body_size: u64) -> Result<Dish, ApiError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    check_content_length(&req, max_body_size)?;

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let bytes = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<http_body_util::LengthLimitError>() => {
            return Err(ApiError::PayloadTooLarge)
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return Err(ApiError::BodyRead);
        }
    };

    match serde_json::Deserializer::from_slice(&bytes)
        .into_iter::<Dish>()
        .next()
    {
        Some(Ok(dish)) => Ok(dish),
        Some(Err(e)) => {
            logger::log_debug(&format!("Rejected dish body: {e}"));
            Err(ApiError::InvalidBody)
        }
        None => Err(ApiError::InvalidBody),
    }
}

/// Reject a declared `Content-Length` above the limit before reading anything
fn check_content_length<B>(req: &Request<B>, max_body_size: u64) -> Result<(), ApiError> {
    let Some(value) = req.headers().get(CONTENT_LENGTH) else {
        return Ok(());
    };
    match value.to_str().ok().and_then(|v| v.parse::<u64>().ok()) {
        Some(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Err(ApiError::PayloadTooLarge)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("1").unwrap(), 1);
        assert_eq!(parse_id("+12").unwrap(), 12);
        assert_eq!(parse_id("-3").unwrap(), -3);
        for bad in ["", "abc", "1.5", "1/extra", " 1", "99999999999999999999"] {
            assert!(matches!(parse_id(bad), Err(ApiError::InvalidId)), "{bad:?}");
        }
    }

    #[test]
    fn test_content_length_check() {
        let req = Request::builder()
            .header(CONTENT_LENGTH, "2048")
            .body(())
            .unwrap();
        assert!(matches!(
            check_content_length(&req, 1024),
            Err(ApiError::PayloadTooLarge)
        ));
        assert!(check_content_length(&req, 4096).is_ok());

        let req = Request::builder().body(()).unwrap();
        assert!(check_content_length(&req, 0).is_ok());
    }

    #[tokio::test]
    async fn test_read_dish_ignores_trailing_data() {
        let req = Request::new(Full::new(Bytes::from(r#"{"name":"Paella"} trailing"#)));
        let dish = read_dish(req, 1024).await.unwrap();
        assert_eq!(dish.name, "Paella");
    }

    #[tokio::test]
    async fn test_read_dish_rejects_empty_and_malformed() {
        let req = Request::new(Full::new(Bytes::new()));
        assert!(matches!(read_dish(req, 1024).await, Err(ApiError::InvalidBody)));

        let req = Request::new(Full::new(Bytes::from("{\"name\":")));
        assert!(matches!(read_dish(req, 1024).await, Err(ApiError::InvalidBody)));
    }

    #[tokio::test]
    async fn test_read_dish_enforces_limit_without_content_length() {
        let req = Request::new(Full::new(Bytes::from(vec![b' '; 64])));
        assert!(matches!(read_dish(req, 16).await, Err(ApiError::PayloadTooLarge)));
    }
}
