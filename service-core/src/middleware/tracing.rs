//! Correlation-id propagation.
//!
//! Every request and its response carry an `x-request-id` header so log lines
//! across services can be stitched together. A caller-supplied id is kept;
//! requests arriving without one get a fresh UUID.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let id = correlation_id(req.headers());
    req.headers_mut()
        .insert(REQUEST_ID_HEADER.clone(), id.clone());

    let mut response = next.run(req).await;
    response.headers_mut().insert(REQUEST_ID_HEADER.clone(), id);
    response
}

fn correlation_id(headers: &HeaderMap) -> HeaderValue {
    match headers.get(&REQUEST_ID_HEADER) {
        Some(id) if !id.is_empty() => id.clone(),
        _ => fresh_id(),
    }
}

fn fresh_id() -> HeaderValue {
    // A hyphenated UUID is always a valid header value.
    HeaderValue::from_str(&Uuid::new_v4().to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_supplied_id_is_kept() {
        let mut headers = HeaderMap::new();
        headers.insert(
            REQUEST_ID_HEADER.clone(),
            HeaderValue::from_static("req-abc-123"),
        );
        assert_eq!(correlation_id(&headers), "req-abc-123");
    }

    #[test]
    fn missing_id_gets_a_uuid() {
        let headers = HeaderMap::new();
        let id = correlation_id(&headers);
        let value = id.to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }

    #[test]
    fn empty_id_is_replaced() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER.clone(), HeaderValue::from_static(""));
        let id = correlation_id(&headers);
        assert!(!id.is_empty());
    }
}
