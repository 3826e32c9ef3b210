//! Upstream forwarding for `proxy` routes.
//!
//! # Responsibilities
//! - Rewrite the request URI to the upstream authority, sending the
//!   normalized path that was routed on
//! - Forward with the shared connection-pooling client
//! - Map upstream failures to 502 Bad Gateway

use axum::{
    body::Body,
    http::{
        uri::{Scheme, Uri},
        HeaderValue, Request, StatusCode,
    },
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::http::request::X_REQUEST_ID;
use crate::path::normalize;

/// Client used for all upstream requests.
pub type HttpClient = Client<HttpConnector, Body>;

pub fn new_client() -> HttpClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

/// Build the upstream URI for `uri`: the normalized path the route matched,
/// plus the original query.
pub fn upstream_uri(upstream: &str, uri: &Uri) -> Result<Uri, axum::http::Error> {
    let path = normalize(uri.path());
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };

    Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(upstream)
        .path_and_query(path_and_query)
        .build()
}

/// Forward `request` to `upstream` and relay its response.
pub async fn forward(
    client: &HttpClient,
    upstream: &str,
    request: Request<Body>,
    request_id: &str,
) -> Response {
    let (mut parts, body) = request.into_parts();

    parts.uri = match upstream_uri(upstream, &parts.uri) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(request_id = %request_id, upstream = %upstream, error = %e, "Invalid upstream URI");
            return (StatusCode::BAD_GATEWAY, "Invalid upstream").into_response();
        }
    };
    if let Ok(value) = HeaderValue::from_str(request_id) {
        parts.headers.insert(X_REQUEST_ID, value);
    }

    tracing::debug!(request_id = %request_id, uri = %parts.uri, "Forwarding request upstream");

    match client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, upstream = %upstream, error = %e, "Upstream error");
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
