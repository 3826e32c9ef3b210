//! Response construction.
//!
//! # Responsibilities
//! - Build configured `respond` answers, filling `{name}` placeholders
//! - Map dispatch errors to status codes (404, 405 + `Allow`)
//! - Tag responses with the route that produced them

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::routing::DispatchError;

/// Response header naming the matched route.
pub const X_MUX_ROUTE: &str = "x-mux-route";

/// Replace `{name}` (or `{*name}`) placeholders in `template` with the
/// captured value of the same name. Unknown placeholders are left untouched.
pub fn render_body(template: &str, params: &[(String, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            rest = "";
            break;
        };

        let placeholder = &after[..close];
        let name = placeholder.strip_prefix('*').unwrap_or(placeholder);
        match params.iter().find(|(key, _)| key == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(placeholder);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Build a configured direct response.
pub fn respond(status: u16, body: &str, content_type: &str, params: &[(String, String)]) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);
    let mut response = (status, render_body(body, params)).into_response();
    if let Ok(value) = HeaderValue::from_str(content_type) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}

/// Map a dispatch failure to its HTTP response.
pub fn dispatch_error(err: &DispatchError) -> Response {
    match err {
        DispatchError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "not found" })),
        )
            .into_response(),
        DispatchError::MethodNotAllowed(methods) => {
            let mut response = (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(json!({ "error": "method not allowed", "allowed": methods })),
            )
                .into_response();
            if let Ok(allow) = HeaderValue::from_str(&methods.join(", ")) {
                response.headers_mut().insert(header::ALLOW, allow);
            }
            response
        }
    }
}

/// Attach the route name header, when the name is a valid header value.
pub fn tag_route(response: &mut Response, route: &str) {
    if let Ok(value) = HeaderValue::from_str(route) {
        response.headers_mut().insert(X_MUX_ROUTE, value);
    }
}
