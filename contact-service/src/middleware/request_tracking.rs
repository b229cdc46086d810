//! Request id generation and header masking for access logs

use http::HeaderName;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

use crate::ids::MakeTypedRequestId;

/// Request header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Headers masked in trace output
pub const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie", "x-api-key"];

/// Assign a `req_<uuidv7>` id to requests that arrive without one
pub fn request_id_layer() -> SetRequestIdLayer<MakeTypedRequestId> {
    SetRequestIdLayer::x_request_id(MakeTypedRequestId)
}

/// Echo the request id back on the response
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Mark credentials as sensitive so `TraceLayer` prints them as `Sensitive`
pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    let headers = SENSITIVE_HEADERS
        .iter()
        .copied()
        .map(HeaderName::from_static)
        .collect::<Vec<_>>();

    SetSensitiveRequestHeadersLayer::new(headers)
}
