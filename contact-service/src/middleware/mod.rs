//! HTTP middleware: bearer-token authentication and request tracking

mod jwt;
mod request_tracking;
mod token;

pub use jwt::JwtAuth;
pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, sensitive_headers_layer, REQUEST_ID_HEADER,
    SENSITIVE_HEADERS,
};
pub use token::{extract_token, Claims, TokenValidator};
