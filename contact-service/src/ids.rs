//! TypeID identifiers for contacts and requests
//!
//! Every id is a [TypeID](https://github.com/jetpack-io/typeid) built on a
//! UUIDv7, so ids carry a readable prefix and sort by creation time:
//!
//! - contacts: `contact_01h455vb4pex5vsknk084sn02q`
//! - requests: `req_01h455vb4pex5vsknk084sn02q`

use http::Request;
use mti::prelude::*;
use tower_http::request_id::{MakeRequestId, RequestId as TowerRequestId};

/// Prefix carried by every contact id
pub const CONTACT_PREFIX: &str = "contact";

/// Generate a fresh contact id.
///
/// Ids are never reused: each call draws a new UUIDv7.
#[must_use]
pub fn new_contact_id() -> String {
    CONTACT_PREFIX.create_type_id::<V7>().to_string()
}

/// A request identifier used for log correlation.
///
/// Format: `req_<base32-encoded-uuidv7>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(MagicTypeId);

impl RequestId {
    /// The prefix used for request IDs
    pub const PREFIX: &'static str = "req";

    /// Creates a new time-sortable request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Self::PREFIX.create_type_id::<V7>())
    }

    /// Returns the request ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

/// `MakeRequestId` for `tower_http::request_id::SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TowerRequestId> {
        let id = RequestId::new();
        let header_value = http::HeaderValue::from_str(id.as_str()).ok()?;
        Some(TowerRequestId::new(header_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_contact_id_format() {
        let id = new_contact_id();
        assert!(id.starts_with("contact_"));
        // prefix (7) + underscore (1) + suffix (26)
        assert_eq!(id.len(), 34);
    }

    #[test]
    fn test_contact_ids_are_unique() {
        let ids: std::collections::HashSet<String> = (0..1000).map(|_| new_contact_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_contact_ids_sort_by_creation_time() {
        let first = new_contact_id();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = new_contact_id();
        assert!(first < second);
    }

    #[test]
    fn test_make_typed_request_id() {
        let mut maker = MakeTypedRequestId;
        let request = http::Request::builder().body(()).unwrap();

        let header_value = maker.make_request_id(&request).unwrap().into_header_value();
        assert!(header_value.to_str().unwrap().starts_with("req_"));
    }
}
