//! Common types used throughout the middleware chain.
//!
//! Requests and responses are plain `http` types with a buffered [`Bytes`]
//! body; the chain never streams.

use bytes::Bytes;
use http::{header, HeaderValue, StatusCode};
use serde::Serialize;

/// The HTTP request type used in the middleware chain.
pub type Request = http::Request<Bytes>;

/// The HTTP response type used in the middleware chain.
pub type Response = http::Response<Bytes>;

/// Marker stored in the extensions of the response produced when a chain
/// runs out of middleware without a handler to hand off to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainExhausted;

/// Body of the JSON responses produced by the enforcement stages.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    success: bool,
    message: &'a str,
}

/// Extension trait for building chain responses.
pub trait ResponseExt {
    /// Creates a plain-text response with the given status code.
    fn error(status: StatusCode, message: &str) -> Response;

    /// Creates a JSON response of the form `{"success":false,"message":...}`.
    fn json_error(status: StatusCode, message: &str) -> Response;

    /// Creates a `303 See Other` redirect to `location`.
    fn redirect(location: HeaderValue) -> Response;

    /// Creates the response returned when the chain is exhausted.
    ///
    /// It is an empty `200 OK` carrying the [`ChainExhausted`] marker, so
    /// the integrator can tell "every middleware passed" apart from a
    /// response a middleware produced itself.
    fn chain_exhausted() -> Response;

    /// Returns true if this is the chain-exhausted response.
    fn is_chain_exhausted(&self) -> bool;
}

impl ResponseExt for Response {
    fn error(status: StatusCode, message: &str) -> Response {
        http::Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Bytes::from(message.to_string()))
            .expect("failed to build error response")
    }

    fn json_error(status: StatusCode, message: &str) -> Response {
        let envelope = Envelope {
            success: false,
            message,
        };
        let body = serde_json::to_vec(&envelope).expect("envelope serializes");

        http::Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Bytes::from(body))
            .expect("failed to build JSON error response")
    }

    fn redirect(location: HeaderValue) -> Response {
        http::Response::builder()
            .status(StatusCode::SEE_OTHER)
            .header(header::LOCATION, location)
            .body(Bytes::new())
            .expect("failed to build redirect response")
    }

    fn chain_exhausted() -> Response {
        let mut response = http::Response::new(Bytes::new());
        response.extensions_mut().insert(ChainExhausted);
        response
    }

    fn is_chain_exhausted(&self) -> bool {
        self.extensions().get::<ChainExhausted>().is_some()
    }
}
