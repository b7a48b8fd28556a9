//! Test request building.

use crate::error::TestError;
use crate::response::TestResponse;
use bytes::Bytes;
use gatehouse_core::{CallerIdentity, RequestId};
use gatehouse_middleware::{Chain, MiddlewareContext, Request, Response};
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use serde::Serialize;

/// A request ready to be run through a [`Chain`], together with the caller
/// it is made on behalf of.
#[derive(Debug, Clone)]
pub struct TestRequest {
    /// HTTP method
    pub method: Method,
    /// Request URI
    pub uri: Uri,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Bytes,
    /// Identity placed in the context before the chain runs
    pub identity: CallerIdentity,
    /// Request ID for the context, generated if unset
    pub request_id: Option<RequestId>,
}

impl TestRequest {
    /// Creates a new GET request.
    pub fn get(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, uri)
    }

    /// Creates a new POST request.
    pub fn post(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, uri)
    }

    /// Creates a new PUT request.
    pub fn put(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, uri)
    }

    /// Creates a new PATCH request.
    pub fn patch(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PATCH, uri)
    }

    /// Creates a new DELETE request.
    pub fn delete(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, uri)
    }

    /// Converts this request to a chain request, dropping the identity.
    pub fn into_http_request(self) -> Request {
        self.into_parts().1
    }

    /// Splits this request into the context and the chain request.
    pub fn into_parts(self) -> (MiddlewareContext, Request) {
        let mut ctx = match self.request_id {
            Some(id) => MiddlewareContext::with_request_id(id),
            None => MiddlewareContext::new(),
        };
        ctx.set_identity(self.identity);

        let mut request = http::Request::new(self.body);
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        *request.headers_mut() = self.headers;

        (ctx, request)
    }

    /// Runs the request through `chain` without a handler.
    pub fn run(self, chain: &Chain) -> TestResponse {
        let (mut ctx, request) = self.into_parts();
        TestResponse::from_response(chain.process(&mut ctx, request))
    }

    /// Runs the request through `chain`, handing off to `handler` if every
    /// middleware passes it on.
    pub fn run_with<H>(self, chain: &Chain, handler: H) -> TestResponse
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> Response,
    {
        self.run_with_context(chain, handler).0
    }

    /// Like [`run_with`](Self::run_with), also returning the context so
    /// tests can inspect what the middleware stored in it.
    pub fn run_with_context<H>(self, chain: &Chain, handler: H) -> (TestResponse, MiddlewareContext)
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> Response,
    {
        let (mut ctx, request) = self.into_parts();
        let response = chain.process_with(&mut ctx, request, handler);
        (TestResponse::from_response(response), ctx)
    }
}

/// Builder for constructing test requests.
///
/// Invalid header names or values are reported by [`build`](Self::build)
/// rather than at the call that introduced them.
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Option<Bytes>,
    identity: CallerIdentity,
    request_id: Option<RequestId>,
    error: Option<TestError>,
}

impl TestRequestBuilder {
    /// Creates a new request builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: None,
            identity: CallerIdentity::anonymous(),
            request_id: None,
            error: None,
        }
    }

    /// Sets a header on the request.
    ///
    /// # Example
    ///
    /// ```
    /// use gatehouse_test::TestRequest;
    ///
    /// let request = TestRequest::get("/forms")
    ///     .header("X-Forwarded-For", "10.0.0.1")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(request.headers["x-forwarded-for"], "10.0.0.1");
    /// ```
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = HeaderName::try_from(name.as_ref());
        let value = HeaderValue::try_from(value.as_ref());
        match (name, value) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            (Err(e), _) => self.fail(TestError::InvalidHeader(e.to_string())),
            (_, Err(e)) => self.fail(TestError::InvalidHeader(e.to_string())),
        }
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the Authorization header with a Bearer token.
    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        self.header(header::AUTHORIZATION.as_str(), format!("Bearer {}", token.as_ref()))
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the request body as JSON.
    ///
    /// This also sets the `Content-Type` header to `application/json`.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.body = Some(Bytes::from(bytes)),
            Err(e) => self.fail(TestError::Json(e)),
        }
        self.content_type("application/json")
    }

    /// Makes the request on behalf of `identity`.
    pub fn identity(mut self, identity: CallerIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Makes the request as a signed-in, non-admin user.
    pub fn as_user(self, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let email = format!("{user_id}@example.com");
        self.identity(CallerIdentity::user(user_id, email))
    }

    /// Makes the request as an administrator.
    pub fn as_admin(self, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let email = format!("{user_id}@example.com");
        self.identity(CallerIdentity::admin(user_id, email))
    }

    /// Fixes the request ID placed in the context.
    pub fn request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Builds the test request.
    pub fn build(self) -> Result<TestRequest, TestError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let uri: Uri = self
            .uri
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("Invalid URI: {e}")))?;

        Ok(TestRequest {
            method: self.method,
            uri,
            headers: self.headers,
            body: self.body.unwrap_or_default(),
            identity: self.identity,
            request_id: self.request_id,
        })
    }

    fn fail(&mut self, error: TestError) {
        // Keep the first failure, it is the one the caller wrote first.
        self.error.get_or_insert(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_middleware::{FnMiddleware, ResponseExt, SharedMiddleware};
    use http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_methods() {
        assert_eq!(TestRequest::get("/a").build().unwrap().method, Method::GET);
        assert_eq!(TestRequest::post("/a").build().unwrap().method, Method::POST);
        assert_eq!(TestRequest::put("/a").build().unwrap().method, Method::PUT);
        assert_eq!(TestRequest::patch("/a").build().unwrap().method, Method::PATCH);
        assert_eq!(TestRequest::delete("/a").build().unwrap().method, Method::DELETE);
    }

    #[test]
    fn test_bearer_token() {
        let request = TestRequest::get("/forms")
            .bearer_token("my_token")
            .build()
            .unwrap();

        assert_eq!(request.headers.get("Authorization").unwrap(), "Bearer my_token");
    }

    #[test]
    fn test_invalid_header_reported_at_build() {
        let result = TestRequest::get("/forms").header("bad header", "v").build();
        assert!(matches!(result, Err(TestError::InvalidHeader(_))));
    }

    #[test]
    fn test_invalid_uri() {
        let result = TestRequest::get("not a uri").build();
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }

    #[test]
    fn test_json_body() {
        let request = TestRequest::post("/forms")
            .json(&json!({"title": "Survey"}))
            .build()
            .unwrap();

        assert_eq!(request.headers.get("Content-Type").unwrap(), "application/json");
        assert_eq!(request.body.as_ref(), b"{\"title\":\"Survey\"}");
    }

    #[test]
    fn test_identity_lands_in_context() {
        let (ctx, request) = TestRequest::get("/admin")
            .as_admin("a1")
            .build()
            .unwrap()
            .into_parts();

        assert!(ctx.identity().is_admin());
        assert_eq!(request.uri().path(), "/admin");
    }

    #[test]
    fn test_request_id_is_kept() {
        let id = RequestId::new();
        let (ctx, _) = TestRequest::get("/")
            .request_id(id)
            .build()
            .unwrap()
            .into_parts();
        assert_eq!(ctx.request_id(), id);
    }

    #[test]
    fn test_run_with_handler() {
        let tag: SharedMiddleware = Arc::new(FnMiddleware::new("tag", |ctx, req, next| {
            let mut response = next.run(ctx, req);
            response
                .headers_mut()
                .insert("x-tag", HeaderValue::from_static("seen"));
            response
        }));
        let chain = Chain::from_middlewares(vec![tag]);

        let response = TestRequest::get("/forms")
            .as_user("u1")
            .build()
            .unwrap()
            .run_with(&chain, |ctx, _req| {
                assert!(ctx.identity().is_authenticated());
                Response::error(StatusCode::CREATED, "made")
            });

        response.assert_status(StatusCode::CREATED).assert_header("x-tag", "seen");
    }

    #[test]
    fn test_run_without_handler_is_exhausted() {
        let response = TestRequest::get("/").build().unwrap().run(&Chain::new());
        assert!(response.is_chain_exhausted());
    }
}
