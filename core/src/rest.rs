// Glossaire
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Generic code for REST handlers.
//!
//! The service implements an `app` function in its `rest` module that returns the `Router` for
//! the application.
//!
//! Every API should be put in its own `.rs` file, using a name like `<entity>_<method>.rs`.  This
//! may seem overkill, but putting every API in its own file makes it easy to ensure all the
//! integration tests for the given API truly belong to that API.
//!
//! More specifically, the `tests` module within an API should define a `route` method that
//! returns the HTTP method and the API path under test.  All integration tests within the module
//! then rely on `route` to obtain this information, ensuring that they all test the desired API.
//!
//! It is also useful for the tests in this layer to define a `TestContext` in a `testutils` module
//! that allows interacting with the database layer directly, using simplified types.

use crate::driver::DriverError;
use crate::model::ModelError;
use async_trait::async_trait;
use axum::body::HttpBody;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::response::IntoResponse;
use axum::Json;
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message returned when a request that needs a JSON object does not carry one.
const INVALID_JSON_MESSAGE: &str = "Invalid JSON data.";

/// Frontend errors.  These are the errors that are visible to the user on failed requests.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RestError {
    /// Catch-all error type for all unexpected errors.
    #[error("An unexpected error occurred: {0}")]
    InternalError(String),

    /// Indicates an error in the contents of the request.
    #[error("{0}")]
    InvalidRequest(String),

    /// Indicates that a requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Indicates that a request that should have empty content did not.
    #[error("Content should be empty")]
    PayloadNotEmpty,
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::AlreadyExists(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::BackendError(_) => RestError::InternalError(e.to_string()),
            DriverError::NotFound(_) => RestError::NotFound(e.to_string()),
        }
    }
}

impl From<ModelError> for RestError {
    fn from(e: ModelError) -> Self {
        RestError::InvalidRequest(e.to_string())
    }
}

impl From<serde_json::Error> for RestError {
    fn from(e: serde_json::Error) -> Self {
        RestError::InvalidRequest(e.to_string())
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            RestError::InternalError(_) => {
                error!("Request failed: {}", self);
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
            RestError::InvalidRequest(_) => http::StatusCode::BAD_REQUEST,
            RestError::NotFound(_) => http::StatusCode::NOT_FOUND,
            RestError::PayloadNotEmpty => http::StatusCode::PAYLOAD_TOO_LARGE,
        };

        let response = ErrorResponse { error: self.to_string() };

        (status, Json(response)).into_response()
    }
}

/// Representation of the details of an error response.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct ErrorResponse {
    /// Textual representation of the error message.
    pub(crate) error: String,
}

/// A request body extractor that forbids any content.
///
/// Any API that doesn't expect a body should use this to ensure we don't get garbage data that we
/// don't care about.  This future-proofs the service.
pub struct EmptyBody {}

#[async_trait]
impl<S> FromRequest<S> for EmptyBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if req.into_body().is_end_stream() {
            Ok(EmptyBody {})
        } else {
            Err(RestError::PayloadNotEmpty)
        }
    }
}

/// A request body extractor for APIs that take a non-empty JSON object.
///
/// Unlike `axum::Json`, this does not deserialize into a fixed type: the handler gets the raw
/// object so that it can tell apart absent keys from keys explicitly set to `null`, and so that
/// validation errors can name the offending field.  Any problem with the payload itself (wrong
/// content type, malformed JSON, a value that is not an object or an empty object) is reported as
/// a `RestError::InvalidRequest`.
pub struct JsonObject(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(Value::Object(map))) if !map.is_empty() => Ok(JsonObject(map)),
            Ok(Json(value)) => {
                debug!("Rejecting JSON payload that is not a non-empty object: {}", value);
                Err(RestError::InvalidRequest(INVALID_JSON_MESSAGE.to_owned()))
            }
            Err(rejection) => {
                debug!("Rejecting invalid JSON payload: {}", rejection.body_text());
                Err(RestError::InvalidRequest(INVALID_JSON_MESSAGE.to_owned()))
            }
        }
    }
}

/// A path extractor that reports malformed path parameters as a `RestError`.
///
/// `axum::extract::Path` answers with a plain-text body on failure; this wraps it so that clients
/// always get the `{"error": ...}` representation.
pub struct PathParam<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(PathParam(value)),
            Err(rejection) => {
                let message = rejection.body_text();
                debug!("Rejecting invalid path: {}", message);
                Err(RestError::InvalidRequest(message))
            }
        }
    }
}

/// Common test code for the REST server.
#[cfg(feature = "testutils")]
pub mod testutils {
    use super::*;
    use axum::http::{self, HeaderName, HeaderValue};
    use axum::Router;
    use serde::de::DeserializeOwned;
    use tower::util::ServiceExt;

    /// Maximum body size for testing purposes.
    const MAX_BODY_SIZE: usize = 64 * 1024;

    /// Builder for a single request to the API server.
    #[must_use]
    pub struct OneShotBuilder {
        /// The router for the app being tested.
        app: Router,

        /// Builder for the request that will be sent to the app.
        builder: axum::http::request::Builder,
    }

    impl OneShotBuilder {
        /// Creates a new request against a given `method`/`uri` pair served by an `app` router.
        pub fn new<U: AsRef<str>>(app: Router, (method, uri): (http::Method, U)) -> Self {
            let builder = Request::builder().method(method).uri(uri.as_ref());
            Self { app, builder }
        }

        /// Sets the header `name` to `value` in the outgoing request.
        pub fn with_header<K, V>(mut self, name: K, value: V) -> Self
        where
            HeaderName: TryFrom<K>,
            <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
            HeaderValue: TryFrom<V>,
            <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
        {
            self.builder = self.builder.header(name, value);
            self
        }

        /// Finishes building the request and sends it with an empty payload.
        pub async fn send_empty(self) -> ResponseChecker {
            let request = self.builder.body(axum::body::Body::empty()).unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Finishes building the request and sends it with a text payload.
        pub async fn send_text<T: Into<String>>(self, text: T) -> ResponseChecker {
            let request = self
                .builder
                .header(http::header::CONTENT_TYPE, mime::TEXT_PLAIN.as_ref())
                .body(axum::body::Body::from(text.into()))
                .unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Finishes building the request and sends it with a JSON payload.
        pub async fn send_json<T: Serialize>(self, request: T) -> ResponseChecker {
            let request = self
                .builder
                .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(axum::body::Body::from(serde_json::to_vec(&request).unwrap()))
                .unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }
    }

    /// Type alias for the complex type returned by the `oneshot` function.
    type HttpResponse = axum::response::Response;

    /// Validator for the outcome of a request sent by a `OneShotBuilder`.
    #[must_use]
    pub struct ResponseChecker {
        /// Actual response that we received from the app.
        response: HttpResponse,

        /// Expected HTTP status code in the response above.
        exp_status: http::StatusCode,
    }

    impl From<HttpResponse> for ResponseChecker {
        fn from(response: HttpResponse) -> Self {
            Self { response, exp_status: http::StatusCode::OK }
        }
    }

    impl ResponseChecker {
        /// Sets the expected exit HTTP status to `status`.
        pub fn expect_status(mut self, status: http::StatusCode) -> Self {
            self.exp_status = status;
            self
        }

        /// Performs common validation operations on the response.
        pub fn verify(&self) {
            assert_eq!(self.exp_status, self.response.status());
        }

        /// Finishes checking the response and expects it to contain an empty body.
        pub async fn expect_empty(self) {
            self.verify();

            let body =
                axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
            let body = String::from_utf8(body.to_vec()).unwrap();
            assert!(body.is_empty(), "Body not empty; got {}", body);
        }

        /// Finishes checking the response and expects its body to be an `ErrorResponse` that
        /// matches `exp_re`.
        pub async fn expect_error(self, exp_re: &str) {
            self.verify();

            let body =
                axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
            let response: ErrorResponse = match serde_json::from_slice(&body) {
                Ok(response) => response,
                Err(e) => {
                    let body = String::from_utf8(body.to_vec()).unwrap();
                    panic!("Invalid error response due to {}; content was {}", e, body);
                }
            };
            if exp_re.is_empty() {
                assert!(
                    response.error.is_empty(),
                    "Response content '{:?}' is not empty",
                    response
                );
            } else {
                let re = regex::Regex::new(exp_re).unwrap();
                assert!(
                    re.is_match(&response.error),
                    "Response content '{:?}' does not match re '{}'",
                    response,
                    exp_re
                );
            }
        }

        /// Finishes checking the response and expects it to contain a valid JSON object of
        /// type `T`.
        pub async fn expect_json<T: DeserializeOwned>(self) -> T {
            self.verify();

            let body =
                axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
            serde_json::from_slice::<T>(&body).unwrap()
        }

        /// Finishes checking the response and expects its body to be valid UTF-8 and to match
        /// `exp_re`.
        pub async fn expect_text(self, exp_re: &str) {
            assert!(!exp_re.is_empty(), "Use expect_empty to validate empty responses");

            self.verify();

            let body =
                axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
            let body = String::from_utf8(body.to_vec()).unwrap();
            assert!(
                !body.contains("\"error\":"),
                "Use expect_error to validate errors wrapped in an ErrorResponse"
            );
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(re.is_match(&body), "Body content '{}' does not match re '{}'", body, exp_re);
        }
    }

    /// Generates a test to verify that an API that expects a JSON object fails when it gets
    /// something else.
    #[macro_export]
    macro_rules! test_payload_must_be_json {
        ( $app:expr, $route:expr ) => {
            #[tokio::test]
            async fn test_payload_must_be_json() {
                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    .send_text("this is not json")
                    .await
                    .expect_status(axum::http::StatusCode::BAD_REQUEST)
                    .expect_error("Invalid JSON data")
                    .await;

                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    .with_header(axum::http::header::CONTENT_TYPE, "application/json")
                    .send_text("this is not json")
                    .await
                    .expect_status(axum::http::StatusCode::BAD_REQUEST)
                    .expect_error("Invalid JSON data")
                    .await;

                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    .send_json(serde_json::json!(["not", "an", "object"]))
                    .await
                    .expect_status(axum::http::StatusCode::BAD_REQUEST)
                    .expect_error("Invalid JSON data")
                    .await;

                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    .send_json(serde_json::json!({}))
                    .await
                    .expect_status(axum::http::StatusCode::BAD_REQUEST)
                    .expect_error("Invalid JSON data")
                    .await;
            }
        };
    }

    pub use test_payload_must_be_json;

    /// Generates a test to verify that an API that does not expect a payload fails as necessary.
    #[macro_export]
    macro_rules! test_payload_must_be_empty {
        ( $app:expr, $route:expr ) => {
            #[tokio::test]
            async fn test_payload_must_be_empty() {
                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    .send_text("should not be here")
                    .await
                    .expect_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE)
                    .expect_error("should be empty")
                    .await;
            }
        };
    }

    pub use test_payload_must_be_empty;
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    /// Sends `body` with `content_type` through the `JsonObject` extractor.
    async fn extract_json_object(
        content_type: Option<&str>,
        body: &'static str,
    ) -> Result<Map<String, Value>, RestError> {
        let mut builder = Request::builder().method(http::Method::POST).uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(http::header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();
        JsonObject::from_request(request, &()).await.map(|JsonObject(map)| map)
    }

    /// Handler that echoes the numeric path parameter it receives.
    async fn echo_id(PathParam(id): PathParam<i64>) -> String {
        id.to_string()
    }

    /// Sends a GET request for `uri` to a router that extracts a numeric `PathParam`.
    async fn get_path_param(uri: &str) -> (http::StatusCode, Vec<u8>) {
        use tower::util::ServiceExt;

        let app = axum::Router::new().route("/items/:id", axum::routing::get(echo_id));
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_path_param_ok() {
        let (status, body) = get_path_param("/items/42").await;
        assert_eq!(http::StatusCode::OK, status);
        assert_eq!(b"42".as_slice(), body.as_slice());
    }

    #[tokio::test]
    async fn test_path_param_errors_are_json() {
        for uri in ["/items/abc", "/items/99999999999999999999"] {
            let (status, body) = get_path_param(uri).await;
            assert_eq!(http::StatusCode::BAD_REQUEST, status);
            let response: ErrorResponse = serde_json::from_slice(&body).unwrap();
            assert!(response.error.contains("Cannot parse"), "Bad message: {}", response.error);
        }
    }

    #[test]
    fn test_from_driver_error() {
        assert_eq!(
            RestError::InvalidRequest("Dup".to_owned()),
            RestError::from(DriverError::AlreadyExists("Dup".to_owned()))
        );
        assert_eq!(
            RestError::InternalError("Boom".to_owned()),
            RestError::from(DriverError::BackendError("Boom".to_owned()))
        );
        assert_eq!(
            RestError::NotFound("Gone".to_owned()),
            RestError::from(DriverError::NotFound("Gone".to_owned()))
        );
    }

    #[test]
    fn test_internal_error_message() {
        assert_eq!(
            "An unexpected error occurred: Boom",
            RestError::InternalError("Boom".to_owned()).to_string()
        );
    }

    #[test]
    fn test_into_response_status() {
        assert_eq!(
            http::StatusCode::INTERNAL_SERVER_ERROR,
            RestError::InternalError("x".to_owned()).into_response().status()
        );
        assert_eq!(
            http::StatusCode::BAD_REQUEST,
            RestError::InvalidRequest("x".to_owned()).into_response().status()
        );
        assert_eq!(
            http::StatusCode::NOT_FOUND,
            RestError::NotFound("x".to_owned()).into_response().status()
        );
        assert_eq!(
            http::StatusCode::PAYLOAD_TOO_LARGE,
            RestError::PayloadNotEmpty.into_response().status()
        );
    }

    #[tokio::test]
    async fn test_json_object_ok() {
        let map = extract_json_object(Some("application/json"), r#"{"a": 1, "b": null}"#)
            .await
            .unwrap();
        assert_eq!(2, map.len());
        assert_eq!(Some(&Value::from(1)), map.get("a"));
        assert_eq!(Some(&Value::Null), map.get("b"));
    }

    #[tokio::test]
    async fn test_json_object_errors() {
        for (content_type, body) in [
            (None, r#"{"a": 1}"#),
            (Some("text/plain"), r#"{"a": 1}"#),
            (Some("application/json"), ""),
            (Some("application/json"), "{"),
            (Some("application/json"), "null"),
            (Some("application/json"), "[1, 2]"),
            (Some("application/json"), "\"text\""),
            (Some("application/json"), "{}"),
        ] {
            assert_eq!(
                RestError::InvalidRequest(INVALID_JSON_MESSAGE.to_owned()),
                extract_json_object(content_type, body).await.unwrap_err(),
                "Body {:?} with content type {:?} should have been rejected",
                body,
                content_type
            );
        }
    }
}
