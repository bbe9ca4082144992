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

//! API to delete one term.

use crate::driver::Driver;
use crate::model::TermId;
use crate::rest::MessageResponse;
use axum::extract::State;
use axum::Json;
use glossary_core::rest::{EmptyBody, PathParam, RestError};

/// DELETE handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParam(tid): PathParam<TermId>,
    _: EmptyBody,
) -> Result<Json<MessageResponse>, RestError> {
    driver.delete_term(tid).await?;
    Ok(Json(MessageResponse::new("Term deleted successfully!")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;
    use glossary_core::rest::testutils::OneShotBuilder;
    use glossary_core::test_payload_must_be_empty;

    fn route(tid: i64) -> (http::Method, String) {
        (http::Method::DELETE, format!("/api/terms/{}", tid))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let term1 = context.create_simple_term("cloud", "nuage").await;
        let term2 = context.create_simple_term("token", "jeton").await;

        let response = OneShotBuilder::new(context.app(), route(1))
            .send_empty()
            .await
            .expect_json::<MessageResponse>()
            .await;
        assert_eq!(MessageResponse::new("Term deleted successfully!"), response);

        assert_eq!(None, context.get_term(*term1.tid()).await);
        let tid2 = *term2.tid();
        assert_eq!(Some(term2), context.get_term(tid2).await);
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        context.create_simple_term("cloud", "nuage").await;

        OneShotBuilder::new(context.app(), route(2))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("^Term with ID 2 not found.$")
            .await;

        assert_eq!(1, context.count_terms().await);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let context = TestContext::setup().await;

        context.create_simple_term("cloud", "nuage").await;

        OneShotBuilder::new(context.app(), route(1)).send_empty().await.verify();
        OneShotBuilder::new(context.app(), route(1))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("^Term with ID 1 not found.$")
            .await;

        assert_eq!(0, context.count_terms().await);
    }

    #[tokio::test]
    async fn test_bad_id() {
        let context = TestContext::setup().await;

        context.create_simple_term("cloud", "nuage").await;

        OneShotBuilder::new(context.app(), (http::Method::DELETE, "/api/terms/one"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("^Invalid URL: Cannot parse")
            .await;

        assert_eq!(1, context.count_terms().await);
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route(1));
}
