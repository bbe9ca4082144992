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

//! API to create a new term.

use crate::driver::Driver;
use crate::model::TermInput;
use crate::rest::TermResponse;
use axum::extract::State;
use axum::{http, Json};
use glossary_core::rest::{JsonObject, RestError};

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    JsonObject(request): JsonObject,
) -> Result<(http::StatusCode, Json<TermResponse>), RestError> {
    let input = TermInput::from_json(&request)?;
    let term = driver.create_term(input).await?;
    let response = TermResponse { message: "Term created successfully!".to_owned(), term };
    Ok((http::StatusCode::CREATED, Json(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ShortText, Term, TermFields, TermId, TermText};
    use crate::rest::testutils::*;
    use glossary_core::rest::testutils::OneShotBuilder;
    use glossary_core::test_payload_must_be_json;
    use serde_json::json;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/api/terms".to_owned())
    }

    #[tokio::test]
    async fn test_ok_minimal() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(json!({"english_term": "cloud", "french_term": "nuage"}))
            .await
            .expect_status(http::StatusCode::CREATED)
            .expect_json::<TermResponse>()
            .await;

        let exp_term = Term::new(
            TermId::new(1),
            TermFields::new(TermText::from("cloud"), TermText::from("nuage")),
        );
        assert_eq!(
            TermResponse {
                message: "Term created successfully!".to_owned(),
                term: exp_term.clone()
            },
            response
        );
        assert_eq!(Some(exp_term), context.get_term(TermId::new(1)).await);
    }

    #[tokio::test]
    async fn test_ok_with_optional_fields() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(json!({
                "english_term": "  machine learning ",
                "french_term": "apprentissage automatique",
                "domain": "Artificial Intelligence",
                "subdomains": ["AI"],
                "near_synonym_en": "statistical learning",
                "syntactic_cooccurrence_fr": ["supervisé", "profond"],
                "lexical_relations_en": {"hyponym": ["deep learning"]},
                "context_fr": null,
            }))
            .await
            .expect_status(http::StatusCode::CREATED)
            .expect_json::<TermResponse>()
            .await;

        let fields = response.term.fields();
        assert_eq!("machine learning", fields.english_term.as_str());
        assert_eq!("Artificial Intelligence", fields.domain.as_str());
        assert_eq!(vec!["AI"], fields.subdomains);
        assert_eq!(Some(ShortText::from("statistical learning")), fields.near_synonym_en);
        assert_eq!(
            Some(vec!["supervisé".to_owned(), "profond".to_owned()]),
            fields.syntactic_cooccurrence_fr
        );
        assert_eq!(
            Some(&vec!["deep learning".to_owned()]),
            fields.lexical_relations_en.as_ref().and_then(|relations| relations.get("hyponym"))
        );
        assert_eq!(None, fields.context_fr);

        assert_eq!(Some(response.term), context.get_term(TermId::new(1)).await);
    }

    #[tokio::test]
    async fn test_duplicate() {
        let context = TestContext::setup().await;

        context.create_simple_term("cloud", "nuage").await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"english_term": "cloud", "french_term": "nuage"}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("^This term already exists.$")
            .await;

        assert_eq!(1, context.count_terms().await);
    }

    #[tokio::test]
    async fn test_missing_english_term() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"french_term": "nuage"}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("^English Term is required.$")
            .await;

        assert_eq!(0, context.count_terms().await);
    }

    #[tokio::test]
    async fn test_missing_french_term() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"english_term": "cloud", "french_term": "   "}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("^French Term is required.$")
            .await;

        assert_eq!(0, context.count_terms().await);
    }

    #[tokio::test]
    async fn test_bad_term_types() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"english_term": 1, "french_term": "nuage"}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Invalid data types: English and French terms should be strings.")
            .await;

        assert_eq!(0, context.count_terms().await);
    }

    #[tokio::test]
    async fn test_bad_optional_field() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"english_term": "cloud", "french_term": "nuage", "note_en": 5}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Invalid value for note_en")
            .await;

        assert_eq!(0, context.count_terms().await);
    }

    #[tokio::test]
    async fn test_term_too_long() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"english_term": "x".repeat(256), "french_term": "nuage"}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Invalid value for english_term: Text is too long")
            .await;

        assert_eq!(0, context.count_terms().await);
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route());
}
