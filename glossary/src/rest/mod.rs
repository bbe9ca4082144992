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

//! Entry point to the REST server.

use crate::driver::Driver;
use crate::model::Term;
use axum::Router;
#[cfg(test)]
use serde::Deserialize;
use serde::Serialize;

mod root_get;
mod term_delete;
mod term_get;
mod term_put;
mod terms_get;
mod terms_post;
#[cfg(test)]
mod testutils;

/// Response that only carries a human-readable message.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct MessageResponse {
    /// The message to return to the client.
    pub(crate) message: String,
}

impl MessageResponse {
    /// Creates a new response from a static `message`.
    pub(crate) fn new(message: &str) -> Self {
        Self { message: message.to_owned() }
    }
}

/// Response to an API that modified a term.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct TermResponse {
    /// The message to return to the client.
    pub(crate) message: String,

    /// The term as stored after the modification.
    pub(crate) term: Term,
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::get;
    Router::new()
        .route("/", get(root_get::handler))
        .route("/api", get(root_get::handler))
        .route("/api/terms", get(terms_get::handler).post(terms_post::handler))
        .route(
            "/api/terms/:tid",
            get(term_get::handler).put(term_put::handler).delete(term_delete::handler),
        )
        .with_state(driver)
}
