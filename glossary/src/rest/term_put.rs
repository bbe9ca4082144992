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

//! API to update one term.

use crate::driver::Driver;
use crate::model::{TermId, TermInput};
use crate::rest::TermResponse;
use axum::extract::State;
use axum::Json;
use glossary_core::rest::{JsonObject, PathParam, RestError};

/// PUT handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParam(tid): PathParam<TermId>,
    JsonObject(request): JsonObject,
) -> Result<Json<TermResponse>, RestError> {
    let input = TermInput::from_json(&request)?;
    let term = driver.update_term(tid, input).await?;
    Ok(Json(TermResponse { message: "Term updated successfully!".to_owned(), term }))
}
