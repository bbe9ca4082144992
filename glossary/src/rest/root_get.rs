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

//! API to identify the service.

use crate::rest::MessageResponse;
use axum::Json;
use glossary_core::rest::{EmptyBody, RestError};

/// Message that identifies the glossary.
pub(crate) const WELCOME_MESSAGE: &str = "Glossaire explicatif et combinatoire anglais-francais \
    des technologies transformatrices (Big Data, IA, blockchain) - English-French Explanatory \
    Combinatorial Glossary for Disruptive Technologies (Big Data, AI, Blockchain).";

/// GET handler for this API.
pub(crate) async fn handler(_: EmptyBody) -> Result<Json<MessageResponse>, RestError> {
    Ok(Json(MessageResponse::new(WELCOME_MESSAGE)))
}
