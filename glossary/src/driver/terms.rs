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

//! Operations on the collection of terms.

use crate::db;
use crate::driver::{map_term_error, Driver, NO_TERMS_MESSAGE};
use crate::model::{Term, TermInput};
use glossary_core::driver::{DriverError, DriverResult};
use log::info;

impl Driver {
    /// Creates a new term from the validated `input` and returns it as stored.
    pub(crate) async fn create_term(self, input: TermInput) -> DriverResult<Term> {
        let fields = input.into_fields();

        let mut tx = self.db.begin().await?;
        let tid = db::create_term(tx.ex(), &fields).await.map_err(|e| map_term_error(e, None))?;
        tx.commit().await?;

        info!(
            "Created term {} ({} / {})",
            tid,
            fields.english_term.as_str(),
            fields.french_term.as_str()
        );
        Ok(Term::new(tid, fields))
    }

    /// Gets all terms sorted by their identifier.  An empty glossary is reported as an error.
    pub(crate) async fn get_terms(self) -> DriverResult<Vec<Term>> {
        let terms = db::get_terms(&mut self.db.ex().await?).await?;
        if terms.is_empty() {
            return Err(DriverError::NotFound(NO_TERMS_MESSAGE.to_owned()));
        }
        Ok(terms)
    }
}
