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

//! Operations on one term.

use crate::db;
use crate::driver::{map_term_error, Driver};
use crate::model::{Term, TermId, TermInput};
use glossary_core::driver::DriverResult;
use log::info;

impl Driver {
    /// Gets the term identified by `tid`.
    pub(crate) async fn get_term(self, tid: TermId) -> DriverResult<Term> {
        let term = db::get_term(&mut self.db.ex().await?, tid)
            .await
            .map_err(|e| map_term_error(e, Some(tid)))?;
        Ok(term)
    }

    /// Updates the term identified by `tid` with the validated `input`.
    ///
    /// Both wordings are always replaced.  Optional fields are only replaced if they were present
    /// in the input.
    pub(crate) async fn update_term(self, tid: TermId, input: TermInput) -> DriverResult<Term> {
        let mut tx = self.db.begin().await?;

        let current = db::get_term(tx.ex(), tid).await.map_err(|e| map_term_error(e, Some(tid)))?;
        let mut fields = current.into_fields();
        input.apply_to(&mut fields);
        let term = Term::new(tid, fields);
        db::update_term(tx.ex(), &term).await.map_err(|e| map_term_error(e, Some(tid)))?;

        tx.commit().await?;
        info!("Updated term {}", tid);
        Ok(term)
    }

    /// Deletes the term identified by `tid`.
    pub(crate) async fn delete_term(self, tid: TermId) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;
        db::delete_term(tx.ex(), tid).await.map_err(|e| map_term_error(e, Some(tid)))?;
        tx.commit().await?;
        info!("Deleted term {}", tid);
        Ok(())
    }
}
