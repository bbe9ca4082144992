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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use crate::rest::app;
use axum::Router;
use glossary_core::db::{Db, DbError};
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the app, for direct manipulation.
    db: Arc<dyn Db + Send + Sync>,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the app using an in-memory database with the schema already in place.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(glossary_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = Driver::new(db.clone());
        let app = app(driver);
        Self { db, app }
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and transforms it into the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Stores `fields` as a new term by directly modifying the backing database.
    pub(crate) async fn create_term(&self, fields: TermFields) -> Term {
        let tid = db::create_term(&mut self.db.ex().await.unwrap(), &fields).await.unwrap();
        Term::new(tid, fields)
    }

    /// Stores a term with the given wordings by directly modifying the backing database.
    pub(crate) async fn create_simple_term(
        &self,
        english: &'static str,
        french: &'static str,
    ) -> Term {
        self.create_term(TermFields::new(TermText::from(english), TermText::from(french))).await
    }

    /// Gets the term identified by `tid` by directly querying the backing database, if it exists.
    pub(crate) async fn get_term(&self, tid: TermId) -> Option<Term> {
        match db::get_term(&mut self.db.ex().await.unwrap(), tid).await {
            Ok(term) => Some(term),
            Err(DbError::NotFound) => None,
            Err(e) => panic!("{:?}", e),
        }
    }

    /// Counts the terms by directly querying the backing database.
    pub(crate) async fn count_terms(&self) -> u64 {
        db::count_terms(&mut self.db.ex().await.unwrap()).await.unwrap()
    }
}
