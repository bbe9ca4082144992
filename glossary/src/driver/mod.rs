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

//! Business logic for the service.

use crate::model::TermId;
use glossary_core::db::{Db, DbError};
use glossary_core::driver::DriverError;
use log::warn;
use std::sync::Arc;

mod term;
mod terms;
#[cfg(test)]
pub(crate) mod testutils;

/// Message returned when a term would duplicate an existing English/French pair.
pub(crate) const TERM_EXISTS_MESSAGE: &str = "This term already exists.";

/// Message returned when the glossary has no terms at all.
pub(crate) const NO_TERMS_MESSAGE: &str = "No Terms found.";

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        Self { db }
    }
}

/// Returns the message for a missing term with identifier `tid`.
pub(crate) fn term_not_found_message(tid: TermId) -> String {
    format!("Term with ID {} not found.", tid)
}

/// Translates a database error `e` raised while operating on terms into a driver error.
///
/// `tid` is the identifier of the term the operation targeted, if any, and is used to describe
/// missing entries.
fn map_term_error(e: DbError, tid: Option<TermId>) -> DriverError {
    match (e, tid) {
        (DbError::AlreadyExists, _) => DriverError::AlreadyExists(TERM_EXISTS_MESSAGE.to_owned()),
        (DbError::NotFound, Some(tid)) => DriverError::NotFound(term_not_found_message(tid)),
        (e @ DbError::NotFound, None) => DriverError::from(e),
        (e, _) => {
            warn!("Unexpected database failure: {}", e);
            DriverError::from(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_term_error() {
        assert_eq!(
            DriverError::AlreadyExists("This term already exists.".to_owned()),
            map_term_error(DbError::AlreadyExists, None)
        );
        assert_eq!(
            DriverError::NotFound("Term with ID 3 not found.".to_owned()),
            map_term_error(DbError::NotFound, Some(TermId::new(3)))
        );
        assert_eq!(
            DriverError::NotFound("Entity not found".to_owned()),
            map_term_error(DbError::NotFound, None)
        );
        assert_eq!(
            DriverError::BackendError("Database error: disk I/O error".to_owned()),
            map_term_error(DbError::BackendError("disk I/O error".to_owned()), Some(TermId::new(1)))
        );
        assert_eq!(
            DriverError::BackendError("Unavailable".to_owned()),
            map_term_error(DbError::Unavailable, None)
        );
    }
}
