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

//! Database abstraction in terms of the operations needed by the server.

use crate::model::{ShortText, Term, TermFields, TermId, TermText};
use glossary_core::db::sqlite::{self, map_sqlx_error};
use glossary_core::db::{DbError, DbResult, Executor};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::Row;


/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,
    }
}

/// Gets the optional short text stored in `column` of `row`.
fn get_short_text(row: &SqliteRow, column: &str) -> DbResult<Option<ShortText>> {
    let value: Option<String> = row.try_get(column).map_err(map_sqlx_error)?;
    Ok(value.map(ShortText::new).transpose()?)
}

/// Gets the optional JSON document stored in `column` of `row`.
fn get_json<T: DeserializeOwned>(row: &SqliteRow, column: &str) -> DbResult<Option<T>> {
    let value: Option<String> = row.try_get(column).map_err(map_sqlx_error)?;
    match value {
        Some(value) => Ok(Some(serde_json::from_str(&value)?)),
        None => Ok(None),
    }
}

/// Serializes an optional `value` into the JSON document to store in its column.
fn to_json<T: Serialize>(value: Option<&T>) -> DbResult<Option<String>> {
    Ok(value.map(serde_json::to_string).transpose()?)
}

impl TryFrom<SqliteRow> for Term {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let tid: i64 = row.try_get("tid").map_err(map_sqlx_error)?;
        let domain: String = row.try_get("domain").map_err(map_sqlx_error)?;
        let subdomains: String = row.try_get("subdomains").map_err(map_sqlx_error)?;
        let english_term: String = row.try_get("english_term").map_err(map_sqlx_error)?;
        let french_term: String = row.try_get("french_term").map_err(map_sqlx_error)?;

        let mut fields = TermFields::new(TermText::new(english_term)?, TermText::new(french_term)?);
        fields.domain = ShortText::new(domain)?;
        fields.subdomains = serde_json::from_str(&subdomains)?;
        fields.variant_en = get_short_text(&row, "variant_en")?;
        fields.variant_fr = get_short_text(&row, "variant_fr")?;
        fields.near_synonym_en = get_short_text(&row, "near_synonym_en")?;
        fields.near_synonym_fr = get_short_text(&row, "near_synonym_fr")?;
        fields.definition_en = row.try_get("definition_en").map_err(map_sqlx_error)?;
        fields.definition_fr = row.try_get("definition_fr").map_err(map_sqlx_error)?;
        fields.syntactic_cooccurrence_en = get_json(&row, "syntactic_cooccurrence_en")?;
        fields.syntactic_cooccurrence_fr = get_json(&row, "syntactic_cooccurrence_fr")?;
        fields.lexical_relations_en = get_json(&row, "lexical_relations_en")?;
        fields.lexical_relations_fr = get_json(&row, "lexical_relations_fr")?;
        fields.note_en = row.try_get("note_en").map_err(map_sqlx_error)?;
        fields.note_fr = row.try_get("note_fr").map_err(map_sqlx_error)?;
        fields.not_to_be_confused_with_en = get_short_text(&row, "not_to_be_confused_with_en")?;
        fields.not_to_be_confused_with_fr = get_short_text(&row, "not_to_be_confused_with_fr")?;
        fields.frequent_expression_en =
            row.try_get("frequent_expression_en").map_err(map_sqlx_error)?;
        fields.frequent_expression_fr =
            row.try_get("frequent_expression_fr").map_err(map_sqlx_error)?;
        fields.phraseology_en = row.try_get("phraseology_en").map_err(map_sqlx_error)?;
        fields.phraseology_fr = row.try_get("phraseology_fr").map_err(map_sqlx_error)?;
        fields.context_en = row.try_get("context_en").map_err(map_sqlx_error)?;
        fields.context_fr = row.try_get("context_fr").map_err(map_sqlx_error)?;

        Ok(Term::new(TermId::new(tid), fields))
    }
}

/// Names of the columns that hold the fields of a term, in the order in which
/// `bind_term_fields` binds them.
const FIELD_COLUMNS: &[&str] = &[
    "domain",
    "subdomains",
    "english_term",
    "french_term",
    "variant_en",
    "variant_fr",
    "near_synonym_en",
    "near_synonym_fr",
    "definition_en",
    "definition_fr",
    "syntactic_cooccurrence_en",
    "syntactic_cooccurrence_fr",
    "lexical_relations_en",
    "lexical_relations_fr",
    "note_en",
    "note_fr",
    "not_to_be_confused_with_en",
    "not_to_be_confused_with_fr",
    "frequent_expression_en",
    "frequent_expression_fr",
    "phraseology_en",
    "phraseology_fr",
    "context_en",
    "context_fr",
];

/// Binds all of the `fields` of a term to `query`, following the order of `FIELD_COLUMNS`.
fn bind_term_fields<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    fields: &'q TermFields,
) -> DbResult<Query<'q, Sqlite, SqliteArguments<'q>>> {
    Ok(query
        .bind(fields.domain.as_str())
        .bind(serde_json::to_string(&fields.subdomains)?)
        .bind(fields.english_term.as_str())
        .bind(fields.french_term.as_str())
        .bind(fields.variant_en.as_ref().map(ShortText::as_str))
        .bind(fields.variant_fr.as_ref().map(ShortText::as_str))
        .bind(fields.near_synonym_en.as_ref().map(ShortText::as_str))
        .bind(fields.near_synonym_fr.as_ref().map(ShortText::as_str))
        .bind(fields.definition_en.as_deref())
        .bind(fields.definition_fr.as_deref())
        .bind(to_json(fields.syntactic_cooccurrence_en.as_ref())?)
        .bind(to_json(fields.syntactic_cooccurrence_fr.as_ref())?)
        .bind(to_json(fields.lexical_relations_en.as_ref())?)
        .bind(to_json(fields.lexical_relations_fr.as_ref())?)
        .bind(fields.note_en.as_deref())
        .bind(fields.note_fr.as_deref())
        .bind(fields.not_to_be_confused_with_en.as_ref().map(ShortText::as_str))
        .bind(fields.not_to_be_confused_with_fr.as_ref().map(ShortText::as_str))
        .bind(fields.frequent_expression_en.as_deref())
        .bind(fields.frequent_expression_fr.as_deref())
        .bind(fields.phraseology_en.as_deref())
        .bind(fields.phraseology_fr.as_deref())
        .bind(fields.context_en.as_deref())
        .bind(fields.context_fr.as_deref()))
}

/// Creates a new term with the given `fields` and returns its newly-assigned identifier.
pub(crate) async fn create_term(ex: &mut Executor, fields: &TermFields) -> DbResult<TermId> {
    let query_str = format!(
        "INSERT INTO terms ({}) VALUES ({})",
        FIELD_COLUMNS.join(", "),
        vec!["?"; FIELD_COLUMNS.len()].join(", ")
    );

    match ex {
        Executor::Sqlite(ex) => {
            let done = bind_term_fields(sqlx::query(&query_str), fields)?
                .execute(ex.conn())
                .await
                .map_err(map_sqlx_error)?;
            if done.rows_affected() != 1 {
                return Err(DbError::BackendError(
                    "Insertion affected more than one row".to_owned(),
                ));
            }
            Ok(TermId::new(done.last_insert_rowid()))
        }
    }
}

/// Gets all existing terms, sorted by their identifier.
pub(crate) async fn get_terms(ex: &mut Executor) -> DbResult<Vec<Term>> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM terms ORDER BY tid";
            let rows = sqlx::query(query_str).fetch_all(ex.conn()).await.map_err(map_sqlx_error)?;
            rows.into_iter().map(Term::try_from).collect()
        }
    }
}

/// Gets the term identified by `tid`.
pub(crate) async fn get_term(ex: &mut Executor, tid: TermId) -> DbResult<Term> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM terms WHERE tid = ?";
            let row = sqlx::query(query_str)
                .bind(tid.as_i64())
                .fetch_one(ex.conn())
                .await
                .map_err(map_sqlx_error)?;
            Term::try_from(row)
        }
    }
}

/// Overwrites all the fields of the existing `term`.
pub(crate) async fn update_term(ex: &mut Executor, term: &Term) -> DbResult<()> {
    let assignments: Vec<String> =
        FIELD_COLUMNS.iter().map(|column| format!("{} = ?", column)).collect();
    let query_str = format!("UPDATE terms SET {} WHERE tid = ?", assignments.join(", "));

    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let done = bind_term_fields(sqlx::query(&query_str), term.fields())?
                .bind(term.tid().as_i64())
                .execute(ex.conn())
                .await
                .map_err(map_sqlx_error)?;
            done.rows_affected()
        }
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }
}

/// Deletes the term identified by `tid`.
pub(crate) async fn delete_term(ex: &mut Executor, tid: TermId) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM terms WHERE tid = ?";
            let done = sqlx::query(query_str)
                .bind(tid.as_i64())
                .execute(ex.conn())
                .await
                .map_err(map_sqlx_error)?;
            done.rows_affected()
        }
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Deletion affected more than one row".to_owned())),
    }
}

/// Counts the number of stored terms.
pub(crate) async fn count_terms(ex: &mut Executor) -> DbResult<u64> {
    let count: i64 = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM terms";
            let row = sqlx::query(query_str).fetch_one(ex.conn()).await.map_err(map_sqlx_error)?;
            row.try_get("count").map_err(map_sqlx_error)?
        }
    };
    u64::try_from(count).map_err(|e| DbError::DataIntegrityError(format!("Bad count: {}", e)))
}
