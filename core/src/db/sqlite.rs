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

//! Common utilities to interact with an SQLite database.

use crate::db::{Db, DbError, DbResult, Executor, TxExecutor};
use crate::env::get_optional_var;
use async_trait::async_trait;
use derivative::Derivative;
use log::warn;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{
    Sqlite, SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions,
};
use sqlx::Transaction;
use std::path::Path;
use std::str::FromStr;

/// Special database path that requests a private, in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Default value for the `path` configuration property.
const DEFAULT_PATH: &str = "instance/glossary.db";

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::PoolTimedOut => DbError::Unavailable,
        sqlx::Error::RowNotFound => DbError::NotFound,
        e if e.to_string().contains("FOREIGN KEY constraint failed") => DbError::NotFound,
        e if e.to_string().contains("UNIQUE constraint failed") => DbError::AlreadyExists,
        e => DbError::BackendError(e.to_string()),
    }
}

/// Options to open an SQLite database.
#[derive(Derivative)]
#[derivative(Debug, Default)]
#[cfg_attr(test, derivative(PartialEq))]
pub struct SqliteOptions {
    /// Path to the database file, or `IN_MEMORY_PATH` for a transient database.
    #[derivative(Default(value = "DEFAULT_PATH.to_owned()"))]
    pub path: String,

    /// Maximum number of connections to allow against the database.
    pub max_connections: Option<u32>,
}

impl SqliteOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_PATH` and `<prefix>_MAX_CONNECTIONS`.
    pub fn from_env(prefix: &str) -> Result<SqliteOptions, String> {
        Ok(SqliteOptions {
            path: get_optional_var::<String>(prefix, "PATH")?
                .unwrap_or_else(|| DEFAULT_PATH.to_owned()),
            max_connections: get_optional_var::<u32>(prefix, "MAX_CONNECTIONS")?,
        })
    }
}

/// Opens the database described by `opts`, creating the file if it does not exist yet.
pub async fn connect(opts: SqliteOptions) -> DbResult<SqliteDb> {
    let conn_options = if opts.path == IN_MEMORY_PATH {
        SqliteConnectOptions::from_str(IN_MEMORY_PATH).map_err(map_sqlx_error)?
    } else {
        if let Some(parent) = Path::new(&opts.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DbError::BackendError(format!(
                        "Cannot create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        SqliteConnectOptions::new().filename(&opts.path).create_if_missing(true)
    };

    let mut pool_options = SqlitePoolOptions::new();
    if let Some(max_connections) = opts.max_connections {
        pool_options = pool_options.max_connections(max_connections);
    }

    let pool = pool_options.connect_with(conn_options).await.map_err(map_sqlx_error)?;
    Ok(SqliteDb { pool })
}

/// A generic database executor implementation for SQLite.
#[derive(Debug)]
pub enum SqliteExecutor {
    /// An executor backed by a pool.  Operations issued via this executor aren't guaranteed to
    /// happen on the same connection.
    PoolExec(PoolConnection<Sqlite>),

    /// An executor backed by a transaction.
    TxExec(Transaction<'static, Sqlite>),
}

impl SqliteExecutor {
    /// Commits the transaction if this executor is backed by one.
    ///
    /// Calling this on a non-transaction-based executor results in a panic.
    pub(super) async fn commit(self) -> DbResult<()> {
        match self {
            SqliteExecutor::PoolExec(_) => unreachable!("Do not call commit on direct executors"),
            SqliteExecutor::TxExec(tx) => tx.commit().await.map_err(map_sqlx_error),
        }
    }

    /// Returns the raw connection to issue `sqlx` queries against, regardless of whether this
    /// executor is backed by a pooled connection or by a transaction.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        match self {
            SqliteExecutor::PoolExec(conn) => &mut **conn,
            SqliteExecutor::TxExec(tx) => &mut **tx,
        }
    }
}

/// A database instance backed by an SQLite database.
pub struct SqliteDb {
    /// Shared SQLite connection pool.  This is a cloneable type that all concurrent
    /// transactions can use concurrently.
    pool: SqlitePool,
}

impl SqliteDb {
    /// Returns an executor of the specific type used by this database.
    pub async fn typed_ex(&self) -> DbResult<SqliteExecutor> {
        let conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        Ok(SqliteExecutor::PoolExec(conn))
    }
}

impl Drop for SqliteDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("Dropping connection without having called close() first");
        }
    }
}

#[async_trait]
impl Db for SqliteDb {
    async fn ex(&self) -> DbResult<Executor> {
        let ex = self.typed_ex().await?;
        Ok(Executor::Sqlite(ex))
    }

    async fn begin(&self) -> DbResult<TxExecutor> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(TxExecutor(Executor::Sqlite(SqliteExecutor::TxExec(tx))))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Helper function to initialize the database with a schema.
///
/// The schema is split into individual statements at semicolons, so these must not appear in
/// comments or literals.
pub async fn run_schema(e: &mut SqliteExecutor, schema: &str) -> DbResult<()> {
    for query_str in schema.split(';') {
        if query_str.trim().is_empty() {
            continue;
        }
        sqlx::query(query_str).execute(e.conn()).await.map_err(map_sqlx_error)?;
    }
    Ok(())
}

/// Test utilities for the SQLite connection.
#[cfg(any(feature = "testutils", test))]
pub mod testutils {
    use super::*;

    /// Initializes the test database.
    pub async fn setup() -> SqliteDb {
        let _can_fail = env_logger::builder().is_test(true).try_init();
        let opts = SqliteOptions { path: IN_MEMORY_PATH.to_owned(), ..Default::default() };
        connect(opts).await.unwrap()
    }
}
