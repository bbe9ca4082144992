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

//! Entry point to the glossary service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use glossary::db::init_schema;
use glossary::{serve, ServerOptions};
use glossary_core::db::sqlite::{self, SqliteOptions};
use glossary_core::db::Db;
use log::info;
use std::error::Error;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let server_opts = ServerOptions::from_env("GLOSSARY")?;
    let db_opts = SqliteOptions::from_env("GLOSSARY_DB")?;

    info!("Opening database {}", db_opts.path);
    let db: Arc<dyn Db + Send + Sync> = Arc::new(sqlite::connect(db_opts).await?);
    init_schema(&mut db.ex().await?).await?;

    serve(server_opts.bind_addr(), db).await
}
