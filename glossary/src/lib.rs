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

//! English-French explanatory combinatorial glossary of disruptive technologies.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use glossary_core::db::Db;
use glossary_core::env::get_optional_var;
use log::{info, warn};
use std::error::Error;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

pub mod db;
pub(crate) mod driver;
use driver::Driver;
pub(crate) mod model;
mod rest;
use rest::app;

/// Default value for the `PORT` setting when not specified.
const DEFAULT_PORT: u16 = 5003;

/// Default value for the `ADDRESS` setting when not specified.
const DEFAULT_ADDRESS: Ipv4Addr = Ipv4Addr::UNSPECIFIED;

/// Configuration options for the network listener.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerOptions {
    /// Address to bind to.
    pub address: Ipv4Addr,

    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self { address: DEFAULT_ADDRESS, port: DEFAULT_PORT }
    }
}

impl ServerOptions {
    /// Creates a new set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_ADDRESS` and `<prefix>_PORT`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(Self {
            address: get_optional_var::<Ipv4Addr>(prefix, "ADDRESS")?.unwrap_or(DEFAULT_ADDRESS),
            port: get_optional_var::<u16>(prefix, "PORT")?.unwrap_or(DEFAULT_PORT),
        })
    }

    /// Returns the socket address to bind to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((self.address, self.port))
    }
}

/// Waits until the process is asked to terminate.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for the shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

/// Instantiates all resources to serve the application on `bind_addr` using `db` for persistence.
///
/// The database must already have been initialized with `db::init_schema`.  The database is
/// closed once the server stops.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db: Arc<dyn Db + Send + Sync>,
) -> Result<(), Box<dyn Error>> {
    let count = db::count_terms(&mut db.ex().await?).await?;
    info!("Glossary contains {} terms", count);

    let driver = Driver::new(db.clone());
    let app = app(driver);

    let bind_addr = bind_addr.into();
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Listening on {}", bind_addr);
    let result = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;

    db.close().await;
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_options_from_env_defaults() {
        let overrides = [("GLOSSARY_ADDRESS", None::<&str>), ("GLOSSARY_PORT", None)];
        temp_env::with_vars(overrides, || {
            let opts = ServerOptions::from_env("GLOSSARY").unwrap();
            assert_eq!(ServerOptions::default(), opts);
            assert_eq!(SocketAddr::from(([0, 0, 0, 0], 5003)), opts.bind_addr());
        });
    }

    #[test]
    fn test_server_options_from_env_all_present() {
        let overrides = [("GLOSSARY_ADDRESS", Some("127.0.0.1")), ("GLOSSARY_PORT", Some("8080"))];
        temp_env::with_vars(overrides, || {
            let opts = ServerOptions::from_env("GLOSSARY").unwrap();
            assert_eq!(ServerOptions { address: Ipv4Addr::LOCALHOST, port: 8080 }, opts);
        });
    }

    #[test]
    fn test_server_options_from_env_bad_port() {
        let overrides = [("GLOSSARY_ADDRESS", None), ("GLOSSARY_PORT", Some("70000"))];
        temp_env::with_vars(overrides, || {
            let err = ServerOptions::from_env("GLOSSARY").unwrap_err();
            assert!(err.contains("GLOSSARY_PORT"));
        });
    }
}
