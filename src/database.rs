//! # MongoDB
//!
//! Hosted document store (Atlas). All application state lives here.
//!
//! ## Requirements
//!
//! - Three collections, no server-side schema: documents are stored with
//!   whatever fields the caller sends
//! - One client for the process, opened at startup and never closed
//! - Stable API v1, strict, so the cluster rejects anything outside the
//!   versioned surface
//!
//! ## Collections
//!
//! - `issues`: `_id` ObjectId, `email`, `category`, `status`, `date`, plus
//!   arbitrary fields
//! - `contributions`: `_id` ObjectId, `issueId` string, `email`, plus
//!   arbitrary fields
//! - `users`: keyed by `email`, `name`, `photoURL`, `role`
use mongodb::{
    Client, Database,
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
};
use tracing::info;

use super::config::Config;

pub const DB_NAME: &str = "clean-connect";
pub const ISSUES: &str = "issues";
pub const CONTRIBUTIONS: &str = "contributions";
pub const USERS: &str = "users";

/// Length of the latest-issues feed on the landing page.
pub const LATEST_ISSUES_LIMIT: i64 = 6;

pub async fn init_mongo(config: &Config) -> Database {
    let mut options = ClientOptions::parse(config.connection_string())
        .await
        .unwrap();

    options.server_api = Some(
        ServerApi::builder()
            .version(ServerApiVersion::V1)
            .strict(true)
            .deprecation_errors(true)
            .build(),
    );

    let client = Client::with_options(options).unwrap();

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .expect("MongoDB unreachable!");

    info!("Pinged deployment, connected to MongoDB");

    client.database(DB_NAME)
}
