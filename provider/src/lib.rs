//! Lagoon Provider Library
//!
//! Resource lifecycle layer for the Lagoon GraphQL API: projects,
//! environments, variables, deploy targets, notifications and advanced
//! tasks, each exposed through the four-method create/read/update/delete
//! contract plus import-by-ID.

pub mod authn;
pub mod client;
pub mod config;
pub mod errors;
pub mod ident;
pub mod logs;
pub mod models;
pub mod provider;
pub mod resources;
pub mod validate;

pub use client::LagoonClient;
pub use config::{PartialSettings, Settings};
pub use errors::LagoonError;
pub use provider::{LagoonProvider, KINDS};
pub use resources::{CreateResult, ReadResult, ResourceLifecycle, UpdateResult, UpdateStrategy};
