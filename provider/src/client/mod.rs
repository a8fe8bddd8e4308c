//! GraphQL client for the Lagoon API
//!
//! `graphql.rs` holds the transport; the per-entity modules attach typed
//! methods to [`LagoonClient`], each owning its GraphQL documents and
//! normalizing the response shapes.

pub mod deploy_target_configs;
pub mod deploy_targets;
pub mod environments;
pub mod graphql;
pub mod notifications;
pub mod projects;
pub mod tasks;
pub mod variables;

pub use graphql::LagoonClient;
