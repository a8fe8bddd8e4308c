//! Dynamic resource providers
//!
//! One module per resource kind, each implementing the four-method
//! [`lifecycle::ResourceLifecycle`] contract against the GraphQL client.

pub mod deploy_target;
pub mod deploy_target_config;
pub mod environment;
pub mod lifecycle;
pub mod notification;
pub mod project;
pub mod project_notification;
pub mod task;
pub mod variable;

pub use lifecycle::{CreateResult, ReadResult, ResourceLifecycle, UpdateResult, UpdateStrategy};
