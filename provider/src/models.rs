//! Normalized mirrors of remote Lagoon entities
//!
//! The GraphQL API returns relations as nested `{id, name}` objects and enum
//! values in SCREAMING_SNAKE case; client methods normalize both into these
//! flat records before anything else sees them.

use serde::{Deserialize, Serialize};

use crate::validate::{
    CloudProvider, DeployType, EnvironmentType, TaskKind, TaskPermission, VariableScope,
};

/// A Lagoon project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Server-assigned project ID
    pub id: i64,

    /// Unique project name
    pub name: String,

    #[serde(default)]
    pub git_url: Option<String>,

    /// Name of the production environment
    #[serde(default)]
    pub production_environment: Option<String>,

    /// Regex controlling which branches deploy
    #[serde(default)]
    pub branches: Option<String>,

    /// Regex controlling which pull requests deploy
    #[serde(default)]
    pub pullrequests: Option<String>,

    /// ID of the deploy target, normalized from the nested relation
    #[serde(default)]
    pub deploy_target_id: Option<i64>,
}

/// A deployed environment of a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    pub id: i64,
    pub name: String,

    /// Parent project ID, normalized from the nested relation
    pub project_id: i64,

    pub deploy_type: DeployType,
    pub environment_type: EnvironmentType,

    #[serde(default)]
    pub deploy_base_ref: Option<String>,

    #[serde(default)]
    pub deploy_head_ref: Option<String>,

    /// Primary route, server-assigned
    #[serde(default)]
    pub route: Option<String>,

    /// All routes, server-assigned
    #[serde(default)]
    pub routes: Option<String>,
}

/// An environment variable, project- or environment-scoped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvVariable {
    /// Server-side row ID; changes on every delete-then-recreate update
    pub id: i64,

    pub name: String,
    pub value: String,
    pub scope: VariableScope,
}

/// A registered Kubernetes cluster Lagoon can deploy onto
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployTarget {
    pub id: i64,
    pub name: String,

    #[serde(default)]
    pub console_url: Option<String>,

    #[serde(default)]
    pub cloud_provider: Option<CloudProvider>,

    #[serde(default)]
    pub cloud_region: Option<String>,

    #[serde(default)]
    pub ssh_host: Option<String>,

    #[serde(default)]
    pub ssh_port: Option<String>,

    #[serde(default)]
    pub router_pattern: Option<String>,

    #[serde(default)]
    pub disabled: Option<bool>,
}

/// Links a project to a deploy target with a branch-matching rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployTargetConfig {
    pub id: i64,

    /// Owning project, normalized from the nested relation
    pub project_id: i64,

    /// Target cluster, normalized from the nested relation
    pub deploy_target_id: i64,

    pub branches: String,
    pub pullrequests: String,

    /// Higher weight wins on conflicting branch matches; sent unmodified
    pub weight: i64,
}

/// A notification endpoint; the name is unique across the whole instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub name: String,

    #[serde(default)]
    pub webhook: Option<String>,

    #[serde(default)]
    pub channel: Option<String>,

    #[serde(default)]
    pub email_address: Option<String>,
}

/// An advanced task definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedTask {
    /// Server-side ID; changes on every delete-then-recreate update
    pub id: i64,

    pub name: String,
    pub task_type: TaskKind,

    #[serde(default)]
    pub service: Option<String>,

    #[serde(default)]
    pub command: Option<String>,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub permission: Option<TaskPermission>,

    /// Set when the task is project-scoped
    #[serde(default)]
    pub project_id: Option<i64>,

    /// Set when the task is environment-scoped
    #[serde(default)]
    pub environment_id: Option<i64>,

    /// Set when the task is group-scoped
    #[serde(default)]
    pub group_name: Option<String>,

    /// Set when the task is visible instance-wide
    #[serde(default)]
    pub system_wide: Option<bool>,
}
