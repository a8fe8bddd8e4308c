//! Environment resource

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::environments::EnvironmentInput;
use crate::client::LagoonClient;
use crate::errors::LagoonError;
use crate::ident::{environment_import_id, is_import_scenario, parse_environment_id};
use crate::models::Environment;
use crate::resources::lifecycle::{
    from_host, skip_noop_update, to_host, CreateResult, ReadResult, ResourceLifecycle,
    UpdateResult,
};
use crate::validate::{
    validate_environment_name, validate_positive_int, DeployType, EnvironmentType,
};

const REQUIRED_STATE: &[&str] = &["name", "project_id"];

/// Input schema for an environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentArgs {
    pub project_id: i64,
    pub name: String,
    pub deploy_type: DeployType,
    pub environment_type: EnvironmentType,

    #[serde(default)]
    pub deploy_base_ref: Option<String>,

    #[serde(default)]
    pub deploy_head_ref: Option<String>,
}

/// Output schema for an environment. `route`/`routes` are server-assigned
/// and read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentState {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub deploy_type: DeployType,
    pub environment_type: EnvironmentType,

    #[serde(default)]
    pub deploy_base_ref: Option<String>,

    #[serde(default)]
    pub deploy_head_ref: Option<String>,

    #[serde(default)]
    pub route: Option<String>,

    #[serde(default)]
    pub routes: Option<String>,
}

impl EnvironmentState {
    fn from_remote(environment: &Environment) -> Self {
        Self {
            id: environment.id,
            project_id: environment.project_id,
            name: environment.name.clone(),
            deploy_type: environment.deploy_type,
            environment_type: environment.environment_type,
            deploy_base_ref: environment.deploy_base_ref.clone(),
            deploy_head_ref: environment.deploy_head_ref.clone(),
            route: environment.route.clone(),
            routes: environment.routes.clone(),
        }
    }

    fn args(&self) -> EnvironmentArgs {
        EnvironmentArgs {
            project_id: self.project_id,
            name: self.name.clone(),
            deploy_type: self.deploy_type,
            environment_type: self.environment_type,
            deploy_base_ref: self.deploy_base_ref.clone(),
            deploy_head_ref: self.deploy_head_ref.clone(),
        }
    }
}

/// Environment provider; resources are keyed by `(project, name)` and the
/// local ID encodes that pair.
pub struct EnvironmentResource {
    client: Arc<LagoonClient>,
}

impl EnvironmentResource {
    pub fn new(client: Arc<LagoonClient>) -> Self {
        Self { client }
    }

    fn validate(args: &EnvironmentArgs) -> Result<(), LagoonError> {
        validate_positive_int("project_id", args.project_id)?;
        validate_environment_name(&args.name)?;
        Ok(())
    }

    fn input(args: &EnvironmentArgs) -> EnvironmentInput {
        EnvironmentInput {
            project_id: args.project_id,
            name: args.name.clone(),
            deploy_type: args.deploy_type,
            environment_type: args.environment_type,
            deploy_base_ref: args.deploy_base_ref.clone(),
            deploy_head_ref: args.deploy_head_ref.clone(),
        }
    }

    /// The delete mutation keys on project name, which state does not carry.
    async fn project_name(&self, project_id: i64) -> Result<String, LagoonError> {
        self.client
            .project_name_by_id(project_id)
            .await?
            .ok_or_else(|| LagoonError::Api(format!("project {} not found", project_id)))
    }
}

#[async_trait]
impl ResourceLifecycle for EnvironmentResource {
    fn kind(&self) -> &'static str {
        "lagoon:environment"
    }

    async fn create(&self, inputs: Value) -> Result<CreateResult, LagoonError> {
        let args: EnvironmentArgs = from_host(inputs)?;
        Self::validate(&args)?;

        let environment = self
            .client
            .add_or_update_environment(&Self::input(&args))
            .await?;
        let state = EnvironmentState::from_remote(&environment);
        Ok(CreateResult {
            id: environment_import_id(state.project_id, &state.name),
            outs: to_host(&state)?,
        })
    }

    async fn read(&self, id: &str, state: Value) -> Result<Option<ReadResult>, LagoonError> {
        let (project_id, name) = if is_import_scenario(&state, REQUIRED_STATE) {
            parse_environment_id(id)?
        } else {
            let prior: EnvironmentState = from_host(state)?;
            (prior.project_id, prior.name)
        };

        match self.client.environment_by_name(project_id, &name).await? {
            Some(environment) => {
                let state = EnvironmentState::from_remote(&environment);
                Ok(Some(ReadResult {
                    id: environment_import_id(state.project_id, &state.name),
                    outs: to_host(&state)?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, id: &str, old: Value, news: Value) -> Result<UpdateResult, LagoonError> {
        let prior: EnvironmentState = from_host(old.clone())?;
        let args: EnvironmentArgs = from_host(news)?;
        Self::validate(&args)?;

        if prior.args() == args {
            return Ok(skip_noop_update(self.kind(), id, old));
        }

        let environment = self
            .client
            .update_environment(prior.id, &Self::input(&args))
            .await?;
        let state = EnvironmentState::from_remote(&environment);
        Ok(UpdateResult {
            outs: to_host(&state)?,
        })
    }

    async fn delete(&self, _id: &str, state: Value) -> Result<(), LagoonError> {
        let prior: EnvironmentState = from_host(state)?;
        let project_name = self.project_name(prior.project_id).await?;
        self.client
            .delete_environment(&project_name, &prior.name)
            .await
    }
}
