//! Deploy target config resource

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::deploy_target_configs::DeployTargetConfigInput;
use crate::client::LagoonClient;
use crate::errors::LagoonError;
use crate::ident::{
    deploy_target_config_import_id, is_import_scenario, parse_deploy_target_config_id,
};
use crate::models::DeployTargetConfig;
use crate::resources::lifecycle::{
    from_host, skip_noop_update, to_host, CreateResult, ReadResult, ResourceLifecycle,
    UpdateResult,
};
use crate::validate::{validate_pattern, validate_positive_int};

const REQUIRED_STATE: &[&str] = &["id", "project_id"];

/// Input schema for a deploy target config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployTargetConfigArgs {
    pub project_id: i64,
    pub deploytarget_id: i64,
    pub branches: String,
    pub pullrequests: String,

    /// Higher weight wins on conflicting branch matches; passed through to
    /// the server unmodified
    pub weight: i64,
}

/// Output schema for a deploy target config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployTargetConfigState {
    pub id: i64,
    pub project_id: i64,
    pub deploytarget_id: i64,
    pub branches: String,
    pub pullrequests: String,
    pub weight: i64,
}

impl DeployTargetConfigState {
    fn from_remote(config: &DeployTargetConfig) -> Self {
        Self {
            id: config.id,
            project_id: config.project_id,
            deploytarget_id: config.deploy_target_id,
            branches: config.branches.clone(),
            pullrequests: config.pullrequests.clone(),
            weight: config.weight,
        }
    }

    fn args(&self) -> DeployTargetConfigArgs {
        DeployTargetConfigArgs {
            project_id: self.project_id,
            deploytarget_id: self.deploytarget_id,
            branches: self.branches.clone(),
            pullrequests: self.pullrequests.clone(),
            weight: self.weight,
        }
    }
}

/// Deploy target config provider; the composite import identity is
/// `project_id:config_id`.
pub struct DeployTargetConfigResource {
    client: Arc<LagoonClient>,
}

impl DeployTargetConfigResource {
    pub fn new(client: Arc<LagoonClient>) -> Self {
        Self { client }
    }

    fn validate(args: &DeployTargetConfigArgs) -> Result<(), LagoonError> {
        validate_positive_int("project_id", args.project_id)?;
        validate_positive_int("deploytarget_id", args.deploytarget_id)?;
        validate_pattern("branches", &args.branches)?;
        validate_pattern("pullrequests", &args.pullrequests)?;
        Ok(())
    }

    fn input(args: &DeployTargetConfigArgs) -> DeployTargetConfigInput {
        DeployTargetConfigInput {
            project_id: args.project_id,
            deploy_target_id: args.deploytarget_id,
            branches: args.branches.clone(),
            pullrequests: args.pullrequests.clone(),
            weight: args.weight,
        }
    }
}

#[async_trait]
impl ResourceLifecycle for DeployTargetConfigResource {
    fn kind(&self) -> &'static str {
        "lagoon:deploy-target-config"
    }

    async fn create(&self, inputs: Value) -> Result<CreateResult, LagoonError> {
        let args: DeployTargetConfigArgs = from_host(inputs)?;
        Self::validate(&args)?;

        let config = self
            .client
            .add_deploy_target_config(&Self::input(&args))
            .await?;
        let state = DeployTargetConfigState::from_remote(&config);
        Ok(CreateResult {
            id: deploy_target_config_import_id(state.project_id, state.id),
            outs: to_host(&state)?,
        })
    }

    async fn read(&self, id: &str, state: Value) -> Result<Option<ReadResult>, LagoonError> {
        let (project_id, config_id) = if is_import_scenario(&state, REQUIRED_STATE) {
            parse_deploy_target_config_id(id)?
        } else {
            let prior: DeployTargetConfigState = from_host(state)?;
            (prior.project_id, prior.id)
        };

        let configs = self
            .client
            .deploy_target_configs_by_project(project_id)
            .await?;

        match configs.into_iter().find(|c| c.id == config_id) {
            Some(config) => {
                let state = DeployTargetConfigState::from_remote(&config);
                Ok(Some(ReadResult {
                    id: deploy_target_config_import_id(state.project_id, state.id),
                    outs: to_host(&state)?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, id: &str, old: Value, news: Value) -> Result<UpdateResult, LagoonError> {
        let prior: DeployTargetConfigState = from_host(old.clone())?;
        let args: DeployTargetConfigArgs = from_host(news)?;
        Self::validate(&args)?;

        if prior.args() == args {
            return Ok(skip_noop_update(self.kind(), id, old));
        }

        let config = self
            .client
            .update_deploy_target_config(prior.id, &Self::input(&args))
            .await?;
        let state = DeployTargetConfigState::from_remote(&config);
        Ok(UpdateResult {
            outs: to_host(&state)?,
        })
    }

    async fn delete(&self, _id: &str, state: Value) -> Result<(), LagoonError> {
        let prior: DeployTargetConfigState = from_host(state)?;
        self.client
            .delete_deploy_target_config(prior.project_id, prior.id)
            .await
    }
}
