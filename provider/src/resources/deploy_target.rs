//! Deploy target resource

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::deploy_targets::DeployTargetInput;
use crate::client::LagoonClient;
use crate::errors::LagoonError;
use crate::ident::is_import_scenario;
use crate::models::DeployTarget;
use crate::resources::lifecycle::{
    from_host, skip_noop_update, to_host, CreateResult, ReadResult, ResourceLifecycle,
    UpdateResult,
};
use crate::validate::{
    parse_positive_int, validate_deploy_target_name, validate_http_url, validate_pattern,
    validate_port, CloudProvider,
};

const REQUIRED_STATE: &[&str] = &["id", "name"];

/// Input schema for a deploy target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployTargetArgs {
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
    pub ssh_port: Option<i64>,

    #[serde(default)]
    pub router_pattern: Option<String>,

    #[serde(default)]
    pub disabled: Option<bool>,
}

/// Output schema for a deploy target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployTargetState {
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
    pub ssh_port: Option<i64>,

    #[serde(default)]
    pub router_pattern: Option<String>,

    #[serde(default)]
    pub disabled: Option<bool>,
}

impl DeployTargetState {
    fn from_remote(target: &DeployTarget) -> Self {
        Self {
            id: target.id,
            name: target.name.clone(),
            console_url: target.console_url.clone(),
            cloud_provider: target.cloud_provider,
            cloud_region: target.cloud_region.clone(),
            ssh_host: target.ssh_host.clone(),
            // the API models the port as a string
            ssh_port: target.ssh_port.as_deref().and_then(|p| p.parse().ok()),
            router_pattern: target.router_pattern.clone(),
            disabled: target.disabled,
        }
    }

    fn args(&self) -> DeployTargetArgs {
        DeployTargetArgs {
            name: self.name.clone(),
            console_url: self.console_url.clone(),
            cloud_provider: self.cloud_provider,
            cloud_region: self.cloud_region.clone(),
            ssh_host: self.ssh_host.clone(),
            ssh_port: self.ssh_port,
            router_pattern: self.router_pattern.clone(),
            disabled: self.disabled,
        }
    }
}

/// Deploy target provider
pub struct DeployTargetResource {
    client: Arc<LagoonClient>,
}

impl DeployTargetResource {
    pub fn new(client: Arc<LagoonClient>) -> Self {
        Self { client }
    }

    fn validate(args: &DeployTargetArgs) -> Result<(), LagoonError> {
        validate_deploy_target_name(&args.name)?;
        if let Some(url) = &args.console_url {
            validate_http_url("console_url", url)?;
        }
        if let Some(port) = args.ssh_port {
            validate_port("ssh_port", port)?;
        }
        if let Some(pattern) = &args.router_pattern {
            validate_pattern("router_pattern", pattern)?;
        }
        Ok(())
    }

    fn input(args: &DeployTargetArgs) -> Result<DeployTargetInput, LagoonError> {
        let ssh_port = match args.ssh_port {
            Some(port) => Some(validate_port("ssh_port", port)?),
            None => None,
        };
        Ok(DeployTargetInput {
            name: args.name.clone(),
            console_url: args.console_url.clone(),
            cloud_provider: args.cloud_provider,
            cloud_region: args.cloud_region.clone(),
            ssh_host: args.ssh_host.clone(),
            ssh_port,
            router_pattern: args.router_pattern.clone(),
            disabled: args.disabled,
        })
    }
}

#[async_trait]
impl ResourceLifecycle for DeployTargetResource {
    fn kind(&self) -> &'static str {
        "lagoon:deploy-target"
    }

    async fn create(&self, inputs: Value) -> Result<CreateResult, LagoonError> {
        let args: DeployTargetArgs = from_host(inputs)?;
        Self::validate(&args)?;

        let target = self.client.add_deploy_target(&Self::input(&args)?).await?;
        let state = DeployTargetState::from_remote(&target);
        Ok(CreateResult {
            id: target.id.to_string(),
            outs: to_host(&state)?,
        })
    }

    async fn read(&self, id: &str, state: Value) -> Result<Option<ReadResult>, LagoonError> {
        let target_id = if is_import_scenario(&state, REQUIRED_STATE) {
            parse_positive_int("deploy_target_id", id)?
        } else {
            let prior: DeployTargetState = from_host(state)?;
            prior.id
        };

        match self.client.deploy_target_by_id(target_id).await? {
            Some(target) => {
                let state = DeployTargetState::from_remote(&target);
                Ok(Some(ReadResult {
                    id: target.id.to_string(),
                    outs: to_host(&state)?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, id: &str, old: Value, news: Value) -> Result<UpdateResult, LagoonError> {
        let prior: DeployTargetState = from_host(old.clone())?;
        let args: DeployTargetArgs = from_host(news)?;
        Self::validate(&args)?;

        if prior.args() == args {
            return Ok(skip_noop_update(self.kind(), id, old));
        }

        let target = self
            .client
            .update_deploy_target(prior.id, &Self::input(&args)?)
            .await?;
        let state = DeployTargetState::from_remote(&target);
        Ok(UpdateResult {
            outs: to_host(&state)?,
        })
    }

    async fn delete(&self, _id: &str, state: Value) -> Result<(), LagoonError> {
        let prior: DeployTargetState = from_host(state)?;
        self.client.delete_deploy_target(&prior.name).await
    }
}
