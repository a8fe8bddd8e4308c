//! Environment variable resource
//!
//! The API has no variable update mutation, so update is delete-then-create;
//! the server row ID changes on every update, which is why the durable local
//! ID is synthesized from the scope and name instead.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::LagoonClient;
use crate::errors::LagoonError;
use crate::ident::{is_import_scenario, parse_variable_id, variable_local_id};
use crate::resources::lifecycle::{
    from_host, recreate, to_host, CreateResult, ReadResult, ResourceLifecycle, UpdateResult,
    UpdateStrategy,
};
use crate::validate::{validate_positive_int, VariableScope};

const REQUIRED_STATE: &[&str] = &["project_id", "name"];

/// Input schema for a variable; no `environment_id` means project scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableArgs {
    pub project_id: i64,

    #[serde(default)]
    pub environment_id: Option<i64>,

    pub name: String,
    pub value: String,
    pub scope: VariableScope,
}

/// Output schema for a variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableState {
    /// Server-side row ID; not durable across updates
    pub id: i64,

    pub project_id: i64,

    #[serde(default)]
    pub environment_id: Option<i64>,

    pub name: String,
    pub value: String,
    pub scope: VariableScope,
}

/// Variable provider
pub struct VariableResource {
    client: Arc<LagoonClient>,
}

impl VariableResource {
    pub fn new(client: Arc<LagoonClient>) -> Self {
        Self { client }
    }

    fn validate(args: &VariableArgs) -> Result<(), LagoonError> {
        validate_positive_int("project_id", args.project_id)?;
        if let Some(env) = args.environment_id {
            validate_positive_int("environment_id", env)?;
        }
        if args.name.is_empty() {
            return Err(LagoonError::validation("name", "must not be empty"));
        }
        Ok(())
    }

    /// Find a variable by scope coordinates and name. Both lookups need the
    /// project (and environment) names, which only exist server-side.
    async fn find(
        &self,
        project_id: i64,
        environment_id: Option<i64>,
        name: &str,
    ) -> Result<Option<VariableState>, LagoonError> {
        let Some(project_name) = self.client.project_name_by_id(project_id).await? else {
            return Ok(None);
        };

        let environment_name = match environment_id {
            None => None,
            Some(env_id) => match self.client.environment_by_id(env_id).await? {
                Some(environment) => Some(environment.name),
                None => return Ok(None),
            },
        };

        let variables = self
            .client
            .list_env_variables(&project_name, environment_name.as_deref())
            .await?;

        Ok(variables.into_iter().find(|v| v.name == name).map(|v| {
            VariableState {
                id: v.id,
                project_id,
                environment_id,
                name: v.name,
                value: v.value,
                scope: v.scope,
            }
        }))
    }
}

#[async_trait]
impl ResourceLifecycle for VariableResource {
    fn kind(&self) -> &'static str {
        "lagoon:variable"
    }

    fn update_strategy(&self) -> UpdateStrategy {
        UpdateStrategy::Recreate
    }

    async fn create(&self, inputs: Value) -> Result<CreateResult, LagoonError> {
        let args: VariableArgs = from_host(inputs)?;
        Self::validate(&args)?;

        let variable = self
            .client
            .add_env_variable(
                args.project_id,
                args.environment_id,
                &args.name,
                &args.value,
                args.scope,
            )
            .await?;

        let state = VariableState {
            id: variable.id,
            project_id: args.project_id,
            environment_id: args.environment_id,
            name: variable.name,
            value: variable.value,
            scope: variable.scope,
        };
        Ok(CreateResult {
            id: variable_local_id(args.project_id, args.environment_id, &state.name),
            outs: to_host(&state)?,
        })
    }

    async fn read(&self, id: &str, state: Value) -> Result<Option<ReadResult>, LagoonError> {
        let (project_id, environment_id, name) = if is_import_scenario(&state, REQUIRED_STATE) {
            parse_variable_id(id)?
        } else {
            let prior: VariableState = from_host(state)?;
            (prior.project_id, prior.environment_id, prior.name)
        };

        match self.find(project_id, environment_id, &name).await? {
            Some(state) => Ok(Some(ReadResult {
                id: variable_local_id(project_id, environment_id, &state.name),
                outs: to_host(&state)?,
            })),
            None => Ok(None),
        }
    }

    async fn update(&self, id: &str, old: Value, news: Value) -> Result<UpdateResult, LagoonError> {
        recreate(self, id, old, news).await
    }

    async fn delete(&self, _id: &str, state: Value) -> Result<(), LagoonError> {
        let prior: VariableState = from_host(state)?;
        self.client.delete_env_variable(prior.id).await
    }
}
