//! Deploy target config API methods

use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::graphql::{normalize_id, LagoonClient};
use crate::errors::LagoonError;
use crate::models::DeployTargetConfig;

const CONFIG_FIELDS: &str =
    "id project { id } deployTarget { id } branches pullrequests weight";

/// Fields accepted by `addDeployTargetConfig` / the update patch
#[derive(Debug, Clone)]
pub struct DeployTargetConfigInput {
    pub project_id: i64,
    pub deploy_target_id: i64,
    pub branches: String,
    pub pullrequests: String,
    /// Higher weight wins on conflicting branch matches. Sent to the server
    /// unmodified; ordering among configs is entirely server-side.
    pub weight: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeployTargetConfigWire {
    id: i64,
    #[serde(default)]
    project: Option<Value>,
    #[serde(default)]
    deploy_target: Option<Value>,
    branches: String,
    pullrequests: String,
    weight: i64,
}

impl DeployTargetConfigWire {
    fn normalize(self, fallback_project_id: i64) -> DeployTargetConfig {
        DeployTargetConfig {
            id: self.id,
            project_id: self
                .project
                .as_ref()
                .and_then(normalize_id)
                .unwrap_or(fallback_project_id),
            deploy_target_id: self
                .deploy_target
                .as_ref()
                .and_then(normalize_id)
                .unwrap_or_default(),
            branches: self.branches,
            pullrequests: self.pullrequests,
            weight: self.weight,
        }
    }
}

impl LagoonClient {
    /// Attach a deploy target config to a project.
    pub async fn add_deploy_target_config(
        &self,
        input: &DeployTargetConfigInput,
    ) -> Result<DeployTargetConfig, LagoonError> {
        let query = format!(
            "mutation addDeployTargetConfig($input: AddDeployTargetConfigInput!) {{ addDeployTargetConfig(input: $input) {{ {} }} }}",
            CONFIG_FIELDS
        );
        let variables = json!({
            "input": {
                "project": input.project_id,
                "deployTarget": input.deploy_target_id,
                "branches": input.branches,
                "pullrequests": input.pullrequests,
                "weight": input.weight,
            }
        });

        let data = self.execute(&query, variables).await?;
        let wire: DeployTargetConfigWire = Self::field(data, "addDeployTargetConfig")?;
        Ok(wire.normalize(input.project_id))
    }

    /// List a project's deploy target configs.
    pub async fn deploy_target_configs_by_project(
        &self,
        project_id: i64,
    ) -> Result<Vec<DeployTargetConfig>, LagoonError> {
        let query = format!(
            "query deployTargetConfigsByProjectId($project: Int!) {{ deployTargetConfigsByProjectId(project: $project) {{ {} }} }}",
            CONFIG_FIELDS
        );
        let data = self.execute(&query, json!({ "project": project_id })).await?;
        let wires: Option<Vec<DeployTargetConfigWire>> =
            Self::field(data, "deployTargetConfigsByProjectId")?;
        Ok(wires
            .unwrap_or_default()
            .into_iter()
            .map(|w| w.normalize(project_id))
            .collect())
    }

    /// Update a deploy target config in place.
    pub async fn update_deploy_target_config(
        &self,
        id: i64,
        patch: &DeployTargetConfigInput,
    ) -> Result<DeployTargetConfig, LagoonError> {
        let query = format!(
            "mutation updateDeployTargetConfig($input: UpdateDeployTargetConfigInput!) {{ updateDeployTargetConfig(input: $input) {{ {} }} }}",
            CONFIG_FIELDS
        );
        let variables = json!({
            "input": {
                "id": id,
                "patch": {
                    "deployTarget": patch.deploy_target_id,
                    "branches": patch.branches,
                    "pullrequests": patch.pullrequests,
                    "weight": patch.weight,
                }
            }
        });

        let data = self.execute(&query, variables).await?;
        let wire: DeployTargetConfigWire = Self::field(data, "updateDeployTargetConfig")?;
        Ok(wire.normalize(patch.project_id))
    }

    /// Delete a deploy target config.
    pub async fn delete_deploy_target_config(
        &self,
        project_id: i64,
        id: i64,
    ) -> Result<(), LagoonError> {
        let query = "mutation deleteDeployTargetConfig($input: DeleteDeployTargetConfigInput!) { deleteDeployTargetConfig(input: $input) }";
        self.execute(query, json!({ "input": { "id": id, "project": project_id } }))
            .await?;
        Ok(())
    }
}
