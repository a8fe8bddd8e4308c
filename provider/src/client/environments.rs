//! Environment API methods

use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::graphql::{normalize_id, LagoonClient};
use crate::errors::LagoonError;
use crate::models::Environment;
use crate::validate::{DeployType, EnvironmentType};

const ENVIRONMENT_FIELDS: &str =
    "id name project { id } deployType environmentType deployBaseRef deployHeadRef route routes";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvironmentWire {
    id: i64,
    name: String,
    #[serde(default)]
    project: Option<Value>,
    deploy_type: DeployType,
    environment_type: EnvironmentType,
    #[serde(default)]
    deploy_base_ref: Option<String>,
    #[serde(default)]
    deploy_head_ref: Option<String>,
    #[serde(default)]
    route: Option<String>,
    #[serde(default)]
    routes: Option<String>,
}

impl EnvironmentWire {
    /// The project relation is `{id}` on current servers and a raw int on
    /// some older ones; accept both.
    fn normalize(self, fallback_project_id: i64) -> Environment {
        let project_id = self
            .project
            .as_ref()
            .and_then(normalize_id)
            .unwrap_or(fallback_project_id);
        Environment {
            id: self.id,
            name: self.name,
            project_id,
            deploy_type: self.deploy_type,
            environment_type: self.environment_type,
            deploy_base_ref: self.deploy_base_ref,
            deploy_head_ref: self.deploy_head_ref,
            route: self.route,
            routes: self.routes,
        }
    }
}

/// Fields accepted by `addOrUpdateEnvironment` / the `updateEnvironment` patch
#[derive(Debug, Clone)]
pub struct EnvironmentInput {
    pub project_id: i64,
    pub name: String,
    pub deploy_type: DeployType,
    pub environment_type: EnvironmentType,
    pub deploy_base_ref: Option<String>,
    pub deploy_head_ref: Option<String>,
}

impl LagoonClient {
    /// Create or update an environment under a project. The mutation is an
    /// upsert keyed on `(project, name)` server-side.
    pub async fn add_or_update_environment(
        &self,
        input: &EnvironmentInput,
    ) -> Result<Environment, LagoonError> {
        let query = format!(
            "mutation addOrUpdateEnvironment($input: AddEnvironmentInput!) {{ addOrUpdateEnvironment(input: $input) {{ {} }} }}",
            ENVIRONMENT_FIELDS
        );
        let variables = json!({
            "input": {
                "name": input.name,
                "project": input.project_id,
                "deployType": input.deploy_type.as_graphql(),
                "environmentType": input.environment_type.as_graphql(),
                "deployBaseRef": input.deploy_base_ref,
                "deployHeadRef": input.deploy_head_ref,
            }
        });

        let data = self.execute(&query, variables).await?;
        let wire: EnvironmentWire = Self::field(data, "addOrUpdateEnvironment")?;
        Ok(wire.normalize(input.project_id))
    }

    /// Look up an environment by `(project, name)`.
    pub async fn environment_by_name(
        &self,
        project_id: i64,
        name: &str,
    ) -> Result<Option<Environment>, LagoonError> {
        let query = format!(
            "query environmentByName($project: Int!, $name: String!) {{ environmentByName(project: $project, name: $name) {{ {} }} }}",
            ENVIRONMENT_FIELDS
        );
        let data = self
            .execute(&query, json!({ "project": project_id, "name": name }))
            .await?;
        let wire: Option<EnvironmentWire> = Self::field(data, "environmentByName")?;
        Ok(wire.map(|w| w.normalize(project_id)))
    }

    /// Look up an environment by its server-side ID.
    pub async fn environment_by_id(&self, id: i64) -> Result<Option<Environment>, LagoonError> {
        let query = format!(
            "query environmentById($id: Int!) {{ environmentById(id: $id) {{ {} }} }}",
            ENVIRONMENT_FIELDS
        );
        let data = self.execute(&query, json!({ "id": id })).await?;
        let wire: Option<EnvironmentWire> = Self::field(data, "environmentById")?;
        // no fallback project ID exists here; a server that omits the project
        // relation yields project_id 0 and callers must not rely on it
        Ok(wire.map(|w| w.normalize(0)))
    }

    /// Update an environment in place.
    pub async fn update_environment(
        &self,
        id: i64,
        patch: &EnvironmentInput,
    ) -> Result<Environment, LagoonError> {
        let query = format!(
            "mutation updateEnvironment($input: UpdateEnvironmentInput!) {{ updateEnvironment(input: $input) {{ {} }} }}",
            ENVIRONMENT_FIELDS
        );
        let variables = json!({
            "input": {
                "id": id,
                "patch": {
                    "deployType": patch.deploy_type.as_graphql(),
                    "environmentType": patch.environment_type.as_graphql(),
                    "deployBaseRef": patch.deploy_base_ref,
                    "deployHeadRef": patch.deploy_head_ref,
                }
            }
        });

        let data = self.execute(&query, variables).await?;
        let wire: EnvironmentWire = Self::field(data, "updateEnvironment")?;
        Ok(wire.normalize(patch.project_id))
    }

    /// Delete an environment. The API keys deletion on `(project name,
    /// environment name)`.
    pub async fn delete_environment(
        &self,
        project_name: &str,
        name: &str,
    ) -> Result<(), LagoonError> {
        let query = "mutation deleteEnvironment($input: DeleteEnvironmentInput!) { deleteEnvironment(input: $input) }";
        self.execute(
            query,
            json!({ "input": { "name": name, "project": project_name, "execute": true } }),
        )
        .await?;
        Ok(())
    }
}
