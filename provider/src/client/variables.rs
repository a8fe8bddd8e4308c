//! Environment variable API methods
//!
//! Variables have no server-side update mutation; the resource layer handles
//! "update" as delete-then-recreate on top of the two calls here.

use serde::Deserialize;
use serde_json::json;

use crate::client::graphql::LagoonClient;
use crate::errors::LagoonError;
use crate::models::EnvVariable;
use crate::validate::VariableScope;

const VARIABLE_FIELDS: &str = "id name value scope";

impl LagoonClient {
    /// Create a variable, project-scoped when `environment_id` is absent.
    pub async fn add_env_variable(
        &self,
        project_id: i64,
        environment_id: Option<i64>,
        name: &str,
        value: &str,
        scope: VariableScope,
    ) -> Result<EnvVariable, LagoonError> {
        let query = format!(
            "mutation addEnvVariable($input: EnvVariableInput!) {{ addEnvVariable(input: $input) {{ {} }} }}",
            VARIABLE_FIELDS
        );
        let (var_type, type_id) = match environment_id {
            Some(env) => ("ENVIRONMENT", env),
            None => ("PROJECT", project_id),
        };
        let variables = json!({
            "input": {
                "type": var_type,
                "typeId": type_id,
                "name": name,
                "value": value,
                "scope": scope.as_graphql(),
            }
        });

        let data = self.execute(&query, variables).await?;
        Self::field(data, "addEnvVariable")
    }

    /// Delete a variable by its server-side row ID.
    pub async fn delete_env_variable(&self, id: i64) -> Result<(), LagoonError> {
        let query = "mutation deleteEnvVariable($input: DeleteEnvVariableInput!) { deleteEnvVariable(input: $input) }";
        self.execute(query, json!({ "input": { "id": id } })).await?;
        Ok(())
    }

    /// List the variables visible at a project or environment scope.
    ///
    /// Current servers expose a direct query; the old schema generation only
    /// returns variables nested under the project, so the fallback document
    /// fetches those and filters locally.
    pub async fn list_env_variables(
        &self,
        project_name: &str,
        environment_name: Option<&str>,
    ) -> Result<Vec<EnvVariable>, LagoonError> {
        let new_query = format!(
            "query getEnvVariablesByProjectEnvironmentName($input: EnvVariableByProjectEnvironmentNameInput!) {{ getEnvVariablesByProjectEnvironmentName(input: $input) {{ {} }} }}",
            VARIABLE_FIELDS
        );
        let new_variables = json!({
            "input": {
                "project": project_name,
                "environment": environment_name,
            }
        });

        let old_query = format!(
            "query projectByName($name: String!) {{ projectByName(name: $name) {{ envVariables {{ {fields} }} environments {{ name envVariables {{ {fields} }} }} }} }}",
            fields = VARIABLE_FIELDS
        );
        let old_variables = json!({ "name": project_name });

        let data = self
            .execute_with_fallback(&new_query, new_variables, &old_query, old_variables)
            .await?;

        if let Some(direct) = data.get("getEnvVariablesByProjectEnvironmentName") {
            let variables: Option<Vec<EnvVariable>> = serde_json::from_value(direct.clone())?;
            return Ok(variables.unwrap_or_default());
        }

        #[derive(Debug, Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct LegacyEnvironment {
            name: String,
            #[serde(default)]
            env_variables: Vec<EnvVariable>,
        }

        #[derive(Debug, Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct LegacyProject {
            #[serde(default)]
            env_variables: Vec<EnvVariable>,
            #[serde(default)]
            environments: Vec<LegacyEnvironment>,
        }

        let project: Option<LegacyProject> = Self::field(data, "projectByName")?;
        let Some(project) = project else {
            return Ok(Vec::new());
        };

        match environment_name {
            None => Ok(project.env_variables),
            Some(env) => Ok(project
                .environments
                .into_iter()
                .find(|e| e.name == env)
                .map(|e| e.env_variables)
                .unwrap_or_default()),
        }
    }
}
