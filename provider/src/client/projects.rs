//! Project API methods

use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::graphql::{normalize_id, LagoonClient};
use crate::errors::LagoonError;
use crate::models::Project;

const PROJECT_FIELDS: &str =
    "id name gitUrl productionEnvironment branches pullrequests kubernetes { id }";

const PROJECT_FIELDS_LEGACY: &str =
    "id name gitUrl productionEnvironment branches pullrequests openshift { id }";

/// Fields accepted by `addProject` / the `updateProject` patch
#[derive(Debug, Clone)]
pub struct ProjectInput {
    pub name: String,
    pub git_url: String,
    pub deploy_target_id: Option<i64>,
    pub production_environment: Option<String>,
    pub branches: Option<String>,
    pub pullrequests: Option<String>,
}

impl ProjectInput {
    /// Wire form of the input; the deploy target relation is named
    /// `kubernetes` on current servers and `openshift` on the old schema
    /// generation.
    fn wire(&self, relation_field: &str) -> Value {
        let mut input = json!({
            "name": self.name,
            "gitUrl": self.git_url,
            "productionEnvironment": self.production_environment,
            "branches": self.branches,
            "pullrequests": self.pullrequests,
        });
        if let Some(target) = self.deploy_target_id {
            input[relation_field] = json!(target);
        }
        input
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectWire {
    id: i64,
    name: String,
    #[serde(default)]
    git_url: Option<String>,
    #[serde(default)]
    production_environment: Option<String>,
    #[serde(default)]
    branches: Option<String>,
    #[serde(default)]
    pullrequests: Option<String>,
    #[serde(default)]
    kubernetes: Option<Value>,
    #[serde(default)]
    openshift: Option<Value>,
}

impl ProjectWire {
    fn normalize(self) -> Project {
        let deploy_target_id = self
            .kubernetes
            .as_ref()
            .or(self.openshift.as_ref())
            .and_then(normalize_id);
        Project {
            id: self.id,
            name: self.name,
            git_url: self.git_url,
            production_environment: self.production_environment,
            branches: self.branches,
            pullrequests: self.pullrequests,
            deploy_target_id,
        }
    }
}

impl LagoonClient {
    /// Create a project.
    pub async fn add_project(&self, input: &ProjectInput) -> Result<Project, LagoonError> {
        let new_query = format!(
            "mutation addProject($input: AddProjectInput!) {{ addProject(input: $input) {{ {} }} }}",
            PROJECT_FIELDS
        );
        let old_query = format!(
            "mutation addProject($input: AddProjectInput!) {{ addProject(input: $input) {{ {} }} }}",
            PROJECT_FIELDS_LEGACY
        );

        let data = self
            .execute_with_fallback(
                &new_query,
                json!({ "input": input.wire("kubernetes") }),
                &old_query,
                json!({ "input": input.wire("openshift") }),
            )
            .await?;

        let wire: ProjectWire = Self::field(data, "addProject")?;
        Ok(wire.normalize())
    }

    /// Look up a project by name. Absence is `Ok(None)`, not an error.
    pub async fn project_by_name(&self, name: &str) -> Result<Option<Project>, LagoonError> {
        let new_query = format!(
            "query projectByName($name: String!) {{ projectByName(name: $name) {{ {} }} }}",
            PROJECT_FIELDS
        );
        let old_query = format!(
            "query projectByName($name: String!) {{ projectByName(name: $name) {{ {} }} }}",
            PROJECT_FIELDS_LEGACY
        );

        let data = self
            .execute_with_fallback(
                &new_query,
                json!({ "name": name }),
                &old_query,
                json!({ "name": name }),
            )
            .await?;

        let wire: Option<ProjectWire> = Self::field(data, "projectByName")?;
        Ok(wire.map(ProjectWire::normalize))
    }

    /// Look up a project by ID. The API has no direct by-ID query, so this
    /// scans `allProjects`.
    pub async fn project_by_id(&self, id: i64) -> Result<Option<Project>, LagoonError> {
        let new_query = format!("query {{ allProjects {{ {} }} }}", PROJECT_FIELDS);
        let old_query = format!("query {{ allProjects {{ {} }} }}", PROJECT_FIELDS_LEGACY);

        let data = self
            .execute_with_fallback(&new_query, json!({}), &old_query, json!({}))
            .await?;

        let projects: Vec<ProjectWire> = Self::field(data, "allProjects")?;
        Ok(projects
            .into_iter()
            .find(|p| p.id == id)
            .map(ProjectWire::normalize))
    }

    /// Resolve a project ID to its name, scanning `allProjects`.
    pub async fn project_name_by_id(&self, id: i64) -> Result<Option<String>, LagoonError> {
        Ok(self.project_by_id(id).await?.map(|p| p.name))
    }

    /// Update a project in place.
    pub async fn update_project(
        &self,
        id: i64,
        patch: &ProjectInput,
    ) -> Result<Project, LagoonError> {
        let new_query = format!(
            "mutation updateProject($input: UpdateProjectInput!) {{ updateProject(input: $input) {{ {} }} }}",
            PROJECT_FIELDS
        );
        let old_query = format!(
            "mutation updateProject($input: UpdateProjectInput!) {{ updateProject(input: $input) {{ {} }} }}",
            PROJECT_FIELDS_LEGACY
        );

        let data = self
            .execute_with_fallback(
                &new_query,
                json!({ "input": { "id": id, "patch": patch.wire("kubernetes") } }),
                &old_query,
                json!({ "input": { "id": id, "patch": patch.wire("openshift") } }),
            )
            .await?;

        let wire: ProjectWire = Self::field(data, "updateProject")?;
        Ok(wire.normalize())
    }

    /// Delete a project by name.
    pub async fn delete_project(&self, name: &str) -> Result<(), LagoonError> {
        let query = "mutation deleteProject($input: DeleteProjectInput!) { deleteProject(input: $input) }";
        self.execute(query, json!({ "input": { "project": name } }))
            .await?;
        Ok(())
    }
}
