//! Advanced task definition API methods
//!
//! Tasks have no server-side update mutation; the resource layer handles
//! "update" as delete-then-recreate.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::graphql::{normalize_id, LagoonClient};
use crate::errors::LagoonError;
use crate::models::AdvancedTask;
use crate::validate::{TaskKind, TaskPermission};

const TASK_FIELDS: &str = "id name type service permission project environment groupName systemWide \
     ... on AdvancedTaskDefinitionCommand { command } \
     ... on AdvancedTaskDefinitionImage { image }";

/// One invocation argument of an advanced task
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct TaskArgument {
    pub name: String,

    #[serde(default)]
    pub display_name: Option<String>,

    /// Argument type as the API names it, e.g. `STRING`, `ENVIRONMENT_SOURCE_NAME`
    #[serde(rename = "type")]
    pub arg_type: String,
}

/// Fields accepted by `addAdvancedTaskDefinition`
#[derive(Debug, Clone)]
pub struct AdvancedTaskInput {
    pub name: String,
    pub task_type: TaskKind,
    pub service: String,
    pub command: Option<String>,
    pub image: Option<String>,
    pub permission: Option<TaskPermission>,
    pub project_id: Option<i64>,
    pub environment_id: Option<i64>,
    pub group_name: Option<String>,
    pub system_wide: Option<bool>,
    pub arguments: Vec<TaskArgument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdvancedTaskWire {
    id: i64,
    name: String,
    #[serde(rename = "type")]
    task_type: TaskKind,
    #[serde(default)]
    service: Option<String>,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    permission: Option<TaskPermission>,
    // raw int on current servers, `{id, ...}` object on some older ones
    #[serde(default)]
    project: Option<Value>,
    #[serde(default)]
    environment: Option<Value>,
    #[serde(default)]
    group_name: Option<String>,
    #[serde(default)]
    system_wide: Option<bool>,
}

impl AdvancedTaskWire {
    fn normalize(self) -> AdvancedTask {
        AdvancedTask {
            id: self.id,
            name: self.name,
            task_type: self.task_type,
            service: self.service,
            command: self.command,
            image: self.image,
            permission: self.permission,
            project_id: self.project.as_ref().and_then(normalize_id),
            environment_id: self.environment.as_ref().and_then(normalize_id),
            group_name: self.group_name,
            system_wide: self.system_wide,
        }
    }
}

impl LagoonClient {
    /// Create an advanced task definition.
    pub async fn add_advanced_task(
        &self,
        input: &AdvancedTaskInput,
    ) -> Result<AdvancedTask, LagoonError> {
        let query = format!(
            "mutation addAdvancedTaskDefinition($input: AddAdvancedTaskDefinitionInput!) {{ addAdvancedTaskDefinition(input: $input) {{ {} }} }}",
            TASK_FIELDS
        );

        let arguments: Vec<Value> = input
            .arguments
            .iter()
            .map(|a| {
                json!({
                    "name": a.name,
                    "displayName": a.display_name,
                    "type": a.arg_type,
                })
            })
            .collect();

        let mut wire = json!({
            "name": input.name,
            "type": input.task_type.as_graphql(),
            "service": input.service,
            "command": input.command,
            "image": input.image,
            "permission": input.permission.map(|p| p.as_graphql()),
            "project": input.project_id,
            "environment": input.environment_id,
            "groupName": input.group_name,
            "systemWide": input.system_wide,
        });
        if !arguments.is_empty() {
            wire["advancedTaskDefinitionArguments"] = json!(arguments);
        }

        let data = self.execute(&query, json!({ "input": wire })).await?;
        let task: AdvancedTaskWire = Self::field(data, "addAdvancedTaskDefinition")?;
        Ok(task.normalize())
    }

    /// Look up an advanced task definition by ID.
    pub async fn advanced_task_by_id(&self, id: i64) -> Result<Option<AdvancedTask>, LagoonError> {
        let query = format!(
            "query advancedTaskDefinitionById($id: Int!) {{ advancedTaskDefinitionById(id: $id) {{ {} }} }}",
            TASK_FIELDS
        );
        let data = self.execute(&query, json!({ "id": id })).await?;
        let wire: Option<AdvancedTaskWire> = Self::field(data, "advancedTaskDefinitionById")?;
        Ok(wire.map(AdvancedTaskWire::normalize))
    }

    /// List the advanced tasks visible from an environment.
    pub async fn advanced_tasks_for_environment(
        &self,
        environment_id: i64,
    ) -> Result<Vec<AdvancedTask>, LagoonError> {
        let query = format!(
            "query advancedTasksForEnvironment($environment: Int!) {{ advancedTasksForEnvironment(environment: $environment) {{ {} }} }}",
            TASK_FIELDS
        );
        let data = self
            .execute(&query, json!({ "environment": environment_id }))
            .await?;
        let wires: Option<Vec<AdvancedTaskWire>> =
            Self::field(data, "advancedTasksForEnvironment")?;
        Ok(wires
            .unwrap_or_default()
            .into_iter()
            .map(AdvancedTaskWire::normalize)
            .collect())
    }

    /// Delete an advanced task definition by ID.
    pub async fn delete_advanced_task(&self, id: i64) -> Result<(), LagoonError> {
        let query = "mutation deleteAdvancedTaskDefinition($id: Int!) { deleteAdvancedTaskDefinition(advancedTaskDefinition: $id) }";
        self.execute(query, json!({ "id": id })).await?;
        Ok(())
    }
}
