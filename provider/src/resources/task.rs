//! Advanced task definition resource
//!
//! No task update mutation exists server-side, so update is delete-then-
//! create and the server ID changes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::tasks::{AdvancedTaskInput, TaskArgument};
use crate::client::LagoonClient;
use crate::errors::LagoonError;
use crate::ident::is_import_scenario;
use crate::models::AdvancedTask;
use crate::resources::lifecycle::{
    from_host, recreate, to_host, CreateResult, ReadResult, ResourceLifecycle, UpdateResult,
    UpdateStrategy,
};
use crate::validate::{parse_positive_int, validate_positive_int, TaskKind, TaskPermission};

const REQUIRED_STATE: &[&str] = &["id", "name"];

/// Input schema for an advanced task definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskArgs {
    pub name: String,
    pub task_type: TaskKind,
    pub service: String,

    /// Shell command; required for `command` tasks, forbidden otherwise
    #[serde(default)]
    pub command: Option<String>,

    /// Container image; required for `image` tasks, forbidden otherwise
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub permission: Option<TaskPermission>,

    #[serde(default)]
    pub project_id: Option<i64>,

    #[serde(default)]
    pub environment_id: Option<i64>,

    #[serde(default)]
    pub group_name: Option<String>,

    #[serde(default)]
    pub system_wide: Option<bool>,

    #[serde(default)]
    pub arguments: Vec<TaskArgument>,
}

/// Output schema for an advanced task definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskState {
    /// Server-side ID; not durable across updates
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

    #[serde(default)]
    pub project_id: Option<i64>,

    #[serde(default)]
    pub environment_id: Option<i64>,

    #[serde(default)]
    pub group_name: Option<String>,

    #[serde(default)]
    pub system_wide: Option<bool>,
}

impl TaskState {
    fn from_remote(task: &AdvancedTask) -> Self {
        Self {
            id: task.id,
            name: task.name.clone(),
            task_type: task.task_type,
            service: task.service.clone(),
            command: task.command.clone(),
            image: task.image.clone(),
            permission: task.permission,
            project_id: task.project_id,
            environment_id: task.environment_id,
            group_name: task.group_name.clone(),
            system_wide: task.system_wide,
        }
    }
}

/// Advanced task provider
pub struct TaskResource {
    client: Arc<LagoonClient>,
}

impl TaskResource {
    pub fn new(client: Arc<LagoonClient>) -> Self {
        Self { client }
    }

    fn validate(args: &TaskArgs) -> Result<(), LagoonError> {
        if args.name.is_empty() {
            return Err(LagoonError::validation("name", "must not be empty"));
        }
        if args.service.is_empty() {
            return Err(LagoonError::validation("service", "must not be empty"));
        }

        // command and image are mutually exclusive, tied to the task type
        match args.task_type {
            TaskKind::Command => {
                if args.command.as_deref().map_or(true, str::is_empty) {
                    return Err(LagoonError::validation(
                        "command",
                        "required for tasks of type 'command'",
                    ));
                }
                if args.image.is_some() {
                    return Err(LagoonError::validation(
                        "image",
                        "must not be set for tasks of type 'command'",
                    ));
                }
            }
            TaskKind::Image => {
                if args.image.as_deref().map_or(true, str::is_empty) {
                    return Err(LagoonError::validation(
                        "image",
                        "required for tasks of type 'image'",
                    ));
                }
                if args.command.is_some() {
                    return Err(LagoonError::validation(
                        "command",
                        "must not be set for tasks of type 'image'",
                    ));
                }
            }
        }

        // exactly one scope: project, environment, group, or system-wide
        let scopes = [
            args.project_id.is_some(),
            args.environment_id.is_some(),
            args.group_name.is_some(),
            args.system_wide == Some(true),
        ];
        let selected = scopes.iter().filter(|s| **s).count();
        if selected != 1 {
            return Err(LagoonError::validation(
                "scope",
                format!(
                    "exactly one of project_id, environment_id, group_name or system_wide \
                     must be set, got {}",
                    selected
                ),
            ));
        }

        if let Some(project) = args.project_id {
            validate_positive_int("project_id", project)?;
        }
        if let Some(environment) = args.environment_id {
            validate_positive_int("environment_id", environment)?;
        }
        Ok(())
    }

    fn input(args: &TaskArgs) -> AdvancedTaskInput {
        AdvancedTaskInput {
            name: args.name.clone(),
            task_type: args.task_type,
            service: args.service.clone(),
            command: args.command.clone(),
            image: args.image.clone(),
            permission: args.permission,
            project_id: args.project_id,
            environment_id: args.environment_id,
            group_name: args.group_name.clone(),
            system_wide: args.system_wide,
            arguments: args.arguments.clone(),
        }
    }

    /// Environment-scoped tasks are read through the per-environment listing
    /// (whose relation ids come back as either raw ints or objects depending
    /// on server version); everything else goes through the by-ID query.
    async fn fetch(
        &self,
        task_id: i64,
        environment_id: Option<i64>,
    ) -> Result<Option<AdvancedTask>, LagoonError> {
        match environment_id {
            Some(environment) => {
                let tasks = self.client.advanced_tasks_for_environment(environment).await?;
                Ok(tasks.into_iter().find(|t| t.id == task_id))
            }
            None => self.client.advanced_task_by_id(task_id).await,
        }
    }
}

#[async_trait]
impl ResourceLifecycle for TaskResource {
    fn kind(&self) -> &'static str {
        "lagoon:task"
    }

    fn update_strategy(&self) -> UpdateStrategy {
        UpdateStrategy::Recreate
    }

    async fn create(&self, inputs: Value) -> Result<CreateResult, LagoonError> {
        let args: TaskArgs = from_host(inputs)?;
        Self::validate(&args)?;

        let task = self.client.add_advanced_task(&Self::input(&args)).await?;
        let state = TaskState::from_remote(&task);
        Ok(CreateResult {
            id: task.id.to_string(),
            outs: to_host(&state)?,
        })
    }

    async fn read(&self, id: &str, state: Value) -> Result<Option<ReadResult>, LagoonError> {
        let (task_id, environment_id) = if is_import_scenario(&state, REQUIRED_STATE) {
            (parse_positive_int("task_id", id)?, None)
        } else {
            let prior: TaskState = from_host(state)?;
            (prior.id, prior.environment_id)
        };

        match self.fetch(task_id, environment_id).await? {
            Some(task) => {
                let state = TaskState::from_remote(&task);
                Ok(Some(ReadResult {
                    id: task.id.to_string(),
                    outs: to_host(&state)?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, id: &str, old: Value, news: Value) -> Result<UpdateResult, LagoonError> {
        recreate(self, id, old, news).await
    }

    async fn delete(&self, _id: &str, state: Value) -> Result<(), LagoonError> {
        let prior: TaskState = from_host(state)?;
        self.client.delete_advanced_task(prior.id).await
    }
}
