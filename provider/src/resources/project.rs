//! Project resource

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::projects::ProjectInput;
use crate::client::LagoonClient;
use crate::errors::LagoonError;
use crate::ident::is_import_scenario;
use crate::models::Project;
use crate::resources::lifecycle::{
    from_host, skip_noop_update, to_host, CreateResult, ReadResult, ResourceLifecycle,
    UpdateResult,
};
use crate::validate::{
    parse_positive_int, validate_environment_name, validate_git_url, validate_pattern,
    validate_positive_int, validate_project_name,
};

/// Fields a refresh needs from prior state; anything less means import
const REQUIRED_STATE: &[&str] = &["name"];

/// Input schema for a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectArgs {
    pub name: String,
    pub git_url: String,

    #[serde(default)]
    pub deploytarget_id: Option<i64>,

    #[serde(default)]
    pub production_environment: Option<String>,

    #[serde(default)]
    pub branches: Option<String>,

    #[serde(default)]
    pub pullrequests: Option<String>,
}

/// Output schema for a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectState {
    pub id: i64,
    pub name: String,
    pub git_url: String,

    #[serde(default)]
    pub deploytarget_id: Option<i64>,

    #[serde(default)]
    pub production_environment: Option<String>,

    #[serde(default)]
    pub branches: Option<String>,

    #[serde(default)]
    pub pullrequests: Option<String>,
}

impl ProjectState {
    fn from_remote(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            git_url: project.git_url.clone().unwrap_or_default(),
            deploytarget_id: project.deploy_target_id,
            production_environment: project.production_environment.clone(),
            branches: project.branches.clone(),
            pullrequests: project.pullrequests.clone(),
        }
    }

    fn args(&self) -> ProjectArgs {
        ProjectArgs {
            name: self.name.clone(),
            git_url: self.git_url.clone(),
            deploytarget_id: self.deploytarget_id,
            production_environment: self.production_environment.clone(),
            branches: self.branches.clone(),
            pullrequests: self.pullrequests.clone(),
        }
    }
}

/// Project provider
pub struct ProjectResource {
    client: Arc<LagoonClient>,
}

impl ProjectResource {
    pub fn new(client: Arc<LagoonClient>) -> Self {
        Self { client }
    }

    fn validate(args: &ProjectArgs) -> Result<(), LagoonError> {
        validate_project_name(&args.name)?;
        validate_git_url(&args.git_url)?;
        if let Some(target) = args.deploytarget_id {
            validate_positive_int("deploytarget_id", target)?;
        }
        if let Some(env) = &args.production_environment {
            validate_environment_name(env)?;
        }
        if let Some(branches) = &args.branches {
            validate_pattern("branches", branches)?;
        }
        if let Some(pullrequests) = &args.pullrequests {
            validate_pattern("pullrequests", pullrequests)?;
        }
        Ok(())
    }

    fn input(args: &ProjectArgs) -> ProjectInput {
        ProjectInput {
            name: args.name.clone(),
            git_url: args.git_url.clone(),
            deploy_target_id: args.deploytarget_id,
            production_environment: args.production_environment.clone(),
            branches: args.branches.clone(),
            pullrequests: args.pullrequests.clone(),
        }
    }
}

#[async_trait]
impl ResourceLifecycle for ProjectResource {
    fn kind(&self) -> &'static str {
        "lagoon:project"
    }

    async fn create(&self, inputs: Value) -> Result<CreateResult, LagoonError> {
        let args: ProjectArgs = from_host(inputs)?;
        Self::validate(&args)?;

        let project = self.client.add_project(&Self::input(&args)).await?;
        let state = ProjectState::from_remote(&project);
        Ok(CreateResult {
            id: project.id.to_string(),
            outs: to_host(&state)?,
        })
    }

    async fn read(&self, id: &str, state: Value) -> Result<Option<ReadResult>, LagoonError> {
        let project = if is_import_scenario(&state, REQUIRED_STATE) {
            // The import ID is either the numeric project ID or the name.
            if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
                let project_id = parse_positive_int("project_id", id)?;
                self.client.project_by_id(project_id).await?
            } else {
                self.client.project_by_name(id).await?
            }
        } else {
            let prior: ProjectState = from_host(state)?;
            self.client.project_by_name(&prior.name).await?
        };

        match project {
            Some(project) => {
                let state = ProjectState::from_remote(&project);
                Ok(Some(ReadResult {
                    id: project.id.to_string(),
                    outs: to_host(&state)?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, id: &str, old: Value, news: Value) -> Result<UpdateResult, LagoonError> {
        let prior: ProjectState = from_host(old.clone())?;
        let args: ProjectArgs = from_host(news)?;
        Self::validate(&args)?;

        // unchanged inputs return the host's state exactly as supplied
        if prior.args() == args {
            return Ok(skip_noop_update(self.kind(), id, old));
        }

        let project = self
            .client
            .update_project(prior.id, &Self::input(&args))
            .await?;
        let state = ProjectState::from_remote(&project);
        Ok(UpdateResult {
            outs: to_host(&state)?,
        })
    }

    async fn delete(&self, _id: &str, state: Value) -> Result<(), LagoonError> {
        let prior: ProjectState = from_host(state)?;
        self.client.delete_project(&prior.name).await
    }
}
