//! Project notification association resource
//!
//! The association `(project, notification_type, notification_name)` has no
//! server-side ID of its own; the composite tuple string is the identity, and
//! any change means detaching the old association and attaching a new one.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::LagoonClient;
use crate::errors::LagoonError;
use crate::ident::{is_import_scenario, parse_project_notification_id, project_notification_id};
use crate::resources::lifecycle::{
    from_host, recreate, to_host, CreateResult, ReadResult, ResourceLifecycle, UpdateResult,
    UpdateStrategy,
};
use crate::validate::{validate_project_name, NotificationKind};

const REQUIRED_STATE: &[&str] = &["project", "notification_type", "notification_name"];

/// Input and output schema for the association; the record has no
/// server-assigned fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectNotificationArgs {
    /// Project name
    pub project: String,

    pub notification_type: NotificationKind,
    pub notification_name: String,
}

/// Project notification provider
pub struct ProjectNotificationResource {
    client: Arc<LagoonClient>,
}

impl ProjectNotificationResource {
    pub fn new(client: Arc<LagoonClient>) -> Self {
        Self { client }
    }

    fn validate(args: &ProjectNotificationArgs) -> Result<(), LagoonError> {
        validate_project_name(&args.project)?;
        if args.notification_name.is_empty() {
            return Err(LagoonError::validation("notification_name", "must not be empty"));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceLifecycle for ProjectNotificationResource {
    fn kind(&self) -> &'static str {
        "lagoon:project-notification"
    }

    fn update_strategy(&self) -> UpdateStrategy {
        UpdateStrategy::Recreate
    }

    async fn create(&self, inputs: Value) -> Result<CreateResult, LagoonError> {
        let args: ProjectNotificationArgs = from_host(inputs)?;
        Self::validate(&args)?;

        self.client
            .add_notification_to_project(
                &args.project,
                args.notification_type,
                &args.notification_name,
            )
            .await?;

        Ok(CreateResult {
            id: project_notification_id(
                &args.project,
                args.notification_type,
                &args.notification_name,
            ),
            outs: to_host(&args)?,
        })
    }

    async fn read(&self, id: &str, state: Value) -> Result<Option<ReadResult>, LagoonError> {
        let args = if is_import_scenario(&state, REQUIRED_STATE) {
            let (project, kind, name) = parse_project_notification_id(id)?;
            ProjectNotificationArgs {
                project,
                notification_type: kind,
                notification_name: name,
            }
        } else {
            from_host(state)?
        };

        let attached = self
            .client
            .project_has_notification(
                &args.project,
                args.notification_type,
                &args.notification_name,
            )
            .await?;

        if !attached {
            return Ok(None);
        }

        Ok(Some(ReadResult {
            id: project_notification_id(
                &args.project,
                args.notification_type,
                &args.notification_name,
            ),
            outs: to_host(&args)?,
        }))
    }

    /// Always detach-then-attach, whichever field changed.
    async fn update(&self, id: &str, old: Value, news: Value) -> Result<UpdateResult, LagoonError> {
        recreate(self, id, old, news).await
    }

    async fn delete(&self, _id: &str, state: Value) -> Result<(), LagoonError> {
        let args: ProjectNotificationArgs = from_host(state)?;
        self.client
            .remove_notification_from_project(
                &args.project,
                args.notification_type,
                &args.notification_name,
            )
            .await
    }
}
