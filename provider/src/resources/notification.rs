//! Notification resources (Slack, RocketChat, Email, Microsoft Teams)
//!
//! One provider covers all four kinds; the payload shape differs per kind
//! and is validated accordingly. Names are unique across the whole instance,
//! so the name itself is the durable local ID and no synthetic ID exists.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::notifications::NotificationInput;
use crate::client::LagoonClient;
use crate::errors::LagoonError;
use crate::ident::is_import_scenario;
use crate::models::Notification;
use crate::resources::lifecycle::{
    from_host, skip_noop_update, to_host, CreateResult, ReadResult, ResourceLifecycle,
    UpdateResult,
};
use crate::validate::{validate_http_url, NotificationKind};

const REQUIRED_STATE: &[&str] = &["name"];

/// Input schema shared by all notification kinds; which fields are required
/// depends on the kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationArgs {
    pub name: String,

    #[serde(default)]
    pub webhook: Option<String>,

    #[serde(default)]
    pub channel: Option<String>,

    #[serde(default)]
    pub email_address: Option<String>,
}

/// Output schema for a notification endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationState {
    pub name: String,

    #[serde(default)]
    pub webhook: Option<String>,

    #[serde(default)]
    pub channel: Option<String>,

    #[serde(default)]
    pub email_address: Option<String>,
}

impl NotificationState {
    fn from_remote(notification: &Notification) -> Self {
        Self {
            name: notification.name.clone(),
            webhook: notification.webhook.clone(),
            channel: notification.channel.clone(),
            email_address: notification.email_address.clone(),
        }
    }

    fn args(&self) -> NotificationArgs {
        NotificationArgs {
            name: self.name.clone(),
            webhook: self.webhook.clone(),
            channel: self.channel.clone(),
            email_address: self.email_address.clone(),
        }
    }
}

/// Notification provider, parameterized by kind
pub struct NotificationResource {
    client: Arc<LagoonClient>,
    kind: NotificationKind,
}

impl NotificationResource {
    pub fn new(client: Arc<LagoonClient>, kind: NotificationKind) -> Self {
        Self { client, kind }
    }

    fn validate(&self, args: &NotificationArgs) -> Result<(), LagoonError> {
        if args.name.is_empty() {
            return Err(LagoonError::validation("name", "must not be empty"));
        }
        match self.kind {
            NotificationKind::Slack | NotificationKind::RocketChat => {
                let webhook = args.webhook.as_deref().ok_or_else(|| {
                    LagoonError::validation("webhook", "required for this notification type")
                })?;
                validate_http_url("webhook", webhook)?;
                if args.channel.as_deref().map_or(true, str::is_empty) {
                    return Err(LagoonError::validation(
                        "channel",
                        "required for this notification type",
                    ));
                }
            }
            NotificationKind::MicrosoftTeams => {
                let webhook = args.webhook.as_deref().ok_or_else(|| {
                    LagoonError::validation("webhook", "required for this notification type")
                })?;
                validate_http_url("webhook", webhook)?;
            }
            NotificationKind::Email => {
                let address = args.email_address.as_deref().unwrap_or_default();
                if !address.contains('@') {
                    return Err(LagoonError::validation(
                        "email_address",
                        format!("'{}' is not a valid email address", address),
                    ));
                }
            }
        }
        Ok(())
    }

    fn input(args: &NotificationArgs) -> NotificationInput {
        NotificationInput {
            name: args.name.clone(),
            webhook: args.webhook.clone(),
            channel: args.channel.clone(),
            email_address: args.email_address.clone(),
        }
    }

    fn kind_str(&self) -> &'static str {
        match self.kind {
            NotificationKind::Slack => "lagoon:notification-slack",
            NotificationKind::RocketChat => "lagoon:notification-rocketchat",
            NotificationKind::Email => "lagoon:notification-email",
            NotificationKind::MicrosoftTeams => "lagoon:notification-microsoftteams",
        }
    }
}

#[async_trait]
impl ResourceLifecycle for NotificationResource {
    fn kind(&self) -> &'static str {
        self.kind_str()
    }

    async fn create(&self, inputs: Value) -> Result<CreateResult, LagoonError> {
        let args: NotificationArgs = from_host(inputs)?;
        self.validate(&args)?;

        let notification = self
            .client
            .add_notification(self.kind, &Self::input(&args))
            .await?;
        let state = NotificationState::from_remote(&notification);
        Ok(CreateResult {
            id: state.name.clone(),
            outs: to_host(&state)?,
        })
    }

    async fn read(&self, id: &str, state: Value) -> Result<Option<ReadResult>, LagoonError> {
        let name = if is_import_scenario(&state, REQUIRED_STATE) {
            if id.is_empty() {
                return Err(LagoonError::validation("import ID", "must be the notification name"));
            }
            id.to_string()
        } else {
            let prior: NotificationState = from_host(state)?;
            prior.name
        };

        match self.client.notification_by_name(self.kind, &name).await? {
            Some(notification) => {
                let state = NotificationState::from_remote(&notification);
                Ok(Some(ReadResult {
                    id: state.name.clone(),
                    outs: to_host(&state)?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, id: &str, old: Value, news: Value) -> Result<UpdateResult, LagoonError> {
        let prior: NotificationState = from_host(old.clone())?;
        let args: NotificationArgs = from_host(news)?;
        self.validate(&args)?;

        if prior.args() == args {
            return Ok(skip_noop_update(self.kind(), id, old));
        }

        let notification = self
            .client
            .update_notification(self.kind, &prior.name, &Self::input(&args))
            .await?;
        let state = NotificationState::from_remote(&notification);
        Ok(UpdateResult {
            outs: to_host(&state)?,
        })
    }

    async fn delete(&self, _id: &str, state: Value) -> Result<(), LagoonError> {
        let prior: NotificationState = from_host(state)?;
        self.client.delete_notification(self.kind, &prior.name).await
    }
}
