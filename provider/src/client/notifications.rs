//! Notification API methods
//!
//! Each notification kind has its own mutation family and payload shape;
//! names are unique across the whole instance, so everything here keys on
//! name.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::graphql::LagoonClient;
use crate::errors::LagoonError;
use crate::models::Notification;
use crate::validate::NotificationKind;

impl NotificationKind {
    /// GraphQL type name, e.g. `NotificationSlack`
    fn type_name(&self) -> &'static str {
        match self {
            NotificationKind::Slack => "NotificationSlack",
            NotificationKind::RocketChat => "NotificationRocketChat",
            NotificationKind::Email => "NotificationEmail",
            NotificationKind::MicrosoftTeams => "NotificationMicrosoftTeams",
        }
    }

    /// Payload selection for this kind
    fn payload_fields(&self) -> &'static str {
        match self {
            NotificationKind::Slack | NotificationKind::RocketChat => "name webhook channel",
            NotificationKind::MicrosoftTeams => "name webhook",
            NotificationKind::Email => "name emailAddress",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationWire {
    name: String,
    #[serde(default)]
    webhook: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    email_address: Option<String>,
}

impl NotificationWire {
    fn normalize(self) -> Notification {
        Notification {
            name: self.name,
            webhook: self.webhook,
            channel: self.channel,
            email_address: self.email_address,
        }
    }
}

/// Payload for creating or patching a notification endpoint
#[derive(Debug, Clone)]
pub struct NotificationInput {
    pub name: String,
    pub webhook: Option<String>,
    pub channel: Option<String>,
    pub email_address: Option<String>,
}

impl NotificationInput {
    fn wire(&self, kind: NotificationKind) -> Value {
        match kind {
            NotificationKind::Slack | NotificationKind::RocketChat => json!({
                "name": self.name,
                "webhook": self.webhook,
                "channel": self.channel,
            }),
            NotificationKind::MicrosoftTeams => json!({
                "name": self.name,
                "webhook": self.webhook,
            }),
            NotificationKind::Email => json!({
                "name": self.name,
                "emailAddress": self.email_address,
            }),
        }
    }
}

impl LagoonClient {
    /// Create a notification endpoint of the given kind.
    pub async fn add_notification(
        &self,
        kind: NotificationKind,
        input: &NotificationInput,
    ) -> Result<Notification, LagoonError> {
        let field = format!("addNotification{}", short_name(kind));
        let query = format!(
            "mutation {field}($input: Add{type_name}Input!) {{ {field}(input: $input) {{ {fields} }} }}",
            field = field,
            type_name = kind.type_name(),
            fields = kind.payload_fields()
        );

        let data = self.execute(&query, json!({ "input": input.wire(kind) })).await?;
        let wire: NotificationWire = Self::field(data, &field)?;
        Ok(wire.normalize())
    }

    /// Look up a notification endpoint by kind and name.
    pub async fn notification_by_name(
        &self,
        kind: NotificationKind,
        name: &str,
    ) -> Result<Option<Notification>, LagoonError> {
        let query = format!(
            "query allNotifications($type: NotificationType!) {{ allNotifications(type: $type) {{ ... on {type_name} {{ {fields} }} }} }}",
            type_name = kind.type_name(),
            fields = kind.payload_fields()
        );

        let data = self
            .execute(&query, json!({ "type": kind.as_graphql() }))
            .await?;
        let wires: Option<Vec<NotificationWire>> = Self::field(data, "allNotifications")?;
        Ok(wires
            .unwrap_or_default()
            .into_iter()
            .find(|n| n.name == name)
            .map(NotificationWire::normalize))
    }

    /// Update a notification endpoint in place, keyed on name.
    pub async fn update_notification(
        &self,
        kind: NotificationKind,
        name: &str,
        patch: &NotificationInput,
    ) -> Result<Notification, LagoonError> {
        let field = format!("updateNotification{}", short_name(kind));
        let query = format!(
            "mutation {field}($input: Update{type_name}Input!) {{ {field}(input: $input) {{ {fields} }} }}",
            field = field,
            type_name = kind.type_name(),
            fields = kind.payload_fields()
        );

        let data = self
            .execute(
                &query,
                json!({ "input": { "name": name, "patch": patch.wire(kind) } }),
            )
            .await?;
        let wire: NotificationWire = Self::field(data, &field)?;
        Ok(wire.normalize())
    }

    /// Delete a notification endpoint by name.
    pub async fn delete_notification(
        &self,
        kind: NotificationKind,
        name: &str,
    ) -> Result<(), LagoonError> {
        let field = format!("deleteNotification{}", short_name(kind));
        let query = format!(
            "mutation {field}($input: Delete{type_name}Input!) {{ {field}(input: $input) }}",
            field = field,
            type_name = kind.type_name()
        );

        self.execute(&query, json!({ "input": { "name": name } }))
            .await?;
        Ok(())
    }

    /// Attach an existing notification endpoint to a project.
    pub async fn add_notification_to_project(
        &self,
        project_name: &str,
        kind: NotificationKind,
        notification_name: &str,
    ) -> Result<(), LagoonError> {
        let query = "mutation addNotificationToProject($input: AddNotificationToProjectInput!) { addNotificationToProject(input: $input) { id } }";
        self.execute(
            query,
            json!({
                "input": {
                    "project": project_name,
                    "notificationType": kind.as_graphql(),
                    "notificationName": notification_name,
                }
            }),
        )
        .await?;
        Ok(())
    }

    /// Whether a project has the given notification attached.
    pub async fn project_has_notification(
        &self,
        project_name: &str,
        kind: NotificationKind,
        notification_name: &str,
    ) -> Result<bool, LagoonError> {
        let query = format!(
            "query projectByName($name: String!, $type: NotificationType!) {{ projectByName(name: $name) {{ notifications(type: $type) {{ ... on {type_name} {{ name }} }} }} }}",
            type_name = kind.type_name()
        );

        let data = self
            .execute(
                &query,
                json!({ "name": project_name, "type": kind.as_graphql() }),
            )
            .await?;

        #[derive(Debug, Deserialize)]
        struct ProjectNotifications {
            #[serde(default)]
            notifications: Vec<NotificationWire>,
        }

        let project: Option<ProjectNotifications> = Self::field(data, "projectByName")?;
        Ok(project
            .map(|p| p.notifications.iter().any(|n| n.name == notification_name))
            .unwrap_or(false))
    }

    /// Detach a notification endpoint from a project.
    pub async fn remove_notification_from_project(
        &self,
        project_name: &str,
        kind: NotificationKind,
        notification_name: &str,
    ) -> Result<(), LagoonError> {
        let query = "mutation removeNotificationFromProject($input: RemoveNotificationFromProjectInput!) { removeNotificationFromProject(input: $input) { id } }";
        self.execute(
            query,
            json!({
                "input": {
                    "project": project_name,
                    "notificationType": kind.as_graphql(),
                    "notificationName": notification_name,
                }
            }),
        )
        .await?;
        Ok(())
    }
}

/// Mutation-name suffix, e.g. `Slack`, `MicrosoftTeams`
fn short_name(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Slack => "Slack",
        NotificationKind::RocketChat => "RocketChat",
        NotificationKind::Email => "Email",
        NotificationKind::MicrosoftTeams => "MicrosoftTeams",
    }
}
