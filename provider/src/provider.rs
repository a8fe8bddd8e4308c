//! Provider entry point: builds the client and dispatches resource kinds

use std::sync::Arc;

use crate::client::LagoonClient;
use crate::config::Settings;
use crate::errors::LagoonError;
use crate::resources::deploy_target::DeployTargetResource;
use crate::resources::deploy_target_config::DeployTargetConfigResource;
use crate::resources::environment::EnvironmentResource;
use crate::resources::notification::NotificationResource;
use crate::resources::project::ProjectResource;
use crate::resources::project_notification::ProjectNotificationResource;
use crate::resources::task::TaskResource;
use crate::resources::variable::VariableResource;
use crate::resources::ResourceLifecycle;
use crate::validate::NotificationKind;

/// All resource kind strings this provider serves
pub const KINDS: &[&str] = &[
    "lagoon:project",
    "lagoon:environment",
    "lagoon:variable",
    "lagoon:deploy-target",
    "lagoon:deploy-target-config",
    "lagoon:notification-slack",
    "lagoon:notification-rocketchat",
    "lagoon:notification-email",
    "lagoon:notification-microsoftteams",
    "lagoon:project-notification",
    "lagoon:task",
];

/// The Lagoon dynamic provider
///
/// Owns the shared API client and hands out per-kind lifecycle
/// implementations to the host engine.
pub struct LagoonProvider {
    client: Arc<LagoonClient>,
}

impl LagoonProvider {
    /// Build a provider from resolved settings.
    pub fn new(settings: &Settings) -> Result<Self, LagoonError> {
        Ok(Self {
            client: Arc::new(LagoonClient::new(settings)?),
        })
    }

    /// The shared API client.
    pub fn client(&self) -> Arc<LagoonClient> {
        Arc::clone(&self.client)
    }

    /// Look up the lifecycle implementation for a resource kind.
    pub fn resource(&self, kind: &str) -> Option<Box<dyn ResourceLifecycle>> {
        let client = self.client();
        let resource: Box<dyn ResourceLifecycle> = match kind {
            "lagoon:project" => Box::new(ProjectResource::new(client)),
            "lagoon:environment" => Box::new(EnvironmentResource::new(client)),
            "lagoon:variable" => Box::new(VariableResource::new(client)),
            "lagoon:deploy-target" => Box::new(DeployTargetResource::new(client)),
            "lagoon:deploy-target-config" => Box::new(DeployTargetConfigResource::new(client)),
            "lagoon:notification-slack" => {
                Box::new(NotificationResource::new(client, NotificationKind::Slack))
            }
            "lagoon:notification-rocketchat" => {
                Box::new(NotificationResource::new(client, NotificationKind::RocketChat))
            }
            "lagoon:notification-email" => {
                Box::new(NotificationResource::new(client, NotificationKind::Email))
            }
            "lagoon:notification-microsoftteams" => Box::new(NotificationResource::new(
                client,
                NotificationKind::MicrosoftTeams,
            )),
            "lagoon:project-notification" => Box::new(ProjectNotificationResource::new(client)),
            "lagoon:task" => Box::new(TaskResource::new(client)),
            _ => return None,
        };
        Some(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PartialSettings;

    fn settings() -> Settings {
        Settings::resolve(
            PartialSettings {
                api_url: Some("http://localhost:7070/graphql".to_string()),
                token: Some("test".to_string()),
                ..Default::default()
            },
            PartialSettings::default(),
        )
    }

    #[test]
    fn every_registered_kind_dispatches() {
        let provider = LagoonProvider::new(&settings()).unwrap();
        for kind in KINDS {
            let resource = provider.resource(kind).unwrap();
            assert_eq!(resource.kind(), *kind);
        }
        assert!(provider.resource("lagoon:unknown").is_none());
    }
}
