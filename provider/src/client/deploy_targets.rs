//! Deploy target API methods
//!
//! Current servers call these `kubernetes`; the old schema generation calls
//! them `openshift`. Every method carries both documents and lets the
//! transport fall back when the server rejects the newer one.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::graphql::LagoonClient;
use crate::errors::LagoonError;
use crate::models::DeployTarget;
use crate::validate::CloudProvider;

const DEPLOY_TARGET_FIELDS: &str =
    "id name consoleUrl cloudProvider cloudRegion sshHost sshPort routerPattern disabled";

/// Fields accepted by `addKubernetes` / the `updateKubernetes` patch
#[derive(Debug, Clone)]
pub struct DeployTargetInput {
    pub name: String,
    pub console_url: Option<String>,
    pub cloud_provider: Option<CloudProvider>,
    pub cloud_region: Option<String>,
    pub ssh_host: Option<String>,
    pub ssh_port: Option<u16>,
    pub router_pattern: Option<String>,
    pub disabled: Option<bool>,
}

impl DeployTargetInput {
    fn wire(&self) -> Value {
        json!({
            "name": self.name,
            "consoleUrl": self.console_url,
            "cloudProvider": self.cloud_provider.map(|p| p.as_str()),
            "cloudRegion": self.cloud_region,
            "sshHost": self.ssh_host,
            // the API models the port as a string
            "sshPort": self.ssh_port.map(|p| p.to_string()),
            "routerPattern": self.router_pattern,
            "disabled": self.disabled,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeployTargetWire {
    id: i64,
    name: String,
    #[serde(default)]
    console_url: Option<String>,
    #[serde(default)]
    cloud_provider: Option<CloudProvider>,
    #[serde(default)]
    cloud_region: Option<String>,
    #[serde(default)]
    ssh_host: Option<String>,
    #[serde(default)]
    ssh_port: Option<String>,
    #[serde(default)]
    router_pattern: Option<String>,
    #[serde(default)]
    disabled: Option<bool>,
}

impl DeployTargetWire {
    fn normalize(self) -> DeployTarget {
        DeployTarget {
            id: self.id,
            name: self.name,
            console_url: self.console_url,
            cloud_provider: self.cloud_provider,
            cloud_region: self.cloud_region,
            ssh_host: self.ssh_host,
            ssh_port: self.ssh_port,
            router_pattern: self.router_pattern,
            disabled: self.disabled,
        }
    }
}

impl LagoonClient {
    /// Register a deploy target.
    pub async fn add_deploy_target(
        &self,
        input: &DeployTargetInput,
    ) -> Result<DeployTarget, LagoonError> {
        let new_query = format!(
            "mutation addKubernetes($input: AddKubernetesInput!) {{ addKubernetes(input: $input) {{ {} }} }}",
            DEPLOY_TARGET_FIELDS
        );
        let old_query = format!(
            "mutation addOpenshift($input: AddOpenshiftInput!) {{ addOpenshift(input: $input) {{ {} }} }}",
            DEPLOY_TARGET_FIELDS
        );

        let data = self
            .execute_with_fallback(
                &new_query,
                json!({ "input": input.wire() }),
                &old_query,
                json!({ "input": input.wire() }),
            )
            .await?;

        let wire: DeployTargetWire = if data.get("addKubernetes").is_some() {
            Self::field(data, "addKubernetes")?
        } else {
            Self::field(data, "addOpenshift")?
        };
        Ok(wire.normalize())
    }

    /// Look up a deploy target by ID, scanning the full list.
    pub async fn deploy_target_by_id(&self, id: i64) -> Result<Option<DeployTarget>, LagoonError> {
        let new_query = format!("query {{ allKubernetes {{ {} }} }}", DEPLOY_TARGET_FIELDS);
        let old_query = format!("query {{ allOpenshifts {{ {} }} }}", DEPLOY_TARGET_FIELDS);

        let data = self
            .execute_with_fallback(&new_query, json!({}), &old_query, json!({}))
            .await?;

        let targets: Vec<DeployTargetWire> = if data.get("allKubernetes").is_some() {
            Self::field(data, "allKubernetes")?
        } else {
            Self::field(data, "allOpenshifts")?
        };
        Ok(targets
            .into_iter()
            .find(|t| t.id == id)
            .map(DeployTargetWire::normalize))
    }

    /// Update a deploy target in place.
    pub async fn update_deploy_target(
        &self,
        id: i64,
        patch: &DeployTargetInput,
    ) -> Result<DeployTarget, LagoonError> {
        let new_query = format!(
            "mutation updateKubernetes($input: UpdateKubernetesInput!) {{ updateKubernetes(input: $input) {{ {} }} }}",
            DEPLOY_TARGET_FIELDS
        );
        let old_query = format!(
            "mutation updateOpenshift($input: UpdateOpenshiftInput!) {{ updateOpenshift(input: $input) {{ {} }} }}",
            DEPLOY_TARGET_FIELDS
        );
        let variables = json!({ "input": { "id": id, "patch": patch.wire() } });

        let data = self
            .execute_with_fallback(&new_query, variables.clone(), &old_query, variables)
            .await?;

        let wire: DeployTargetWire = if data.get("updateKubernetes").is_some() {
            Self::field(data, "updateKubernetes")?
        } else {
            Self::field(data, "updateOpenshift")?
        };
        Ok(wire.normalize())
    }

    /// Delete a deploy target by name.
    pub async fn delete_deploy_target(&self, name: &str) -> Result<(), LagoonError> {
        let new_query = "mutation deleteKubernetes($input: DeleteKubernetesInput!) { deleteKubernetes(input: $input) }";
        let old_query = "mutation deleteOpenshift($input: DeleteOpenshiftInput!) { deleteOpenshift(input: $input) }";
        let variables = json!({ "input": { "name": name } });

        self.execute_with_fallback(new_query, variables.clone(), old_query, variables)
            .await?;
        Ok(())
    }
}
