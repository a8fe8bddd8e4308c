//! GraphQL transport

use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::authn::TokenSource;
use crate::config::Settings;
use crate::errors::LagoonError;

/// Standard GraphQL response envelope
#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,

    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// Client for the Lagoon GraphQL API
///
/// Holds one pooled `reqwest::Client`; no state is shared across calls
/// beyond connection reuse.
pub struct LagoonClient {
    http: Client,
    api_url: String,
    token: TokenSource,
}

impl LagoonClient {
    /// Build a client from resolved settings.
    pub fn new(settings: &Settings) -> Result<Self, LagoonError> {
        if settings.insecure {
            warn!("TLS certificate verification disabled; use only against local clusters with self-signed certificates");
        }

        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .danger_accept_invalid_certs(settings.insecure)
            .build()?;

        let token = TokenSource::from_settings(settings)?;

        Ok(Self {
            http,
            api_url: settings.api_url.clone(),
            token,
        })
    }

    /// Get the endpoint URL
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Execute a GraphQL operation and return the `data` object.
    ///
    /// Transport failures and non-2xx statuses map to
    /// [`LagoonError::Connection`]; a response carrying an `errors` array maps
    /// to [`LagoonError::Api`] with all messages aggregated.
    pub async fn execute(&self, query: &str, variables: Value) -> Result<Value, LagoonError> {
        debug!("POST {}", self.api_url);

        let bearer = self.token.bearer()?;
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let response = self
            .http
            .post(&self.api_url)
            .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            error!("GraphQL request failed: {} - {}", status, text);
            return Err(LagoonError::Connection(format!("{}: {}", status, text)));
        }

        let envelope: GraphqlResponse = response.json().await?;

        if let Some(errors) = envelope.errors {
            if !errors.is_empty() {
                let joined = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(LagoonError::Api(joined));
            }
        }

        Ok(envelope.data.unwrap_or(Value::Null))
    }

    /// Execute a new-schema operation, falling back to the old-schema shape
    /// when the server rejects the newer document.
    ///
    /// The API supports two live schema generations; which one a server runs
    /// is only detectable from the wording of its rejection (see
    /// [`LagoonError::is_schema_mismatch`]).
    pub(crate) async fn execute_with_fallback(
        &self,
        new_query: &str,
        new_variables: Value,
        old_query: &str,
        old_variables: Value,
    ) -> Result<Value, LagoonError> {
        match self.execute(new_query, new_variables).await {
            Err(err) if err.is_schema_mismatch() => {
                debug!("server rejected current-schema document ({}); retrying legacy shape", err);
                self.execute(old_query, old_variables).await
            }
            other => other,
        }
    }

    /// Pull a named field out of the `data` object and deserialize it.
    pub(crate) fn field<T: DeserializeOwned>(
        mut data: Value,
        name: &str,
    ) -> Result<T, LagoonError> {
        let value = data
            .get_mut(name)
            .map(Value::take)
            .unwrap_or(Value::Null);
        Ok(serde_json::from_value(value)?)
    }
}

/// Normalize an ID that some API versions return as a raw integer and others
/// as a nested `{id, ...}` object.
pub(crate) fn normalize_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::Object(map) => map.get("id").and_then(Value::as_i64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_id_accepts_both_response_shapes() {
        assert_eq!(normalize_id(&json!(7)), Some(7));
        assert_eq!(normalize_id(&json!({"id": 7, "name": "target"})), Some(7));
        assert_eq!(normalize_id(&json!("7")), None);
        assert_eq!(normalize_id(&Value::Null), None);
    }
}
