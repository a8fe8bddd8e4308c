//! The resource lifecycle contract
//!
//! States and inputs cross this boundary as opaque `serde_json::Value` maps,
//! exactly as the host engine hands them over; each provider deserializes
//! into its typed Args/State structs on entry and serializes back on exit.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::LagoonError;

/// How a provider realizes `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStrategy {
    /// The API has an update mutation; unchanged inputs skip the call
    InPlace,

    /// No update mutation exists; update is always delete-then-create and
    /// the server-side ID changes
    Recreate,
}

/// Result of `create`
#[derive(Debug, Clone)]
pub struct CreateResult {
    /// Durable local ID for the new resource
    pub id: String,

    /// Output state persisted by the host
    pub outs: Value,
}

/// Result of a successful `read`
#[derive(Debug, Clone)]
pub struct ReadResult {
    /// Local ID, re-derived for imports
    pub id: String,

    /// Current remote state
    pub outs: Value,
}

/// Result of `update`
#[derive(Debug, Clone)]
pub struct UpdateResult {
    /// New output state
    pub outs: Value,
}

/// The four-method capability contract every resource kind implements.
///
/// There is no retry, batching, or internal concurrency here; each call is
/// independent and a failure is a hard failure, with the single exception of
/// the delete step inside [`recreate`].
#[async_trait]
pub trait ResourceLifecycle: Send + Sync {
    /// Stable kind string, e.g. `lagoon:environment`
    fn kind(&self) -> &'static str;

    fn update_strategy(&self) -> UpdateStrategy {
        UpdateStrategy::InPlace
    }

    /// Validate inputs, create the remote resource, return its state.
    async fn create(&self, inputs: Value) -> Result<CreateResult, LagoonError>;

    /// Fetch current remote state. `Ok(None)` means the resource is gone and
    /// the host should drop it from state; absence is never an error.
    async fn read(&self, id: &str, state: Value) -> Result<Option<ReadResult>, LagoonError>;

    /// Reconcile old state with new inputs.
    async fn update(&self, id: &str, old: Value, news: Value) -> Result<UpdateResult, LagoonError>;

    /// Delete the remote resource.
    async fn delete(&self, id: &str, state: Value) -> Result<(), LagoonError>;
}

/// Shared driver for [`UpdateStrategy::Recreate`] providers.
///
/// A delete failure classified as an API error means the resource is already
/// gone remotely; forward progress is safe, so it is swallowed and the create
/// proceeds. A connection-class failure says nothing about remote state and
/// must propagate.
pub(crate) async fn recreate<R>(
    resource: &R,
    id: &str,
    old: Value,
    news: Value,
) -> Result<UpdateResult, LagoonError>
where
    R: ResourceLifecycle + ?Sized,
{
    match resource.delete(id, old).await {
        Ok(()) => {}
        Err(err) if err.is_api() => {
            warn!(
                kind = resource.kind(),
                id, "delete before recreate reported an API error (already gone?): {}", err
            );
        }
        Err(err) => return Err(err),
    }

    let created = resource.create(news).await?;
    Ok(UpdateResult { outs: created.outs })
}

/// Deserialize host-supplied inputs or state into a typed struct, with
/// unknown fields ignored.
pub(crate) fn from_host<T: DeserializeOwned>(value: Value) -> Result<T, LagoonError> {
    serde_json::from_value(value)
        .map_err(|e| LagoonError::validation("inputs", format!("unexpected shape: {}", e)))
}

/// Serialize a typed state back into the host's map form.
pub(crate) fn to_host<T: Serialize>(state: &T) -> Result<Value, LagoonError> {
    serde_json::to_value(state)
        .map_err(|e| LagoonError::Config(format!("failed to serialize state: {}", e)))
}

/// Log-and-return helper for the unchanged-inputs fast path.
pub(crate) fn skip_noop_update(kind: &str, id: &str, outs: Value) -> UpdateResult {
    debug!(kind, id, "inputs unchanged; skipping remote mutation");
    UpdateResult { outs }
}
