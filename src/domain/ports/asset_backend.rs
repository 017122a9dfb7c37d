//! Asset Backend Port
//!
//! Defines the contract every asset backend implements.
//! Implementations resolve against a filesystem root, an HTTP store,
//! or a privileged external catalogue.

use crate::domain::entities::{
    RegistryEntry, RegistryQuery, RegistryResolution, Resolvable, SceneRequest, SceneResolution,
};
use crate::domain::error::{AssetError, AssetResult};
use crate::domain::value_objects::BackendName;
use async_trait::async_trait;

/// Resolver for logical asset requests.
///
/// This is an outbound port: callers obtain an implementation from the
/// backend registry and never know which storage answers them. Operations
/// run to completion; no timeout or retry is applied here.
#[async_trait]
pub trait AssetBackend: Send + Sync {
    /// Which backend this is.
    fn name(&self) -> BackendName;

    /// Resolve a scene by namespace and optional layout/style/version.
    ///
    /// The location is checked before returning, so a missing asset fails
    /// here with [`AssetError::NotFound`]; the resolution itself is built
    /// when [`Resolvable::result`] is called.
    async fn acquire_scene(
        &self,
        request: &SceneRequest,
    ) -> AssetResult<Resolvable<SceneResolution>>;

    /// Resolve an asset by catalogue metadata.
    async fn acquire_by_registry(&self, query: &RegistryQuery) -> AssetResult<RegistryResolution>;

    /// Resolve an asset by its published file version.
    async fn acquire_by_file_version(&self, _version: &str) -> AssetResult<RegistryResolution> {
        Err(AssetError::Unsupported {
            backend: self.name(),
            operation: "acquire_by_file_version",
        })
    }

    /// Endpoint this backend is configured with.
    fn host(&self) -> AssetResult<String>;

    /// Reconfigure the endpoint.
    fn set_host(&self, host: &str) -> AssetResult<()>;

    /// List catalogue entries.
    ///
    /// Best-effort: backends without a catalogue, or whose catalogue fails,
    /// return an empty list.
    async fn list_registry_entries(&self) -> Vec<RegistryEntry> {
        Vec::new()
    }
}
