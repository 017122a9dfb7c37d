//! Privileged Asset Backend
//!
//! Implements AssetBackend on top of the external asset catalogue.
//! The catalogue client is optional: when it cannot be bound the backend
//! either refuses construction or stays detached and rejects every call.

use crate::config::Config;
use crate::domain::entities::{
    RegistryEntry, RegistryQuery, RegistryResolution, Resolvable, SceneRequest, SceneResolution,
};
use crate::domain::error::{AssetError, AssetResult};
use crate::domain::ports::{AssetBackend, CatalogueClient, CatalogueSearch};
use crate::domain::value_objects::{BackendName, Endpoint};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

/// Outcome of binding the catalogue client.
pub enum CatalogueBinding {
    Bound {
        client: Arc<dyn CatalogueClient>,
        endpoint: Endpoint,
    },
    Unavailable {
        reason: String,
    },
}

/// Try to bind the catalogue client described by `cfg`.
///
/// The binding is unavailable when the crate was built without the
/// `catalogue` feature or no catalogue endpoint is configured.
#[cfg(feature = "catalogue")]
pub fn probe_catalogue(cfg: &Config) -> CatalogueBinding {
    use super::HttpCatalogueClient;

    let Some(endpoint) = cfg.catalogue_endpoint.as_ref() else {
        return CatalogueBinding::Unavailable {
            reason: format!(
                "catalogue endpoint not configured (set {})",
                crate::config::CATALOGUE_ENDPOINT_ENV
            ),
        };
    };

    let client = Arc::new(HttpCatalogueClient::new(
        endpoint.clone(),
        cfg.catalogue_token.clone(),
    ));

    CatalogueBinding::Bound {
        client: client.clone(),
        endpoint: Endpoint::Handle(client),
    }
}

#[cfg(not(feature = "catalogue"))]
pub fn probe_catalogue(_cfg: &Config) -> CatalogueBinding {
    CatalogueBinding::Unavailable {
        reason: "built without the `catalogue` feature".to_string(),
    }
}

/// Backend wrapping the privileged catalogue client.
pub struct PrivilegedAssetBackend {
    client: Option<Arc<dyn CatalogueClient>>,
    endpoint: RwLock<Endpoint>,
    unavailable_reason: Option<String>,
}

impl PrivilegedAssetBackend {
    /// Bind the catalogue described by `cfg`, surfacing `DependencyMissing` if absent.
    pub fn from_config(cfg: &Config) -> AssetResult<Self> {
        match probe_catalogue(cfg) {
            CatalogueBinding::Bound { client, endpoint } => Ok(Self::with_client(client, endpoint)),
            CatalogueBinding::Unavailable { reason } => Err(AssetError::DependencyMissing(reason)),
        }
    }

    /// Construct from an already bound client.
    pub fn with_client(client: Arc<dyn CatalogueClient>, endpoint: Endpoint) -> Self {
        Self {
            client: Some(client),
            endpoint: RwLock::new(endpoint),
            unavailable_reason: None,
        }
    }

    /// A detached instance; every operation fails with `BackendUnavailable`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            client: None,
            endpoint: RwLock::new(Endpoint::Plain(String::new())),
            unavailable_reason: Some(reason.into()),
        }
    }

    /// Build from a probe result, keeping a detached instance when unbound.
    pub fn from_binding(binding: CatalogueBinding) -> Self {
        match binding {
            CatalogueBinding::Bound { client, endpoint } => Self::with_client(client, endpoint),
            CatalogueBinding::Unavailable { reason } => Self::unavailable(reason),
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> AssetResult<&Arc<dyn CatalogueClient>> {
        self.client.as_ref().ok_or_else(|| {
            AssetError::BackendUnavailable(
                self.unavailable_reason
                    .clone()
                    .unwrap_or_else(|| "catalogue client not bound".to_string()),
            )
        })
    }
}

#[async_trait]
impl AssetBackend for PrivilegedAssetBackend {
    fn name(&self) -> BackendName {
        BackendName::Privileged
    }

    async fn acquire_scene(
        &self,
        request: &SceneRequest,
    ) -> AssetResult<Resolvable<SceneResolution>> {
        let resolution = self.client()?.load_floorplan(request).await?;
        Ok(Resolvable::ready(resolution))
    }

    async fn acquire_by_registry(&self, query: &RegistryQuery) -> AssetResult<RegistryResolution> {
        let client = self.client()?;
        client.search_registry(&CatalogueSearch::from(query)).await
    }

    async fn acquire_by_file_version(&self, version: &str) -> AssetResult<RegistryResolution> {
        self.client()?.load_by_version(version).await
    }

    fn host(&self) -> AssetResult<String> {
        self.client()?;
        Ok(self.endpoint.read().host())
    }

    fn set_host(&self, host: &str) -> AssetResult<()> {
        self.client()?;
        self.endpoint.write().set_host(host);
        Ok(())
    }

    async fn list_registry_entries(&self) -> Vec<RegistryEntry> {
        let client = match self.client() {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("catalogue listing skipped: {}", e);
                return Vec::new();
            }
        };

        match client.list_registry().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("catalogue listing failed: {}", e);
                Vec::new()
            }
        }
    }
}
