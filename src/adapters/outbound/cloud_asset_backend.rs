//! Cloud Asset Backend
//!
//! Implements AssetBackend against a remote HTTP asset store.
//! An asset exists when a GET on its URL answers with a 2xx status.

use crate::config::{self, Config};
use crate::domain::entities::{
    RegistryQuery, RegistryResolution, Resolvable, SceneMetadata, SceneRequest, SceneResolution,
};
use crate::domain::error::{AssetError, AssetResult};
use crate::domain::ports::AssetBackend;
use crate::domain::services::SceneLayout;
use crate::domain::value_objects::BackendName;
use async_trait::async_trait;
use parking_lot::RwLock;

/// HTTP-backed asset backend.
///
/// The HTTP client is created once and reused for every request made by
/// this instance.
pub struct CloudAssetBackend {
    base_url: RwLock<String>,
    client: reqwest::Client,
}

impl CloudAssetBackend {
    /// Create a backend for `base_url`, or for the default asset store.
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: RwLock::new(
                base_url.unwrap_or_else(|| config::DEFAULT_CLOUD_URL.to_string()),
            ),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(Some(cfg.cloud_base_url.clone()))
    }

    pub fn base_url(&self) -> String {
        self.base_url.read().clone()
    }

    fn url_for(&self, relative: &str) -> String {
        format!("{}/{}", self.base_url.read().trim_end_matches('/'), relative)
    }

    pub fn scene_url(&self, request: &SceneRequest) -> String {
        self.url_for(&SceneLayout::relative_path(request))
    }

    pub fn registry_url(&self, asset_type: &str, source: &str) -> String {
        self.url_for(&SceneLayout::registry_path(asset_type, source))
    }

    /// GET `url` and fail with NotFound unless it answers 2xx.
    async fn ensure_exists(&self, url: &str) -> AssetResult<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AssetError::Transport {
                location: url.to_string(),
                source: e,
            })?;

        if !response.status().is_success() {
            tracing::debug!("GET {} answered {}", url, response.status());
            return Err(AssetError::not_found(url));
        }

        Ok(())
    }
}

impl Default for CloudAssetBackend {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl AssetBackend for CloudAssetBackend {
    fn name(&self) -> BackendName {
        BackendName::Cloud
    }

    async fn acquire_scene(
        &self,
        request: &SceneRequest,
    ) -> AssetResult<Resolvable<SceneResolution>> {
        let url = self.scene_url(request);
        self.ensure_exists(&url).await?;

        tracing::debug!("resolved scene {} -> {}", request.backend_namespace, url);

        let metadata = SceneMetadata::from(request);
        Ok(Resolvable::deferred(move || SceneResolution {
            location: url,
            metadata,
        }))
    }

    async fn acquire_by_registry(&self, query: &RegistryQuery) -> AssetResult<RegistryResolution> {
        let url = self.registry_url(&query.asset_type, &query.source);
        self.ensure_exists(&url).await?;

        tracing::debug!("resolved {}/{} -> {}", query.asset_type, query.source, url);

        Ok(RegistryResolution::new(url, query.source.clone()))
    }

    fn host(&self) -> AssetResult<String> {
        Ok(self.base_url())
    }

    fn set_host(&self, host: &str) -> AssetResult<()> {
        *self.base_url.write() = host.to_string();
        Ok(())
    }
}
