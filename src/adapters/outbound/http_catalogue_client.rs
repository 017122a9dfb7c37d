//! HTTP Catalogue Client
//!
//! Implements CatalogueClient as JSON over HTTP against the privileged
//! asset catalogue. The client owns its host, so it doubles as the
//! endpoint handle the privileged backend reconfigures in place.

use crate::domain::entities::{RegistryEntry, RegistryResolution, SceneRequest, SceneResolution};
use crate::domain::error::{AssetError, AssetResult};
use crate::domain::ports::{CatalogueClient, CatalogueSearch};
use crate::domain::value_objects::EndpointHandle;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// JSON/HTTP client for the asset catalogue.
pub struct HttpCatalogueClient {
    host: RwLock<String>,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpCatalogueClient {
    pub fn new(host: impl Into<String>, token: Option<String>) -> Self {
        Self {
            host: RwLock::new(host.into()),
            token,
            client: reqwest::Client::new(),
        }
    }

    /// Catalogue URL for `segments`, each percent-encoded as one path segment.
    fn url(&self, segments: &[&str]) -> AssetResult<reqwest::Url> {
        let host = self.host.read().clone();
        let mut url = reqwest::Url::parse(&host)
            .map_err(|e| AssetError::Catalogue(format!("invalid catalogue host {}: {}", host, e)))?;

        url.path_segments_mut()
            .map_err(|_| AssetError::Catalogue(format!("catalogue host {} cannot be a base", host)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> AssetResult<T> {
        let url = self.url(segments)?;
        let request = self.authorize(self.client.get(url.clone()));
        Self::send(request, url.to_string()).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> AssetResult<T> {
        let url = self.url(segments)?;
        let request = self.authorize(self.client.post(url.clone()).json(body));
        Self::send(request, url.to_string()).await
    }

    async fn send<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
        url: String,
    ) -> AssetResult<T> {
        let response = request.send().await.map_err(|e| AssetError::Transport {
            location: url.clone(),
            source: e,
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AssetError::not_found(url));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssetError::Catalogue(format!(
                "{} answered {} - {}",
                url, status, body
            )));
        }

        response.json::<T>().await.map_err(|e| {
            AssetError::Catalogue(format!("invalid response from {}: {}", url, e))
        })
    }
}

impl EndpointHandle for HttpCatalogueClient {
    fn host(&self) -> String {
        self.host.read().clone()
    }

    fn set_host(&self, host: &str) {
        *self.host.write() = host.to_string();
    }
}

#[async_trait]
impl CatalogueClient for HttpCatalogueClient {
    async fn load_floorplan(&self, request: &SceneRequest) -> AssetResult<SceneResolution> {
        self.post(&["v1", "floorplans", "acquire"], request).await
    }

    async fn search_registry(&self, search: &CatalogueSearch) -> AssetResult<RegistryResolution> {
        self.post(&["v1", "registry", "search"], search).await
    }

    async fn load_by_version(&self, version: &str) -> AssetResult<RegistryResolution> {
        self.get(&["v1", "registry", "versions", version]).await
    }

    async fn list_registry(&self) -> AssetResult<Vec<RegistryEntry>> {
        self.get(&["v1", "registry"]).await
    }
}
