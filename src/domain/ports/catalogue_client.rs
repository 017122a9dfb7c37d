//! Catalogue Client Port
//!
//! Defines the interface of the privileged asset catalogue.
//! The catalogue is an opaque remote service; this crate only shapes its
//! own requests into the schema the catalogue expects.

use crate::domain::entities::{
    RegistryEntry, RegistryQuery, RegistryResolution, SceneRequest, SceneResolution,
};
use crate::domain::error::AssetResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// File type requested from the catalogue for every search.
pub const CATALOGUE_FILE_TYPE: &str = "USD";

/// Search request in the catalogue's own schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueSearch {
    pub registry_type: String,
    pub registry_name: Vec<String>,
    pub exclude_registry_name: Vec<String>,
    pub eqs: Option<Map<String, Value>>,
    pub contains: Option<Map<String, Value>>,
    pub file_type: String,
    pub file_name: String,
    pub source: Vec<String>,
    pub projects: Vec<String>,
    pub quality_levels: Vec<String>,
}

impl From<&RegistryQuery> for CatalogueSearch {
    fn from(query: &RegistryQuery) -> Self {
        let source = if query.source.is_empty() {
            Vec::new()
        } else {
            vec![query.source.clone()]
        };

        Self {
            registry_type: query.asset_type.clone(),
            registry_name: query.registry_names.clone(),
            exclude_registry_name: query.exclude_registry_names.clone(),
            eqs: query.eqs.clone(),
            contains: query.contains.clone(),
            file_type: CATALOGUE_FILE_TYPE.to_string(),
            file_name: query.file_name.clone().unwrap_or_default(),
            source,
            projects: query.projects.clone(),
            quality_levels: Vec::new(),
        }
    }
}

/// Client for the privileged asset catalogue.
///
/// Results and failures are passed through to callers unchanged.
#[async_trait]
pub trait CatalogueClient: Send + Sync {
    /// Load a floorplan by its parameters.
    async fn load_floorplan(&self, request: &SceneRequest) -> AssetResult<SceneResolution>;

    /// Find an asset matching the given filters.
    async fn search_registry(&self, search: &CatalogueSearch) -> AssetResult<RegistryResolution>;

    /// Load an asset by file version.
    async fn load_by_version(&self, version: &str) -> AssetResult<RegistryResolution>;

    /// List every catalogue entry visible to this client.
    async fn list_registry(&self) -> AssetResult<Vec<RegistryEntry>>;
}
