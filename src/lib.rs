//! ngine-assets Library
//!
//! Resolves logical asset requests (scenes, catalogue lookups) to concrete
//! locations through interchangeable backends selected by a process-wide
//! registry.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

// Re-export commonly used types
pub use adapters::outbound::{CloudAssetBackend, LocalAssetBackend, PrivilegedAssetBackend};
pub use application::{
    cloud_backend, get_backend, get_current_backend, local_backend, privileged_backend,
    BackendRegistry,
};
pub use config::{load_config, Config};
pub use domain::entities::{
    RegistryEntry, RegistryQuery, RegistryResolution, Resolvable, SceneMetadata, SceneRequest,
    SceneResolution,
};
pub use domain::error::{AssetError, AssetResult};
pub use domain::ports::{AssetBackend, CatalogueClient, CatalogueSearch};
pub use domain::value_objects::{BackendName, Endpoint, EndpointHandle};
