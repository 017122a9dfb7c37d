mod cloud_asset_backend;
#[cfg(feature = "catalogue")]
mod http_catalogue_client;
mod local_asset_backend;
mod privileged_asset_backend;

pub use cloud_asset_backend::CloudAssetBackend;
#[cfg(feature = "catalogue")]
pub use http_catalogue_client::HttpCatalogueClient;
pub use local_asset_backend::LocalAssetBackend;
pub use privileged_asset_backend::{probe_catalogue, CatalogueBinding, PrivilegedAssetBackend};
