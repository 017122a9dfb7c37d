mod asset_backend;
mod catalogue_client;

pub use asset_backend::AssetBackend;
pub use catalogue_client::{CatalogueClient, CatalogueSearch, CATALOGUE_FILE_TYPE};
