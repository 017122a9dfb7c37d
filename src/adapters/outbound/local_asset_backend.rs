//! Local Asset Backend
//!
//! Implements AssetBackend against a directory on the local filesystem.
//! Needs neither network nor catalogue access, which is why the registry
//! selects it by default.

use crate::config::{self, Config};
use crate::domain::entities::{
    RegistryQuery, RegistryResolution, Resolvable, SceneMetadata, SceneRequest, SceneResolution,
};
use crate::domain::error::{AssetError, AssetResult};
use crate::domain::ports::AssetBackend;
use crate::domain::services::SceneLayout;
use crate::domain::value_objects::BackendName;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Filesystem-backed asset backend.
///
/// Layout under the root:
/// ```text
/// <root>/scenes/<namespace>/{<layout>_<style>|layout_<layout>|default}.usd
/// <root>/<asset_type>/<source>
/// ```
///
/// The endpoint lives in `NGINE_API_ENDPOINT`: `host` reads it on every
/// call and `set_host` writes it, so every reader in the process sees the
/// same value.
pub struct LocalAssetBackend {
    root: PathBuf,
}

impl LocalAssetBackend {
    /// Create a backend rooted at `root`, or at `NGINE_ASSET_PATH`, or at `./assets`.
    pub fn new(root: Option<PathBuf>) -> Self {
        let root = root.unwrap_or_else(|| {
            PathBuf::from(
                config::env_var(config::ASSET_PATH_ENV)
                    .unwrap_or_else(|| config::DEFAULT_ASSET_PATH.to_string()),
            )
        });

        Self { root }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(Some(PathBuf::from(&cfg.asset_path)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute-or-relative path of the scene selected by `request`.
    pub fn scene_path(&self, request: &SceneRequest) -> PathBuf {
        self.root
            .join(SceneLayout::SCENES_DIR)
            .join(&request.backend_namespace)
            .join(SceneLayout::file_name(request))
    }

    pub fn registry_path(&self, asset_type: &str, source: &str) -> PathBuf {
        self.root.join(asset_type).join(source)
    }

    /// Reject request parts that would leave the root once joined.
    ///
    /// Only plain names are accepted: an absolute part replaces the root
    /// and `..` climbs out of it.
    fn ensure_relative(parts: &[&str]) -> AssetResult<()> {
        for part in parts {
            let plain = Path::new(part)
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
            if !plain {
                tracing::debug!("rejecting path outside asset root: {}", part);
                return Err(AssetError::not_found(*part));
            }
        }
        Ok(())
    }

    async fn ensure_exists(path: &Path) -> AssetResult<()> {
        match tokio::fs::try_exists(path).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AssetError::not_found(path.display().to_string())),
            Err(e) => {
                tracing::debug!("cannot stat {}: {}", path.display(), e);
                Err(AssetError::not_found(path.display().to_string()))
            }
        }
    }
}

impl Default for LocalAssetBackend {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl AssetBackend for LocalAssetBackend {
    fn name(&self) -> BackendName {
        BackendName::Local
    }

    async fn acquire_scene(
        &self,
        request: &SceneRequest,
    ) -> AssetResult<Resolvable<SceneResolution>> {
        Self::ensure_relative(&[request.backend_namespace.as_str()])?;
        let path = self.scene_path(request);
        Self::ensure_exists(&path).await?;

        tracing::debug!("resolved scene {} -> {}", request.backend_namespace, path.display());

        let metadata = SceneMetadata::from(request);
        Ok(Resolvable::deferred(move || SceneResolution {
            location: path.display().to_string(),
            metadata,
        }))
    }

    async fn acquire_by_registry(&self, query: &RegistryQuery) -> AssetResult<RegistryResolution> {
        Self::ensure_relative(&[query.asset_type.as_str(), query.source.as_str()])?;
        let path = self.registry_path(&query.asset_type, &query.source);
        Self::ensure_exists(&path).await?;

        tracing::debug!("resolved {}/{} -> {}", query.asset_type, query.source, path.display());

        Ok(RegistryResolution::new(
            path.display().to_string(),
            query.source.clone(),
        ))
    }

    fn host(&self) -> AssetResult<String> {
        Ok(config::env_var(config::API_ENDPOINT_ENV)
            .unwrap_or_else(|| config::DEFAULT_API_ENDPOINT.to_string()))
    }

    fn set_host(&self, host: &str) -> AssetResult<()> {
        std::env::set_var(config::API_ENDPOINT_ENV, host);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_LOCK;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"#usda 1.0\n").unwrap();
    }

    fn backend_with(files: &[&str]) -> (TempDir, LocalAssetBackend) {
        let dir = TempDir::new().unwrap();
        for file in files {
            touch(dir.path(), file);
        }
        let backend = LocalAssetBackend::new(Some(dir.path().to_path_buf()));
        (dir, backend)
    }

    #[tokio::test]
    async fn test_default_scene_resolves() {
        let (dir, backend) = backend_with(&["scenes/kitchen/default.usd"]);

        let resolution = backend
            .acquire_scene(&SceneRequest::new("kitchen", "kitchen"))
            .await
            .unwrap()
            .result();

        let expected = dir.path().join("scenes/kitchen/default.usd");
        assert_eq!(resolution.location, expected.display().to_string());
        assert_eq!(resolution.metadata.scene, "kitchen");
        assert_eq!(resolution.metadata.layout_id, None);
        assert_eq!(resolution.metadata.style_id, None);
        assert_eq!(resolution.metadata.version_id, None);
    }

    #[tokio::test]
    async fn test_missing_layout_is_not_found() {
        let (dir, backend) = backend_with(&["scenes/kitchen/default.usd"]);

        let err = backend
            .acquire_scene(&SceneRequest::new("kitchen", "kitchen").layout_id(1))
            .await
            .unwrap_err();

        let expected = dir.path().join("scenes/kitchen/layout_1.usd");
        match err {
            AssetError::NotFound { location } => {
                assert_eq!(location, expected.display().to_string())
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_layout_and_style_resolves() {
        let (_dir, backend) = backend_with(&["scenes/kitchen/3_7.usd"]);

        let request = SceneRequest::new("kitchen", "kitchen")
            .layout_id(3)
            .style_id(7)
            .version("v1");
        let resolution = backend.acquire_scene(&request).await.unwrap().result();

        assert!(resolution.location.ends_with("3_7.usd"));
        assert_eq!(resolution.metadata.layout_id, Some(3));
        assert_eq!(resolution.metadata.style_id, Some(7));
        assert_eq!(resolution.metadata.version_id.as_deref(), Some("v1"));
    }

    #[tokio::test]
    async fn test_layout_only_resolves() {
        let (_dir, backend) = backend_with(&["scenes/kitchen/layout_3.usd"]);

        let resolution = backend
            .acquire_scene(&SceneRequest::new("kitchen", "kitchen").layout_id(3))
            .await
            .unwrap()
            .result();

        assert!(resolution.location.ends_with("layout_3.usd"));
    }

    #[tokio::test]
    async fn test_scene_result_is_deferred() {
        let (_dir, backend) = backend_with(&["scenes/kitchen/default.usd"]);

        let resolvable = backend
            .acquire_scene(&SceneRequest::new("kitchen", "kitchen"))
            .await
            .unwrap();

        assert!(!resolvable.is_ready());
    }

    #[tokio::test]
    async fn test_acquire_by_registry() {
        let (dir, backend) = backend_with(&["objects/bowl.usd"]);

        let resolution = backend
            .acquire_by_registry(&RegistryQuery::new("objects", "bowl.usd"))
            .await
            .unwrap();

        assert_eq!(
            resolution.location,
            dir.path().join("objects/bowl.usd").display().to_string()
        );
        assert_eq!(resolution.source, "bowl.usd");
        assert!(resolution.extra_info.is_none());
    }

    #[tokio::test]
    async fn test_acquire_by_registry_not_found() {
        let (_dir, backend) = backend_with(&[]);

        let err = backend
            .acquire_by_registry(&RegistryQuery::new("objects", "plate.usd"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().ends_with("objects/plate.usd"));
    }

    #[tokio::test]
    async fn test_list_registry_entries_is_empty() {
        let (_dir, backend) = backend_with(&["objects/bowl.usd"]);
        assert!(backend.list_registry_entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_file_version_is_unsupported() {
        let (_dir, backend) = backend_with(&[]);
        let err = backend.acquire_by_file_version("v1").await.unwrap_err();
        assert!(matches!(
            err,
            AssetError::Unsupported {
                backend: BackendName::Local,
                ..
            }
        ));
    }

    #[test]
    fn test_root_defaults() {
        let _guard = ENV_LOCK.lock();

        std::env::remove_var(config::ASSET_PATH_ENV);
        assert_eq!(LocalAssetBackend::default().root(), Path::new("./assets"));

        std::env::set_var(config::ASSET_PATH_ENV, "/srv/assets");
        assert_eq!(LocalAssetBackend::new(None).root(), Path::new("/srv/assets"));
        assert_eq!(
            LocalAssetBackend::new(Some(PathBuf::from("/explicit"))).root(),
            Path::new("/explicit")
        );
        std::env::remove_var(config::ASSET_PATH_ENV);
    }

    #[test]
    fn test_host_defaults_to_localhost() {
        let _guard = ENV_LOCK.lock();
        std::env::remove_var(config::API_ENDPOINT_ENV);

        let backend = LocalAssetBackend::new(Some(PathBuf::from("/tmp")));
        assert_eq!(backend.host().unwrap(), "http://localhost:8080");
    }

    #[test]
    fn test_host_follows_environment_after_construction() {
        let _guard = ENV_LOCK.lock();
        std::env::set_var(config::API_ENDPOINT_ENV, "http://first:1");
        let backend = LocalAssetBackend::from_config(&Config::from_env());
        assert_eq!(backend.host().unwrap(), "http://first:1");

        std::env::set_var(config::API_ENDPOINT_ENV, "http://second:2");
        assert_eq!(backend.host().unwrap(), "http://second:2");

        backend.set_host("http://third:3").unwrap();
        let exported = std::env::var(config::API_ENDPOINT_ENV);
        std::env::remove_var(config::API_ENDPOINT_ENV);

        assert_eq!(exported.as_deref(), Ok("http://third:3"));
    }

    #[test]
    fn test_from_config() {
        let cfg = Config {
            asset_path: "/data/assets".to_string(),
            ..Config::default()
        };
        let backend = LocalAssetBackend::from_config(&cfg);

        assert_eq!(backend.root(), Path::new("/data/assets"));
        assert_eq!(backend.name(), BackendName::Local);
    }

    #[tokio::test]
    async fn test_parts_leaving_root_are_rejected() {
        let (_dir, backend) = backend_with(&["objects/bowl.usd"]);

        let tests = vec![
            RegistryQuery::new("/etc", "passwd"),
            RegistryQuery::new("objects", "../../etc/passwd"),
            RegistryQuery::new("..", "objects/bowl.usd"),
        ];

        for query in tests {
            let err = backend.acquire_by_registry(&query).await.unwrap_err();
            assert!(err.is_not_found(), "Failed for {:?}", query);
        }

        let scene = backend
            .acquire_scene(&SceneRequest::new("../objects", "x"))
            .await;
        assert!(matches!(scene, Err(AssetError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_nested_source_stays_inside_root() {
        let (_dir, backend) = backend_with(&["objects/kitchen/bowl.usd"]);

        let resolution = backend
            .acquire_by_registry(&RegistryQuery::new("objects", "kitchen/bowl.usd"))
            .await
            .unwrap();

        assert!(resolution.location.ends_with("bowl.usd"));
    }
}
