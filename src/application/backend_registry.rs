//! Backend Registry - Asset backend selection use case
//!
//! Maps backend names to lazily constructed, cached backend instances and
//! tracks which backend was selected last. A process-wide registry is
//! available through [`global`]; it is created on first use and lives
//! until the process exits.

use crate::adapters::outbound::{CloudAssetBackend, LocalAssetBackend, PrivilegedAssetBackend};
use crate::config::{self, Config};
use crate::domain::error::{AssetError, AssetResult};
use crate::domain::ports::AssetBackend;
use crate::domain::value_objects::BackendName;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Constructor invoked the first time a backend name is selected.
pub type BackendFactory = dyn Fn(BackendName) -> AssetResult<Arc<dyn AssetBackend>> + Send + Sync;

#[derive(Default)]
struct RegistryState {
    backends: HashMap<BackendName, Arc<dyn AssetBackend>>,
    current: Option<BackendName>,
}

/// Registry of asset backends.
///
/// Selection order is: explicit name, then `NGINE_ASSET_BACKEND`, then
/// `local`. Each backend is constructed at most once; construction and
/// caching happen under a single lock, so concurrent first uses of a name
/// share one instance.
pub struct BackendRegistry {
    state: Mutex<RegistryState>,
    factory: Box<BackendFactory>,
}

impl BackendRegistry {
    /// Registry constructing backends from the environment.
    pub fn new() -> Self {
        Self::with_factory(default_factory)
    }

    /// Registry constructing backends with `factory`.
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: Fn(BackendName) -> AssetResult<Arc<dyn AssetBackend>> + Send + Sync + 'static,
    {
        Self {
            state: Mutex::new(RegistryState::default()),
            factory: Box::new(factory),
        }
    }

    /// Resolve the effective backend name.
    ///
    /// An empty explicit name counts as absent.
    pub fn resolve_name(explicit: Option<&str>) -> AssetResult<BackendName> {
        let requested = explicit
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
            .or_else(|| config::env_var(config::ASSET_BACKEND_ENV))
            .unwrap_or_else(|| BackendName::default().as_str().to_string());

        BackendName::parse(&requested).ok_or_else(|| AssetError::unknown_backend(requested))
    }

    /// Select a backend by name (or by default) and make it current.
    pub fn get_backend(&self, name: Option<&str>) -> AssetResult<Arc<dyn AssetBackend>> {
        let name = Self::resolve_name(name)?;
        self.select(name)
    }

    /// Select `name`, constructing and caching it on first use.
    ///
    /// A failed construction caches nothing and leaves the current backend
    /// unchanged.
    pub fn select(&self, name: BackendName) -> AssetResult<Arc<dyn AssetBackend>> {
        let mut state = self.state.lock();

        let backend = match state.backends.get(&name) {
            Some(backend) => backend.clone(),
            None => {
                tracing::info!("constructing {} asset backend", name);
                let backend = (self.factory)(name).map_err(|e| {
                    tracing::warn!("failed to construct {} asset backend: {}", name, e);
                    e
                })?;
                state.backends.insert(name, backend.clone());
                backend
            }
        };

        if state.current != Some(name) {
            tracing::debug!("active asset backend is now {}", name);
        }
        state.current = Some(name);

        Ok(backend)
    }

    /// The most recently selected backend, selecting the default one if none was.
    pub fn get_current_backend(&self) -> AssetResult<Arc<dyn AssetBackend>> {
        {
            let state = self.state.lock();
            if let Some(backend) = state.current.and_then(|name| state.backends.get(&name)) {
                return Ok(backend.clone());
            }
        }
        self.get_backend(None)
    }

    pub fn local(&self) -> AssetResult<Arc<dyn AssetBackend>> {
        self.select(BackendName::Local)
    }

    pub fn cloud(&self) -> AssetResult<Arc<dyn AssetBackend>> {
        self.select(BackendName::Cloud)
    }

    pub fn privileged(&self) -> AssetResult<Arc<dyn AssetBackend>> {
        self.select(BackendName::Privileged)
    }

    pub fn current_name(&self) -> Option<BackendName> {
        self.state.lock().current
    }

    pub fn is_cached(&self, name: BackendName) -> bool {
        self.state.lock().backends.contains_key(&name)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Construct a backend from the current environment.
pub fn default_factory(name: BackendName) -> AssetResult<Arc<dyn AssetBackend>> {
    let cfg = Config::from_env();

    let backend: Arc<dyn AssetBackend> = match name {
        BackendName::Local => Arc::new(LocalAssetBackend::from_config(&cfg)),
        BackendName::Cloud => Arc::new(CloudAssetBackend::from_config(&cfg)),
        BackendName::Privileged => Arc::new(PrivilegedAssetBackend::from_config(&cfg)?),
    };

    Ok(backend)
}

static REGISTRY: OnceLock<BackendRegistry> = OnceLock::new();

/// Process-wide registry, created on first use.
pub fn global() -> &'static BackendRegistry {
    REGISTRY.get_or_init(BackendRegistry::new)
}

/// Select a backend on the process-wide registry.
pub fn get_backend(name: Option<&str>) -> AssetResult<Arc<dyn AssetBackend>> {
    global().get_backend(name)
}

/// Current backend of the process-wide registry.
pub fn get_current_backend() -> AssetResult<Arc<dyn AssetBackend>> {
    global().get_current_backend()
}

pub fn local_backend() -> AssetResult<Arc<dyn AssetBackend>> {
    global().local()
}

pub fn cloud_backend() -> AssetResult<Arc<dyn AssetBackend>> {
    global().cloud()
}

pub fn privileged_backend() -> AssetResult<Arc<dyn AssetBackend>> {
    global().privileged()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_LOCK;
    use crate::domain::entities::{
        RegistryQuery, RegistryResolution, Resolvable, SceneRequest, SceneResolution,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    // ===== Mock Implementations =====

    struct StubBackend {
        name: BackendName,
    }

    #[async_trait]
    impl AssetBackend for StubBackend {
        fn name(&self) -> BackendName {
            self.name
        }

        async fn acquire_scene(
            &self,
            request: &SceneRequest,
        ) -> AssetResult<Resolvable<SceneResolution>> {
            Err(AssetError::not_found(&request.backend_namespace))
        }

        async fn acquire_by_registry(
            &self,
            query: &RegistryQuery,
        ) -> AssetResult<RegistryResolution> {
            Err(AssetError::not_found(&query.source))
        }

        fn host(&self) -> AssetResult<String> {
            Ok(format!("stub://{}", self.name))
        }

        fn set_host(&self, _host: &str) -> AssetResult<()> {
            Ok(())
        }
    }

    /// Registry whose factory counts constructions and refuses `privileged`.
    fn counting_registry() -> (BackendRegistry, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let registry = BackendRegistry::with_factory(move |name| {
            counter.fetch_add(1, Ordering::SeqCst);
            if name == BackendName::Privileged {
                return Err(AssetError::DependencyMissing("catalogue".to_string()));
            }
            Ok(Arc::new(StubBackend { name }) as Arc<dyn AssetBackend>)
        });
        (registry, count)
    }

    #[test]
    fn test_repeated_get_returns_same_instance() {
        let (registry, count) = counting_registry();

        let first = registry.get_backend(Some("local")).unwrap();
        let second = registry.get_backend(Some("local")).unwrap();
        let third = registry.local().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &third));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_backend_constructs_nothing() {
        let (registry, count) = counting_registry();

        let err = registry.get_backend(Some("nonexistent")).err().unwrap();

        match err {
            AssetError::UnknownBackend { name, valid } => {
                assert_eq!(name, "nonexistent");
                assert_eq!(valid, vec!["local", "cloud", "privileged"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(registry.current_name().is_none());
    }

    #[test]
    fn test_each_name_gets_its_own_instance() {
        let (registry, count) = counting_registry();

        let local = registry.get_backend(Some("local")).unwrap();
        let cloud = registry.get_backend(Some("cloud")).unwrap();

        assert_eq!(local.name(), BackendName::Local);
        assert_eq!(cloud.name(), BackendName::Cloud);
        assert!(!Arc::ptr_eq(&local, &cloud));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_selection_updates_current() {
        let (registry, _count) = counting_registry();

        registry.get_backend(Some("cloud")).unwrap();
        assert_eq!(registry.current_name(), Some(BackendName::Cloud));
        assert_eq!(
            registry.get_current_backend().unwrap().name(),
            BackendName::Cloud
        );

        registry.get_backend(Some("local")).unwrap();
        assert_eq!(
            registry.get_current_backend().unwrap().name(),
            BackendName::Local
        );
    }

    #[test]
    fn test_current_defaults_to_local() {
        let _guard = ENV_LOCK.lock();
        std::env::remove_var(config::ASSET_BACKEND_ENV);
        let (registry, _count) = counting_registry();

        let backend = registry.get_current_backend().unwrap();

        assert_eq!(backend.name(), BackendName::Local);
        assert_eq!(registry.current_name(), Some(BackendName::Local));
    }

    #[test]
    fn test_env_override_selects_backend() {
        let _guard = ENV_LOCK.lock();
        std::env::set_var(config::ASSET_BACKEND_ENV, "cloud");
        let (registry, _count) = counting_registry();

        let current = registry.get_current_backend().unwrap();
        let explicit = registry.get_backend(Some("local")).unwrap();

        std::env::remove_var(config::ASSET_BACKEND_ENV);

        assert_eq!(current.name(), BackendName::Cloud);
        assert_eq!(explicit.name(), BackendName::Local);
    }

    #[test]
    fn test_invalid_env_override_is_unknown_backend() {
        let _guard = ENV_LOCK.lock();
        std::env::set_var(config::ASSET_BACKEND_ENV, "s3");
        let (registry, count) = counting_registry();

        let result = registry.get_backend(None);

        std::env::remove_var(config::ASSET_BACKEND_ENV);

        assert!(matches!(result, Err(AssetError::UnknownBackend { .. })));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_explicit_name_falls_back() {
        let _guard = ENV_LOCK.lock();
        std::env::remove_var(config::ASSET_BACKEND_ENV);

        assert_eq!(
            BackendRegistry::resolve_name(Some("")).unwrap(),
            BackendName::Local
        );
        assert_eq!(
            BackendRegistry::resolve_name(Some("Privileged")).unwrap(),
            BackendName::Privileged
        );
    }

    #[test]
    fn test_failed_construction_is_not_cached() {
        let (registry, count) = counting_registry();
        registry.get_backend(Some("local")).unwrap();

        let first = registry.get_backend(Some("privileged"));
        let second = registry.privileged();

        assert!(matches!(first, Err(AssetError::DependencyMissing(_))));
        assert!(matches!(second, Err(AssetError::DependencyMissing(_))));
        assert!(!registry.is_cached(BackendName::Privileged));
        assert_eq!(registry.current_name(), Some(BackendName::Local));
        // local once, privileged attempted twice
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_concurrent_first_use_constructs_once() {
        let (registry, count) = counting_registry();
        let registry = Arc::new(registry);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.get_backend(Some("cloud")).unwrap())
            })
            .collect();

        let backends: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        for backend in &backends[1..] {
            assert!(Arc::ptr_eq(&backends[0], backend));
        }
    }

    #[test]
    fn test_default_factory_builds_real_backends() {
        let _guard = ENV_LOCK.lock();
        std::env::remove_var(config::CATALOGUE_ENDPOINT_ENV);
        let registry = BackendRegistry::new();

        assert_eq!(registry.local().unwrap().name(), BackendName::Local);
        assert_eq!(registry.cloud().unwrap().name(), BackendName::Cloud);

        let privileged = registry.privileged();
        assert!(matches!(privileged, Err(AssetError::DependencyMissing(_))));
        assert!(!registry.is_cached(BackendName::Privileged));
        assert_eq!(registry.current_name(), Some(BackendName::Cloud));
    }

    #[test]
    fn test_global_registry_is_shared() {
        assert!(std::ptr::eq(global(), global()));
    }

    #[test]
    #[traced_test]
    fn test_construction_is_logged() {
        let (registry, _count) = counting_registry();
        registry.get_backend(Some("local")).unwrap();

        assert!(logs_contain("constructing local asset backend"));
    }
}
