use std::sync::Arc;

use gatehouse_application::{
    CollectionSource, DirectoryConfig, DirectoryService, LookupCache, Notifier, PermissionModel,
    PersistenceStore, RestResource, RouteGuard, RouteGuardConfig, SessionService, Transport,
};
use gatehouse_core::AppResult;
use gatehouse_domain::{AccessRequest, Device, Role, Software, StateRequest, User};
use gatehouse_infrastructure::{
    FilePersistenceStore, InMemoryPersistenceStore, JwtClaimsDecoder, ReqwestTransport,
    StaticPermissionCatalog, TracingNotifier,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::console_config::ConsoleConfig;

pub struct ConsoleServices {
    pub notifier: Arc<dyn Notifier>,
    pub session: SessionService,
    pub permissions: PermissionModel,
    pub route_guard: RouteGuard,
    pub users: Arc<LookupCache<User>>,
    pub roles: Arc<LookupCache<Role>>,
    pub software: Arc<LookupCache<Software>>,
    pub states: Arc<LookupCache<StateRequest>>,
    pub devices: RestResource<Device>,
    pub directory: DirectoryService,
}

impl ConsoleServices {
    pub async fn build(config: &ConsoleConfig) -> AppResult<Self> {
        let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier::new());
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(config.http_timeout)?);
        let store: Arc<dyn PersistenceStore> = match &config.cache_dir {
            Some(directory) => {
                info!(directory = %directory.display(), "using file persistence");
                Arc::new(FilePersistenceStore::new(directory))
            }
            None => Arc::new(InMemoryPersistenceStore::new()),
        };

        let catalog = match &config.permission_catalog_path {
            Some(path) => StaticPermissionCatalog::from_path(path).await?,
            None => StaticPermissionCatalog::builtin()?,
        };

        let base_url = config.api_base_url.as_str();
        let users = lookup_cache::<User>("users", &transport, base_url, &store, &notifier);
        let roles = lookup_cache::<Role>("roles", &transport, base_url, &store, &notifier);
        let software = lookup_cache::<Software>("software", &transport, base_url, &store, &notifier);
        let states =
            lookup_cache::<StateRequest>("state-requests", &transport, base_url, &store, &notifier);
        let devices_cache = lookup_cache::<Device>("devices", &transport, base_url, &store, &notifier);
        let access_cache =
            lookup_cache::<AccessRequest>("access", &transport, base_url, &store, &notifier);
        let access_updates =
            RestResource::<AccessRequest>::new(Arc::clone(&transport), base_url, "access");

        let directory = DirectoryService::new(
            DirectoryConfig {
                pending_label: config.pending_state_label.clone(),
                ..DirectoryConfig::default()
            },
            Arc::clone(&users),
            devices_cache,
            access_cache,
            Arc::clone(&states),
            Arc::new(access_updates),
            Arc::clone(&notifier),
        );

        let route_guard = RouteGuard::new(
            RouteGuardConfig {
                entry_path: config.entry_path.clone(),
                landing_path: config.landing_path.clone(),
                ..RouteGuardConfig::default()
            },
            Arc::clone(&notifier),
        );

        Ok(Self {
            session: SessionService::new(
                Arc::new(JwtClaimsDecoder::new()),
                Arc::clone(&store),
                Arc::clone(&notifier),
            ),
            permissions: PermissionModel::new(catalog),
            route_guard,
            users,
            roles,
            software,
            states,
            devices: RestResource::new(Arc::clone(&transport), base_url, "devices"),
            directory,
            notifier,
        })
    }
}

// Each cache is named after the collection it mirrors.
fn lookup_cache<T>(
    collection: &str,
    transport: &Arc<dyn Transport>,
    base_url: &str,
    store: &Arc<dyn PersistenceStore>,
    notifier: &Arc<dyn Notifier>,
) -> Arc<LookupCache<T>>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    let source: Arc<dyn CollectionSource<T>> =
        Arc::new(RestResource::<T>::new(Arc::clone(transport), base_url, collection));
    Arc::new(LookupCache::new(
        collection,
        source,
        Arc::clone(store),
        Arc::clone(notifier),
    ))
}
