//! The three settings singletons and the cached public projection.

use tracing::warn;

use folio_cache::{CacheManager, keys};
use folio_core::result::AppResult;
use folio_core::traits::cache::CacheProvider;
use folio_database::Stores;
use folio_entity::settings::{AboutContent, ContactSetting, Singleton, SystemInfo, SystemSetting};

use crate::singleton::SingletonService;

/// Groups the settings singletons and keeps the public system info cache
/// coherent with writes.
#[derive(Debug, Clone)]
pub struct SettingsService {
    system: SingletonService<SystemSetting>,
    contact: SingletonService<ContactSetting>,
    about: SingletonService<AboutContent>,
    cache: CacheManager,
}

impl SettingsService {
    /// Creates the service over the configured stores.
    pub fn new(stores: &Stores, cache: CacheManager) -> Self {
        Self {
            system: SingletonService::new(stores.system_settings.clone()),
            contact: SingletonService::new(stores.contact_settings.clone()),
            about: SingletonService::new(stores.about_content.clone()),
            cache,
        }
    }

    pub fn system(&self) -> &SingletonService<SystemSetting> {
        &self.system
    }

    pub fn contact(&self) -> &SingletonService<ContactSetting> {
        &self.contact
    }

    pub fn about(&self) -> &SingletonService<AboutContent> {
        &self.about
    }

    /// Replaces the system settings and drops the cached projection.
    pub async fn replace_system(&self, value: SystemSetting) -> AppResult<Singleton<SystemSetting>> {
        let row = self.system.replace(value).await?;
        if let Err(e) = self.cache.delete(&keys::system_info()).await {
            warn!(error = %e, "Failed to invalidate cached system info");
        }
        Ok(row)
    }

    /// Public projection of the system settings, served from cache when
    /// possible. Cache failures fall back to the store.
    pub async fn system_info(&self) -> AppResult<SystemInfo> {
        let key = keys::system_info();
        match self.cache.get_json::<SystemInfo>(&key).await {
            Ok(Some(info)) => return Ok(info),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "System info cache read failed"),
        }

        let row = self.system.get().await?;
        let info = SystemInfo::from(&row.value);
        if let Err(e) = self.cache.set_json(&key, &info).await {
            warn!(error = %e, "System info cache write failed");
        }
        Ok(info)
    }
}
