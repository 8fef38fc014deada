//! Generic service over singleton configuration records.

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use folio_core::result::AppResult;
use folio_database::store::SingletonStore;
use folio_entity::settings::{Singleton, SingletonEntity};

/// Reads and replaces the single row of `T`.
pub struct SingletonService<T: SingletonEntity> {
    store: Arc<dyn SingletonStore<T>>,
}

impl<T: SingletonEntity> Clone for SingletonService<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<T: SingletonEntity> std::fmt::Debug for SingletonService<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingletonService")
            .field("kind", &T::KIND)
            .field("store", &self.store)
            .finish()
    }
}

impl<T: SingletonEntity> SingletonService<T> {
    /// Creates a new singleton service.
    pub fn new(store: Arc<dyn SingletonStore<T>>) -> Self {
        Self { store }
    }

    /// Returns the record, creating it from defaults on first access.
    pub async fn get(&self) -> AppResult<Singleton<T>> {
        self.store.get_or_create().await
    }

    /// Validates `value` and overwrites the record with it.
    ///
    /// Identity and `created_at` are preserved. Fails with a validation
    /// error listing every offending field, in which case the stored row
    /// is untouched.
    pub async fn replace(&self, mut value: T) -> AppResult<Singleton<T>> {
        value.normalize();
        value.validate()?;

        let row = self.store.replace(value).await?;
        info!(kind = T::KIND, id = %row.id, "Replaced singleton record");
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use folio_core::error::ErrorKind;
    use folio_database::memory::MemorySingletonStore;
    use folio_entity::settings::{AboutContent, SystemSetting};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
    struct Branding {
        #[validate(length(min = 1))]
        site_name: String,
    }

    impl Default for Branding {
        fn default() -> Self {
            Self {
                site_name: "X".to_string(),
            }
        }
    }

    impl SingletonEntity for Branding {
        const KIND: &'static str = "branding";
        const TABLE: &'static str = "branding";
    }

    fn service<T: SingletonEntity>() -> (Arc<MemorySingletonStore<T>>, SingletonService<T>) {
        let store = Arc::new(MemorySingletonStore::<T>::new());
        (store.clone(), SingletonService::new(store))
    }

    #[tokio::test]
    async fn test_concurrent_first_access_creates_one_row() {
        let (store, svc) = service::<Branding>();

        let (a, b) = tokio::join!(svc.get(), svc.get());
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a.id, b.id);
        assert_eq!(a.value.site_name, "X");
        assert_eq!(b.value.site_name, "X");
        assert_eq!(store.row_count().await, 1);
    }

    #[tokio::test]
    async fn test_replace_keeps_identity() {
        let (store, svc) = service::<SystemSetting>();
        let original = svc.get().await.unwrap();

        let mut value = original.value.clone();
        value.site_name = "Renamed".to_string();
        let updated = svc.replace(value).await.unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
        assert_eq!(svc.get().await.unwrap().value.site_name, "Renamed");
        assert_eq!(store.row_count().await, 1);
    }

    #[tokio::test]
    async fn test_replace_before_get_creates_single_row() {
        let (store, svc) = service::<SystemSetting>();
        let mut value = SystemSetting::default();
        value.maintenance_mode = true;
        let row = svc.replace(value).await.unwrap();

        assert!(row.value.maintenance_mode);
        assert_eq!(store.row_count().await, 1);
    }

    #[tokio::test]
    async fn test_invalid_value_rejected_and_row_untouched() {
        let (_, svc) = service::<SystemSetting>();
        let before = svc.get().await.unwrap();

        let mut value = before.value.clone();
        value.contact_email = "not-an-email".to_string();
        let err = svc.replace(value).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
        let fields: Vec<String> = err.field_errors().into_iter().map(|f| f.field).collect();
        assert_eq!(fields, vec!["contact_email".to_string()]);
        assert_eq!(svc.get().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_replace_normalizes_derived_fields() {
        let (_, svc) = service::<AboutContent>();
        let mut value = AboutContent::default();
        value.name = "Ada".to_string();
        value.title = "Engineer".to_string();
        value.meta_title = String::new();

        let row = svc.replace(value).await.unwrap();
        assert_eq!(row.value.meta_title, "Ada - Engineer");
    }
}
