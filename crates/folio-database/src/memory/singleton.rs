//! In-memory singleton store.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use folio_core::result::AppResult;
use folio_entity::settings::{Singleton, SingletonEntity};

use crate::store::SingletonStore;

/// Keeps singleton rows in a vector guarded by one async mutex, so the
/// check-then-insert of first creation is atomic.
#[derive(Debug)]
pub struct MemorySingletonStore<T> {
    rows: Mutex<Vec<Singleton<T>>>,
}

impl<T: SingletonEntity> Default for MemorySingletonStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SingletonEntity> MemorySingletonStore<T> {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }

    /// A store preloaded with rows, e.g. duplicates left by manual edits.
    pub fn with_rows(rows: Vec<Singleton<T>>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Number of stored rows.
    pub async fn row_count(&self) -> usize {
        self.rows.lock().await.len()
    }
}

/// Index of the earliest-created row, ties broken by id; creates one if empty.
fn earliest_or_insert<T: SingletonEntity>(rows: &mut Vec<Singleton<T>>) -> usize {
    if rows.is_empty() {
        rows.push(Singleton::with_defaults(Utc::now()));
        return 0;
    }
    let mut best = 0;
    for (i, row) in rows.iter().enumerate().skip(1) {
        let current = &rows[best];
        if (row.created_at, row.id) < (current.created_at, current.id) {
            best = i;
        }
    }
    best
}

#[async_trait]
impl<T: SingletonEntity> SingletonStore<T> for MemorySingletonStore<T> {
    async fn get_or_create(&self) -> AppResult<Singleton<T>> {
        let mut rows = self.rows.lock().await;
        let idx = earliest_or_insert(&mut rows);
        Ok(rows[idx].clone())
    }

    async fn replace(&self, value: T) -> AppResult<Singleton<T>> {
        let mut rows = self.rows.lock().await;
        let idx = earliest_or_insert(&mut rows);
        let row = &mut rows[idx];
        row.value = value;
        row.updated_at = Utc::now().max(row.created_at);
        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use folio_entity::settings::SystemSetting;

    use super::*;

    #[tokio::test]
    async fn test_concurrent_first_access_creates_one_row() {
        let store = Arc::new(MemorySingletonStore::<SystemSetting>::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.get_or_create().await.unwrap().id })
            })
            .collect();
        let ids: Vec<_> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(store.row_count().await, 1);
    }

    #[tokio::test]
    async fn test_every_record_type_behind_trait_object() {
        use folio_entity::settings::{AboutContent, ContactSetting};

        let contact: Arc<dyn SingletonStore<ContactSetting>> =
            Arc::new(MemorySingletonStore::<ContactSetting>::new());
        let about: Arc<dyn SingletonStore<AboutContent>> =
            Arc::new(MemorySingletonStore::<AboutContent>::new());

        assert!(format!("{contact:?}").contains("MemorySingletonStore"));
        let first = contact.get_or_create().await.unwrap();
        assert_eq!(contact.get_or_create().await.unwrap().id, first.id);
        assert_eq!(about.get_or_create().await.unwrap().value, AboutContent::default());
    }

    #[tokio::test]
    async fn test_duplicate_rows_resolve_to_earliest() {
        let now = Utc::now();
        let older = Singleton::<SystemSetting>::with_defaults(now - Duration::seconds(10));
        let newer = Singleton::<SystemSetting>::with_defaults(now);
        let store = MemorySingletonStore::with_rows(vec![newer, older.clone()]);

        assert_eq!(store.get_or_create().await.unwrap().id, older.id);
        let replaced = store
            .replace(SystemSetting {
                site_name: "Edited".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(replaced.id, older.id);
        assert_eq!(store.row_count().await, 2);
    }

    #[tokio::test]
    async fn test_replace_without_row_creates_exactly_one() {
        let store = MemorySingletonStore::<SystemSetting>::new();
        let replaced = store.replace(SystemSetting::default()).await.unwrap();
        assert_eq!(store.row_count().await, 1);
        assert!(replaced.updated_at >= replaced.created_at);
    }
}
