//! Singleton record repository.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::debug;
use uuid::Uuid;

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_entity::settings::{Singleton, SingletonEntity};

use crate::store::SingletonStore;

type SingletonRow<T> = (Uuid, Json<T>, DateTime<Utc>, DateTime<Utc>);

/// Stores `T` as one JSONB document in `T::TABLE`.
///
/// The table's `singleton_key` column is `UNIQUE` and can only be `TRUE`,
/// so `INSERT .. ON CONFLICT DO NOTHING` makes first creation race-safe.
#[derive(Debug)]
pub struct SingletonRepository<T> {
    pool: PgPool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for SingletonRepository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: SingletonEntity> SingletonRepository<T> {
    /// Create a new singleton repository.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    async fn earliest(&self) -> AppResult<Option<Singleton<T>>> {
        let sql = format!(
            "SELECT id, data, created_at, updated_at FROM {} ORDER BY created_at ASC, id ASC LIMIT 1",
            T::TABLE
        );
        let row: Option<SingletonRow<T>> = sqlx::query_as(&sql)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Persistence,
                    format!("Failed to read {}", T::KIND),
                    e,
                )
            })?;
        Ok(row.map(into_singleton))
    }
}

fn into_singleton<T>((id, Json(value), created_at, updated_at): SingletonRow<T>) -> Singleton<T> {
    Singleton {
        id,
        value,
        created_at,
        updated_at,
    }
}

#[async_trait]
impl<T: SingletonEntity> SingletonStore<T> for SingletonRepository<T> {
    async fn get_or_create(&self) -> AppResult<Singleton<T>> {
        if let Some(existing) = self.earliest().await? {
            return Ok(existing);
        }

        let sql = format!(
            "INSERT INTO {} (id, data) VALUES ($1, $2) ON CONFLICT (singleton_key) DO NOTHING",
            T::TABLE
        );
        let inserted = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(Json(T::default()))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Persistence,
                    format!("Failed to create {}", T::KIND),
                    e,
                )
            })?;
        debug!(
            kind = T::KIND,
            created = inserted.rows_affected() == 1,
            "Singleton initialised"
        );

        self.earliest().await?.ok_or_else(|| {
            AppError::persistence(format!("{} vanished after creation", T::KIND))
        })
    }

    async fn replace(&self, value: T) -> AppResult<Singleton<T>> {
        let current = self.get_or_create().await?;
        let sql = format!(
            "UPDATE {} SET data = $1, updated_at = GREATEST(clock_timestamp(), created_at) \
             WHERE id = $2 RETURNING id, data, created_at, updated_at",
            T::TABLE
        );
        let row: SingletonRow<T> = sqlx::query_as(&sql)
            .bind(Json(value))
            .bind(current.id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Persistence,
                    format!("Failed to update {}", T::KIND),
                    e,
                )
            })?;
        Ok(into_singleton(row))
    }
}
