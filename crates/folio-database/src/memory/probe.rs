//! In-memory database probe.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use folio_core::AppError;
use folio_core::result::AppResult;

use crate::store::DatabaseProbe;

/// Always reachable unless switched off; size is unknown.
#[derive(Debug)]
pub struct MemoryDatabaseProbe {
    available: AtomicBool,
}

impl Default for MemoryDatabaseProbe {
    fn default() -> Self {
        Self {
            available: AtomicBool::new(true),
        }
    }
}

impl MemoryDatabaseProbe {
    /// A reachable probe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the database going away or coming back.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

#[async_trait]
impl DatabaseProbe for MemoryDatabaseProbe {
    async fn ping(&self) -> AppResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::persistence("Database unavailable"))
        }
    }

    async fn database_size(&self) -> AppResult<Option<String>> {
        Ok(None)
    }
}
