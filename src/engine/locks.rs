use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Prune idle entries once the table grows past this many properties.
const PRUNE_THRESHOLD: usize = 1024;

/// One async mutex per property id.
///
/// Holding the guard serializes check-then-create sequences for that
/// property within this process. Other processes writing to the same store
/// are not covered.
#[derive(Default)]
pub struct PropertyLocks {
    table: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl PropertyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, property_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            if table.len() >= PRUNE_THRESHOLD {
                // an entry only the table references has no holder or waiter
                table.retain(|_, m| Arc::strong_count(m) > 1);
            }
            Arc::clone(
                table
                    .entry(property_id.to_string())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    pub fn tracked(&self) -> usize {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
