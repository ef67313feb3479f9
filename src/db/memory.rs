use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;

use super::{creation_timestamp, EstimateStore};
use crate::models::*;

/// Process-local estimate store.
///
/// The id counter and the records live behind one mutex, so id assignment
/// and insertion happen as a unit. Clones share the same underlying state.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    next_id: i64,
    estimates: BTreeMap<i64, Estimate>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                next_id: 1,
                estimates: BTreeMap::new(),
            })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| anyhow::anyhow!("estimate store lock poisoned"))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EstimateStore for MemoryStore {
    fn create_estimate(&self, input: NewEstimate) -> Result<Estimate> {
        let mut inner = self.lock()?;

        let id = inner.next_id;
        inner.next_id += 1;

        let estimate = Estimate {
            id,
            data: input,
            created_at: creation_timestamp(),
        };
        inner.estimates.insert(id, estimate.clone());

        tracing::info!(id, project = %estimate.data.project_name, "Created estimate");
        Ok(estimate)
    }

    fn get_estimate(&self, id: i64) -> Result<Option<Estimate>> {
        Ok(self.lock()?.estimates.get(&id).cloned())
    }

    fn get_all_estimates(&self) -> Result<Vec<Estimate>> {
        let mut estimates: Vec<Estimate> = self.lock()?.estimates.values().cloned().collect();
        estimates.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(estimates)
    }
}
