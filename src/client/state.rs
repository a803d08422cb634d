use std::sync::{PoisonError, RwLock};

use crate::error::SwotError;

/// Snapshot of one store: the cached records plus request status.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

/// Lock around a [`StoreState`]. A poisoned lock is recovered, since the
/// state is always left consistent between statements.
pub(crate) struct StateCell<T> {
    state: RwLock<StoreState<T>>,
}

impl<T: Clone> StateCell<T> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
        }
    }

    pub fn snapshot(&self) -> StoreState<T> {
        self.read(|s| s.clone())
    }

    pub fn read<R>(&self, f: impl FnOnce(&StoreState<T>) -> R) -> R {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut StoreState<T>) -> R) -> R {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Mark a request as started.
    pub fn begin(&self) {
        self.write(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    /// Apply a successful response to the cache.
    pub fn finish<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        self.write(|s| {
            s.loading = false;
            f(&mut s.items)
        })
    }

    /// Record a failed request, leaving the cache as it was.
    pub fn fail(&self, context: &str, err: SwotError) -> SwotError {
        tracing::warn!(error = %err, "{}", context);
        self.write(|s| {
            s.loading = false;
            s.error = Some(format!("{}: {}", context, err));
        });
        err
    }
}
