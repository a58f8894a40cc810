//! # In-Memory Store
//!
//! Thread-safe, cloneable map keyed by [`ReceiverId`], backing the in-memory
//! repository.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use pix_core::ReceiverId;

/// Cloneable handle to a shared map of records.
///
/// The lock is `parking_lot`, never held across `.await`, and does not
/// poison on panic.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<ReceiverId, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert only if the key is absent. Returns `false` when it was taken.
    pub fn insert_new(&self, id: ReceiverId, value: T) -> bool {
        let mut guard = self.data.write();
        if guard.contains_key(&id) {
            return false;
        }
        guard.insert(id, value);
        true
    }

    pub fn get(&self, id: &ReceiverId) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Replace an existing record. Returns `false` if the key is absent.
    pub fn replace(&self, id: &ReceiverId, value: T) -> bool {
        match self.data.write().get_mut(id) {
            Some(entry) => {
                *entry = value;
                true
            }
            None => false,
        }
    }

    /// Remove every listed key under one write lock. Returns how many existed.
    pub fn remove_many(&self, ids: &[ReceiverId]) -> usize {
        let mut guard = self.data.write();
        ids.iter().filter(|id| guard.remove(*id).is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}
