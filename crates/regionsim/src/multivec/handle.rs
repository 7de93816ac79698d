//! Shared store and scope-bound sequence handles.
//!
//! A `SeqHandle` owns exactly one sequence of a `SharedStore` and releases it
//! on drop. Every call resolves the sequence through its id under the lock, so
//! handles stay valid while other sequences grow or shrink.

use std::ops::Range;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::store::{MultiVecStore, SeqId};

/// Store shared between all handles carved out of it.
pub type SharedStore<T> = Arc<RwLock<MultiVecStore<T>>>;

/// Fresh empty shared store.
pub fn shared_store<T>() -> SharedStore<T> {
    Arc::new(RwLock::new(MultiVecStore::new()))
}

/// Owning view on one sequence of a shared store.
#[derive(Debug)]
pub struct SeqHandle<T> {
    store: SharedStore<T>,
    id: SeqId,
}

impl<T> SeqHandle<T> {
    /// Acquire a new empty sequence in `store`.
    pub fn acquire(store: &SharedStore<T>) -> Self {
        let id = write(store).acquire();
        Self {
            store: Arc::clone(store),
            id,
        }
    }

    /// Acquire a sequence pre-seeded with `values`.
    pub fn from_slice(store: &SharedStore<T>, values: &[T]) -> Self
    where
        T: Clone,
    {
        let h = Self::acquire(store);
        h.extend_from_slice(values);
        h
    }

    #[inline]
    pub fn id(&self) -> SeqId {
        self.id
    }

    pub fn store(&self) -> &SharedStore<T> {
        &self.store
    }

    /// Explicit release; equivalent to dropping the handle.
    pub fn release(self) {
        drop(self)
    }

    pub fn len(&self) -> usize {
        read(&self.store).len(self.id).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn span(&self) -> Range<usize> {
        read(&self.store).span(self.id).unwrap_or(0..0)
    }

    /// Run `f` on the sequence contents without copying.
    pub fn with_slice<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let guard = read(&self.store);
        f(guard.as_slice(self.id).unwrap_or(&[]))
    }

    /// Run `f` on the mutable sequence contents (no structural edits).
    pub fn with_mut_slice<R>(&self, f: impl FnOnce(&mut [T]) -> R) -> R {
        let mut guard = write(&self.store);
        match guard.as_mut_slice(self.id) {
            Some(s) => f(s),
            None => f(&mut []),
        }
    }

    pub fn get(&self, idx: usize) -> Option<T>
    where
        T: Clone,
    {
        read(&self.store).get(self.id, idx).cloned()
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.with_slice(|s| s.to_vec())
    }

    pub fn set(&self, idx: usize, value: T) -> bool {
        write(&self.store).set(self.id, idx, value)
    }

    pub fn insert(&self, pos: usize, value: T) -> bool {
        write(&self.store).insert(self.id, pos, value)
    }

    pub fn insert_slice(&self, pos: usize, values: &[T]) -> bool
    where
        T: Clone,
    {
        write(&self.store).insert_slice(self.id, pos, values)
    }

    pub fn push(&self, value: T) -> bool {
        write(&self.store).push(self.id, value)
    }

    pub fn extend_from_slice(&self, values: &[T]) -> bool
    where
        T: Clone,
    {
        write(&self.store).extend_from_slice(self.id, values)
    }

    pub fn pop(&self) -> Option<T> {
        write(&self.store).pop(self.id)
    }

    pub fn erase(&self, pos: usize) -> bool {
        write(&self.store).erase(self.id, pos)
    }

    pub fn erase_range(&self, pos: usize, count: usize) -> bool {
        write(&self.store).erase_range(self.id, pos, count)
    }

    pub fn clear(&self) -> bool {
        write(&self.store).clear(self.id)
    }
}

impl<T> Drop for SeqHandle<T> {
    fn drop(&mut self) {
        write(&self.store).release(self.id);
    }
}

// Spans are updated after each splice, so a poisoned store is still consistent.
fn read<T>(store: &SharedStore<T>) -> RwLockReadGuard<'_, MultiVecStore<T>> {
    store.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(store: &SharedStore<T>) -> RwLockWriteGuard<'_, MultiVecStore<T>> {
    store.write().unwrap_or_else(PoisonError::into_inner)
}
