//! Copy-on-write snapshot cell.
//!
//! Readers take an `Arc` of the current value and never block on writers.
//! Writers are serialized by an async mutex, build the next value in a
//! [`Draft`], and publish it with [`Draft::commit`]. Dropping a draft
//! without committing discards it, which is how a failed persist leaves the
//! visible state untouched.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug)]
pub struct SnapshotCell<S> {
    current: RwLock<Arc<S>>,
    writer: Mutex<()>,
}

impl<S: Clone> SnapshotCell<S> {
    pub fn new(value: S) -> Self {
        Self {
            current: RwLock::new(Arc::new(value)),
            writer: Mutex::new(()),
        }
    }

    /// The currently published value.
    pub fn load(&self) -> Arc<S> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Take the writer lock and start a draft from the current value.
    pub async fn begin(&self) -> Draft<'_, S> {
        let guard = self.writer.lock().await;
        let value = S::clone(&self.load());
        Draft {
            cell: self,
            value,
            _guard: guard,
        }
    }

    fn publish(&self, value: S) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(value);
    }
}

/// A pending write. Holds the writer lock until committed or dropped.
pub struct Draft<'a, S: Clone> {
    cell: &'a SnapshotCell<S>,
    value: S,
    _guard: MutexGuard<'a, ()>,
}

impl<S: Clone> Draft<'_, S> {
    /// Publish the draft to readers.
    pub fn commit(self) {
        self.cell.publish(self.value);
    }
}

impl<S: Clone> Deref for Draft<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.value
    }
}

impl<S: Clone> DerefMut for Draft<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_commit_publishes() {
        let cell = SnapshotCell::new(vec![1]);
        let mut draft = cell.begin().await;
        draft.push(2);
        assert_eq!(*cell.load(), vec![1]);
        draft.commit();
        assert_eq!(*cell.load(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_dropped_draft_is_discarded() {
        let cell = SnapshotCell::new(vec![1]);
        {
            let mut draft = cell.begin().await;
            draft.clear();
        }
        assert_eq!(*cell.load(), vec![1]);
    }

    #[tokio::test]
    async fn test_readers_keep_their_snapshot() {
        let cell = SnapshotCell::new(String::from("before"));
        let seen = cell.load();
        let mut draft = cell.begin().await;
        *draft = String::from("after");
        draft.commit();
        assert_eq!(seen.as_str(), "before");
        assert_eq!(cell.load().as_str(), "after");
    }
}
