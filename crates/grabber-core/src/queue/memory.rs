//! In-memory target queue.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{Target, TargetId};

/// Shared FIFO of targets (insertion order = priority).
///
/// Design:
/// - The worker is the only writer: it peeks the head, attempts it, and pops
///   it only on a terminal outcome (`pop_front_if`). A retried target simply
///   stays at the head.
/// - Readers get a defensive copy (`snapshot`). The lock is never held across
///   an `.await`, so readers never wait on network I/O.
/// - Duplicates are allowed.
#[derive(Debug, Clone, Default)]
pub struct TargetQueue {
    inner: Arc<Mutex<VecDeque<Target>>>,
}

impl TargetQueue {
    pub fn new(targets: impl IntoIterator<Item = Target>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(targets.into_iter().collect())),
        }
    }

    // poison されても中身の VecDeque は常に整合している（各操作は 1 手で完結）
    fn lock(&self) -> MutexGuard<'_, VecDeque<Target>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clone of the head target, without removing it.
    pub fn peek_front(&self) -> Option<Target> {
        self.lock().front().cloned()
    }

    /// Remove the head only if it is still the target with `id`.
    ///
    /// Returns the removed target.
    pub fn pop_front_if(&self, id: TargetId) -> Option<Target> {
        let mut queue = self.lock();
        if queue.front().is_some_and(|t| t.id == id) {
            queue.pop_front()
        } else {
            None
        }
    }

    /// Point-in-time copy, head first.
    pub fn snapshot(&self) -> Vec<Target> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
