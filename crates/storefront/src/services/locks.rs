//! Per-user locks over cart and checkout activity.
//!
//! Checkout for a given user must be serialized with respect to itself
//! and with respect to cart mutations for that user; checkouts for
//! different users proceed in parallel. A keyed map of async mutexes
//! gives exactly that: at-most-one in-flight cart-or-checkout operation
//! per user, no contention across users.

use std::collections::HashMap;
use std::sync::Arc;

use copperleaf_core::UserId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Keyed per-user locks. Cheap to clone; clones share the same lock map.
#[derive(Debug, Clone, Default)]
pub struct UserLocks {
    inner: Arc<Mutex<HashMap<UserId, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a user, waiting for any in-flight cart
    /// mutation or checkout for the same user to finish first.
    ///
    /// The guard is owned, so it can be held across awaits for the whole
    /// duration of a multi-step operation.
    pub async fn acquire(&self, user_id: UserId) -> OwnedMutexGuard<()> {
        let entry = {
            let mut map = self.inner.lock().await;
            Arc::clone(map.entry(user_id).or_default())
        };
        entry.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn same_user_is_mutually_exclusive() {
        let locks = UserLocks::new();
        let user = UserId::new(1);

        let guard = locks.acquire(user).await;

        let contender = locks.clone();
        let blocked = tokio::spawn(async move { contender.acquire(user).await });

        // The second acquire must not complete while the guard is held.
        assert!(
            timeout(Duration::from_millis(50), locks.acquire(user)).await.is_err()
        );

        drop(guard);
        blocked.await.expect("task should finish");
    }

    #[tokio::test]
    async fn different_users_do_not_contend() {
        let locks = UserLocks::new();
        let _one = locks.acquire(UserId::new(1)).await;

        // A different user's lock is immediately available.
        timeout(Duration::from_millis(50), locks.acquire(UserId::new(2)))
            .await
            .expect("no contention across users");
    }
}
