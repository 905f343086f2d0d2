//! Session-keyed cart store.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::carts::{
    errors::CartsServiceError,
    models::Cart,
    persistence::{CartPersistence, EphemeralCarts},
    session::SessionId,
};

#[derive(Debug, Default)]
struct SessionCart {
    cart: Cart,
    loaded: bool,
}

type SessionSlot = Arc<AsyncMutex<SessionCart>>;

type Sessions = Arc<Mutex<FxHashMap<SessionId, SessionSlot>>>;

/// Process-wide collection of carts keyed by session.
///
/// The outer map lock is held only long enough to find or create a session's
/// slot. Each slot carries its own async lock, held for the whole
/// read-modify-write of that session's cart. A slot whose cart is empty is
/// dropped once nothing holds or waits on it.
pub struct CartStore {
    sessions: Sessions,
    persistence: Arc<dyn CartPersistence>,
}

impl CartStore {
    #[must_use]
    pub fn new(persistence: Arc<dyn CartPersistence>) -> Self {
        Self {
            sessions: Arc::default(),
            persistence,
        }
    }

    /// A store whose carts live only as long as the process.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self::new(Arc::new(EphemeralCarts))
    }

    /// Take exclusive access to a session's cart, creating it on first use.
    ///
    /// Waits while another operation holds the same session. The cart is
    /// loaded from persistence the first time a session is seen.
    pub async fn lock(&self, session: &SessionId) -> Result<CartGuard, CartsServiceError> {
        let slot = {
            let mut sessions = self.sessions.lock();

            Arc::clone(sessions.entry(session.clone()).or_default())
        };

        let mut guard = CartGuard {
            session: session.clone(),
            slot: slot.lock_owned().await,
            sessions: Arc::clone(&self.sessions),
            persistence: Arc::clone(&self.persistence),
        };

        if !guard.slot.loaded {
            let lines = self.persistence.load(session).await?;

            guard.slot.cart = Cart::from_lines(lines);
            guard.slot.loaded = true;
        }

        Ok(guard)
    }

    /// Number of sessions currently holding a slot.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }
}

impl Debug for CartStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CartStore")
            .field("sessions", &self.session_count())
            .finish_non_exhaustive()
    }
}

/// Exclusive handle on one session's cart. Dropping it releases the session.
pub struct CartGuard {
    session: SessionId,
    slot: OwnedMutexGuard<SessionCart>,
    sessions: Sessions,
    persistence: Arc<dyn CartPersistence>,
}

impl CartGuard {
    #[must_use]
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.slot.cart
    }

    /// Persist `cart` and make it the session's current cart.
    ///
    /// When persisting fails the previous cart is kept.
    pub async fn replace(&mut self, cart: Cart) -> Result<Cart, CartsServiceError> {
        self.persistence.save(&self.session, cart.lines()).await?;

        self.slot.cart = cart;

        Ok(self.slot.cart.clone())
    }

    /// Empty the session's cart. Clearing an empty cart is a no-op.
    pub async fn clear(&mut self) -> Result<Cart, CartsServiceError> {
        if self.slot.cart.is_empty() {
            return Ok(Cart::new());
        }

        self.replace(Cart::new()).await
    }
}

impl Drop for CartGuard {
    fn drop(&mut self) {
        if !self.slot.cart.is_empty() {
            return;
        }

        let mut sessions = self.sessions.lock();
        let held = OwnedMutexGuard::mutex(&self.slot);

        // One reference from the map and one from this guard. Anything more
        // is a caller already waiting on the slot.
        let idle = sessions
            .get(&self.session)
            .is_some_and(|slot| Arc::ptr_eq(slot, held) && Arc::strong_count(slot) == 2);

        if idle {
            sessions.remove(&self.session);
        }
    }
}

impl Debug for CartGuard {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CartGuard")
            .field("session", &self.session)
            .field("cart", &self.slot.cart)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;
    use tokio::time;

    use crate::{
        domain::carts::{MockCartPersistence, models::Cart},
        test::fixtures::{product, snapshot_line},
    };

    use super::*;

    #[tokio::test]
    async fn first_lock_creates_an_empty_cart() -> TestResult {
        let store = CartStore::ephemeral();
        let guard = store.lock(&SessionId::generate()).await?;

        assert!(guard.cart().is_empty());
        assert_eq!(store.session_count(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn empty_carts_do_not_accumulate_sessions() -> TestResult {
        let store = CartStore::ephemeral();

        for _ in 0..100 {
            let guard = store.lock(&SessionId::generate()).await?;

            assert!(guard.cart().is_empty());
        }

        assert_eq!(store.session_count(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn cleared_cart_releases_its_session() -> TestResult {
        let store = CartStore::ephemeral();
        let session = SessionId::generate();
        let helmet = product("Helmet", 8_000, 10);

        {
            let mut guard = store.lock(&session).await?;
            let mut cart = guard.cart().clone();

            cart.merge(&helmet, 1)?;
            guard.replace(cart).await?;
        }

        assert_eq!(store.session_count(), 1);

        store.lock(&session).await?.clear().await?;

        assert_eq!(store.session_count(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn waiting_lock_keeps_an_empty_slot() -> TestResult {
        let store = Arc::new(CartStore::ephemeral());
        let session = SessionId::generate();
        let helmet = product("Helmet", 8_000, 10);

        let guard = store.lock(&session).await?;

        let contender = {
            let store = Arc::clone(&store);
            let session = session.clone();
            let helmet = helmet.clone();

            tokio::spawn(async move {
                let mut guard = store.lock(&session).await?;
                let mut cart = guard.cart().clone();

                cart.merge(&helmet, 1)?;
                guard.replace(cart).await?;

                Ok::<_, CartsServiceError>(())
            })
        };

        time::sleep(Duration::from_millis(50)).await;

        drop(guard);

        contender.await??;

        assert_eq!(store.session_count(), 1);
        assert_eq!(
            store.lock(&session).await?.cart().quantity_of(helmet.uuid),
            1
        );

        Ok(())
    }

    #[tokio::test]
    async fn replaced_cart_is_seen_by_the_next_lock() -> TestResult {
        let store = CartStore::ephemeral();
        let session = SessionId::generate();
        let helmet = product("Helmet", 8_000, 10);

        {
            let mut guard = store.lock(&session).await?;
            let mut cart = guard.cart().clone();

            cart.merge(&helmet, 2)?;
            guard.replace(cart).await?;
        }

        let guard = store.lock(&session).await?;

        assert_eq!(guard.cart().quantity_of(helmet.uuid), 2);

        Ok(())
    }

    #[tokio::test]
    async fn same_session_waits_for_the_holder() -> TestResult {
        let store = Arc::new(CartStore::ephemeral());
        let session = SessionId::generate();

        let guard = store.lock(&session).await?;

        let contender = {
            let store = Arc::clone(&store);
            let session = session.clone();

            tokio::spawn(async move { store.lock(&session).await.map(|_guard| ()) })
        };

        time::sleep(Duration::from_millis(50)).await;

        assert!(!contender.is_finished(), "second lock should be waiting");

        drop(guard);

        contender.await??;

        Ok(())
    }

    #[tokio::test]
    async fn different_sessions_do_not_block_each_other() -> TestResult {
        let store = CartStore::ephemeral();

        let _first = store.lock(&SessionId::generate()).await?;

        let second = time::timeout(
            Duration::from_millis(200),
            store.lock(&SessionId::generate()),
        )
        .await;

        assert!(second.is_ok(), "lock on another session should not wait");

        Ok(())
    }

    #[tokio::test]
    async fn persisted_lines_are_loaded_once() -> TestResult {
        let helmet = product("Helmet", 8_000, 10);
        let line = snapshot_line(&helmet, 3);

        let mut persistence = MockCartPersistence::new();

        persistence
            .expect_load()
            .once()
            .return_once(move |_| Ok(vec![line]));

        persistence.expect_save().never();

        let store = CartStore::new(Arc::new(persistence));
        let session = SessionId::generate();

        drop(store.lock(&session).await?);

        let guard = store.lock(&session).await?;

        assert_eq!(guard.cart().quantity_of(helmet.uuid), 3);
        assert_eq!(guard.cart().total(), 24_000);

        Ok(())
    }

    #[tokio::test]
    async fn failed_save_keeps_the_previous_cart() -> TestResult {
        let helmet = product("Helmet", 8_000, 10);

        let mut persistence = MockCartPersistence::new();

        persistence.expect_load().once().return_once(|_| Ok(vec![]));
        persistence
            .expect_save()
            .once()
            .return_once(|_, _| Err(sqlx::Error::PoolTimedOut));

        let store = CartStore::new(Arc::new(persistence));
        let mut guard = store.lock(&SessionId::generate()).await?;

        let mut cart = Cart::new();
        cart.merge(&helmet, 1)?;

        let result = guard.replace(cart).await;

        assert!(
            matches!(result, Err(CartsServiceError::Sql(_))),
            "expected Sql error, got {result:?}"
        );
        assert!(guard.cart().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn clearing_an_empty_cart_skips_persistence() -> TestResult {
        let mut persistence = MockCartPersistence::new();

        persistence.expect_load().once().return_once(|_| Ok(vec![]));
        persistence.expect_save().never();

        let store = CartStore::new(Arc::new(persistence));
        let mut guard = store.lock(&SessionId::generate()).await?;

        let cart = guard.clear().await?;

        assert!(cart.is_empty());

        Ok(())
    }
}
