// storefront/src/services/cart_store.rs

//! Per-session carts and checkout wizards, held in process memory.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use horas_core::{Cart, CheckoutWizard};

pub const CART_NOT_FOUND: &str = "Cart not found. Create a cart with POST /api/v1/cart first.";

/// What one shopper has in flight: the cart and, once started, the checkout.
#[derive(Debug, Clone, Default)]
pub struct ShopperSession {
  pub cart: Cart,
  pub checkout: Option<CheckoutWizard>,
}

#[derive(Debug)]
struct Entry {
  session: ShopperSession,
  touched: Instant,
}

/// Sessions are opened only by [`CartStore::create`]. Any other access to an
/// unknown or idle-expired id is a `NotFound`; expired entries are swept
/// whenever a new session is opened.
#[derive(Debug)]
pub struct CartStore {
  sessions: RwLock<HashMap<Uuid, Entry>>,
  idle_ttl: Duration,
}

impl CartStore {
  pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
    CartStore {
      sessions: RwLock::new(HashMap::new()),
      idle_ttl,
    }
  }

  /// Opens an empty session and returns its id.
  pub fn create(&self) -> Uuid {
    let id = Uuid::new_v4();
    let mut sessions = self.sessions.write();
    let before = sessions.len();
    sessions.retain(|_, entry| entry.touched.elapsed() < self.idle_ttl);
    let swept = before - sessions.len();
    sessions.insert(
      id,
      Entry {
        session: ShopperSession::default(),
        touched: Instant::now(),
      },
    );
    tracing::debug!(session_id = %id, swept, "Cart session created.");
    id
  }

  /// Copy of the session.
  pub fn snapshot(&self, id: &Uuid) -> Result<ShopperSession> {
    self
      .sessions
      .read()
      .get(id)
      .filter(|entry| entry.touched.elapsed() < self.idle_ttl)
      .map(|entry| entry.session.clone())
      .ok_or_else(|| AppError::NotFound(CART_NOT_FOUND.to_string()))
  }

  /// Runs `f` against a live session under the write lock and marks it as
  /// touched. `f` must not block.
  pub fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut ShopperSession) -> Result<R>) -> Result<R> {
    let mut sessions = self.sessions.write();
    let expired = match sessions.get(&id) {
      Some(entry) => entry.touched.elapsed() >= self.idle_ttl,
      None => return Err(AppError::NotFound(CART_NOT_FOUND.to_string())),
    };
    if expired {
      sessions.remove(&id);
      tracing::debug!(session_id = %id, "Idle cart session dropped.");
      return Err(AppError::NotFound(CART_NOT_FOUND.to_string()));
    }
    match sessions.get_mut(&id) {
      Some(entry) => {
        entry.touched = Instant::now();
        f(&mut entry.session)
      }
      None => Err(AppError::NotFound(CART_NOT_FOUND.to_string())),
    }
  }

  pub fn len(&self) -> usize {
    self.sessions.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.sessions.read().is_empty()
  }
}
