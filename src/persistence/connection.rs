//! Lazily established, shared store connection.
//!
//! [`LazyConnection`] owns a connector, the established handle once there
//! is one, and the connect attempt currently in flight. The first caller of
//! [`LazyConnection::get`] starts an attempt; every caller arriving while it
//! runs awaits that same attempt and receives its outcome, success or
//! error. A successful handle is cached for the life of the value. A failed
//! attempt is dropped once it settles, so the next fresh call starts over.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use futures_util::future::Shared;
use tokio::sync::OnceCell;

use crate::error::GatewayError;

/// Boxed connect attempt produced by a connector.
pub type ConnectFuture<T> = Pin<Box<dyn Future<Output = Result<T, GatewayError>> + Send>>;

type Connector<T> = Box<dyn Fn() -> ConnectFuture<T> + Send + Sync>;

type Attempt<T> = Shared<ConnectFuture<T>>;

/// Shared handle to a store connection that is opened on first use.
pub struct LazyConnection<T> {
    cell: OnceCell<T>,
    in_flight: Mutex<Option<Attempt<T>>>,
    connector: Connector<T>,
}

impl<T> LazyConnection<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an unconnected handle that will call `connector` on first
    /// use (and again after a failed attempt).
    #[must_use]
    pub fn new<F, Fut>(connector: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, GatewayError>> + Send + 'static,
    {
        Self {
            cell: OnceCell::new(),
            in_flight: Mutex::new(None),
            connector: Box::new(move || -> ConnectFuture<T> { Box::pin(connector()) }),
        }
    }

    /// Returns the connection, establishing it if necessary.
    ///
    /// # Errors
    ///
    /// Returns the connector's error (normally
    /// [`GatewayError::Connection`]) to every caller that awaited the
    /// failed attempt. Nothing is cached on failure.
    pub async fn get(&self) -> Result<&T, GatewayError> {
        if let Some(handle) = self.cell.get() {
            return Ok(handle);
        }

        let attempt = {
            let mut slot = self.lock_in_flight();
            if let Some(handle) = self.cell.get() {
                return Ok(handle);
            }
            match slot.as_ref() {
                Some(attempt) => attempt.clone(),
                None => {
                    tracing::debug!("opening store connection");
                    let attempt = (self.connector)().shared();
                    *slot = Some(attempt.clone());
                    attempt
                }
            }
        };

        let outcome = attempt.clone().await;
        if let Ok(handle) = &outcome {
            // Filled before the attempt is released.
            let _ = self.cell.set(handle.clone());
        }
        self.release(&attempt, &outcome);

        if let Err(e) = outcome {
            return Err(e);
        }
        self.cell.get().ok_or_else(|| {
            GatewayError::Internal("store connection vanished after connect".to_string())
        })
    }

    #[cfg(test)]
    pub(crate) fn is_established(&self) -> bool {
        self.cell.initialized()
    }

    /// Clears the in-flight slot if it still holds `attempt`.
    fn release(&self, attempt: &Attempt<T>, outcome: &Result<T, GatewayError>) {
        let mut slot = self.lock_in_flight();
        if slot
            .as_ref()
            .is_some_and(|current| Shared::ptr_eq(current, attempt))
        {
            *slot = None;
            if let Err(e) = outcome {
                tracing::warn!(error = %e, "store connection attempt failed");
            }
        }
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<Attempt<T>>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> fmt::Debug for LazyConnection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyConnection")
            .field("established", &self.cell.initialized())
            .finish_non_exhaustive()
    }
}
