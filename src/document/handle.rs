//! Memoized document-store client.
//!
//! The only state shared across requests. The client is connected lazily on
//! first use and dropped on [`StoreHandle::reset`] (e.g. after the backend
//! reports it unavailable), so the next request reconnects.

use std::sync::Arc;

use parking_lot::Mutex;

use super::StoreError;

type Connect<S> = Box<dyn Fn() -> Result<Arc<S>, StoreError> + Send + Sync>;

pub struct StoreHandle<S> {
    slot: Mutex<Option<Arc<S>>>,
    connect: Connect<S>,
}

impl<S> StoreHandle<S> {
    pub fn new(connect: impl Fn() -> Result<S, StoreError> + Send + Sync + 'static) -> Self {
        Self {
            slot: Mutex::new(None),
            connect: Box::new(move || connect().map(Arc::new)),
        }
    }

    /// Get the client, connecting if absent.
    ///
    /// A failed connect leaves the slot empty so the next call retries.
    pub fn get(&self) -> Result<Arc<S>, StoreError> {
        let mut slot = self.slot.lock();
        if let Some(store) = slot.as_ref() {
            return Ok(Arc::clone(store));
        }
        let store = (self.connect)()?;
        *slot = Some(Arc::clone(&store));
        Ok(store)
    }

    /// Drop the memoized client.
    pub fn reset(&self) {
        self.slot.lock().take();
    }

    pub fn is_connected(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl<S> std::fmt::Debug for StoreHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("connected", &self.is_connected())
            .finish()
    }
}
