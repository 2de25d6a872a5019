//! PIN storage seam for single-PIN creation.
//!
//! The generator never talks to a database directly. It receives a
//! [`PinStore`] and asks it whether a candidate is already in use, or (for
//! claim-based creation) asks it to record the candidate atomically. The
//! production service wires in its database; [`InMemoryPinStore`] backs the
//! CLI and the tests.
use std::collections::HashSet;
use std::fmt;

use async_trait::async_trait;
use parking_lot::Mutex;

/// Errors reported by a [`PinStore`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not answer the lookup.
    Backend {
        /// Human-readable description from the backend.
        detail: String,
    },
    /// The store only answers existence checks and cannot claim PINs.
    ClaimUnsupported,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend { detail } => write!(f, "PIN store lookup failed: {detail}"),
            Self::ClaimUnsupported => f.write_str("PIN store does not support claiming PINs"),
        }
    }
}

impl std::error::Error for StoreError {}

/// The set of live PINs, as seen by the generator.
#[async_trait]
pub trait PinStore: Send + Sync {
    /// Returns `true` when `pin` is already held by a live record.
    async fn exists(&self, pin: &str) -> Result<bool, StoreError>;

    /// Atomically records `pin` as live if nobody holds it yet.
    ///
    /// Returns `true` when this call won the PIN and `false` when it was
    /// already taken. Stores backed by a unique constraint implement this as
    /// an insert that reports a constraint violation as `false`.
    async fn claim(&self, _pin: &str) -> Result<bool, StoreError> {
        Err(StoreError::ClaimUnsupported)
    }
}

/// A process-local [`PinStore`] over a mutex-guarded set.
#[derive(Debug, Default)]
pub struct InMemoryPinStore {
    pins: Mutex<HashSet<String>>,
}

impl InMemoryPinStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `pins`.
    pub fn with_pins<I, S>(pins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pins: Mutex::new(pins.into_iter().map(Into::into).collect()),
        }
    }

    /// Number of live PINs.
    pub fn len(&self) -> usize {
        self.pins.lock().len()
    }

    /// Returns `true` when no PIN is live.
    pub fn is_empty(&self) -> bool {
        self.pins.lock().is_empty()
    }

    /// Returns `true` when `pin` is live.
    pub fn contains(&self, pin: &str) -> bool {
        self.pins.lock().contains(pin)
    }

    /// Expires `pin`, releasing its value for reuse. Returns `false` if it
    /// was not live.
    pub fn expire(&self, pin: &str) -> bool {
        self.pins.lock().remove(pin)
    }
}

#[async_trait]
impl PinStore for InMemoryPinStore {
    async fn exists(&self, pin: &str) -> Result<bool, StoreError> {
        Ok(self.contains(pin))
    }

    async fn claim(&self, pin: &str) -> Result<bool, StoreError> {
        Ok(self.pins.lock().insert(pin.to_owned()))
    }
}
