//! PIN generation.
//!
//! Two entry points cover the two ways PINs are issued:
//!
//! - [`create_batch`] builds the initial set of PINs in memory. Uniqueness is
//!   tracked by a set owned by the call, and the request is rejected up front
//!   when the keyspace is smaller than the quantity.
//! - [`create_pin`] and [`create_and_claim_pin`] issue one PIN against the
//!   live records behind a [`PinStore`], retrying at most
//!   [`MAX_SINGLE_PIN_ATTEMPTS`] times before giving up.
//!
//! [`create_pin`] only asks the store whether a candidate exists, so two
//! concurrent callers can both be told a candidate is free. Callers that
//! need a hard guarantee use [`create_and_claim_pin`], which lets the store
//! insert the candidate atomically.
use std::collections::HashSet;
use std::fmt;

use tracing::{debug, warn};

use crate::store::{PinStore, StoreError};

mod alphabet;
mod random;

pub use alphabet::{Alphabet, LOWERCASE_ALPHABET, UPPERCASE_ALPHABET};

/// PIN length used when the caller does not choose one.
pub const DEFAULT_PIN_LENGTH: usize = 8;

/// Attempts made by single-PIN creation before reporting exhaustion.
pub const MAX_SINGLE_PIN_ATTEMPTS: usize = 20;

/// Upper bound on the storage reserved up front by [`create_batch`].
const MAX_PREALLOCATED_PINS: usize = 1 << 16;

// ---------------------------------------------------------------------------
// PinError
// ---------------------------------------------------------------------------

/// Errors produced while generating PINs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinError {
    /// The requested PIN length was zero.
    InvalidLength,
    /// The requested batch quantity was zero.
    InvalidQuantity,
    /// Single-PIN creation was given an alphabet with no characters.
    EmptyAlphabet,
    /// `alphabet_size ^ length` is smaller than the requested quantity.
    GuaranteedRepeats {
        /// Number of PINs requested.
        quantity: usize,
        /// Distinct characters available.
        alphabet_size: usize,
        /// Requested PIN length.
        length: usize,
    },
    /// Every single-PIN candidate collided with a live PIN.
    RetriesExhausted {
        /// Number of candidates tried.
        attempts: usize,
    },
    /// The platform CSPRNG failed.
    CsprngFailure(String),
    /// The PIN store could not answer.
    Store(StoreError),
}

impl PinError {
    /// Returns `true` for errors caused by out-of-bounds caller parameters or
    /// an exhausted keyspace, as opposed to infrastructure failures.
    pub fn is_range_error(&self) -> bool {
        match self {
            Self::InvalidLength
            | Self::InvalidQuantity
            | Self::EmptyAlphabet
            | Self::GuaranteedRepeats { .. }
            | Self::RetriesExhausted { .. } => true,
            Self::CsprngFailure(_) | Self::Store(_) => false,
        }
    }
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength => f.write_str("PIN must be of length 1 or greater"),
            Self::InvalidQuantity => f.write_str("Quantity must be greater than 0"),
            Self::EmptyAlphabet => f.write_str("Allowed characters must not be empty"),
            Self::GuaranteedRepeats {
                quantity,
                alphabet_size,
                length,
            } => write!(
                f,
                "Cannot create {quantity} PINs of length {length} from {alphabet_size} \
                 characters: guaranteed repeats"
            ),
            Self::RetriesExhausted { attempts } => write!(
                f,
                "Could not find an unused PIN in {attempts} attempts: \
                 increase the PIN length or the number of allowed characters"
            ),
            Self::CsprngFailure(detail) => write!(f, "CSPRNG failure: {detail}"),
            Self::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PinError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::InvalidLength
            | Self::InvalidQuantity
            | Self::EmptyAlphabet
            | Self::GuaranteedRepeats { .. }
            | Self::RetriesExhausted { .. }
            | Self::CsprngFailure(_) => None,
        }
    }
}

impl From<StoreError> for PinError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<getrandom::Error> for PinError {
    fn from(e: getrandom::Error) -> Self {
        Self::CsprngFailure(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// PinOptions
// ---------------------------------------------------------------------------

/// Shape of the PINs to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinOptions {
    /// Number of characters per PIN. Must be at least 1.
    ///
    /// Default: [`DEFAULT_PIN_LENGTH`].
    pub length: usize,
    /// Characters PINs are drawn from.
    ///
    /// Default: [`Alphabet::Uppercase`].
    pub alphabet: Alphabet,
}

impl Default for PinOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_PIN_LENGTH,
            alphabet: Alphabet::default(),
        }
    }
}

impl PinOptions {
    /// Returns a copy with `length` replaced.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Returns a copy with `alphabet` replaced.
    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    fn checked_length(&self) -> Result<usize, PinError> {
        if self.length == 0 {
            return Err(PinError::InvalidLength);
        }
        Ok(self.length)
    }
}

// ---------------------------------------------------------------------------
// Batch creation
// ---------------------------------------------------------------------------

/// Distinct PINs produced by one [`create_batch`] call, in generation order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PinBatch {
    pins: Vec<String>,
}

impl PinBatch {
    /// Number of PINs in the batch.
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Returns `true` when the batch holds no PINs.
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// The PINs as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.pins
    }

    /// Iterates over the PINs.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.pins.iter()
    }

    /// Consumes the batch, returning the PINs.
    pub fn into_vec(self) -> Vec<String> {
        self.pins
    }
}

impl IntoIterator for PinBatch {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.pins.into_iter()
    }
}

impl<'a> IntoIterator for &'a PinBatch {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.pins.iter()
    }
}

/// Generates `quantity` distinct PINs without consulting any store.
///
/// Checks run in order: quantity, length, then keyspace feasibility. A
/// collision with an earlier PIN of the same batch re-rolls the same slot.
///
/// # Errors
///
/// - [`PinError::InvalidQuantity`] when `quantity == 0`.
/// - [`PinError::InvalidLength`] when `options.length == 0`.
/// - [`PinError::GuaranteedRepeats`] when `alphabet_size ^ length < quantity`,
///   including every request against an empty alphabet.
/// - [`PinError::CsprngFailure`] when the OS cannot supply randomness.
pub fn create_batch(quantity: usize, options: &PinOptions) -> Result<PinBatch, PinError> {
    if quantity == 0 {
        return Err(PinError::InvalidQuantity);
    }
    let length = options.checked_length()?;
    let chars = options.alphabet.chars();
    if !alphabet::keyspace_fits(chars.len(), length, quantity) {
        return Err(PinError::GuaranteedRepeats {
            quantity,
            alphabet_size: chars.len(),
            length,
        });
    }

    let capacity = quantity.min(MAX_PREALLOCATED_PINS);
    let mut seen: HashSet<String> = HashSet::with_capacity(capacity);
    let mut pins = Vec::with_capacity(capacity);
    let mut collisions = 0usize;
    while pins.len() < quantity {
        let candidate = random::random_string(length, &chars)?;
        if seen.insert(candidate.clone()) {
            pins.push(candidate);
        } else {
            collisions += 1;
        }
    }
    debug!(quantity, length, collisions, "generated PIN batch");
    Ok(PinBatch { pins })
}

// ---------------------------------------------------------------------------
// Single creation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Reservation {
    /// Accept the first candidate the store does not report as existing.
    CheckExists,
    /// Accept the first candidate the store lets us claim.
    Claim,
}

/// Generates one PIN that `store` does not report as live.
///
/// Each attempt draws a fresh candidate and awaits `store.exists`. The
/// accepted PIN is not recorded anywhere; the caller persists it.
///
/// # Errors
///
/// - [`PinError::InvalidLength`] when `options.length == 0`.
/// - [`PinError::EmptyAlphabet`] when the alphabet has no characters.
/// - [`PinError::RetriesExhausted`] after [`MAX_SINGLE_PIN_ATTEMPTS`]
///   collisions.
/// - [`PinError::Store`] when a lookup fails; the failure is not retried.
pub async fn create_pin<S>(store: &S, options: &PinOptions) -> Result<String, PinError>
where
    S: PinStore + ?Sized,
{
    create_single(store, options, Reservation::CheckExists).await
}

/// Generates one PIN and claims it in `store` in the same step.
///
/// Same validation and retry budget as [`create_pin`], but each candidate is
/// offered to [`PinStore::claim`], so concurrent callers can never be handed
/// the same PIN.
///
/// # Errors
///
/// As [`create_pin`]; additionally [`PinError::Store`] wrapping
/// [`StoreError::ClaimUnsupported`] for stores that only answer lookups.
pub async fn create_and_claim_pin<S>(store: &S, options: &PinOptions) -> Result<String, PinError>
where
    S: PinStore + ?Sized,
{
    create_single(store, options, Reservation::Claim).await
}

async fn create_single<S>(
    store: &S,
    options: &PinOptions,
    reservation: Reservation,
) -> Result<String, PinError>
where
    S: PinStore + ?Sized,
{
    let length = options.checked_length()?;
    let chars = options.alphabet.chars();
    if chars.is_empty() {
        return Err(PinError::EmptyAlphabet);
    }

    for attempt in 1..=MAX_SINGLE_PIN_ATTEMPTS {
        let candidate = random::random_string(length, &chars)?;
        let accepted = match reservation {
            Reservation::CheckExists => !store.exists(&candidate).await?,
            Reservation::Claim => store.claim(&candidate).await?,
        };
        if accepted {
            return Ok(candidate);
        }
        debug!(attempt, length, "PIN candidate already in use");
    }

    warn!(
        attempts = MAX_SINGLE_PIN_ATTEMPTS,
        length,
        alphabet_size = chars.len(),
        "no unused PIN found; keyspace may be nearly exhausted"
    );
    Err(PinError::RetriesExhausted {
        attempts: MAX_SINGLE_PIN_ATTEMPTS,
    })
}
