#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod matching;
pub mod pin;
pub mod records;
pub mod similarity;
pub mod store;
pub mod weights;

pub use matching::{
    FieldScores, MatchError, MatchOutcome, MatchScore, NO_ADDRESS_ON_FILE, record_faults,
    score_match,
};
pub use pin::{
    Alphabet, DEFAULT_PIN_LENGTH, LOWERCASE_ALPHABET, MAX_SINGLE_PIN_ATTEMPTS, PinBatch, PinError,
    PinOptions, UPPERCASE_ALPHABET, create_and_claim_pin, create_batch, create_pin,
};
pub use records::{MatchRequest, OwnerIdentity, OwnerRecord};
pub use similarity::{ScoreError, score};
pub use store::{InMemoryPinStore, PinStore, StoreError};
pub use weights::{
    ConfigError, Field, FieldTable, JsonFileSource, WeightsConfig, WeightsSource, load_weights,
};

/// Returns the current version of the vhers-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
