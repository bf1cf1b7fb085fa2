//! Advisory comparison with previously generated text.

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::store::{read_text, TextStore};

/// SHA-256 of `text`, lowercase hex.
pub fn fingerprint(text: &str) -> String {
    let mut sha = Sha256::new();
    sha.update(text.as_bytes());
    format!("{:x}", sha.finalize())
}

/// What the store held for a key before this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriorState {
    Missing,
    Unchanged,
    Changed { previous: String },
    /// The read failed; treated like a change.
    Unreadable,
}

impl PriorState {
    pub fn needs_write(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Compares the stored text under `key` with `text` by fingerprint.
/// Read failures are logged and never propagate.
pub fn compare_prior(store: &dyn TextStore, key: &str, text: &str) -> PriorState {
    match read_text(store, key) {
        Ok(None) => PriorState::Missing,
        Ok(Some(prior)) => {
            let previous = fingerprint(&prior);
            if previous == fingerprint(text) {
                PriorState::Unchanged
            } else {
                PriorState::Changed { previous }
            }
        }
        Err(e) => {
            warn!(type_name = %key, error = %e, "prior output unreadable; ignored");
            PriorState::Unreadable
        }
    }
}
