//! Saved user identifier and the gate that requires it before submission.
//!
//! DESIGN
//! ======
//! The identifier is kept as the string the user typed (trimmed) under
//! [`STORAGE_KEY`]. It is only turned into an integer when a request is
//! built, via [`parse_user_id`].

use crate::util::labels::ENTER_IDENTIFIER;
use crate::util::storage::{KeyValueStore, StorageError};

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

pub const STORAGE_KEY: &str = "rag_sql_user_id";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("{}", ENTER_IDENTIFIER)]
    Empty,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Read and write access to the saved identifier.
pub struct IdentityGate<S> {
    store: S,
}

impl<S: KeyValueStore> IdentityGate<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The saved identifier. An empty stored value counts as absent.
    pub fn get_saved(&self) -> Option<String> {
        self.store.get(STORAGE_KEY).filter(|v| !v.is_empty())
    }

    /// Persist the trimmed input and return what was stored.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Empty`] for blank input and
    /// [`IdentityError::Storage`] when the store rejects the write.
    pub fn set_saved(&self, raw: &str) -> Result<String, IdentityError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(IdentityError::Empty);
        }
        self.store.set(STORAGE_KEY, value)?;
        Ok(value.to_owned())
    }
}

/// Leading-integer parse: optional whitespace and sign, then digits. Trailing
/// text is ignored (`"42abc"` is 42); no digits at all is `None`.
pub fn parse_user_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
