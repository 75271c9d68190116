//! Round-robin credential selection
//!
//! The cursor is the only mutable state shared between concurrent callers.
//! It is guarded by a single lock held for exactly the read-and-advance, never
//! across a network call.

use std::fmt;

use parking_lot::Mutex;
use rulegate_domain::{Result, RulegateError};

/// One step of the rotation: the pool position handed out, the 1-based
/// number of this call, and the credential at that position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation<'a, T> {
    pub position: usize,
    pub sequence: u64,
    pub credential: &'a T,
}

#[derive(Debug, Default)]
struct Cursor {
    index: usize,
    issued: u64,
}

/// Thread-safe round-robin selector over a fixed, non-empty credential pool.
///
/// The cursor advances before each use, so with a fresh rotator the first
/// call returns position `1 % len`, the next `2 % len`, and so on.
pub struct CredentialRotator<T = String> {
    pool: Vec<T>,
    cursor: Mutex<Cursor>,
}

impl<T> CredentialRotator<T> {
    /// Create a rotator over `pool`.
    ///
    /// # Errors
    /// Returns [`RulegateError::Config`] when `pool` is empty.
    pub fn new(pool: Vec<T>) -> Result<Self> {
        if pool.is_empty() {
            return Err(RulegateError::Config(
                "credential pool must contain at least one credential".into(),
            ));
        }
        Ok(Self { pool, cursor: Mutex::new(Cursor::default()) })
    }

    /// Next credential in round-robin order.
    pub fn next(&self) -> &T {
        self.advance().credential
    }

    /// Advance the cursor and return the position, call number, and
    /// credential observed together under the lock.
    pub fn advance(&self) -> Rotation<'_, T> {
        let (position, sequence) = {
            let mut cursor = self.cursor.lock();
            cursor.index = (cursor.index + 1) % self.pool.len();
            cursor.issued += 1;
            (cursor.index, cursor.issued)
        };
        // `position < pool.len()` holds by construction of the modulo above.
        Rotation { position, sequence, credential: &self.pool[position] }
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Always `false`; an empty pool is rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}

// Credentials never appear in debug output.
impl<T> fmt::Debug for CredentialRotator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cursor = self.cursor.lock();
        f.debug_struct("CredentialRotator")
            .field("pool_size", &self.pool.len())
            .field("index", &cursor.index)
            .finish()
    }
}
