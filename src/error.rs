//! Error type for the one fallible public operation, `rewind`.
//!
//! Grounded on `larry0x-tree/src/error.rs`'s `thiserror`-derived enum; this
//! crate has a single failure mode, so the enum has a single variant, but the
//! shape (a library `Error` plus a crate-local `Result` alias) follows the
//! same pattern.

/// Errors surfaced by [`crate::tree::PersistentMap`] and [`crate::ranking::PlayerRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Raised by `rewind` when `delta` is zero or larger than the current version.
    #[error("cannot rewind by {delta} version(s): current version is only {current}")]
    InvalidRewind { delta: u64, current: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;
