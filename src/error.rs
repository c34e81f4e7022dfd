//! Error types shared by every component of the crate.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while decoding inputs or running a signing round.
///
/// A signature that is well formed but does not satisfy the verification
/// equation is not an error: verification returns `false` instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Zero or out-of-range scalar where a valid one is required.
    #[error("Invalid scalar: {0}")]
    InvalidScalar(&'static str),

    /// Point fails the curve equation or subgroup check, or is the identity.
    #[error("Invalid point: {0}")]
    InvalidPoint(&'static str),

    /// Combining zero keys, nonces or signatures.
    #[error("Cannot combine an empty set of {0}")]
    EmptyInputSet(&'static str),

    /// Partial signatures of one round carry differing commitments.
    #[error("Partial signatures carry differing nonce commitments")]
    InconsistentCommitment,

    /// Wrong-length input bytes.
    #[error("Serialization error: expected {expected} bytes, got {actual}")]
    Serialization { expected: usize, actual: usize },

    /// The keyed hash behind nonce derivation could not be initialised.
    #[error("Nonce derivation failed: {0}")]
    NonceDerivation(String),

    /// A protocol step received the wrong number of messages.
    #[error("Expected messages from {expected} parties, got {actual}")]
    PartyCountMismatch { expected: usize, actual: usize },

    /// The share submitted at this position does not verify.
    #[error("Partial signature from party {0} is invalid")]
    InvalidPartialSignature(usize),
}

/// Checks that `bytes` has exactly `N` bytes and returns them as an array.
pub(crate) fn fixed_bytes<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| Error::Serialization {
        expected: N,
        actual: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_bytes_length_check() {
        assert_eq!(fixed_bytes::<4>(&[1, 2, 3, 4]), Ok([1, 2, 3, 4]));
        assert_eq!(
            fixed_bytes::<32>(&[0u8; 31]),
            Err(Error::Serialization {
                expected: 32,
                actual: 31
            })
        );
    }
}
