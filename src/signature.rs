//! Wire forms of complete and partial signatures: `R || S`, 64 bytes.

use crate::arithmetic::scalar::{scalar_from_canonical_bytes, SCALAR_LENGTH};
use crate::curve::POINT_LENGTH;
use crate::error::{fixed_bytes, Result};
use curve25519_dalek::Scalar;

/// Width of an encoded signature.
pub const SIGNATURE_LENGTH: usize = POINT_LENGTH + SCALAR_LENGTH;

/// Schnorr signature structure: (R, S).
///
/// `r` is kept in encoded form; it is only decoded and validated when the
/// signature is verified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    r: [u8; POINT_LENGTH],
    s: Scalar,
}

/// One signer's share of a jointly produced signature.
///
/// Carries the round's aggregate nonce commitment as `r`, which must be the
/// same for every share combined together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartialSignature {
    r: [u8; POINT_LENGTH],
    s: Scalar,
}

macro_rules! impl_signature_encoding {
    ($name:ident) => {
        impl $name {
            pub fn new(r: [u8; POINT_LENGTH], s: Scalar) -> $name {
                $name { r, s }
            }

            /// The encoded nonce commitment.
            pub fn r(&self) -> &[u8; POINT_LENGTH] {
                &self.r
            }

            /// The response scalar.
            pub fn s(&self) -> &Scalar {
                &self.s
            }

            pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
                let mut out = [0u8; SIGNATURE_LENGTH];
                out[..POINT_LENGTH].copy_from_slice(&self.r);
                out[POINT_LENGTH..].copy_from_slice(self.s.as_bytes());
                out
            }

            /// Parses `R || S`. `S` must be below N; `R` is checked at
            /// verification time.
            pub fn from_bytes(bytes: &[u8]) -> Result<$name> {
                let bytes = fixed_bytes::<SIGNATURE_LENGTH>(bytes)?;
                let r = fixed_bytes::<POINT_LENGTH>(&bytes[..POINT_LENGTH])?;
                let s = scalar_from_canonical_bytes(&bytes[POINT_LENGTH..])?;
                Ok($name { r, s })
            }
        }
    };
}

impl_signature_encoding!(Signature);
impl_signature_encoding!(PartialSignature);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arithmetic::scalar::GROUP_ORDER;
    use crate::error::Error;

    #[test]
    fn test_signature_layout() {
        let signature = Signature::new([9u8; 32], Scalar::from(3u64));
        let bytes = signature.to_bytes();
        assert_eq!(&bytes[..32], &[9u8; 32]);
        assert_eq!(bytes[32], 3);
        assert_eq!(Signature::from_bytes(&bytes).unwrap(), signature);
    }

    #[test]
    fn test_signature_rejects_wrong_length() {
        assert_eq!(
            Signature::from_bytes(&[0u8; 63]),
            Err(Error::Serialization {
                expected: 64,
                actual: 63
            })
        );
        assert!(PartialSignature::from_bytes(&[0u8; 65]).is_err());
    }

    #[test]
    fn test_signature_rejects_non_canonical_s() {
        let mut bytes = [0u8; 64];
        bytes[32..].copy_from_slice(&GROUP_ORDER);
        assert!(matches!(
            Signature::from_bytes(&bytes),
            Err(Error::InvalidScalar(_))
        ));
    }
}
