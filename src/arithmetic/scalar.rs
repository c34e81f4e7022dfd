//! Arithmetic modulo the group order N.
//!
//! Scalars are `curve25519_dalek::Scalar` values, which are always held
//! reduced into [0, N). The helpers here decide at each entry point whether
//! out-of-range input is rejected or reduced:
//!
//! * [`scalar_from_canonical_bytes`] rejects values >= N with `InvalidScalar`.
//!   Used for private keys, nonces and signature responses read from bytes.
//! * [`scalar_reduce`] and [`scalar_reduce_wide`] silently reduce. Used only
//!   for hash and DRBG outputs.

use crate::error::{fixed_bytes, Error, Result};
use curve25519_dalek::Scalar;
use rand_core::{CryptoRng, RngCore};

/// Width of a scalar encoding.
pub const SCALAR_LENGTH: usize = 32;

/// The group order N = 2^252 + 27742317777372353535851937790883648493, little-endian.
pub const GROUP_ORDER: [u8; 32] = [
    0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde, 0x14,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10,
];

/// Decodes a 32-byte little-endian scalar, rejecting values >= N.
pub fn scalar_from_canonical_bytes(bytes: &[u8]) -> Result<Scalar> {
    let bytes = fixed_bytes::<SCALAR_LENGTH>(bytes)?;
    Option::<Scalar>::from(Scalar::from_canonical_bytes(bytes))
        .ok_or(Error::InvalidScalar("value is not below the group order"))
}

/// Interprets 32 little-endian bytes as an integer and reduces it mod N.
pub fn scalar_reduce(bytes: [u8; 32]) -> Scalar {
    Scalar::from_bytes_mod_order(bytes)
}

/// Interprets 64 little-endian bytes as an integer and reduces it mod N.
pub fn scalar_reduce_wide(bytes: &[u8; 64]) -> Scalar {
    Scalar::from_bytes_mod_order_wide(bytes)
}

/// Draws a uniformly random scalar in [1, N).
pub fn random_nonzero_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    loop {
        let candidate = Scalar::random(rng);
        if candidate != Scalar::ZERO {
            return candidate;
        }
    }
}

/// Sums scalars modulo N.
pub fn sum_scalars<'a, I>(scalars: I) -> Scalar
where
    I: IntoIterator<Item = &'a Scalar>,
{
    scalars.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_group_order_is_rejected() {
        assert_eq!(
            scalar_from_canonical_bytes(&GROUP_ORDER),
            Err(Error::InvalidScalar("value is not below the group order"))
        );
        assert_eq!(scalar_reduce(GROUP_ORDER), Scalar::ZERO);
    }

    #[test]
    fn test_order_minus_one_is_accepted() {
        let mut bytes = GROUP_ORDER;
        bytes[0] -= 1;
        let scalar = scalar_from_canonical_bytes(&bytes).unwrap();
        assert_eq!(scalar + Scalar::ONE, Scalar::ZERO);
        assert_eq!(scalar.to_bytes(), bytes);
    }

    #[test]
    fn test_wrong_length_is_serialization_error() {
        assert_eq!(
            scalar_from_canonical_bytes(&[1u8; 33]),
            Err(Error::Serialization {
                expected: 32,
                actual: 33
            })
        );
    }

    #[test]
    fn test_field_arithmetic_identities() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let a = random_nonzero_scalar(&mut rng);
        let b = random_nonzero_scalar(&mut rng);

        assert_eq!(a - a, Scalar::ZERO);
        assert_eq!((a + b) - b, a);
        assert_eq!(a * a.invert(), Scalar::ONE);
        assert_eq!(sum_scalars(&[a, b, -a]), b);
    }

    #[test]
    fn test_wide_reduction_matches_narrow_for_small_values() {
        let mut wide = [0u8; 64];
        wide[0] = 42;
        assert_eq!(scalar_reduce_wide(&wide), Scalar::from(42u64));
    }
}
