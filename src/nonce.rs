//! Deterministic per-signature nonces.
//!
//! The nonce is drawn from an HMAC-DRBG over HMAC-SHA512 in the manner of
//! RFC 6979 section 3.2, seeded with the private key, the SHA-512 digest of
//! the message, optional auxiliary entropy and a fixed domain tag. Each
//! 64-byte DRBG output is reduced modulo N and clamped by clearing its three
//! lowest bits. Identical inputs always give the identical nonce.

use crate::arithmetic::scalar::scalar_reduce_wide;
use crate::error::{Error, Result};
use crate::keys_management::{PrivateKey, PublicKey};
use curve25519_dalek::Scalar;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

type HmacSha512 = Hmac<Sha512>;

const HASH_LENGTH: usize = 64;

/// Domain-separation tag appended to the DRBG seed.
pub const NONCE_DOMAIN_TAG: [u8; 16] = *b"Edwards+SHA512  ";

/// A private nonce together with its public commitment `k * B`.
pub struct Nonce<'c> {
    pub public_nonce: PublicKey,
    pub(crate) private_nonce: PrivateKey<'c>,
}

use std::fmt;
impl fmt::Debug for Nonce<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Format the Nonce struct without including private_nonce
        write!(f, "Nonce {{ public_nonce: {:?} }}", self.public_nonce)
    }
}

impl Clone for Nonce<'_> {
    fn clone(&self) -> Self {
        Nonce {
            public_nonce: self.public_nonce,
            private_nonce: self.private_nonce.clone(),
        }
    }
}

impl<'c> Nonce<'c> {
    /// Derives the nonce for signing `message` with `private_key`.
    #[tracing::instrument(name = "Deriving a deterministic nonce", skip_all)]
    pub fn derive(
        private_key: &PrivateKey<'c>,
        message: &[u8],
        aux_entropy: Option<&[u8; 32]>,
    ) -> Result<Nonce<'c>> {
        let key_bytes = private_key.to_bytes();
        let scalar = nonce_rfc6979(&key_bytes, message, aux_entropy, &NONCE_DOMAIN_TAG)?;
        Ok(Nonce::from_private_nonce(PrivateKey::from_scalar(
            private_key.curve(),
            scalar,
        )?))
    }

    pub fn from_private_nonce(private_nonce: PrivateKey<'c>) -> Nonce<'c> {
        Nonce {
            public_nonce: private_nonce.public_key(),
            private_nonce,
        }
    }

    pub fn private_nonce(&self) -> &PrivateKey<'c> {
        &self.private_nonce
    }

    pub fn into_parts(self) -> (PrivateKey<'c>, PublicKey) {
        (self.private_nonce, self.public_nonce)
    }
}

/// Returns the `(private_nonce, public_nonce)` pair for `message`.
pub fn derive_nonce<'c>(
    private_key: &PrivateKey<'c>,
    message: &[u8],
    aux_entropy: Option<&[u8; 32]>,
) -> Result<(PrivateKey<'c>, PublicKey)> {
    Ok(Nonce::derive(private_key, message, aux_entropy)?.into_parts())
}

fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<Zeroizing<[u8; HASH_LENGTH]>> {
    let mut mac =
        HmacSha512::new_from_slice(key).map_err(|e| Error::NonceDerivation(e.to_string()))?;
    for part in parts {
        mac.update(part);
    }
    let mut out = Zeroizing::new([0u8; HASH_LENGTH]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// Clears the low three bits, keeping the value a multiple of the cofactor.
fn clamp(scalar: Scalar) -> Scalar {
    let mut bytes = scalar.to_bytes();
    bytes[0] &= 0xf8;
    Scalar::from_bytes_mod_order(bytes)
}

fn nonce_rfc6979(
    private_key: &[u8; 32],
    message: &[u8],
    aux_entropy: Option<&[u8; 32]>,
    tag: &[u8; 16],
) -> Result<Scalar> {
    let digest = Sha512::digest(message);

    let mut seed = Zeroizing::new(Vec::with_capacity(32 + HASH_LENGTH + 32 + 16));
    seed.extend_from_slice(private_key);
    seed.extend_from_slice(&digest);
    seed.extend_from_slice(aux_entropy.unwrap_or(&[0u8; 32]));
    seed.extend_from_slice(tag);

    let mut v = Zeroizing::new([0x01u8; HASH_LENGTH]);
    let mut k = Zeroizing::new([0x00u8; HASH_LENGTH]);

    k = hmac_sha512(k.as_slice(), &[v.as_slice(), &[0x00], seed.as_slice()])?;
    v = hmac_sha512(k.as_slice(), &[v.as_slice()])?;
    k = hmac_sha512(k.as_slice(), &[v.as_slice(), &[0x01], seed.as_slice()])?;
    v = hmac_sha512(k.as_slice(), &[v.as_slice()])?;

    loop {
        v = hmac_sha512(k.as_slice(), &[v.as_slice()])?;
        let candidate = clamp(scalar_reduce_wide(&v));
        if candidate != Scalar::ZERO {
            return Ok(candidate);
        }
        tracing::debug!("Derived nonce clamped to zero, drawing again");
        k = hmac_sha512(k.as_slice(), &[v.as_slice(), &[0x00]])?;
        v = hmac_sha512(k.as_slice(), &[v.as_slice()])?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurveParameters;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use secrecy::ExposeSecret;

    const MESSAGE: &str = "d04b98f48e8f8bcc15c6ae5ac050801cd6dcfd428fb5f9e65c4e16e7807340fa";

    #[test]
    fn test_nonce_is_deterministic() {
        let curve = CurveParameters::ed25519();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let key = PrivateKey::generate(&curve, &mut rng);
        let message = hex::decode(MESSAGE).unwrap();

        let first = Nonce::derive(&key, &message, None).unwrap();
        let second = Nonce::derive(&key, &message, None).unwrap();

        assert_eq!(
            first.private_nonce().expose_secret(),
            second.private_nonce().expose_secret()
        );
        assert_eq!(first.public_nonce, second.public_nonce);
    }

    #[test]
    fn test_nonce_depends_on_every_input() {
        let curve = CurveParameters::ed25519();
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let key = PrivateKey::generate(&curve, &mut rng);
        let other_key = PrivateKey::generate(&curve, &mut rng);
        let message = hex::decode(MESSAGE).unwrap();

        let base = Nonce::derive(&key, &message, None).unwrap().public_nonce;
        let other_message = Nonce::derive(&key, b"another message", None)
            .unwrap()
            .public_nonce;
        let with_aux = Nonce::derive(&key, &message, Some(&[7u8; 32]))
            .unwrap()
            .public_nonce;
        let with_other_key = Nonce::derive(&other_key, &message, None)
            .unwrap()
            .public_nonce;

        assert_ne!(base, other_message);
        assert_ne!(base, with_aux);
        assert_ne!(base, with_other_key);
    }

    #[test]
    fn test_nonce_is_clamped() {
        let curve = CurveParameters::ed25519();
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        for i in 0u8..16 {
            let key = PrivateKey::generate(&curve, &mut rng);
            let nonce = Nonce::derive(&key, &[i], None).unwrap();
            let bytes = nonce.private_nonce().to_bytes();
            assert_eq!(bytes[0] & 0x07, 0);
            assert_eq!(nonce.public_nonce, nonce.private_nonce().public_key());
        }
    }

    #[test]
    fn test_derive_nonce_pair() {
        let curve = CurveParameters::ed25519();
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        let key = PrivateKey::generate(&curve, &mut rng);

        let (private_nonce, public_nonce) = derive_nonce(&key, b"message", None).unwrap();
        assert_eq!(private_nonce.public_key(), public_nonce);
    }

    #[test]
    fn test_clamp_clears_low_bits() {
        assert_eq!(clamp(Scalar::from(15u64)), Scalar::from(8u64));
        assert_eq!(clamp(Scalar::from(7u64)), Scalar::ZERO);
    }
}
