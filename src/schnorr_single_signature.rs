use crate::curve::{CurveParameters, Point, POINT_LENGTH};
use crate::error::Result;
use crate::keys_management::{PrivateKey, PublicKey};
use crate::nonce::Nonce;
use crate::signature::Signature;
use curve25519_dalek::Scalar;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha512};

impl Signature {
    /// Signs a message with an explicit nonce:
    /// (R,s) = (kG, k + H(R,X,m)x)
    ///
    /// # Arguments
    ///
    /// * `message` - The message to be signed.
    /// * `private_key` - The signing key x.
    /// * `private_nonce` - The nonce k. Must never be reused for another message.
    ///
    /// # Returns
    ///
    /// A Signature containing the encoded `R` and `s`.
    ///
    #[tracing::instrument(name = "Signing the message with a given nonce", skip_all)]
    pub fn sign_with_nonce(
        message: &[u8],
        private_key: &PrivateKey<'_>,
        private_nonce: &PrivateKey<'_>,
    ) -> Signature {
        let cap_r = private_nonce.public_key().to_bytes();
        let cap_x = private_key.public_key().to_bytes();
        let hash_rpm = calc_hash_rpm(&cap_r, &cap_x, message);
        let s = private_nonce.expose_secret() + hash_rpm * private_key.expose_secret();

        Signature::new(cap_r, s)
    }

    /// Signs a message with a nonce derived deterministically from the key,
    /// the message and `aux_entropy`.
    #[tracing::instrument(name = "Signing the message with Schnorr signature", skip_all)]
    pub fn sign(
        message: &[u8],
        private_key: &PrivateKey<'_>,
        aux_entropy: Option<&[u8; 32]>,
    ) -> Result<Signature> {
        let nonce = Nonce::derive(private_key, message, aux_entropy)?;
        Ok(Signature::sign_with_nonce(
            message,
            private_key,
            nonce.private_nonce(),
        ))
    }

    /// Verifies a Schnorr signature using the following formula:
    /// sG = R + H(R,X,m)X
    ///
    /// # Arguments
    ///
    /// * `curve` - Parameters used to validate the encoded `R`.
    /// * `public_key` - The public key to verify the signature.
    /// * `message` - The message that was signed.
    ///
    /// # Returns
    ///
    /// `true` if the signature is valid, `false` otherwise, including when
    /// `R` does not decode to a valid point.
    ///
    #[tracing::instrument(name = "Verifying the Schnorr signature", skip_all)]
    pub fn verify(&self, curve: &CurveParameters, public_key: &PublicKey, message: &[u8]) -> bool {
        let r_public = match Point::decode(curve, self.r()) {
            Ok(point) => point,
            Err(error) => {
                tracing::debug!(%error, "Signature commitment failed to decode");
                return false;
            }
        };
        let hash_rpm = calc_hash_rpm(self.r(), &public_key.to_bytes(), message);

        let left = Point::mul_base(self.s());
        let right = r_public + public_key.as_point().mul(&hash_rpm);

        left == right
    }
}

/// Checks `signature` against `public_key` and `message`.
pub fn verify(
    curve: &CurveParameters,
    public_key: &PublicKey,
    message: &[u8],
    signature: &Signature,
) -> bool {
    signature.verify(curve, public_key, message)
}

/// Calculates the challenge H(R || X || m) reduced modulo N.
///
/// # Arguments
///
/// * `cap_r` - The encoded nonce commitment `R`.
/// * `public_key` - The encoded public key `X`.
/// * `message` - The message, hashed as is.
///
pub(crate) fn calc_hash_rpm(
    cap_r: &[u8; POINT_LENGTH],
    public_key: &[u8; POINT_LENGTH],
    message: &[u8],
) -> Scalar {
    let hasher = Sha512::new()
        .chain_update(cap_r)
        .chain_update(public_key)
        .chain_update(message);
    Scalar::from_hash(hasher)
}
