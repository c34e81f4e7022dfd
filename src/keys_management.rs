use crate::arithmetic::scalar::{random_nonzero_scalar, scalar_from_canonical_bytes, SCALAR_LENGTH};
use crate::curve::{CurveParameters, Point, POINT_LENGTH};
use crate::error::{Error, Result};
use curve25519_dalek::Scalar;
use rand_core::{CryptoRng, RngCore};
use secrecy::{ExposeSecret, Secret};
use zeroize::Zeroizing;

/// A non-zero secret scalar bound to the curve it lives on.
///
/// Used both for long-term signing keys and for per-round private nonces.
pub struct PrivateKey<'c> {
    curve: &'c CurveParameters,
    scalar: Secret<Scalar>,
}

use std::fmt;
impl fmt::Debug for PrivateKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Format the PrivateKey struct without including the scalar
        write!(f, "PrivateKey {{ public_key: {:?} }}", self.public_key())
    }
}

impl Clone for PrivateKey<'_> {
    fn clone(&self) -> Self {
        PrivateKey {
            curve: self.curve,
            scalar: Secret::new(*self.scalar.expose_secret()),
        }
    }
}

impl ExposeSecret<Scalar> for PrivateKey<'_> {
    fn expose_secret(&self) -> &Scalar {
        self.scalar.expose_secret()
    }
}

impl<'c> PrivateKey<'c> {
    /// Draws a uniformly random key in [1, N) from `rng`.
    pub fn generate<R>(curve: &'c CurveParameters, rng: &mut R) -> PrivateKey<'c>
    where
        R: RngCore + CryptoRng,
    {
        PrivateKey {
            curve,
            scalar: Secret::new(random_nonzero_scalar(rng)),
        }
    }

    /// Wraps an already reduced scalar, rejecting zero.
    pub fn from_scalar(curve: &'c CurveParameters, scalar: Scalar) -> Result<PrivateKey<'c>> {
        if scalar == Scalar::ZERO {
            return Err(Error::InvalidScalar("private scalar is zero"));
        }
        Ok(PrivateKey {
            curve,
            scalar: Secret::new(scalar),
        })
    }

    /// Decodes a 32-byte little-endian scalar; it must be non-zero and below N.
    pub fn from_bytes(curve: &'c CurveParameters, bytes: &[u8]) -> Result<PrivateKey<'c>> {
        PrivateKey::from_scalar(curve, scalar_from_canonical_bytes(bytes)?)
    }

    /// Serializes the scalar. The returned buffer is wiped on drop.
    pub fn to_bytes(&self) -> Zeroizing<[u8; SCALAR_LENGTH]> {
        Zeroizing::new(self.scalar.expose_secret().to_bytes())
    }

    /// `scalar * B`.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            point: Point::mul_base(self.scalar.expose_secret()),
        }
    }

    pub fn curve(&self) -> &'c CurveParameters {
        self.curve
    }
}

/// A validated public point: on the curve, in the prime-order subgroup and
/// not the identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey {
    point: Point,
}

impl PublicKey {
    /// Wraps a point after checking identity and subgroup membership.
    pub fn from_point(point: Point) -> Result<PublicKey> {
        Ok(PublicKey {
            point: point.validate()?,
        })
    }

    pub fn from_bytes(curve: &CurveParameters, bytes: &[u8]) -> Result<PublicKey> {
        Ok(PublicKey {
            point: Point::decode(curve, bytes)?,
        })
    }

    pub fn to_bytes(&self) -> [u8; POINT_LENGTH] {
        self.point.encode()
    }

    pub fn as_point(&self) -> &Point {
        &self.point
    }
}

/// Draws a fresh private key; zero is rejected by resampling.
pub fn generate_key<'c, R>(curve: &'c CurveParameters, rng: &mut R) -> PrivateKey<'c>
where
    R: RngCore + CryptoRng,
{
    PrivateKey::generate(curve, rng)
}

pub fn derive_public_key(private_key: &PrivateKey<'_>) -> PublicKey {
    private_key.public_key()
}
