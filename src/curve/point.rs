use super::CurveParameters;
use crate::arithmetic::field::FieldElement;
use crate::error::{fixed_bytes, Error, Result};
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::traits::IsIdentity;
use curve25519_dalek::Scalar;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};

/// Width of a compressed point encoding.
pub const POINT_LENGTH: usize = 32;

/// A point of the edwards25519 group.
///
/// Group law and scalar multiplication are delegated to `curve25519-dalek`
/// (extended coordinates, constant-time variable-base multiplication).
/// Points read from bytes always go through [`Point::decode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point(EdwardsPoint);

impl Point {
    pub(crate) fn from_edwards(point: EdwardsPoint) -> Point {
        Point(point)
    }

    pub fn identity() -> Point {
        Point(EdwardsPoint::default())
    }

    /// `k * B` for the fixed base point.
    pub fn mul_base(scalar: &Scalar) -> Point {
        Point(EdwardsPoint::mul_base(scalar))
    }

    /// `k * self`. Runs in time independent of the bits of `k`.
    pub fn mul(&self, scalar: &Scalar) -> Point {
        Point(scalar * self.0)
    }

    pub fn double(&self) -> Point {
        Point(self.0 + self.0)
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_identity()
    }

    /// True when the point has no component in the order-8 torsion subgroup.
    pub fn is_in_prime_order_subgroup(&self) -> bool {
        self.0.is_torsion_free()
    }

    /// Checks the curve equation on this point's affine coordinates.
    pub fn is_on_curve(&self, curve: &CurveParameters) -> bool {
        match self.affine(curve) {
            Ok((x, y)) => curve.is_on_curve(&x, &y),
            Err(_) => false,
        }
    }

    /// Affine (x, y) coordinates.
    pub fn affine(&self, curve: &CurveParameters) -> Result<(FieldElement, FieldElement)> {
        curve.decompress_affine(&self.encode())
    }

    /// Builds a point from affine coordinates, applying the same checks as
    /// [`Point::decode`].
    pub fn from_affine(
        curve: &CurveParameters,
        x: &FieldElement,
        y: &FieldElement,
    ) -> Result<Point> {
        if !curve.is_on_curve(x, y) {
            return Err(Error::InvalidPoint("not on the curve"));
        }
        let mut encoded = y.to_bytes();
        encoded[31] |= x.is_negative().unwrap_u8() << 7;
        Point::decode(curve, &encoded)
    }

    /// 32-byte compressed form: y little-endian with the parity of x in the top bit.
    pub fn encode(&self) -> [u8; POINT_LENGTH] {
        self.0.compress().to_bytes()
    }

    /// Decodes and validates an externally supplied point.
    ///
    /// Fails with `InvalidPoint` unless the bytes name a non-identity point
    /// of the prime-order subgroup.
    pub fn decode(curve: &CurveParameters, bytes: &[u8]) -> Result<Point> {
        let encoded = fixed_bytes::<POINT_LENGTH>(bytes)?;
        curve.decompress_affine(&encoded)?;

        let point = CompressedEdwardsY(encoded)
            .decompress()
            .ok_or(Error::InvalidPoint("not on the curve"))?;
        Point(point).validate()
    }

    /// Rejects the identity and points with a torsion component.
    pub fn validate(self) -> Result<Point> {
        if self.is_identity() {
            return Err(Error::InvalidPoint("identity element"));
        }
        if !self.is_in_prime_order_subgroup() {
            return Err(Error::InvalidPoint("not in the prime-order subgroup"));
        }
        Ok(self)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point(self.0 + rhs.0)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point(self.0 - rhs.0)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point(-self.0)
    }
}

impl<'a> Sum<&'a Point> for Point {
    fn sum<I: Iterator<Item = &'a Point>>(iter: I) -> Point {
        iter.fold(Point::identity(), |acc, point| acc + *point)
    }
}
