//! The twisted Edwards curve -x^2 + y^2 = 1 + d x^2 y^2 over GF(2^255 - 19).
//!
//! [`CurveParameters`] is built once and then only read. Every operation
//! that needs curve constants borrows it, so any number of signers may share
//! one instance across threads without locking.

pub mod point;

pub use point::{Point, POINT_LENGTH};

use crate::arithmetic::field::{FieldElement, FIELD_MODULUS};
use crate::arithmetic::scalar::GROUP_ORDER;
use crate::error::{Error, Result};
use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
use subtle::ConditionallySelectable;

/// Immutable description of the curve group.
#[derive(Clone, Debug)]
pub struct CurveParameters {
    field_modulus: [u8; 32],
    order: [u8; 32],
    cofactor: u8,
    a: FieldElement,
    d: FieldElement,
    sqrt_m1: FieldElement,
    base_point: Point,
}

impl CurveParameters {
    /// The edwards25519 group: a = -1, d = -121665/121666, cofactor 8.
    pub fn ed25519() -> CurveParameters {
        let d = -(&FieldElement::from_u64(121665) * &FieldElement::from_u64(121666).invert());
        CurveParameters {
            field_modulus: FIELD_MODULUS,
            order: GROUP_ORDER,
            cofactor: 8,
            a: -FieldElement::ONE,
            d,
            sqrt_m1: FieldElement::sqrt_minus_one(),
            base_point: Point::from_edwards(ED25519_BASEPOINT_POINT),
        }
    }

    /// The field prime p, little-endian.
    pub fn field_modulus(&self) -> &[u8; 32] {
        &self.field_modulus
    }

    /// The prime order N of the base point, little-endian.
    pub fn order(&self) -> &[u8; 32] {
        &self.order
    }

    pub fn cofactor(&self) -> u8 {
        self.cofactor
    }

    pub fn a(&self) -> &FieldElement {
        &self.a
    }

    pub fn d(&self) -> &FieldElement {
        &self.d
    }

    pub fn base_point(&self) -> &Point {
        &self.base_point
    }

    /// Checks a x^2 + y^2 == 1 + d x^2 y^2.
    pub fn is_on_curve(&self, x: &FieldElement, y: &FieldElement) -> bool {
        let xx = x.square();
        let yy = y.square();
        let lhs = &(&self.a * &xx) + &yy;
        let rhs = &FieldElement::ONE + &(&self.d * &(&xx * &yy));
        lhs == rhs
    }

    /// Recovers affine coordinates from a compressed encoding.
    ///
    /// Rejects non-canonical y, encodings with no matching x, and the
    /// negative-zero form (x = 0 with the sign bit set).
    pub(crate) fn decompress_affine(
        &self,
        encoded: &[u8; 32],
    ) -> Result<(FieldElement, FieldElement)> {
        let sign = encoded[31] >> 7;
        let y = FieldElement::from_bytes(encoded);

        let mut y_bytes = *encoded;
        y_bytes[31] &= 0x7f;
        if y.to_bytes() != y_bytes {
            return Err(Error::InvalidPoint("y coordinate is not canonical"));
        }

        // x^2 = (y^2 - 1) / (d y^2 - a)
        let yy = y.square();
        let u = &yy - &FieldElement::ONE;
        let v = &(&self.d * &yy) - &self.a;
        let (was_square, x) = FieldElement::sqrt_ratio(&u, &v, &self.sqrt_m1);
        if !bool::from(was_square) {
            return Err(Error::InvalidPoint("no x coordinate for this y"));
        }
        if bool::from(x.is_zero()) && sign == 1 {
            return Err(Error::InvalidPoint("negative zero x coordinate"));
        }

        let flip = x.is_negative() ^ subtle::Choice::from(sign);
        let x = FieldElement::conditional_select(&x, &-&x, flip);

        if !self.is_on_curve(&x, &y) {
            return Err(Error::InvalidPoint("not on the curve"));
        }
        Ok((x, y))
    }
}
