//! Arithmetic modulo the field prime p = 2^255 - 19.
//!
//! Elements are held in radix 2^51 as five `u64` limbs. Every operation
//! returns a weakly reduced element (each limb below 2^52); only
//! [`FieldElement::to_bytes`] produces the canonical representative.
//! Coordinates handled here are public, but equality and selection still go
//! through `subtle` so that no branch depends on limb values.

use std::ops::{Add, Mul, Neg, Sub};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

const LOW_51_BIT_MASK: u64 = (1u64 << 51) - 1;

/// p - 2, little-endian. Exponent for inversion.
const P_MINUS_2: [u8; 32] = exponent(0xeb, 0x7f);
/// (p - 5) / 8 = 2^252 - 3, little-endian.
const P_MINUS_5_DIV_8: [u8; 32] = exponent(0xfd, 0x0f);
/// (p - 1) / 4 = 2^253 - 5, little-endian.
const P_MINUS_1_DIV_4: [u8; 32] = exponent(0xfb, 0x1f);

/// The field modulus p = 2^255 - 19, little-endian.
pub const FIELD_MODULUS: [u8; 32] = exponent(0xed, 0x7f);

/// Builds `[low, 0xff, .., 0xff, high]`; every exponent above has this shape.
const fn exponent(low: u8, high: u8) -> [u8; 32] {
    let mut bytes = [0xffu8; 32];
    bytes[0] = low;
    bytes[31] = high;
    bytes
}

/// An element of GF(2^255 - 19).
#[derive(Clone, Copy)]
pub struct FieldElement([u64; 5]);

impl FieldElement {
    pub const ZERO: FieldElement = FieldElement([0, 0, 0, 0, 0]);
    pub const ONE: FieldElement = FieldElement([1, 0, 0, 0, 0]);

    pub fn from_u64(value: u64) -> FieldElement {
        FieldElement([value & LOW_51_BIT_MASK, value >> 51, 0, 0, 0])
    }

    /// Loads 32 little-endian bytes, ignoring the top bit.
    ///
    /// Values in [p, 2^255) are accepted and reduced; callers that need a
    /// canonical encoding compare against [`FieldElement::to_bytes`].
    pub fn from_bytes(bytes: &[u8; 32]) -> FieldElement {
        let mut limbs = [0u64; 5];
        let mut acc: u128 = 0;
        let mut bits = 0;
        let mut next = 0;
        for &byte in bytes {
            acc |= (byte as u128) << bits;
            bits += 8;
            if bits >= 51 && next < 5 {
                limbs[next] = (acc as u64) & LOW_51_BIT_MASK;
                acc >>= 51;
                bits -= 51;
                next += 1;
            }
        }
        FieldElement(limbs)
    }

    /// Canonical little-endian encoding of the value in [0, p).
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut limbs = weak_reduce(self.0).0;

        // q is 1 exactly when the value is at least p.
        let mut q = (limbs[0] + 19) >> 51;
        q = (limbs[1] + q) >> 51;
        q = (limbs[2] + q) >> 51;
        q = (limbs[3] + q) >> 51;
        q = (limbs[4] + q) >> 51;

        limbs[0] += 19 * q;
        limbs[1] += limbs[0] >> 51;
        limbs[0] &= LOW_51_BIT_MASK;
        limbs[2] += limbs[1] >> 51;
        limbs[1] &= LOW_51_BIT_MASK;
        limbs[3] += limbs[2] >> 51;
        limbs[2] &= LOW_51_BIT_MASK;
        limbs[4] += limbs[3] >> 51;
        limbs[3] &= LOW_51_BIT_MASK;
        limbs[4] &= LOW_51_BIT_MASK;

        let mut out = [0u8; 32];
        let mut acc: u128 = 0;
        let mut bits = 0;
        let mut next = 0;
        for limb in limbs {
            acc |= (limb as u128) << bits;
            bits += 51;
            while bits >= 8 {
                out[next] = acc as u8;
                acc >>= 8;
                bits -= 8;
                next += 1;
            }
        }
        out[next] = acc as u8;
        out
    }

    pub fn square(&self) -> FieldElement {
        self * self
    }

    /// Raises to a public exponent given as 32 little-endian bytes.
    pub fn pow(&self, exponent: &[u8; 32]) -> FieldElement {
        let mut result = FieldElement::ONE;
        for bit in (0..256).rev() {
            result = result.square();
            let set = Choice::from((exponent[bit / 8] >> (bit % 8)) & 1);
            let product = &result * self;
            result = FieldElement::conditional_select(&result, &product, set);
        }
        result
    }

    /// Multiplicative inverse; zero maps to zero.
    pub fn invert(&self) -> FieldElement {
        self.pow(&P_MINUS_2)
    }

    /// A square root of -1, computed as 2^((p-1)/4).
    pub fn sqrt_minus_one() -> FieldElement {
        FieldElement::from_u64(2).pow(&P_MINUS_1_DIV_4)
    }

    /// Computes sqrt(u / v) when it exists.
    ///
    /// Returns `(Choice(1), r)` with `v * r^2 == u` when u/v is a square,
    /// otherwise `(Choice(0), _)`. `sqrt_m1` must square to -1.
    pub fn sqrt_ratio(
        u: &FieldElement,
        v: &FieldElement,
        sqrt_m1: &FieldElement,
    ) -> (Choice, FieldElement) {
        let v3 = &v.square() * v;
        let v7 = &v3.square() * v;
        let r = &(u * &v3) * &(u * &v7).pow(&P_MINUS_5_DIV_8);
        let check = v * &r.square();

        let correct_sign = check.ct_eq(u);
        let flipped_sign = check.ct_eq(&-u);
        let r_prime = &r * sqrt_m1;
        let r = FieldElement::conditional_select(&r, &r_prime, flipped_sign);

        (correct_sign | flipped_sign, r)
    }

    /// The low bit of the canonical encoding.
    pub fn is_negative(&self) -> Choice {
        Choice::from(self.to_bytes()[0] & 1)
    }

    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&FieldElement::ZERO)
    }
}

/// Propagates carries so that every limb is below 2^52.
fn weak_reduce(mut limbs: [u64; 5]) -> FieldElement {
    let c0 = limbs[0] >> 51;
    let c1 = limbs[1] >> 51;
    let c2 = limbs[2] >> 51;
    let c3 = limbs[3] >> 51;
    let c4 = limbs[4] >> 51;

    limbs[0] &= LOW_51_BIT_MASK;
    limbs[1] &= LOW_51_BIT_MASK;
    limbs[2] &= LOW_51_BIT_MASK;
    limbs[3] &= LOW_51_BIT_MASK;
    limbs[4] &= LOW_51_BIT_MASK;

    // 2^255 = 19 (mod p)
    limbs[0] += c4 * 19;
    limbs[1] += c0;
    limbs[2] += c1;
    limbs[3] += c2;
    limbs[4] += c3;

    FieldElement(limbs)
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &FieldElement) -> Choice {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &FieldElement) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &FieldElement, b: &FieldElement, choice: Choice) -> FieldElement {
        FieldElement([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
            u64::conditional_select(&a.0[4], &b.0[4], choice),
        ])
    }
}

impl std::fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FieldElement({:02x?})", self.to_bytes())
    }
}

impl<'a, 'b> Add<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;

    fn add(self, rhs: &'b FieldElement) -> FieldElement {
        weak_reduce([
            self.0[0] + rhs.0[0],
            self.0[1] + rhs.0[1],
            self.0[2] + rhs.0[2],
            self.0[3] + rhs.0[3],
            self.0[4] + rhs.0[4],
        ])
    }
}

impl<'a, 'b> Sub<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;

    fn sub(self, rhs: &'b FieldElement) -> FieldElement {
        // Add 16p before subtracting so no limb underflows.
        weak_reduce([
            (self.0[0] + 36028797018963664) - rhs.0[0],
            (self.0[1] + 36028797018963952) - rhs.0[1],
            (self.0[2] + 36028797018963952) - rhs.0[2],
            (self.0[3] + 36028797018963952) - rhs.0[3],
            (self.0[4] + 36028797018963952) - rhs.0[4],
        ])
    }
}

impl<'a, 'b> Mul<&'b FieldElement> for &'a FieldElement {
    type Output = FieldElement;

    fn mul(self, rhs: &'b FieldElement) -> FieldElement {
        #[inline(always)]
        fn m(x: u64, y: u64) -> u128 {
            (x as u128) * (y as u128)
        }

        let a = &self.0;
        let b = &rhs.0;

        let b1_19 = b[1] * 19;
        let b2_19 = b[2] * 19;
        let b3_19 = b[3] * 19;
        let b4_19 = b[4] * 19;

        let c0 = m(a[0], b[0]) + m(a[4], b1_19) + m(a[3], b2_19) + m(a[2], b3_19) + m(a[1], b4_19);
        let mut c1 =
            m(a[1], b[0]) + m(a[0], b[1]) + m(a[4], b2_19) + m(a[3], b3_19) + m(a[2], b4_19);
        let mut c2 =
            m(a[2], b[0]) + m(a[1], b[1]) + m(a[0], b[2]) + m(a[4], b3_19) + m(a[3], b4_19);
        let mut c3 = m(a[3], b[0]) + m(a[2], b[1]) + m(a[1], b[2]) + m(a[0], b[3]) + m(a[4], b4_19);
        let mut c4 = m(a[4], b[0]) + m(a[3], b[1]) + m(a[2], b[2]) + m(a[1], b[3]) + m(a[0], b[4]);

        let mut out = [0u64; 5];

        c1 += ((c0 >> 51) as u64) as u128;
        out[0] = (c0 as u64) & LOW_51_BIT_MASK;

        c2 += ((c1 >> 51) as u64) as u128;
        out[1] = (c1 as u64) & LOW_51_BIT_MASK;

        c3 += ((c2 >> 51) as u64) as u128;
        out[2] = (c2 as u64) & LOW_51_BIT_MASK;

        c4 += ((c3 >> 51) as u64) as u128;
        out[3] = (c3 as u64) & LOW_51_BIT_MASK;

        let carry = (c4 >> 51) as u64;
        out[4] = (c4 as u64) & LOW_51_BIT_MASK;

        out[0] += carry * 19;
        out[1] += out[0] >> 51;
        out[0] &= LOW_51_BIT_MASK;

        FieldElement(out)
    }
}

impl<'a> Neg for &'a FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        &FieldElement::ZERO - self
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        -&self
    }
}
