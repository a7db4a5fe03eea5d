//! Field element types for the BLS12-381 scalar field and the CIOS
//! Montgomery arithmetic engine that backs them.
//!
//! Two distinct types track the two semantic flavours described in the
//! data model: [`Scalar`] holds a normal-form integer, [`MontScalar`] holds
//! a Montgomery-form integer (`x * R mod P`). Both share the same four-limb
//! little-endian storage; the type boundary is what keeps the two flavours
//! from being silently mixed.

use core::fmt;

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

use crate::limbs::{adc, adc_array, mac, sbb_array};

#[cfg(feature = "zeroize")]
use zeroize::DefaultIsZeroes;

#[cfg(feature = "serde")]
use serdect::serde::{de, ser, Deserialize, Serialize};

/// Constant representing the modulus
/// `p = 0x73EDA753299D7D483339D80809A1D80553BDA402FFFE5BFEFFFFFFFF00000001`.
pub const MODULUS: [u64; 4] = [
    0xFFFF_FFFF_0000_0001,
    0x53BD_A402_FFFE_5BFE,
    0x3339_D808_09A1_D805,
    0x73ED_A753_299D_7D48,
];

/// `R^2 mod P`, used to move values into Montgomery form.
pub const R2: [u64; 4] = [
    0xC999_E990_F3F2_9C6D,
    0x2B6C_EDCB_8792_5C23,
    0x05D3_1496_7254_398F,
    0x0748_D9D9_9F59_FF11,
];

/// `-P^-1 mod 2^64`, the single-limb Montgomery reduction constant.
pub const INV: u64 = 0xFFFF_FFFE_FFFF_FFFF;

/// `1` in Montgomery form, i.e. `R mod P`. Used as the starting accumulator
/// for [`MontScalar::exp`] and to define [`MontScalar::ONE`].
const R_MOD_P: [u64; 4] = [
    0x0000_0001_FFFF_FFFE,
    0x5884_B7FA_0003_4802,
    0x998C_4FEF_ECBC_4FF5,
    0x1824_B159_ACC5_056F,
];

#[inline(always)]
const fn conditional_select_raw(a: &[u64; 4], b: &[u64; 4], choice: u64) -> [u64; 4] {
    // choice is 0 or u64::MAX (an all-ones mask), not a boolean 0/1.
    [
        (a[0] & !choice) | (b[0] & choice),
        (a[1] & !choice) | (b[1] & choice),
        (a[2] & !choice) | (b[2] & choice),
        (a[3] & !choice) | (b[3] & choice),
    ]
}

/// Turns a 0/1 flag into an all-zero/all-one mask without branching.
#[inline(always)]
const fn mask_from_bit(bit: u64) -> u64 {
    0u64.wrapping_sub(bit & 1)
}

/// `(a + b) mod P`, flavour-agnostic (spec.md §4.2).
#[inline]
const fn add_raw(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
    let (sum, carry) = adc_array(a, b);
    let (tentative, borrow) = sbb_array(&sum, &MODULUS);
    let use_sub = mask_from_bit((carry != 0 || borrow == 0) as u64);
    conditional_select_raw(&sum, &tentative, use_sub)
}

/// `(a - b) mod P`, flavour-agnostic (spec.md §4.3).
#[inline]
const fn sub_raw(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
    let (diff, borrow) = sbb_array(a, b);
    let (tentative, _carry) = adc_array(&diff, &MODULUS);
    let use_add_back = mask_from_bit(borrow);
    conditional_select_raw(&diff, &tentative, use_add_back)
}

/// CIOS Montgomery product: `a * b * R^-1 mod P` (spec.md §4.4).
///
/// Four outer iterations, each interleaving a multiply-accumulate column
/// against `b[i]` with an immediate reduction column against `MODULUS`,
/// shifting the 5-limb accumulator down by one limb per iteration.
fn cios_mul(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
    let mut r = [0u64; 5];

    let mut i = 0;
    while i < 4 {
        // Multiply-accumulate column: r[0..4] += a[0..4] * b[i].
        let mut carry = 0u64;
        let mut j = 0;
        while j < 4 {
            let (v, c) = mac(r[j], a[j], b[i], carry);
            r[j] = v;
            carry = c;
            j += 1;
        }
        let (r4, overflow) = adc(r[4], carry, 0);
        debug_assert_eq!(overflow, 0, "CIOS accumulator overflow in MAC column");
        r[4] = r4;

        // Reduction column: fold r[0] away via m = r[0] * INV mod 2^64,
        // then shift the accumulator down by one limb.
        let m = r[0].wrapping_mul(INV);
        let (_, mut carry) = mac(r[0], m, MODULUS[0], 0);
        let (v0, c) = mac(r[1], m, MODULUS[1], carry);
        r[0] = v0;
        carry = c;
        let (v1, c) = mac(r[2], m, MODULUS[2], carry);
        r[1] = v1;
        carry = c;
        let (v2, c) = mac(r[3], m, MODULUS[3], carry);
        r[2] = v2;
        carry = c;
        let (v3, v4) = adc(r[4], carry, 0);
        r[3] = v3;
        r[4] = v4;

        i += 1;
    }

    let (tentative, borrow) = sbb_array(&[r[0], r[1], r[2], r[3]], &MODULUS);
    let use_sub = mask_from_bit((r[4] != 0 || borrow == 0) as u64);
    conditional_select_raw(&[r[0], r[1], r[2], r[3]], &tentative, use_sub)
}

/// Right-to-left square-and-multiply, always squaring so the operation
/// count is data-independent (spec.md §4.6). Branching on exponent bits is
/// permitted: exponents passed through this core are public (e.g. `P - 2`).
fn exp_raw(base: &[u64; 4], exp: &[u64; 4]) -> [u64; 4] {
    let mut res = R_MOD_P;
    let mut running_base = *base;

    for limb in exp {
        let mut w = *limb;
        for _ in 0..64 {
            if w & 1 == 1 {
                res = cios_mul(&res, &running_base);
            }
            running_base = cios_mul(&running_base, &running_base);
            w >>= 1;
        }
    }

    res
}

/// A field element in normal form: the integer itself, canonical in
/// `[0, P)`.
#[derive(Clone, Copy, Debug, Eq)]
pub struct Scalar([u64; 4]);

/// A field element in Montgomery form: `x * R mod P` where `R = 2^256`.
#[derive(Clone, Copy, Debug, Eq)]
pub struct MontScalar([u64; 4]);

macro_rules! impl_common {
    ($ty:ident) => {
        impl $ty {
            /// The additive identity.
            pub const ZERO: Self = Self([0, 0, 0, 0]);

            /// Constructs an element directly from raw little-endian limbs,
            /// without checking canonicity. Mirrors spec.md §4.8's
            /// `from_bytes`: the caller is responsible for the value being
            /// `< P` if that matters.
            #[inline]
            pub const fn from_raw(limbs: [u64; 4]) -> Self {
                Self(limbs)
            }

            /// Returns the raw little-endian limbs as stored (no flavour
            /// conversion).
            #[inline]
            pub const fn to_raw(self) -> [u64; 4] {
                self.0
            }

            /// `self + rhs`, preserving flavour (spec.md §4.2).
            #[inline]
            pub const fn add(&self, rhs: &Self) -> Self {
                Self(add_raw(&self.0, &rhs.0))
            }

            /// `self - rhs`, preserving flavour (spec.md §4.3).
            #[inline]
            pub const fn sub(&self, rhs: &Self) -> Self {
                Self(sub_raw(&self.0, &rhs.0))
            }

            /// `-self`, computed as `ZERO - self`.
            #[inline]
            pub const fn neg(&self) -> Self {
                Self::ZERO.sub(self)
            }

            /// Decodes 32 little-endian bytes into an element. Does not
            /// check canonicity (spec.md §4.8, §7): the caller must ensure
            /// the value is `< P` if that matters. See
            /// [`Self::from_bytes_checked`] for a constant-time checked
            /// variant.
            pub fn from_bytes(bytes: &[u8; 32]) -> Self {
                let mut limbs = [0u64; 4];
                for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
                    *limb = u64::from_le_bytes(chunk.try_into().expect("8-byte chunk"));
                }
                Self(limbs)
            }

            /// Decodes 32 little-endian bytes into an element, rejecting
            /// encodings `>= P` in constant time (SPEC_FULL.md §4.11).
            pub fn from_bytes_checked(bytes: &[u8; 32]) -> CtOption<Self> {
                let candidate = Self::from_bytes(bytes);
                let is_canonical = limbs_lt(&candidate.0, &MODULUS);
                CtOption::new(candidate, is_canonical)
            }

            /// Encodes this element's stored limbs as 32 little-endian
            /// bytes (spec.md §4.8). Operates on the stored limbs
            /// regardless of flavour.
            pub fn to_bytes(self) -> [u8; 32] {
                let mut out = [0u8; 32];
                for (chunk, limb) in out.chunks_exact_mut(8).zip(self.0.iter()) {
                    chunk.copy_from_slice(&limb.to_le_bytes());
                }
                out
            }
        }

        impl Default for $ty {
            #[inline]
            fn default() -> Self {
                Self::ZERO
            }
        }

        impl ConstantTimeEq for $ty {
            fn ct_eq(&self, other: &Self) -> Choice {
                self.0[0].ct_eq(&other.0[0])
                    & self.0[1].ct_eq(&other.0[1])
                    & self.0[2].ct_eq(&other.0[2])
                    & self.0[3].ct_eq(&other.0[3])
            }
        }

        impl PartialEq for $ty {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.ct_eq(other).into()
            }
        }

        impl ConditionallySelectable for $ty {
            fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
                Self([
                    u64::conditional_select(&a.0[0], &b.0[0], choice),
                    u64::conditional_select(&a.0[1], &b.0[1], choice),
                    u64::conditional_select(&a.0[2], &b.0[2], choice),
                    u64::conditional_select(&a.0[3], &b.0[3], choice),
                ])
            }
        }

        #[cfg(feature = "zeroize")]
        impl DefaultIsZeroes for $ty {}

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x")?;
                for byte in self.to_bytes().iter().rev() {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }

        #[cfg(feature = "serde")]
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
            where
                S: ser::Serializer,
            {
                serdect::array::serialize_hex_lower_or_bin(&self.to_bytes(), serializer)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
            where
                D: de::Deserializer<'de>,
            {
                let mut bytes = [0u8; 32];
                serdect::array::deserialize_hex_or_bin(&mut bytes, deserializer)?;
                Self::from_bytes_checked(&bytes)
                    .into_option()
                    .ok_or_else(|| de::Error::custom("scalar encoding is not canonical (>= P)"))
            }
        }
    };
}

impl_common!(Scalar);
impl_common!(MontScalar);

impl Scalar {
    /// The multiplicative identity in normal form.
    pub const ONE: Self = Self([1, 0, 0, 0]);

    /// Builds a canonical element from a 64-bit integer (spec.md §4.8).
    /// Always in range since `v < 2^64 < P`.
    #[inline]
    pub const fn from_u64(v: u64) -> Self {
        Self([v, 0, 0, 0])
    }

    /// Moves this element into Montgomery form: `to_mont(x) = MontMul(x, R2)`.
    #[inline]
    pub fn to_mont(self) -> MontScalar {
        MontScalar(cios_mul(&self.0, &R2))
    }
}

impl MontScalar {
    /// The multiplicative identity in Montgomery form, i.e. `R mod P`.
    ///
    /// Seed scenario S1: this is the exact encoding `to_mont(from_u64(1))`
    /// produces.
    pub const ONE: Self = Self(R_MOD_P);

    /// Montgomery product: `MontMul(self, rhs) = self * rhs * R^-1 mod P`.
    /// Mont × Mont → Mont.
    #[inline]
    pub fn mul(&self, rhs: &Self) -> Self {
        Self(cios_mul(&self.0, &rhs.0))
    }

    /// Montgomery squaring, `MontMul(self, self)`.
    ///
    /// Defined as a direct wrapper over [`Self::mul`] (spec.md §9's open
    /// question: a specialised squaring path that halves the number of
    /// 64x64 products is a valid follow-up, deliberately deferred here).
    #[inline]
    pub fn sqr(&self) -> Self {
        self.mul(self)
    }

    /// Moves this element out of Montgomery form: `from_mont(x) = MontMul(x, 1)`.
    #[inline]
    pub fn from_mont(self) -> Scalar {
        Scalar(cios_mul(&self.0, &[1, 0, 0, 0]))
    }

    /// Modular exponentiation: `self^exp mod P`, `exp` a raw (non-Montgomery)
    /// 256-bit integer in little-endian limbs (spec.md §4.6).
    #[inline]
    pub fn exp(&self, exp: &[u64; 4]) -> Self {
        Self(exp_raw(&self.0, exp))
    }

    /// Modular inverse via Fermat's little theorem: `self^(P-2) mod P`
    /// (spec.md §4.7). Behaviour for `self = 0` is unspecified (returns
    /// zero); callers must not invert zero.
    pub fn inv(&self) -> Self {
        let (exp, _borrow) = sbb_array(&MODULUS, &[2, 0, 0, 0]);
        self.exp(&exp)
    }
}

/// Constant-time `a < b` over 4-limb little-endian integers: `a - b`
/// borrows out of the top limb exactly when `a < b`.
#[inline]
fn limbs_lt(a: &[u64; 4], b: &[u64; 4]) -> Choice {
    let (_, borrow) = sbb_array(a, b);
    Choice::from(borrow as u8)
}
