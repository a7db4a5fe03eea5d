//! Property tests for the BLS12-381 scalar field core (spec.md §8).

use bls12_381_scalar_field::{MontScalar, Scalar};
use proptest::prelude::*;
use rand_core::{OsRng, TryRngCore}; // requires the 'os_rng' feature
use subtle::ConstantTimeEq;

prop_compose! {
    /// A uniformly random canonical `Scalar`, built by rejecting
    /// non-canonical 32-byte draws.
    fn scalar()(bytes in any::<[u8; 32]>()
        .prop_filter("must decode to a canonical element", |b| {
            bool::from(Scalar::from_bytes_checked(b).is_some())
        })
    ) -> Scalar {
        Scalar::from_bytes_checked(&bytes).unwrap()
    }
}

prop_compose! {
    fn mont_scalar()(s in scalar()) -> MontScalar {
        s.to_mont()
    }
}

proptest! {
    #[test]
    fn additive_group_laws(x in mont_scalar(), y in mont_scalar(), z in mont_scalar()) {
        prop_assert_eq!(x.add(&MontScalar::ZERO), x);
        prop_assert_eq!(x.add(&y), y.add(&x));
        prop_assert_eq!(x.add(&y).add(&z), x.add(&y.add(&z)));
        prop_assert_eq!(x.add(&x.neg()), MontScalar::ZERO);
    }

    #[test]
    fn multiplicative_identity(x in mont_scalar()) {
        prop_assert_eq!(x.mul(&MontScalar::ONE), x);
    }

    #[test]
    fn mul_commutative_associative(x in mont_scalar(), y in mont_scalar(), z in mont_scalar()) {
        prop_assert_eq!(x.mul(&y), y.mul(&x));
        prop_assert_eq!(x.mul(&y).mul(&z), x.mul(&y.mul(&z)));
    }

    #[test]
    fn distributivity(x in mont_scalar(), y in mont_scalar(), z in mont_scalar()) {
        prop_assert_eq!(x.mul(&y.add(&z)), x.mul(&y).add(&x.mul(&z)));
    }

    #[test]
    fn round_trip_mont_form(x in scalar()) {
        prop_assert_eq!(x.to_mont().from_mont(), x);
    }

    #[test]
    fn round_trip_bytes(x in scalar()) {
        prop_assert_eq!(Scalar::from_bytes(&x.to_bytes()), x);
    }

    #[test]
    fn sqr_equals_self_mul(x in mont_scalar()) {
        prop_assert_eq!(x.sqr(), x.mul(&x));
    }

    #[test]
    fn fermat_identity(x in mont_scalar()) {
        prop_assume!(!bool::from(x.ct_eq(&MontScalar::ZERO)));
        let exponent = modulus_minus_one();
        prop_assert_eq!(x.exp(&exponent), MontScalar::ONE);
    }

    #[test]
    fn inverse_law(x in mont_scalar()) {
        prop_assume!(!bool::from(x.ct_eq(&MontScalar::ZERO)));
        prop_assert_eq!(x.mul(&x.inv()), MontScalar::ONE);
    }
}

fn modulus_minus_one() -> [u64; 4] {
    use bls12_381_scalar_field::MODULUS;
    let mut exp = MODULUS;
    let (limb0, borrow) = exp[0].overflowing_sub(1);
    exp[0] = limb0;
    debug_assert!(!borrow);
    exp
}

/// Draws a uniformly random canonical scalar from the OS RNG, rejecting
/// non-canonical 32-byte draws the same way `scalar()`'s proptest strategy
/// does above.
fn random_scalar() -> Scalar {
    let mut rng = OsRng.unwrap_mut();
    loop {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        if let Some(s) = Scalar::from_bytes_checked(&bytes).into_option() {
            return s;
        }
    }
}

#[test]
fn os_rng_sampled_scalar_obeys_inverse_law() {
    let x = random_scalar().to_mont();
    if bool::from(x.ct_eq(&MontScalar::ZERO)) {
        return;
    }
    assert_eq!(x.mul(&x.inv()), MontScalar::ONE);
}
