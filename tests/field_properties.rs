use num_bigint::BigUint;
use proptest::prelude::*;

use aiip::gf::{FieldContext, FieldElement};
use aiip::AiipInstance;

fn gf81() -> FieldContext {
    FieldContext::from_order(81).unwrap()
}

fn gf_prime() -> FieldContext {
    FieldContext::prime(131_071u32).unwrap()
}

fn arb_gf81() -> impl Strategy<Value = FieldElement> {
    (0u64..81).prop_map(|v| gf81().element(v))
}

fn arb_gf81_nonzero() -> impl Strategy<Value = FieldElement> {
    (1u64..81).prop_map(|v| gf81().element(v))
}

fn arb_prime() -> impl Strategy<Value = FieldElement> {
    (0u64..131_071).prop_map(|v| gf_prime().element(v))
}

// ===== Field axioms =====

proptest! {
    #[test]
    fn addition_commutative(a in arb_gf81(), b in arb_gf81()) {
        prop_assert_eq!(&a + &b, &b + &a);
    }
}

proptest! {
    #[test]
    fn multiplication_associative(a in arb_gf81(), b in arb_gf81(), c in arb_gf81()) {
        prop_assert_eq!(&(&a * &b) * &c, &a * &(&b * &c));
    }
}

proptest! {
    #[test]
    fn distributive(a in arb_gf81(), b in arb_gf81(), c in arb_gf81()) {
        prop_assert_eq!(&a * &(&b + &c), &(&a * &b) + &(&a * &c));
    }
}

proptest! {
    #[test]
    fn additive_inverse(a in arb_gf81()) {
        prop_assert!((&a + &(-&a)).is_zero());
        prop_assert_eq!(&a - &a, gf81().zero());
    }
}

proptest! {
    #[test]
    fn multiplicative_inverse(a in arb_gf81_nonzero()) {
        let inv = a.inverse().unwrap();
        prop_assert!((&a * &inv).is_one());
        prop_assert_eq!(a.div(&a).unwrap(), gf81().one());
    }
}

proptest! {
    #[test]
    fn square_matches_mul(a in arb_prime()) {
        prop_assert_eq!(a.square(), &a * &a);
    }
}

proptest! {
    #[test]
    fn fermat(a in arb_gf81_nonzero()) {
        prop_assert!(a.pow(&BigUint::from(80u32)).is_one());
    }
}

// ===== Vector isomorphism =====

proptest! {
    #[test]
    fn vector_round_trip(a in arb_gf81()) {
        let field = gf81();
        prop_assert_eq!(field.from_vector(a.to_vector()).unwrap(), a.clone());
        prop_assert_eq!(field.from_integer(&a.to_integer()).unwrap(), a);
    }
}

proptest! {
    #[test]
    fn vector_to_element_round_trip(coords in proptest::collection::vec(0u32..3, 4)) {
        let coords: Vec<BigUint> = coords.into_iter().map(BigUint::from).collect();
        let element = gf81().from_vector(coords.clone()).unwrap();
        prop_assert_eq!(element.to_vector(), coords);
    }
}

proptest! {
    #[test]
    fn addition_is_coordinatewise(a in arb_gf81(), b in arb_gf81()) {
        let sum = (&a + &b).to_vector();
        for (w, s) in sum.iter().enumerate() {
            prop_assert_eq!(s, &((&a.to_vector()[w] + &b.to_vector()[w]) % 3u32));
        }
    }
}

// ===== Quadratic character =====

proptest! {
    #[test]
    fn squares_are_residues(a in arb_gf81_nonzero()) {
        prop_assert!(a.square().is_quadratic_residue());
        prop_assert_eq!(a.square().legendre(), 1);
    }
}

// ===== Iteration =====

proptest! {
    #[test]
    fn iteration_consistency(x in arb_prime(), alpha in 0u64..131_071, n in 1usize..12) {
        let field = gf_prime();
        let instance = AiipInstance::new(field.clone(), field.element(alpha), n).unwrap();
        let penultimate = instance.iterate_n(&x, n - 1).unwrap();
        prop_assert_eq!(
            instance.iterate(&x).unwrap(),
            instance.iterate_n(&penultimate, 1).unwrap()
        );
        prop_assert_eq!(instance.iterate_n(&x, 0).unwrap(), x);
    }
}

proptest! {
    #[test]
    fn chain_is_valid(x in arb_gf81(), alpha in 0u64..81, n in 0usize..10) {
        let field = gf81();
        let instance = AiipInstance::new(field.clone(), field.element(alpha), n).unwrap();
        let chain = instance.chain(&x).unwrap();
        prop_assert!(chain.is_valid_for(&instance));
        prop_assert_eq!(chain.target(), &instance.iterate(&x).unwrap());
    }
}
