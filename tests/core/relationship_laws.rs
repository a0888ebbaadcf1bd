//! Relationship Law Tests
//!
//! Algebraic properties of `relationship` over arbitrary contracts.

use crate::common::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn reflexive(a in arb_contract()) {
        prop_assert_eq!(relationship(&a, &a), Relationship::Equal);
    }

    #[test]
    fn inverse_symmetric(a in arb_contract(), b in arb_contract()) {
        prop_assert_eq!(relationship(&a, &b), relationship(&b, &a).inverse());
    }

    #[test]
    fn any_is_top(a in arb_contract()) {
        let rel = relationship(&Contract::any(), &a);
        prop_assert!(rel.accepts());
    }

    #[test]
    fn double_complement_collapses(a in arb_contract()) {
        let twice = Contract::complement(Contract::complement(a.clone()));
        prop_assert_eq!(relationship(&twice, &a), Relationship::Equal);
    }

    #[test]
    fn union_accepts_its_branches(a in arb_contract(), b in arb_contract()) {
        let u = Contract::union(a.clone(), b.clone());
        prop_assert!(relationship(&u, &a).accepts());
        prop_assert!(relationship(&u, &b).accepts());
    }
}

#[test]
fn integer_is_subset_of_float() {
    assert_eq!(
        relationship(&Contract::integer(), &Contract::float()),
        Relationship::Subset
    );
}

#[test]
fn wider_record_is_subset() {
    let narrow = Contract::record([("a", Contract::integer())]);
    let wide = Contract::record([("a", Contract::integer()), ("b", Contract::string())]);
    assert_eq!(relationship(&wide, &narrow), Relationship::Subset);
    assert_eq!(relationship(&narrow, &wide), Relationship::Superset);
}

#[test]
fn signatures_need_matching_shape() {
    let one = Contract::signature(vec![Contract::integer()]);
    let two = Contract::signature(vec![Contract::integer(), Contract::integer()]);
    let one_way = Contract::Signature(Signature::one_way(vec![Contract::integer()]));
    assert_eq!(relationship(&one, &two), Relationship::Unrelated);
    assert_eq!(relationship(&one, &one_way), Relationship::Unrelated);
}

#[test]
fn complement_of_disjoint_is_superset() {
    let not_string = Contract::complement(Contract::string());
    assert_eq!(
        relationship(&not_string, &Contract::integer()),
        Relationship::Superset
    );
    assert_eq!(
        relationship(&not_string, &Contract::string()),
        Relationship::Unrelated
    );
}

#[test]
fn user_primitives_follow_parents() {
    let rt = Runtime::new();
    let shape = rt.registry().define("shape", None).unwrap();
    let circle = rt.registry().define("circle", Some(&shape)).unwrap();
    assert_eq!(
        relationship(&Contract::Primitive(shape), &Contract::Primitive(circle)),
        Relationship::Superset
    );
}
