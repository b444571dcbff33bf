//! Multiset laws for union, intersection and disjunction

use glkit::collections::{count_map, disjunction, intersection, subtract, union};
use proptest::prelude::*;
use std::collections::HashSet;

fn small_list() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(0u8..8, 0..24)
}

fn count(items: &[u8], x: u8) -> usize {
    items.iter().filter(|&&i| i == x).count()
}

proptest! {
    #[test]
    fn counts_follow_max_min_and_difference(a in small_list(), b in small_list()) {
        let u = union(&a, &b);
        let i = intersection(&a, &b);
        let d = disjunction(&a, &b);
        let keys: HashSet<u8> = a.iter().chain(b.iter()).copied().collect();

        for x in keys {
            let (ca, cb) = (count(&a, x), count(&b, x));
            prop_assert_eq!(count(&u, x), ca.max(cb));
            prop_assert_eq!(count(&i, x), ca.min(cb));
            prop_assert_eq!(count(&d, x), ca.abs_diff(cb));
        }
    }

    #[test]
    fn union_is_intersection_plus_disjunction(a in small_list(), b in small_list()) {
        let u = count_map(union(&a, &b));
        let mut combined = intersection(&a, &b);
        combined.extend(disjunction(&a, &b));
        prop_assert_eq!(u, count_map(combined));
    }

    #[test]
    fn operations_are_commutative_on_counts(a in small_list(), b in small_list()) {
        prop_assert_eq!(count_map(union(&a, &b)), count_map(union(&b, &a)));
        prop_assert_eq!(count_map(intersection(&a, &b)), count_map(intersection(&b, &a)));
        prop_assert_eq!(count_map(disjunction(&a, &b)), count_map(disjunction(&b, &a)));
    }

    #[test]
    fn subtract_removes_at_most_the_other_count(a in small_list(), b in small_list()) {
        let s = subtract(&a, &b);
        for x in 0u8..8 {
            prop_assert_eq!(count(&s, x), count(&a, x).saturating_sub(count(&b, x)));
        }
    }
}
