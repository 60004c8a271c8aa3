//! Fixed 16-leaf order-commitment Merkle tree.
//!
//! The verifier's circuit is compiled against exactly 16 leaves, so the
//! tree here never varies in shape: inputs shorter than 16 are zero-padded,
//! and inputs longer than 16 are rejected rather than silently truncated.

pub const LEAF_COUNT: usize = 16;
pub const TREE_DEPTH: u32 = 4;

use field_math::{hash_pair, FieldElement};

/// Builds the order-commitment root for up to 16 leaves, zero-padding any
/// remaining slots.
///
/// # Panics
///
/// Panics if `leaves.len() > LEAF_COUNT`; the batch-state invariant
/// (`orders.len() <= 16`) must be enforced by the caller before reaching
/// this point.
pub fn compute_root(leaves: &[FieldElement]) -> FieldElement {
    assert!(
        leaves.len() <= LEAF_COUNT,
        "order-merkle: batch has more than {LEAF_COUNT} orders"
    );

    let mut level: Vec<FieldElement> = leaves.to_vec();
    level.resize(LEAF_COUNT, FieldElement::zero());

    while level.len() > 1 {
        level = level
            .chunks_exact(2)
            .map(|pair| hash_pair(pair[0], pair[1]))
            .collect();
    }
    level[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(v: u128) -> FieldElement {
        FieldElement::from_u128(v)
    }

    #[test]
    fn zero_orders_is_a_fixed_constant() {
        let empty_root = compute_root(&[]);
        let all_zero_root = compute_root(&vec![FieldElement::zero(); LEAF_COUNT]);
        assert_eq!(empty_root, all_zero_root);
    }

    #[test]
    fn one_order_goes_at_position_zero() {
        let single = compute_root(&[leaf(5)]);

        let mut padded = vec![leaf(5)];
        padded.resize(LEAF_COUNT, FieldElement::zero());
        let explicit = compute_root(&padded);

        assert_eq!(single, explicit);
    }

    #[test]
    fn same_orders_give_same_root() {
        let leaves = vec![leaf(1), leaf(2), leaf(3)];
        assert_eq!(compute_root(&leaves), compute_root(&leaves));
    }

    #[test]
    fn different_orders_give_different_roots() {
        let a = compute_root(&[leaf(1), leaf(2)]);
        let b = compute_root(&[leaf(2), leaf(1)]);
        assert_ne!(a, b);
    }

    #[test]
    fn two_leaf_root_is_symmetric_under_pair_sorting() {
        // hash_pair itself is commutative, so swapping two leaves that sit
        // in the same pair position produces the same root.
        let root_l1_l2 = compute_root(&{
            let mut v = vec![leaf(11), leaf(22)];
            v.resize(LEAF_COUNT, FieldElement::zero());
            v
        });
        let root_l2_l1 = compute_root(&{
            let mut v = vec![leaf(22), leaf(11)];
            v.resize(LEAF_COUNT, FieldElement::zero());
            v
        });
        assert_eq!(root_l1_l2, root_l2_l1);
    }

    #[test]
    #[should_panic(expected = "more than 16 orders")]
    fn rejects_too_many_leaves() {
        compute_root(&vec![FieldElement::zero(); LEAF_COUNT + 1]);
    }
}
