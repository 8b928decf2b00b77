//! Internal node combination rule.

use mdrop_core::base::{Hash256, keccak256};

/// Combine two sibling nodes into their parent.
///
/// The pair is ordered byte-wise before hashing (`keccak256(min || max)`), so the result
/// does not depend on which side each child sits.
#[must_use]
pub fn hash_pair(a: &Hash256, b: &Hash256) -> Hash256 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    keccak256([low.to_bytes(), high.to_bytes()].concat())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_does_not_matter() {
        let a = Hash256::new([1_u8; 32]);
        let b = Hash256::new([2_u8; 32]);

        assert_eq!(hash_pair(&a, &b), hash_pair(&b, &a));
    }

    #[test]
    fn hashes_low_then_high() {
        let low = Hash256::new([1_u8; 32]);
        let high = Hash256::new([2_u8; 32]);

        let expected = keccak256([[1_u8; 32], [2_u8; 32]].concat());
        assert_eq!(hash_pair(&high, &low), expected);
        assert_ne!(
            hash_pair(&high, &low),
            keccak256([[2_u8; 32], [1_u8; 32]].concat())
        );
    }

    #[test]
    fn equal_children_still_hash() {
        let a = Hash256::new([7_u8; 32]);
        assert_eq!(hash_pair(&a, &a), keccak256([[7_u8; 32], [7_u8; 32]].concat()));
    }
}
