//! Canonical signature extraction.
//!
//! A canonical signature is the label-aware, order-independent string form
//! of a subtree: `"label(sig_1,sig_2,...)"` with child signatures sorted
//! lexicographically at every level. Two subtrees have equal signatures iff
//! they are isomorphic as labeled trees under reordering of siblings; this
//! is the defining equivalence for a motif.
//!
//! Signatures differ from [`SymbolNode::hash`](crate::SymbolNode::hash) in
//! that they carry every label verbatim rather than a digest, so they are
//! readable in diagnostics at the cost of size.

use crate::node::SymbolNode;

/// Compute the canonical signature of a subtree.
///
/// # Example
///
/// ```rust
/// use semio_core::{canonical, SymbolNode};
///
/// let mut root = SymbolNode::new("R");
/// root.add_child(SymbolNode::new("B"));
/// root.add_child(SymbolNode::new("A"));
/// assert_eq!(canonical::signature(&root), "R(A(),B())");
/// ```
pub fn signature(node: &SymbolNode) -> String {
    let mut child_sigs: Vec<String> = node.children().iter().map(signature).collect();
    child_sigs.sort();
    format!("{}({})", node.label(), child_sigs.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_signature() {
        assert_eq!(signature(&SymbolNode::new("A")), "A()");
    }

    #[test]
    fn test_children_sorted_lexicographically() {
        let mut node = SymbolNode::new("R");
        node.add_child(SymbolNode::new("C"));
        node.add_child(SymbolNode::new("A"));
        node.add_child(SymbolNode::new("B"));
        assert_eq!(signature(&node), "R(A(),B(),C())");
    }

    #[test]
    fn test_isomorphic_reordering_equal_signature_and_hash() {
        let mut left = SymbolNode::new("R");
        let mut inner = SymbolNode::new("X");
        inner.add_child(SymbolNode::new("A"));
        inner.add_child(SymbolNode::new("B"));
        left.add_child(inner);
        left.add_child(SymbolNode::new("Y"));

        let mut right = SymbolNode::new("R");
        right.add_child(SymbolNode::new("Y"));
        let mut inner = SymbolNode::new("X");
        inner.add_child(SymbolNode::new("B"));
        inner.add_child(SymbolNode::new("A"));
        right.add_child(inner);

        assert_eq!(signature(&left), signature(&right));
        assert_eq!(left.hash(), right.hash());
    }

    #[test]
    fn test_nested_signature_shape() {
        let mut node = SymbolNode::new("R");
        let mut x = SymbolNode::new("X");
        x.add_child(SymbolNode::new("A"));
        node.add_child(x);
        assert_eq!(signature(&node), "R(X(A()))");
    }

    #[test]
    fn test_different_labels_different_signature() {
        assert_ne!(signature(&SymbolNode::new("A")), signature(&SymbolNode::new("B")));
    }
}
