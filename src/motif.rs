//! Motif detection: grouping nodes by canonical signature.
//!
//! A motif is a set of two or more nodes, possibly across different trees,
//! whose subtrees share an identical canonical signature. The index is
//! derived state: it is fully rebuilt on every detection call, never
//! invalidated incrementally.

use std::collections::HashMap;

use crate::node::SymbolNode;

/// Address of a node within a forest: root index followed by the child
/// index at each level down.
pub type NodePath = Vec<usize>;

/// Index of every node in a forest, grouped by canonical signature.
///
/// Built in a single bottom-up pass that reuses child signatures while
/// indexing, which keeps the cost proportional to the total output size
/// instead of recomputing each signature from scratch per node. The
/// resulting groups are identical to naive per-node recomputation since
/// signatures are pure functions of the subtree at build time.
///
/// # Example
///
/// ```rust
/// use semio_core::{MotifIndex, SymbolNode};
///
/// let mut root = SymbolNode::new("R");
/// root.add_child(SymbolNode::new("A"));
/// root.add_child(SymbolNode::new("A"));
/// root.add_child(SymbolNode::new("B"));
///
/// let index = MotifIndex::build(std::slice::from_ref(&root));
/// let motifs: Vec<_> = index.motifs().collect();
/// assert_eq!(motifs.len(), 1);
/// assert_eq!(motifs[0].0, "A()");
/// assert_eq!(motifs[0].1.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MotifIndex {
    /// Signature to member-node paths, singletons included
    buckets: HashMap<String, Vec<NodePath>>,
}

impl MotifIndex {
    /// Build a fresh index over the full subtree of every given root.
    pub fn build(roots: &[SymbolNode]) -> Self {
        let mut index = Self::default();
        for (i, root) in roots.iter().enumerate() {
            let mut path = vec![i];
            index.index_subtree(root, &mut path);
        }
        index
    }

    /// Index `node` and every descendant, returning `node`'s signature.
    fn index_subtree(&mut self, node: &SymbolNode, path: &mut NodePath) -> String {
        let mut child_sigs = Vec::with_capacity(node.children().len());
        for (i, child) in node.children().iter().enumerate() {
            path.push(i);
            child_sigs.push(self.index_subtree(child, path));
            path.pop();
        }
        child_sigs.sort();
        let sig = format!("{}({})", node.label(), child_sigs.join(","));
        self.buckets.entry(sig.clone()).or_default().push(path.clone());
        sig
    }

    /// Iterate over motif groups: signatures with more than one member.
    ///
    /// Singleton signatures are not motifs and are never yielded.
    pub fn motifs(&self) -> impl Iterator<Item = (&str, &[NodePath])> {
        self.buckets
            .iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(sig, paths)| (sig.as_str(), paths.as_slice()))
    }

    /// Number of motif groups (not total indexed signatures).
    pub fn motif_count(&self) -> usize {
        self.buckets.values().filter(|paths| paths.len() > 1).count()
    }

    /// Member paths for a specific signature, singletons included.
    pub fn members(&self, signature: &str) -> Option<&[NodePath]> {
        self.buckets.get(signature).map(Vec::as_slice)
    }

    /// Total number of distinct signatures indexed.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// True when nothing has been indexed.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Detect motifs and mark every member node.
///
/// Members receive `duplicate = true` and the group signature in their
/// derived annotations. Nodes with unique signatures are left untouched:
/// no mark is forced to false. Returns the index so callers can retain
/// the motif groups that were applied.
pub fn mark_duplicates(roots: &mut [SymbolNode]) -> MotifIndex {
    let index = MotifIndex::build(roots);
    for (sig, paths) in index.motifs() {
        for path in paths {
            if let Some(node) = node_at_mut(roots, path) {
                node.mark_motif(sig);
            }
        }
    }
    index
}

/// Resolve a path to a mutable node reference.
fn node_at_mut<'a>(roots: &'a mut [SymbolNode], path: &NodePath) -> Option<&'a mut SymbolNode> {
    let (&root_idx, rest) = path.split_first()?;
    let mut node = roots.get_mut(root_idx)?;
    for &i in rest {
        node = node.children_mut().get_mut(i)?;
    }
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical;

    fn fanout(label: &str, child_labels: &[&str]) -> SymbolNode {
        let mut node = SymbolNode::new(label);
        for l in child_labels {
            node.add_child(SymbolNode::new(*l));
        }
        node
    }

    #[test]
    fn test_no_repeats_yields_no_motifs() {
        let roots = vec![fanout("R", &["A", "B", "C"])];
        let index = MotifIndex::build(&roots);
        assert_eq!(index.motif_count(), 0);
        assert!(index.motifs().next().is_none());
    }

    #[test]
    fn test_repeated_leaves_form_one_motif() {
        let roots = vec![fanout("R", &["A", "A", "B"])];
        let index = MotifIndex::build(&roots);

        let motifs: Vec<_> = index.motifs().collect();
        assert_eq!(motifs.len(), 1);
        let (sig, paths) = motifs[0];
        assert_eq!(sig, "A()");
        assert_eq!(paths.len(), 2);
        assert_eq!(paths, &[vec![0, 0], vec![0, 1]]);
    }

    #[test]
    fn test_motifs_span_trees() {
        // Identical subtree under two different roots
        let mut first = SymbolNode::new("R1");
        first.add_child(fanout("X", &["A", "B"]));
        let mut second = SymbolNode::new("R2");
        second.add_child(fanout("X", &["B", "A"]));

        let roots = vec![first, second];
        let index = MotifIndex::build(&roots);

        // X(A(),B()) recurs, as do the A and B leaves themselves
        assert_eq!(index.members("X(A(),B())").map(|paths| paths.len()), Some(2));
        assert_eq!(index.motif_count(), 3);
    }

    #[test]
    fn test_index_signatures_match_canonical() {
        let roots = vec![fanout("R", &["A", "A"])];
        let index = MotifIndex::build(&roots);
        assert!(index.members(&canonical::signature(&roots[0])).is_some());
    }

    #[test]
    fn test_mark_duplicates_sets_annotations() {
        let mut roots = vec![fanout("R", &["A", "A", "B"])];
        mark_duplicates(&mut roots);

        let children = roots[0].children();
        assert!(children[0].is_duplicate());
        assert_eq!(children[0].motif_signature(), Some("A()"));
        assert!(children[1].is_duplicate());
        assert_eq!(children[1].motif_signature(), Some("A()"));
        // Unique node left untouched, no mark forced to false
        assert!(!children[2].is_duplicate());
        assert_eq!(children[2].motif_signature(), None);
    }

    #[test]
    fn test_mark_duplicates_is_stable() {
        let mut roots = vec![fanout("R", &["A", "A"])];
        mark_duplicates(&mut roots);
        let snapshot = roots.clone();
        mark_duplicates(&mut roots);
        assert_eq!(roots, snapshot);
    }

    #[test]
    fn test_rebuild_replaces_index() {
        let roots = vec![fanout("R", &["A", "A"])];
        let index = MotifIndex::build(&roots);
        assert_eq!(index.motif_count(), 1);

        let unique = vec![fanout("R", &["A", "B"])];
        let index = MotifIndex::build(&unique);
        assert_eq!(index.motif_count(), 0);
    }
}
