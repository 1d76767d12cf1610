//! Symbol tree nodes and their structural metrics.
//!
//! This module defines `SymbolNode`, the ordered labeled tree node the rest
//! of the crate operates on, together with the per-subtree metrics: Shannon
//! entropy of child labels, weighted and recursive entropy aggregates, the
//! attractor stability score, and the order-independent structural hash.

use std::collections::HashMap;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Derived annotations written by motif detection.
///
/// Kept separate from the caller-supplied metadata map so engine-computed
/// state never aliases caller input. Populated only by
/// [`mark_duplicates`](crate::motif::mark_duplicates); absence of a mark
/// means "not a duplicate".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    /// True when this node belongs to a motif group (≥2 structurally
    /// identical subtrees).
    pub duplicate: bool,
    /// The canonical signature shared by the motif group, if any.
    pub motif_signature: Option<String>,
}

/// A node in an ordered, labeled symbol tree.
///
/// Children are exclusively owned by their parent, so the tree is acyclic
/// and finite by construction. The label is mutable (rebinding replaces
/// it); metadata holds caller-supplied attributes, of which `weight`
/// (float, default 1.0) scales entropy.
///
/// Read-only metric traversals ([`entropy`](Self::entropy),
/// [`hash`](Self::hash), [`traverse`](Self::traverse)) are kept separate
/// from mutating passes ([`traverse_mut`](Self::traverse_mut)) at the
/// interface level.
///
/// # Example
///
/// ```rust
/// use semio_core::SymbolNode;
///
/// let mut root = SymbolNode::new("R");
/// root.add_child(SymbolNode::new("A"));
/// root.add_child(SymbolNode::new("A"));
/// root.add_child(SymbolNode::new("B"));
///
/// // Two distinct labels among three children
/// assert!(root.entropy() > 0.9 && root.entropy() < 0.92);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolNode {
    /// Symbolic label; replaced in place by rebinding
    label: String,

    /// Caller-supplied attributes (recognized key: `weight`)
    meta: Map<String, Value>,

    /// Engine-derived motif annotations
    annotations: Annotations,

    /// Ordered children, exclusively owned
    children: Vec<SymbolNode>,
}

impl SymbolNode {
    /// Create a leaf node with the given label and empty metadata.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            meta: Map::new(),
            annotations: Annotations::default(),
            children: Vec::new(),
        }
    }

    /// Attach caller-supplied metadata, builder style.
    ///
    /// # Example
    ///
    /// ```rust
    /// use semio_core::SymbolNode;
    /// use serde_json::{json, Map};
    ///
    /// let mut meta = Map::new();
    /// meta.insert("weight".into(), json!(2.0));
    /// let node = SymbolNode::new("A").with_meta(meta);
    /// assert_eq!(node.weight(), 2.0);
    /// ```
    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = meta;
        self
    }

    /// Returns the node's label.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace the node's label (rebinding).
    #[inline]
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Returns the caller-supplied metadata map.
    #[inline]
    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    /// Returns the entropy weight, `meta["weight"]` defaulting to 1.0.
    pub fn weight(&self) -> f64 {
        self.meta.get("weight").and_then(Value::as_f64).unwrap_or(1.0)
    }

    /// Returns the derived motif annotations.
    #[inline]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// True when motif detection marked this node as a duplicate.
    #[inline]
    pub fn is_duplicate(&self) -> bool {
        self.annotations.duplicate
    }

    /// The motif signature set by duplicate marking, if any.
    #[inline]
    pub fn motif_signature(&self) -> Option<&str> {
        self.annotations.motif_signature.as_deref()
    }

    /// Mark this node as a member of a motif group.
    pub(crate) fn mark_motif(&mut self, signature: &str) {
        self.annotations.duplicate = true;
        self.annotations.motif_signature = Some(signature.to_string());
    }

    /// Append a child, preserving insertion order.
    pub fn add_child(&mut self, child: SymbolNode) {
        self.children.push(child);
    }

    /// Returns the ordered children.
    #[inline]
    pub fn children(&self) -> &[SymbolNode] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [SymbolNode] {
        &mut self.children
    }

    /// Shannon entropy (base 2) of the empirical distribution of immediate
    /// child labels.
    ///
    /// Not recursive and not weighted by subtree size. A node with zero or
    /// one child has entropy 0.0. Only materialized labels contribute, so
    /// no `log2(0)` term ever appears.
    pub fn entropy(&self) -> f64 {
        if self.children.is_empty() {
            return 0.0;
        }
        let mut freq: HashMap<&str, usize> = HashMap::new();
        for child in &self.children {
            *freq.entry(child.label.as_str()).or_insert(0) += 1;
        }
        let total = self.children.len() as f64;
        -freq
            .values()
            .map(|&count| {
                let p = count as f64 / total;
                p * p.log2()
            })
            .sum::<f64>()
    }

    /// `entropy()` scaled by the node's `weight` metadata.
    pub fn weighted_entropy(&self) -> f64 {
        self.entropy() * self.weight()
    }

    /// Weighted entropy summed over the whole subtree.
    ///
    /// Additive and independent of child order.
    pub fn recursive_entropy(&self) -> f64 {
        self.weighted_entropy()
            + self
                .children
                .iter()
                .map(SymbolNode::recursive_entropy)
                .sum::<f64>()
    }

    /// Stability heuristic in (0, 1].
    ///
    /// `round(1 / (1 + |weighted_entropy − Σ child.entropy()|), 4)`.
    /// Exactly 1.0 when the node's weighted dispersion agrees with its
    /// children's raw dispersion.
    pub fn attractor_score(&self) -> f64 {
        let base = self.weighted_entropy();
        let child_sum: f64 = self.children.iter().map(SymbolNode::entropy).sum();
        let stability = 1.0 / (1.0 + (base - child_sum).abs());
        (stability * 10_000.0).round() / 10_000.0
    }

    /// Deterministic structural hash of the subtree, hex-encoded SHA-256.
    ///
    /// Child hashes are sorted (as hex strings, not by label) before being
    /// concatenated, so the hash is invariant under any permutation of
    /// sibling storage order. Two nodes with different labels but equal
    /// sorted child hashes still differ through their own label; equal
    /// subtree hashes under different child labels collapse at the join
    /// step. That collapsing is intentional structural hashing, not
    /// label-aware identity.
    ///
    /// Leaf hash = `SHA256("{label}:")`.
    pub fn hash(&self) -> String {
        let mut child_hashes: Vec<String> =
            self.children.iter().map(SymbolNode::hash).collect();
        child_hashes.sort();
        let raw = format!("{}:{}", self.label, child_hashes.concat());
        hex::encode(Sha256::digest(raw.as_bytes()))
    }

    /// Depth-first pre-order read-only traversal.
    ///
    /// Applies `visit` to every node in the subtree (including self) before
    /// descending into children, left to right as stored.
    pub fn traverse<F: FnMut(&SymbolNode)>(&self, visit: &mut F) {
        visit(self);
        for child in &self.children {
            child.traverse(visit);
        }
    }

    /// Depth-first pre-order mutating traversal.
    ///
    /// The mutating counterpart of [`traverse`](Self::traverse), used for
    /// side-effecting passes such as rebinding. Each node is visited
    /// exactly once, so a label rewritten by `visit` is not re-examined in
    /// the same pass.
    pub fn traverse_mut<F: FnMut(&mut SymbolNode)>(&mut self, visit: &mut F) {
        visit(self);
        for child in &mut self.children {
            child.traverse_mut(visit);
        }
    }
}
