//! Symbolic engine: forest orchestration.
//!
//! The engine owns a forest of [`SymbolNode`] roots and drives the
//! multi-step passes over it: symbol rebinding, compression (canonicalize,
//! mark duplicates, aggregate entropy), interchange (de)serialization, and
//! the entry points for motif detection and graph export.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{Result, SemioError};
use crate::export;
use crate::motif::{self, MotifIndex};
use crate::node::SymbolNode;

/// Advisory recursion configuration.
///
/// Carried and exposed for forward compatibility; no current operation
/// enforces either field. Recursive passes are bounded only by actual
/// tree depth, which is a caller responsibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecursionPolicy {
    /// Traversal/recursion depth advisory
    pub max_depth: u32,
    /// Reserved for future entropy-based pruning
    pub entropy_threshold: f64,
}

impl Default for RecursionPolicy {
    fn default() -> Self {
        Self {
            max_depth: 10,
            entropy_threshold: 0.05,
        }
    }
}

/// Per-root analysis result produced by [`SymbolicEngine::compress`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedRoot {
    /// Hex-encoded structural hash of the root's subtree
    pub hash: String,
    /// Recursive (weighted, whole-subtree) entropy
    pub entropy: f64,
    /// Attractor stability score in (0, 1]
    pub attractor: f64,
}

/// Orchestrates a forest of symbol trees.
///
/// Lifecycle: the forest is created by [`load_structure`](Self::load_structure),
/// [`load_structure_from`](Self::load_structure_from), or
/// [`set_roots`](Self::set_roots), each replacing any prior forest. Nodes
/// are mutated only through rebinding (label change) and duplicate marking
/// (annotation writes); there is no node deletion short of whole-forest
/// replacement.
///
/// # Binding contract
///
/// [`apply_bindings`](Self::apply_bindings) performs exactly one
/// substitution pass per call, so a binding cycle (`A -> B, B -> A`) does
/// not loop, but repeated calls would oscillate those labels. Bindings
/// should be confluent; cycle detection is deliberately not performed.
///
/// # Example
///
/// ```rust
/// use semio_core::{SymbolicEngine, SymbolNode};
///
/// let mut root = SymbolNode::new("R");
/// root.add_child(SymbolNode::new("A"));
/// root.add_child(SymbolNode::new("A"));
/// root.add_child(SymbolNode::new("B"));
///
/// let mut engine = SymbolicEngine::default();
/// engine.set_roots(vec![root]);
///
/// let results = engine.compress();
/// assert_eq!(results.len(), 1);
/// assert!(engine.roots()[0].children()[0].is_duplicate());
/// ```
#[derive(Debug, Default)]
pub struct SymbolicEngine {
    /// Forest roots, ordered, exclusively owned
    roots: Vec<SymbolNode>,

    /// Old label to new label; replaced wholesale on bind
    bindings: HashMap<String, String>,

    /// Advisory recursion configuration
    recursion_policy: RecursionPolicy,

    /// Derived signature index; fully rebuilt on every detection call
    motif_index: MotifIndex,
}

impl SymbolicEngine {
    /// Create an engine with an empty forest and default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the forest roots in order.
    #[inline]
    pub fn roots(&self) -> &[SymbolNode] {
        &self.roots
    }

    /// Mutable access to the roots, for attaching children after loading.
    #[inline]
    pub fn roots_mut(&mut self) -> &mut [SymbolNode] {
        &mut self.roots
    }

    /// Replace the forest with an already-built one.
    pub fn set_roots(&mut self, roots: Vec<SymbolNode>) {
        self.roots = roots;
    }

    /// Returns the advisory recursion policy.
    #[inline]
    pub fn recursion_policy(&self) -> RecursionPolicy {
        self.recursion_policy
    }

    /// Replace the advisory recursion policy.
    pub fn set_recursion_policy(&mut self, policy: RecursionPolicy) {
        self.recursion_policy = policy;
    }

    /// Returns the motif index from the most recent detection pass.
    #[inline]
    pub fn motif_index(&self) -> &MotifIndex {
        &self.motif_index
    }

    /// Replace the forest from plain descriptions.
    ///
    /// Each description is an object supplying a required `label` and an
    /// optional `meta` mapping; this level only, children are attached
    /// separately by the caller through [`SymbolNode::add_child`] (reach
    /// them via [`roots_mut`](Self::roots_mut)).
    ///
    /// Loading is all-or-nothing: on [`SemioError::MalformedInput`] the
    /// prior forest is left intact.
    pub fn load_structure(&mut self, descriptions: &[Value]) -> Result<()> {
        let mut roots = Vec::with_capacity(descriptions.len());
        for (index, description) in descriptions.iter().enumerate() {
            let label = description
                .get("label")
                .and_then(Value::as_str)
                .ok_or(SemioError::MalformedInput { index, field: "label" })?;
            let meta = description
                .get("meta")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            roots.push(SymbolNode::new(label).with_meta(meta));
        }
        self.roots = roots;
        Ok(())
    }

    /// Replace `bindings` wholesale (not merged); last load wins.
    pub fn bind_symbols(&mut self, alias_map: HashMap<String, String>) {
        self.bindings = alias_map;
    }

    /// Apply one substitution pass over every root.
    ///
    /// Depth-first pre-order; a node whose label is a binding key gets the
    /// bound value. Substitution is not transitive within a pass (a node
    /// relabeled to `X` is not re-checked against `bindings["X"]`), and the
    /// pass reaches a fixed point once no label is a binding key.
    pub fn apply_bindings(&mut self) {
        if self.bindings.is_empty() {
            return;
        }
        let Self { roots, bindings, .. } = self;
        for root in roots.iter_mut() {
            root.traverse_mut(&mut |node| {
                if let Some(bound) = bindings.get(node.label()) {
                    debug!(from = node.label(), to = bound.as_str(), "rebinding symbol");
                    node.set_label(bound.clone());
                }
            });
        }
    }

    /// Rebuild the motif index over the whole forest.
    ///
    /// The previous index is discarded; there is no incremental
    /// invalidation. Returns the fresh index.
    pub fn detect_motifs(&mut self) -> &MotifIndex {
        self.motif_index = MotifIndex::build(&self.roots);
        &self.motif_index
    }

    /// Primary analysis entry point.
    ///
    /// Runs [`apply_bindings`](Self::apply_bindings), marks duplicates
    /// across the forest, then computes `(hash, recursive_entropy,
    /// attractor_score)` per root in root order.
    ///
    /// Mutates node labels (via bindings) and annotations (via duplicate
    /// marking), so it is not idempotent on raw input; a second call on
    /// its own output is a no-op apart from recomputing the same marks.
    pub fn compress(&mut self) -> Vec<CompressedRoot> {
        self.apply_bindings();
        self.motif_index = motif::mark_duplicates(&mut self.roots);
        self.roots
            .iter()
            .map(|root| {
                let result = CompressedRoot {
                    hash: root.hash(),
                    entropy: root.recursive_entropy(),
                    attractor: root.attractor_score(),
                };
                info!(
                    label = root.label(),
                    hash_prefix = &result.hash[..10],
                    entropy = result.entropy,
                    attractor = result.attractor,
                    "compressed root"
                );
                result
            })
            .collect()
    }

    /// Serialize the forest to the nested interchange form.
    ///
    /// Each node becomes `{"label", "meta", "children"}` with children in
    /// stored order. Derived annotations and hashes are not persisted;
    /// both are recomputed on demand.
    pub fn export_structure(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Record<'a> {
            label: &'a str,
            meta: &'a Map<String, Value>,
            children: Vec<Record<'a>>,
        }

        fn serialize(node: &SymbolNode) -> Record<'_> {
            Record {
                label: node.label(),
                meta: node.meta(),
                children: node.children().iter().map(serialize).collect(),
            }
        }

        let records: Vec<Record<'_>> = self.roots.iter().map(serialize).collect();
        serde_json::to_string_pretty(&records)
            .map_err(|e| SemioError::Serialization(e.to_string()))
    }

    /// Replace the forest from interchange text produced by
    /// [`export_structure`](Self::export_structure).
    ///
    /// Fails with [`SemioError::Serialization`] when the text is not the
    /// expected nested shape and [`SemioError::MalformedInput`] when a
    /// record lacks a `label`; the prior forest is untouched on failure.
    pub fn load_structure_from(&mut self, text: &str) -> Result<()> {
        let decoded: Value =
            serde_json::from_str(text).map_err(|e| SemioError::Serialization(e.to_string()))?;
        let records = decoded.as_array().ok_or_else(|| {
            SemioError::Serialization("expected a top-level array of node records".into())
        })?;

        let mut roots = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            roots.push(Self::deserialize_node(record, index)?);
        }
        self.roots = roots;
        Ok(())
    }

    /// Deserialize one nested node record; `index` names the offending
    /// top-level record in errors.
    fn deserialize_node(value: &Value, index: usize) -> Result<SymbolNode> {
        let record = value.as_object().ok_or_else(|| {
            SemioError::Serialization(format!("node record at index {index} is not an object"))
        })?;
        let label = record
            .get("label")
            .and_then(Value::as_str)
            .ok_or(SemioError::MalformedInput { index, field: "label" })?;
        let meta = record
            .get("meta")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let mut node = SymbolNode::new(label).with_meta(meta);
        if let Some(children) = record.get("children") {
            let children = children.as_array().ok_or_else(|| {
                SemioError::Serialization(format!(
                    "children of record at index {index} is not an array"
                ))
            })?;
            for child in children {
                node.add_child(Self::deserialize_node(child, index)?);
            }
        }
        Ok(node)
    }

    /// Produce the directed-graph view of the forest for external
    /// visualization. See [`export::export_graph`].
    pub fn export_graph(&self) -> export::SymbolGraph {
        export::export_graph(&self.roots)
    }

    /// Render an indented diagnostic dump of the forest.
    ///
    /// One line per node with weighted entropy, attractor score, and a
    /// `*DUP*` marker on motif members. Returned as a string; the caller
    /// decides where it goes.
    pub fn render_trace(&self) -> String {
        fn write_node(out: &mut String, node: &SymbolNode, depth: usize) {
            let indent = "  ".repeat(depth);
            let duplicate = if node.is_duplicate() { " *DUP*" } else { "" };
            let _ = writeln!(
                out,
                "{indent}- {}{duplicate} [Entropy={:.4}] :: Attractor={:.2}",
                node.label(),
                node.weighted_entropy(),
                node.attractor_score()
            );
            for child in node.children() {
                write_node(out, child, depth + 1);
            }
        }

        let mut out = String::new();
        for root in &self.roots {
            write_node(&mut out, root, 0);
        }
        out
    }
}
