//! Directed-graph view of a forest for external visualization.
//!
//! Produces a petgraph `DiGraph` with one graph node per tree node, keyed
//! by a short prefix of the structural hash, and one edge per parent→child
//! relation. Rendering and layout are the consumer's responsibility; this
//! module only supplies the structure.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::node::SymbolNode;

/// Number of hex characters of the structural hash used as the graph key.
///
/// Prefix collisions across distinct subtrees are an accepted risk of this
/// diagnostic view; the prefix is never used for identity elsewhere.
const KEY_PREFIX_LEN: usize = 10;

/// Graph export of a forest.
pub type SymbolGraph = DiGraph<GraphNode, ()>;

/// Attributes attached to each exported graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// 10-hex-character prefix of the structural hash
    pub id: String,
    /// Tree-node label at export time
    pub label: String,
    /// Immediate (child-label) entropy
    pub entropy: f64,
    /// Attractor stability score
    pub attractor: f64,
}

struct GraphBuilder {
    graph: SymbolGraph,
    seen: HashMap<String, NodeIndex>,
}

impl GraphBuilder {
    fn ensure_node(&mut self, node: &SymbolNode) -> NodeIndex {
        let id = node.hash()[..KEY_PREFIX_LEN].to_string();
        match self.seen.get(&id) {
            Some(&idx) => idx,
            None => {
                let idx = self.graph.add_node(GraphNode {
                    id: id.clone(),
                    label: node.label().to_string(),
                    entropy: node.entropy(),
                    attractor: node.attractor_score(),
                });
                self.seen.insert(id, idx);
                idx
            }
        }
    }

    fn add_subtree(&mut self, node: &SymbolNode) {
        let parent = self.ensure_node(node);
        for child in node.children() {
            let child_idx = self.ensure_node(child);
            self.graph.update_edge(parent, child_idx, ());
            self.add_subtree(child);
        }
    }
}

/// Export the forest as a directed graph.
///
/// Structurally identical subtrees share a hash prefix and therefore
/// collapse into a single graph node; repeated parent→child pairs collapse
/// into a single edge.
///
/// # Example
///
/// ```rust
/// use semio_core::{export, SymbolNode};
///
/// let mut root = SymbolNode::new("R");
/// root.add_child(SymbolNode::new("A"));
/// root.add_child(SymbolNode::new("A"));
///
/// let graph = export::export_graph(std::slice::from_ref(&root));
/// // The two identical A leaves collapse into one graph node
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
pub fn export_graph(roots: &[SymbolNode]) -> SymbolGraph {
    let mut builder = GraphBuilder {
        graph: DiGraph::new(),
        seen: HashMap::new(),
    };
    for root in roots {
        builder.add_subtree(root);
    }
    builder.graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::visit::EdgeRef;

    fn fanout(label: &str, child_labels: &[&str]) -> SymbolNode {
        let mut node = SymbolNode::new(label);
        for l in child_labels {
            node.add_child(SymbolNode::new(*l));
        }
        node
    }

    #[test]
    fn test_empty_forest_empty_graph() {
        let graph = export_graph(&[]);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_identical_subtrees_collapse() {
        let root = fanout("R", &["A", "A", "B"]);
        let graph = export_graph(std::slice::from_ref(&root));

        // R, the shared A leaf, and B
        assert_eq!(graph.node_count(), 3);
        // R->A deduplicated, R->B
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_node_attributes() {
        let root = fanout("R", &["A", "B"]);
        let graph = export_graph(std::slice::from_ref(&root));

        let r = graph
            .node_weights()
            .find(|n| n.label == "R")
            .expect("root exported");
        assert_eq!(r.id, &root.hash()[..10]);
        assert!((r.entropy - 1.0).abs() < 1e-12);
        assert!(r.attractor > 0.0 && r.attractor <= 1.0);
    }

    #[test]
    fn test_edges_run_parent_to_child() {
        let root = fanout("R", &["A"]);
        let graph = export_graph(std::slice::from_ref(&root));

        let edge = graph.edge_references().next().expect("one edge");
        assert_eq!(graph[edge.source()].label, "R");
        assert_eq!(graph[edge.target()].label, "A");
    }

    #[test]
    fn test_forest_spans_multiple_roots() {
        let roots = vec![fanout("R1", &["A"]), fanout("R2", &["A"])];
        let graph = export_graph(&roots);

        // Shared A leaf collapses across roots
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }
}
