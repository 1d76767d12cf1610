//! # Semio Core
//!
//! **Symbolic Core for Semiotic Entropy Modeling**
//!
//! This crate models hierarchical symbol trees and computes structural
//! metrics over them: Shannon entropy of child-label distributions,
//! content-addressed structural hashes, canonical signatures for
//! duplicate/motif detection, and a derived attractor stability score.
//!
//! ## Features
//!
//! - **Deterministic**: hashes and signatures are invariant under sibling
//!   reordering, so the same structure yields the same identity everywhere
//! - **Minimal**: no network I/O, no async, single-threaded whole-structure
//!   passes
//! - **Diagnostic-friendly**: label-aware canonical signatures alongside
//!   compact SHA-256 structural hashes
//!
//! ## Quick Start
//!
//! ```rust
//! use semio_core::{SymbolNode, SymbolicEngine};
//!
//! // Build a small forest
//! let mut root = SymbolNode::new("R");
//! root.add_child(SymbolNode::new("A"));
//! root.add_child(SymbolNode::new("A"));
//! root.add_child(SymbolNode::new("B"));
//!
//! let mut engine = SymbolicEngine::new();
//! engine.set_roots(vec![root]);
//!
//! // Compress: rebind, mark duplicate subtrees, compute per-root metrics
//! let results = engine.compress();
//! assert_eq!(results.len(), 1);
//! assert!(results[0].entropy > 0.0);
//!
//! // The repeated "A" leaves form a motif
//! assert_eq!(engine.motif_index().motif_count(), 1);
//! ```

pub mod canonical;
pub mod engine;
pub mod error;
pub mod export;
pub mod motif;
pub mod node;

// Re-export main types for convenience
pub use engine::{CompressedRoot, RecursionPolicy, SymbolicEngine};
pub use error::SemioError;
pub use export::{GraphNode, SymbolGraph};
pub use motif::{MotifIndex, NodePath};
pub use node::{Annotations, SymbolNode};
