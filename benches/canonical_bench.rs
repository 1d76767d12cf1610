use criterion::{black_box, criterion_group, criterion_main, Criterion};
use semio_core::{canonical, MotifIndex, SymbolNode, SymbolicEngine};

/// Balanced tree with the given depth and fan-out, labels cycling so that
/// motifs actually recur.
fn balanced_tree(depth: usize, fanout: usize) -> SymbolNode {
    fn grow(label_pool: &[&str], depth: usize, fanout: usize, level: usize) -> SymbolNode {
        let mut node = SymbolNode::new(label_pool[level % label_pool.len()]);
        if depth > 0 {
            for _ in 0..fanout {
                node.add_child(grow(label_pool, depth - 1, fanout, level + 1));
            }
        }
        node
    }
    grow(&["alpha", "beta", "gamma"], depth, fanout, 0)
}

fn bench_structural_hash(c: &mut Criterion) {
    let tree = balanced_tree(6, 3);
    c.bench_function("hash_depth6_fanout3", |b| {
        b.iter(|| black_box(&tree).hash())
    });
}

fn bench_signature(c: &mut Criterion) {
    let tree = balanced_tree(6, 3);
    c.bench_function("signature_depth6_fanout3", |b| {
        b.iter(|| canonical::signature(black_box(&tree)))
    });
}

fn bench_motif_index(c: &mut Criterion) {
    let roots = vec![balanced_tree(5, 3), balanced_tree(5, 3)];
    c.bench_function("motif_index_two_trees", |b| {
        b.iter(|| MotifIndex::build(black_box(&roots)))
    });
}

fn bench_compress(c: &mut Criterion) {
    c.bench_function("compress_depth5_fanout3", |b| {
        b.iter(|| {
            let mut engine = SymbolicEngine::new();
            engine.set_roots(vec![balanced_tree(5, 3)]);
            engine.compress()
        })
    });
}

criterion_group!(
    benches,
    bench_structural_hash,
    bench_signature,
    bench_motif_index,
    bench_compress
);
criterion_main!(benches);
