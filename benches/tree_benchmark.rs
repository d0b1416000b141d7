use criterion::{black_box, criterion_group, criterion_main, Criterion};
use orthantree::interaction_lists::InteractionScheme;
use orthantree::tree::helpers::{points_fixture, points_fixture_clustered};
use orthantree::tree::OrthantTree;

pub fn tree_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree");
    group.sample_size(20);

    for npoints in [10_000, 100_000] {
        let sources = points_fixture::<3>(npoints, None, None, Some(0));
        let targets = points_fixture_clustered::<3>(npoints, Some(1));

        group.bench_function(format!("Construction with {} points", npoints), |b| {
            b.iter(|| black_box(OrthantTree::new(&sources, &targets, 32).unwrap()))
        });

        let tree = OrthantTree::new(&sources, &targets, 32).unwrap();
        group.bench_function(
            format!("Interaction lists of {} boxes", tree.nboxes()),
            |b| b.iter(|| black_box(InteractionScheme::new(&tree).unwrap())),
        );
    }
    group.finish();
}

criterion_group!(benches, tree_benchmark);
criterion_main!(benches);
