use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roll_packer_core::model::PreparedItem;
use roll_packer_core::prelude::*;
use std::hint::black_box;

fn generate_pieces(count: usize, min_side: f64, max_side: f64) -> Vec<Item> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min_side..=max_side).round();
            let h = rng.gen_range(min_side..=max_side).round();
            Item::new(format!("piece_{}", i), w, h)
        })
        .collect()
}

fn bench_single_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategies");
    let cfg = OptimizerConfig::builder()
        .roll_width(152.0)
        .blade_spacing(0.3)
        .build();

    for count in [50, 100, 200] {
        let items: Vec<PreparedItem> = generate_pieces(count, 10.0, 100.0)
            .iter()
            .map(PreparedItem::from_item)
            .collect();
        group.throughput(Throughput::Elements(count as u64));

        let strategies = [
            Strategy::RowBased,
            Strategy::Skyline,
            Strategy::MaxRects,
            Strategy::Guillotine {
                sort: SortOrder::AreaDesc,
                orientation: Orientation::None,
            },
        ];
        for strategy in strategies {
            group.bench_with_input(
                BenchmarkId::new(strategy.to_string(), count),
                &items,
                |b, items| b.iter(|| black_box(strategy.run(&cfg, items, &[]))),
            );
        }
    }
    group.finish();
}

fn bench_optimizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimizer");
    group.sample_size(10);

    for count in [50, 100] {
        let request = OptimizeRequest::new(generate_pieces(count, 10.0, 100.0));
        group.throughput(Throughput::Elements(count as u64));

        let optimizer = CuttingOptimizer::new(OptimizerConfig::default()).unwrap();
        group.bench_with_input(BenchmarkId::new("portfolio", count), &request, |b, req| {
            b.iter(|| black_box(optimizer.optimize(req).unwrap()))
        });

        let deep = request.clone().deep_search(true);
        let optimizer = CuttingOptimizer::new(
            OptimizerConfig::builder().deep_search_iterations(20).build(),
        )
        .unwrap();
        group.bench_with_input(BenchmarkId::new("deep_search_20", count), &deep, |b, req| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(7);
                black_box(optimizer.optimize_with_rng(req, &mut rng).unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_strategies, bench_optimizer);
criterion_main!(benches);
