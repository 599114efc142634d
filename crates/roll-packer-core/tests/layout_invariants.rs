use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roll_packer_core::model::PreparedItem;
use roll_packer_core::prelude::*;

const EPS: f64 = 1e-6;

fn random_items(rng: &mut StdRng, n: usize, min: f64, max: f64) -> Vec<Item> {
    (0..n)
        .map(|i| {
            let w = rng.gen_range(min..=max).round();
            let h = rng.gen_range(min..=max).round();
            Item::new(format!("p{}", i), w, h)
        })
        .collect()
}

fn separated(a: &PlacedRect, b: &PlacedRect, spacing: f64) -> bool {
    a.right() + spacing <= b.x + EPS
        || b.right() + spacing <= a.x + EPS
        || a.bottom() + spacing <= b.y + EPS
        || b.bottom() + spacing <= a.y + EPS
}

fn check_layout(out: &OptimizationResult, items: &[Item], cfg: &OptimizerConfig) {
    let name = &out.strategy;
    for (i, a) in out.placed_items.iter().enumerate() {
        assert!(a.x >= -EPS && a.y >= -EPS, "{name}: {} has negative origin", a.id);
        assert!(
            a.right() <= cfg.roll_width + EPS,
            "{name}: {} exceeds roll width ({} > {})",
            a.id,
            a.right(),
            cfg.roll_width
        );
        for b in &out.placed_items[i + 1..] {
            assert!(!a.overlaps(b), "{name}: {} overlaps {}", a.id, b.id);
            assert!(separated(a, b, cfg.blade_spacing), "{name}: {} and {} closer than the blade spacing", a.id, b.id);
        }
        let src = items.iter().find(|it| it.id == a.id).expect("placed id comes from the input");
        let dims = if a.rotated {
            (src.height, src.width)
        } else {
            (src.width, src.height)
        };
        assert_eq!((a.width, a.height), dims, "{name}: {} rotated flag disagrees with its size", a.id);
    }
    let mut ids: Vec<&str> = out.placed_items.iter().map(|p| p.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), out.placed_items.len(), "{name}: a piece was placed twice");

    let length = out.placed_items.iter().map(|p| p.bottom()).fold(0.0_f64, f64::max);
    assert!((out.total_length - length).abs() < EPS, "{name}: total length");
    if length > 0.0 {
        let used: f64 = out.placed_items.iter().map(|p| p.area()).sum();
        let expected = used / (cfg.roll_width * length) * 100.0;
        assert!((out.efficiency - expected).abs() < 1e-6, "{name}: efficiency");
        assert!(out.efficiency <= 100.0 + 1e-6);
    }
}

fn prepared(items: &[Item]) -> Vec<PreparedItem> {
    items.iter().map(PreparedItem::from_item).collect()
}

#[test]
fn every_strategy_produces_valid_layouts() {
    let mut rng = StdRng::seed_from_u64(42);
    for &spacing in &[0.0, 0.3, 2.0] {
        for &rotation in &[true, false] {
            let cfg = OptimizerConfig::builder()
                .roll_width(152.0)
                .blade_spacing(spacing)
                .allow_rotation(rotation)
                .build();
            let items = random_items(&mut rng, 40, 5.0, 80.0);
            let prep = prepared(&items);
            for strategy in Strategy::portfolio(&cfg, false) {
                let out = strategy.run(&cfg, &prep, &[]).expect("no locked pieces");
                assert_eq!(out.strategy, strategy.to_string());
                assert_eq!(
                    out.placed_items.len(),
                    items.len(),
                    "{strategy}: every piece fits the roll width"
                );
                check_layout(&out, &items, &cfg);
            }
        }
    }
}

#[test]
fn pieces_close_to_roll_width_stay_inside() {
    let mut rng = StdRng::seed_from_u64(7);
    let cfg = OptimizerConfig::builder().roll_width(100.0).blade_spacing(0.5).build();
    // Many pieces are wider than the roll in one orientation only.
    let items = random_items(&mut rng, 30, 20.0, 140.0);
    let prep = prepared(&items);
    let feasible = items
        .iter()
        .filter(|it| it.width.min(it.height) <= cfg.roll_width)
        .count();
    for strategy in Strategy::portfolio(&cfg, false) {
        let out = strategy.run(&cfg, &prep, &[]).unwrap();
        assert_eq!(out.placed_items.len(), feasible, "{strategy}: a piece that fits was left out");
        check_layout(&out, &items, &cfg);
    }
}

#[test]
fn full_width_pieces_are_placed_with_spacing() {
    for &rotation in &[true, false] {
        let cfg = OptimizerConfig::builder()
            .roll_width(100.0)
            .blade_spacing(1.0)
            .allow_rotation(rotation)
            .build();
        let items = vec![
            Item::new("full", 100.0, 10.0),
            Item::new("b", 30.0, 30.0),
            Item::new("full2", 100.0, 25.0),
        ];
        let prep = prepared(&items);
        for strategy in Strategy::portfolio(&cfg, false) {
            let out = strategy.run(&cfg, &prep, &[]).unwrap();
            assert_eq!(out.placed_items.len(), 3, "{strategy}: full-width piece left out");
            check_layout(&out, &items, &cfg);
        }
        let opt = CuttingOptimizer::new(cfg).unwrap();
        let out = opt.optimize(&OptimizeRequest::new(items.clone())).unwrap();
        assert!(out.unplaced(&items).is_empty(), "unplaced: {:?}", out.unplaced(&items));
    }
}

#[test]
fn optimizer_with_deep_search_keeps_invariants() {
    let mut rng = StdRng::seed_from_u64(2024);
    let cfg = OptimizerConfig::builder()
        .roll_width(152.0)
        .blade_spacing(0.3)
        .deep_search_iterations(10)
        .build();
    let optimizer = CuttingOptimizer::new(cfg.clone()).unwrap();
    for _ in 0..5 {
        let items = random_items(&mut rng, 25, 10.0, 100.0);
        let request = OptimizeRequest::new(items.clone()).deep_search(true);
        let out = optimizer.optimize_with_rng(&request, &mut rng).unwrap();
        assert_eq!(out.placed_items.len(), items.len());
        check_layout(&out, &items, &cfg);
    }
}

#[test]
fn winner_is_the_shortest_candidate_when_everything_fits() {
    let mut rng = StdRng::seed_from_u64(99);
    let cfg = OptimizerConfig::builder().roll_width(152.0).build();
    let optimizer = CuttingOptimizer::new(cfg.clone()).unwrap();
    let items = random_items(&mut rng, 30, 10.0, 90.0);
    let best = optimizer.optimize(&OptimizeRequest::new(items.clone())).unwrap();

    let prep = prepared(&items);
    let shortest = Strategy::portfolio(&cfg, false)
        .into_iter()
        .filter_map(|s| s.run(&cfg, &prep, &[]))
        .map(|r| r.total_length)
        .fold(f64::INFINITY, f64::min);
    // Same used area everywhere, so higher efficiency means shorter.
    assert!((best.total_length - shortest).abs() < 1e-9);
}
