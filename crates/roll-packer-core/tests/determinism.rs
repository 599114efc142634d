use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roll_packer_core::prelude::*;
use roll_packer_core::to_json_layout;

fn items(seed: u64, n: usize) -> Vec<Item> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            Item::new(
                format!("p{}", i),
                rng.gen_range(8.0..=90.0_f64).round(),
                rng.gen_range(8.0..=90.0_f64).round(),
            )
        })
        .collect()
}

#[test]
fn same_request_gives_identical_output() {
    let cfg = OptimizerConfig::builder()
        .roll_width(152.0)
        .blade_spacing(0.3)
        .build();
    let opt = CuttingOptimizer::new(cfg).unwrap();
    let request = OptimizeRequest::new(items(3, 60)).force_rotation("p4", true);

    let a = opt.optimize(&request).unwrap();
    let b = opt.optimize(&request).unwrap();
    assert_eq!(a, b);
    let ja = serde_json::to_string(&to_json_layout(&a)).unwrap();
    let jb = serde_json::to_string(&to_json_layout(&b)).unwrap();
    assert_eq!(ja, jb);
}

#[test]
fn deep_search_is_reproducible_with_a_seeded_rng() {
    let cfg = OptimizerConfig::builder()
        .roll_width(152.0)
        .deep_search_iterations(12)
        .build();
    let opt = CuttingOptimizer::new(cfg).unwrap();
    let request = OptimizeRequest::new(items(8, 45)).deep_search(true);

    let a = opt
        .optimize_with_rng(&request, &mut StdRng::seed_from_u64(77))
        .unwrap();
    let b = opt
        .optimize_with_rng(&request, &mut StdRng::seed_from_u64(77))
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn deep_search_never_loses_to_the_plain_portfolio() {
    let cfg = OptimizerConfig::builder()
        .roll_width(152.0)
        .deep_search_iterations(10)
        .build();
    let opt = CuttingOptimizer::new(cfg).unwrap();
    let plain = OptimizeRequest::new(items(21, 40));
    let deep = plain.clone().deep_search(true);

    let base = opt.optimize(&plain).unwrap();
    let searched = opt
        .optimize_with_rng(&deep, &mut StdRng::seed_from_u64(1))
        .unwrap();
    assert!(searched.total_length <= base.total_length + 1e-9);
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_evaluation_matches_sequential() {
    let request = OptimizeRequest::new(items(13, 50)).deep_search(true);
    let seq_cfg = OptimizerConfig::builder().deep_search_iterations(16).build();
    let par_cfg = OptimizerConfig {
        parallel: true,
        ..seq_cfg.clone()
    };
    let seq = CuttingOptimizer::new(seq_cfg)
        .unwrap()
        .optimize_with_rng(&request, &mut StdRng::seed_from_u64(9))
        .unwrap();
    let par = CuttingOptimizer::new(par_cfg)
        .unwrap()
        .optimize_with_rng(&request, &mut StdRng::seed_from_u64(9))
        .unwrap();
    assert_eq!(seq, par);
}
