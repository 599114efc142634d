use roll_packer_core::prelude::*;

fn optimizer(roll_width: f64) -> CuttingOptimizer {
    let cfg = OptimizerConfig::builder().roll_width(roll_width).build();
    CuttingOptimizer::new(cfg).expect("valid config")
}

#[test]
fn single_piece_sits_at_origin_unrotated() {
    let out = optimizer(150.0)
        .optimize(&OptimizeRequest::new(vec![Item::new("a", 50.0, 30.0)]))
        .unwrap();
    assert_eq!(out.placed_items.len(), 1);
    let p = &out.placed_items[0];
    assert_eq!((p.x, p.y, p.width, p.height), (0.0, 0.0, 50.0, 30.0));
    assert!(!p.rotated);
    assert_eq!(out.total_length, 30.0);
    // 1500 / (150 * 30)
    assert!((out.efficiency - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn piece_wider_than_roll_both_ways_is_left_out() {
    let items = vec![Item::new("big", 150.0, 200.0)];
    let out = optimizer(100.0)
        .optimize(&OptimizeRequest::new(items.clone()))
        .unwrap();
    assert!(out.placed_items.is_empty());
    assert_eq!(out.total_length, 0.0);
    assert_eq!(out.efficiency, 0.0);
    assert_eq!(out.unplaced(&items), vec!["big"]);
}

#[test]
fn two_half_width_pieces_share_one_row() {
    let out = optimizer(100.0)
        .optimize(&OptimizeRequest::new(vec![
            Item::new("a", 50.0, 40.0),
            Item::new("b", 50.0, 40.0),
        ]))
        .unwrap();
    assert_eq!(out.placed_items.len(), 2);
    assert!(out.placed_items.iter().all(|p| p.y == 0.0));
    assert_eq!(out.total_length, 40.0);
    assert!((out.efficiency - 100.0).abs() < 1e-9);
}

#[test]
fn locked_piece_is_packed_around() {
    let locked = PlacedRect {
        id: "lock".into(),
        label: String::new(),
        x: 0.0,
        y: 0.0,
        width: 50.0,
        height: 50.0,
        rotated: false,
    };
    let request = OptimizeRequest::new(vec![Item::new("free", 50.0, 50.0)]).lock(locked.clone());
    let out = optimizer(100.0).optimize(&request).unwrap();

    assert_eq!(out.placed_items.len(), 2);
    assert_eq!(out.placed_items[0], locked, "locked placement is echoed first, unchanged");
    let free = out.placed_items.iter().find(|p| p.id == "free").unwrap();
    assert!(free.x >= 50.0);
    assert_eq!(free.y, 0.0);
    assert_eq!(out.total_length, 50.0);
}

#[test]
fn empty_request_yields_empty_layout() {
    let out = optimizer(120.0).optimize(&OptimizeRequest::default()).unwrap();
    assert!(out.placed_items.is_empty());
    assert_eq!(out.total_length, 0.0);
    assert_eq!(out.efficiency, 0.0);
    assert_eq!(out.roll_width, 120.0);
}

#[test]
fn row_based_wins_exact_ties_as_first_candidate() {
    let out = optimizer(150.0)
        .optimize(&OptimizeRequest::new(vec![Item::new("a", 50.0, 30.0)]))
        .unwrap();
    assert_eq!(out.strategy, "Row-based");
}
