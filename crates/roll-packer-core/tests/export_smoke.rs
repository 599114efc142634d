use roll_packer_core::prelude::*;
use roll_packer_core::{cut_list_text, cut_order, to_cut_list, to_json_layout};

fn layout() -> OptimizationResult {
    let cfg = OptimizerConfig::builder().roll_width(100.0).build();
    let opt = CuttingOptimizer::new(cfg).unwrap();
    opt.optimize(&OptimizeRequest::new(vec![
        Item::new("a", 50.0, 40.0).with_label("50x40"),
        Item::new("b", 50.0, 40.0),
        Item::new("c", 100.0, 20.0),
    ]))
    .unwrap()
}

#[test]
fn json_layout_uses_short_rect_fields() {
    let out = layout();
    let v = to_json_layout(&out);
    let placed = v["placedItems"].as_array().unwrap();
    assert_eq!(placed.len(), 3);
    for p in placed {
        assert!(p["x"].is_number() && p["y"].is_number());
        assert!(p["w"].is_number() && p["h"].is_number());
        assert!(p["rotated"].is_boolean());
    }
    let a = placed.iter().find(|p| p["id"] == "a").unwrap();
    assert_eq!(a["label"], "50x40");
    assert_eq!(v["totalLength"], 60.0);
    assert_eq!(v["rollWidth"], 100.0);
    assert_eq!(v["stats"]["num_pieces"], 3);
    assert!(v["strategy"].is_string());
}

#[test]
fn cut_list_follows_the_roll() {
    let out = layout();
    let order = cut_order(&out);
    for w in order.windows(2) {
        assert!(w[0].y < w[1].y || (w[0].y == w[1].y && w[0].x <= w[1].x));
    }
    let list = to_cut_list(&out);
    let rows = list.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["seq"], 1);
    assert_eq!(rows[2]["seq"], 3);

    let text = cut_list_text(&out);
    assert_eq!(text.lines().count(), 1 + 3 + 1);
    assert!(text.contains("Pieces: 3"));
}

#[test]
fn result_round_trips_through_serde() {
    let out = layout();
    let s = serde_json::to_string(&out).unwrap();
    let back: OptimizationResult = serde_json::from_str(&s).unwrap();
    assert_eq!(back, out);
}
