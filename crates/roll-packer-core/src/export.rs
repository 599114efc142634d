use crate::model::{OptimizationResult, PlacedRect};
use serde_json::{Value, json};

/// Serialize a layout as `{ placedItems, totalLength, efficiency, rollWidth, strategy, stats }`.
///
/// Rect fields use the short `x/y/w/h` names renderers expect.
pub fn to_json_layout(result: &OptimizationResult) -> Value {
    let placed: Vec<Value> = result
        .placed_items
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "label": p.label,
                "x": p.x,
                "y": p.y,
                "w": p.width,
                "h": p.height,
                "rotated": p.rotated,
            })
        })
        .collect();
    json!({
        "placedItems": placed,
        "totalLength": result.total_length,
        "efficiency": result.efficiency,
        "rollWidth": result.roll_width,
        "strategy": result.strategy,
        "stats": result.stats(),
    })
}

/// Placements in cutting order: along the roll first, then across it.
pub fn cut_order(result: &OptimizationResult) -> Vec<&PlacedRect> {
    let mut order: Vec<&PlacedRect> = result.placed_items.iter().collect();
    order.sort_by(|a, b| a.y.total_cmp(&b.y).then_with(|| a.x.total_cmp(&b.x)));
    order
}

/// Flat cut list `[ { seq, id, label, x, y, width, height, rotated } ]` in cutting order.
pub fn to_cut_list(result: &OptimizationResult) -> Value {
    let rows: Vec<Value> = cut_order(result)
        .into_iter()
        .enumerate()
        .map(|(seq, p)| {
            json!({
                "seq": seq + 1,
                "id": p.id,
                "label": p.label,
                "x": p.x,
                "y": p.y,
                "width": p.width,
                "height": p.height,
                "rotated": p.rotated,
            })
        })
        .collect();
    Value::Array(rows)
}

/// Plain-text cut list table, one line per piece, followed by the summary.
pub fn cut_list_text(result: &OptimizationResult) -> String {
    let mut s = String::new();
    s.push_str(&format!(
        "{:>4}  {:<16} {:>9} {:>9} {:>9} {:>9}  {}\n",
        "#", "id", "x", "y", "width", "length", "rot"
    ));
    for (seq, p) in cut_order(result).into_iter().enumerate() {
        s.push_str(&format!(
            "{:>4}  {:<16} {:>9.2} {:>9.2} {:>9.2} {:>9.2}  {}\n",
            seq + 1,
            p.id,
            p.x,
            p.y,
            p.width,
            p.height,
            if p.rotated { "yes" } else { "no" }
        ));
    }
    s.push_str(&result.stats().summary());
    s.push('\n');
    s
}
