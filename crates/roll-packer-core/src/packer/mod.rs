use crate::config::SortOrder;
use crate::model::{PlacedRect, PreparedItem};
use tracing::debug;

pub mod guillotine;
pub mod maxrects;
pub mod row;
pub mod skyline;

/// A packer places pieces one at a time onto a roll it owns.
///
/// Implementations must never produce overlapping placements and must keep
/// every placement inside the roll width. `pack` returns `None` when the piece
/// fits nowhere; the caller leaves it unplaced.
pub trait Packer {
    fn pack(&mut self, item: &PreparedItem) -> Option<PlacedRect>;
}

/// Feeds `items` to `packer` in order, appending placements to `placed`.
pub fn pack_sequence<P: Packer>(packer: &mut P, items: &[PreparedItem], placed: &mut Vec<PlacedRect>) {
    for item in items {
        match packer.pack(item) {
            Some(p) => placed.push(p),
            None => debug!(id = %item.id, w = item.width, h = item.height, "piece does not fit the roll, skipped"),
        }
    }
}

/// Stable descending sort by the given key; equal keys keep their input order.
pub fn sort_items(items: &mut [PreparedItem], order: SortOrder) {
    match order {
        SortOrder::HeightDesc => items.sort_by(|a, b| b.height.total_cmp(&a.height)),
        SortOrder::WidthDesc => items.sort_by(|a, b| b.width.total_cmp(&a.width)),
        SortOrder::AreaDesc => items.sort_by(|a, b| b.area().total_cmp(&a.area())),
        SortOrder::MaxSideDesc => items.sort_by(|a, b| b.max_side().total_cmp(&a.max_side())),
    }
}
