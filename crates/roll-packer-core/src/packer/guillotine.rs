use super::{Packer, sort_items};
use crate::config::{OptimizerConfig, Orientation, SortOrder};
use crate::geometry::{FreeList, FreeRect};
use crate::model::{PlacedRect, PreparedItem};

/// Bottom-left packer over the MaxRects free list, used by the guillotine heuristic family.
pub struct GuillotinePacker {
    spacing: f64,
    allow_rotation: bool,
    free: FreeList,
}

impl GuillotinePacker {
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            spacing: config.blade_spacing,
            allow_rotation: config.allow_rotation,
            free: FreeList::new(config.roll_width, config.blade_spacing),
        }
    }

    /// Reserves a fixed obstacle (plus trailing spacing) before packing starts.
    pub fn reserve(&mut self, obstacle: &PlacedRect) {
        self.free.reserve(&FreeRect::new(
            obstacle.x,
            obstacle.y,
            obstacle.width + self.spacing,
            obstacle.height + self.spacing,
        ));
    }

    fn choose(&self, w: f64, h: f64) -> Option<FreeRect> {
        let mut best: Option<FreeRect> = None;
        for fr in self.free.iter() {
            if !fr.fits(w, h) {
                continue;
            }
            if best.is_none_or(|b| fr.y < b.y || (fr.y == b.y && fr.x < b.x)) {
                best = Some(FreeRect::new(fr.x, fr.y, w, h));
            }
        }
        best
    }
}

impl Packer for GuillotinePacker {
    fn pack(&mut self, item: &PreparedItem) -> Option<PlacedRect> {
        let s = self.spacing;
        let mut best = self
            .choose(item.width + s, item.height + s)
            .map(|node| (node, false));

        if item.can_rotate(self.allow_rotation) {
            if let Some(node) = self.choose(item.height + s, item.width + s) {
                let wins = best.is_none_or(|(b, _)| {
                    node.y < b.y || (node.y == b.y && node.x < b.x)
                });
                if wins {
                    best = Some((node, true));
                }
            }
        }

        let (node, turned) = best?;
        self.free.reserve(&node);
        Some(item.place_at(node.x, node.y, turned))
    }
}

/// Applies an orientation mode to a piece. Pieces with a pinned orientation are left alone.
pub fn normalize(item: &PreparedItem, orientation: Orientation) -> PreparedItem {
    if item.orientation_locked {
        return item.clone();
    }
    match orientation {
        Orientation::Vertical if item.width > item.height => item.turned(),
        Orientation::Horizontal if item.width < item.height => item.turned(),
        _ => item.clone(),
    }
}

/// Normalized and sorted copy of `items` for one guillotine pass.
pub fn prepare_pass(
    items: &[PreparedItem],
    sort: SortOrder,
    orientation: Orientation,
) -> Vec<PreparedItem> {
    let mut out: Vec<PreparedItem> = items.iter().map(|it| normalize(it, orientation)).collect();
    sort_items(&mut out, sort);
    out
}
