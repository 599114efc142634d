use super::Packer;
use crate::config::OptimizerConfig;
use crate::geometry::{FreeList, FreeRect};
use crate::model::{PlacedRect, PreparedItem};

/// MaxRects packer scoring free rectangles by Best Short Side Fit.
pub struct MaxRectsPacker {
    spacing: f64,
    allow_rotation: bool,
    free: FreeList,
}

impl MaxRectsPacker {
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

    /// Best free rectangle for a `w` x `h` footprint: lowest short-side leftover, then lowest y.
    fn find_position(&self, w: f64, h: f64) -> Option<(FreeRect, f64)> {
        let mut best: Option<(FreeRect, f64)> = None;
        for fr in self.free.iter() {
            if !fr.fits(w, h) {
                continue;
            }
            let leftover_h = (fr.w - w).abs();
            let leftover_v = (fr.h - h).abs();
            let short_fit = leftover_h.min(leftover_v);
            let better = match &best {
                None => true,
                Some((b, score)) => short_fit < *score || (short_fit == *score && fr.y < b.y),
            };
            if better {
                best = Some((FreeRect::new(fr.x, fr.y, w, h), short_fit));
            }
        }
        best
    }

    pub fn free_list_len(&self) -> usize {
        self.free.iter().count()
    }
}

impl Packer for MaxRectsPacker {
    fn pack(&mut self, item: &PreparedItem) -> Option<PlacedRect> {
        let s = self.spacing;
        let mut best = self
            .find_position(item.width + s, item.height + s)
            .map(|(node, score)| (node, score, false));

        if item.can_rotate(self.allow_rotation) {
            if let Some((node, score)) = self.find_position(item.height + s, item.width + s) {
                if best.as_ref().is_none_or(|(_, best_score, _)| score < *best_score) {
                    best = Some((node, score, true));
                }
            }
        }

        let (node, _, turned) = best?;
        self.free.reserve(&node);
        Some(item.place_at(node.x, node.y, turned))
    }
}
