use crate::config::{FIT_EPSILON, OptimizerConfig, ROW_HEIGHT_TOLERANCE};
use crate::model::{PlacedRect, PreparedItem};
use tracing::{debug, trace};

/// A horizontal shelf across the roll.
#[derive(Debug, Clone)]
struct Row {
    y: f64,
    /// Shelf height including spacing.
    height: f64,
    /// Height of the piece that opened the shelf; the matching reference.
    item_height: f64,
    remaining_width: f64,
}

/// Shelf packer that groups pieces of (nearly) equal height into rows.
///
/// Picks its own order from the remaining pieces, so unlike the other packers it
/// consumes the whole list at once. Does not support fixed obstacles.
pub struct RowPacker {
    roll_width: f64,
    spacing: f64,
    allow_rotation: bool,
}

impl RowPacker {
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            roll_width: config.roll_width,
            spacing: config.blade_spacing,
            allow_rotation: config.allow_rotation,
        }
    }

    /// Ascending by shorter side, then descending by longer side (stable).
    pub fn sort_items(items: &mut [PreparedItem]) {
        items.sort_by(|a, b| {
            a.min_side()
                .total_cmp(&b.min_side())
                .then_with(|| b.max_side().total_cmp(&a.max_side()))
        });
    }

    /// Packs all `items`, returning placements in placement order.
    pub fn pack_all(&self, items: &[PreparedItem]) -> Vec<PlacedRect> {
        let mut remaining = items.to_vec();
        Self::sort_items(&mut remaining);

        let mut rows: Vec<Row> = Vec::new();
        let mut placed: Vec<PlacedRect> = Vec::with_capacity(items.len());

        while !remaining.is_empty() {
            if let Some((ri, ii, turned)) = self.find_row_fit(&rows, &remaining) {
                let item = remaining.remove(ii);
                let row = &mut rows[ri];
                let p = item.place_at(self.roll_width - row.remaining_width, row.y, turned);
                row.remaining_width -= p.width + self.spacing;
                row.height = row.height.max(p.height + self.spacing);
                placed.push(p);
                continue;
            }

            let item = remaining.remove(0);
            let Some(turned) = self.new_row_orientation(&item, &remaining) else {
                debug!(id = %item.id, w = item.width, h = item.height, "piece wider than the roll, skipped");
                continue;
            };
            let y = rows.last().map_or(0.0, |r| r.y + r.height);
            let p = item.place_at(0.0, y, turned);
            trace!(y, row = rows.len(), w = p.width, h = p.height, "opening row");
            rows.push(Row {
                y,
                height: p.height + self.spacing,
                item_height: p.height,
                remaining_width: self.roll_width - (p.width + self.spacing),
            });
            placed.push(p);
        }
        placed
    }

    /// First (row, piece, turned) triple where a remaining piece joins an open row.
    ///
    /// A piece taller than a shelf's current height may only join the last row,
    /// which can still grow without running into the row after it.
    fn find_row_fit(&self, rows: &[Row], remaining: &[PreparedItem]) -> Option<(usize, usize, bool)> {
        let last = rows.len().checked_sub(1);
        for (ri, row) in rows.iter().enumerate() {
            let can_grow = Some(ri) == last;
            let fits = |w: f64, h: f64| {
                (h - row.item_height).abs() <= ROW_HEIGHT_TOLERANCE
                    && (can_grow || h + self.spacing <= row.height + FIT_EPSILON)
                    && w + self.spacing <= row.remaining_width + FIT_EPSILON
            };
            for (ii, item) in remaining.iter().enumerate() {
                let normal = fits(item.width, item.height);
                let rotated = item.can_rotate(self.allow_rotation) && fits(item.height, item.width);
                if normal || rotated {
                    let turned = rotated && (!normal || item.width < item.height);
                    return Some((ri, ii, turned));
                }
            }
        }
        None
    }

    /// Orientation for a piece opening a new row, or `None` if it cannot span the roll.
    fn new_row_orientation(&self, item: &PreparedItem, pending: &[PreparedItem]) -> Option<bool> {
        let can_rotate = item.can_rotate(self.allow_rotation);
        let mut turned = false;
        if can_rotate {
            let similar = pending.iter().filter(|o| o.same_size(item)).count() + 1;
            let fits_normal = (self.roll_width / (item.width + self.spacing)).floor();
            let fits_rotated = (self.roll_width / (item.height + self.spacing)).floor();
            // Lower shelf, or more pieces per shelf when enough of them are waiting.
            if item.width < item.height
                || (fits_rotated > fits_normal && similar as f64 >= fits_rotated)
            {
                turned = true;
            }
        }
        let (w, h) = if turned {
            (item.height, item.width)
        } else {
            (item.width, item.height)
        };
        if w <= self.roll_width + FIT_EPSILON {
            Some(turned)
        } else if can_rotate && h <= self.roll_width + FIT_EPSILON {
            Some(!turned)
        } else {
            None
        }
    }
}
