use super::Packer;
use crate::config::{FIT_EPSILON, OptimizerConfig};
use crate::model::{PlacedRect, PreparedItem};
use tracing::trace;

/// Horizontal run of the skyline at height `y`, spanning `[x, x + width)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkylineSegment {
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

impl SkylineSegment {
    #[inline]
    fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Skyline packer: tracks the highest occupied point at every position across the roll.
///
/// Does not support fixed obstacles. Every piece that fits the roll width in some
/// allowed orientation gets placed, falling back to the top of the skyline.
pub struct SkylinePacker {
    roll_width: f64,
    spacing: f64,
    allow_rotation: bool,
    skyline: Vec<SkylineSegment>,
}

struct Position {
    x: f64,
    y: f64,
    turned: bool,
}

impl SkylinePacker {
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            roll_width: config.roll_width,
            spacing: config.blade_spacing,
            allow_rotation: config.allow_rotation,
            skyline: vec![SkylineSegment {
                x: 0.0,
                y: 0.0,
                width: config.roll_width,
            }],
        }
    }

    /// Height descending, then width descending (stable).
    pub fn sort_items(items: &mut [PreparedItem]) {
        items.sort_by(|a, b| {
            b.height
                .total_cmp(&a.height)
                .then_with(|| b.width.total_cmp(&a.width))
        });
    }

    pub fn segments(&self) -> &[SkylineSegment] {
        &self.skyline
    }

    /// Lowest resting point for a piece of width `w`; leftmost on ties.
    fn find_for_width(&self, w: f64) -> Option<(f64, f64)> {
        let required = w + self.spacing;
        let mut best: Option<(f64, f64)> = None;
        for i in 0..self.skyline.len() {
            let mut width = 0.0;
            let mut max_y = f64::MIN;
            for seg in &self.skyline[i..] {
                width += seg.width;
                max_y = max_y.max(seg.y);
                if width + FIT_EPSILON >= required {
                    if best.is_none_or(|(_, by)| max_y < by) {
                        best = Some((self.skyline[i].x, max_y));
                    }
                    break;
                }
            }
        }
        best
    }

    fn find_position(&self, item: &PreparedItem) -> Option<Position> {
        let mut best = self.find_for_width(item.width).map(|(x, y)| Position {
            x,
            y,
            turned: false,
        });
        if item.can_rotate(self.allow_rotation) {
            if let Some((x, y)) = self.find_for_width(item.height) {
                let wins = match &best {
                    None => true,
                    Some(b) => y < b.y || (y == b.y && x < b.x),
                };
                if wins {
                    best = Some(Position { x, y, turned: true });
                }
            }
        }
        best
    }

    /// Orientation for the fallback placement, or `None` if the piece is wider
    /// than the roll in every allowed orientation.
    fn fallback_orientation(&self, item: &PreparedItem) -> Option<bool> {
        let limit = self.roll_width + FIT_EPSILON;
        let normal = item.width <= limit;
        let rotated = item.can_rotate(self.allow_rotation) && item.height <= limit;
        match (normal, rotated) {
            (true, true) => Some(item.height < item.width),
            (true, false) => Some(false),
            (false, true) => Some(true),
            (false, false) => None,
        }
    }

    fn max_height(&self) -> f64 {
        self.skyline.iter().map(|s| s.y).fold(0.0_f64, f64::max)
    }

    /// Raises the skyline under `[x, x + w + spacing)` to `y + h + spacing`.
    fn update(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let new_top = y + h + self.spacing;
        let item_right = (x + w + self.spacing).min(self.roll_width);
        let mut next: Vec<SkylineSegment> = Vec::with_capacity(self.skyline.len() + 2);

        let mut i = 0;
        while i < self.skyline.len() && self.skyline[i].right() <= x + FIT_EPSILON {
            next.push(self.skyline[i]);
            i += 1;
        }
        if i < self.skyline.len() && self.skyline[i].x < x {
            next.push(SkylineSegment {
                x: self.skyline[i].x,
                y: self.skyline[i].y,
                width: x - self.skyline[i].x,
            });
        }
        next.push(SkylineSegment {
            x,
            y: new_top,
            width: item_right - x,
        });
        while i < self.skyline.len() && self.skyline[i].right() <= item_right + FIT_EPSILON {
            i += 1;
        }
        if i < self.skyline.len() && self.skyline[i].x < item_right {
            next.push(SkylineSegment {
                x: item_right,
                y: self.skyline[i].y,
                width: self.skyline[i].right() - item_right,
            });
            i += 1;
        }
        next.extend_from_slice(&self.skyline[i..]);

        self.skyline = next;
        self.merge();
    }

    fn merge(&mut self) {
        let mut i = 1;
        while i < self.skyline.len() {
            if (self.skyline[i - 1].y - self.skyline[i].y).abs() <= FIT_EPSILON {
                let w = self.skyline[i].width;
                self.skyline[i - 1].width += w;
                self.skyline.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

impl Packer for SkylinePacker {
    fn pack(&mut self, item: &PreparedItem) -> Option<PlacedRect> {
        let (x, y, turned) = match self.find_position(item) {
            Some(p) => (p.x, p.y, p.turned),
            None => {
                // Correctness backstop: no run is wide enough once spacing is added,
                // so stack the piece on top of everything placed so far.
                let turned = self.fallback_orientation(item)?;
                let y = self.max_height();
                trace!(id = %item.id, y, "skyline fallback placement");
                (0.0, y, turned)
            }
        };
        let placed = item.place_at(x, y, turned);
        self.update(placed.x, placed.y, placed.width, placed.height);
        Some(placed)
    }
}
