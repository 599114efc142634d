//! Free-space bookkeeping on the roll.
//!
//! The roll is open-ended along `y`, so the seed free rectangle has an infinite
//! height. All comparisons that decide whether something fits go through
//! [`FIT_EPSILON`] so accumulated float error never rejects an exact fit.

use crate::config::FIT_EPSILON;

/// Axis-aligned rectangle on the roll (`x` across, `y` along). `h` may be infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl FreeRect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> f64 {
        self.x + self.w
    }
    /// Exclusive far edge along the roll (`y + h`).
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &FreeRect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
    /// Returns true if a `w` x `h` block fits inside.
    pub fn fits(&self, w: f64, h: f64) -> bool {
        self.w + FIT_EPSILON >= w && self.h + FIT_EPSILON >= h
    }
    fn is_degenerate(&self) -> bool {
        self.w <= FIT_EPSILON || self.h <= FIT_EPSILON
    }
}

/// Open-interval overlap test; rectangles that only share an edge do not intersect.
pub fn intersects(a: &FreeRect, b: &FreeRect) -> bool {
    !(a.x >= b.right() || b.x >= a.right() || a.y >= b.bottom() || b.y >= a.bottom())
}

/// Splits `free` around `placed`, pushing the non-degenerate residuals into `out`.
///
/// Each residual keeps the full extent of `free` along the other axis, so the
/// pieces overlap one another; [`prune_contained`] cleans up afterwards.
/// Nothing is pushed when the two rectangles do not intersect.
pub fn split_free_rect(free: &FreeRect, placed: &FreeRect, out: &mut Vec<FreeRect>) {
    if !intersects(free, placed) {
        return;
    }
    let fr_x2 = free.right();
    let fr_y2 = free.bottom();
    let n_x2 = placed.right();
    let n_y2 = placed.bottom();

    let mut candidates = [None; 4];
    // before (smaller y)
    if placed.y > free.y && placed.y < fr_y2 {
        candidates[0] = Some(FreeRect::new(free.x, free.y, free.w, placed.y - free.y));
    }
    // after (larger y)
    if n_y2 < fr_y2 {
        candidates[1] = Some(FreeRect::new(free.x, n_y2, free.w, fr_y2 - n_y2));
    }
    // left
    if placed.x > free.x && placed.x < fr_x2 {
        candidates[2] = Some(FreeRect::new(free.x, free.y, placed.x - free.x, free.h));
    }
    // right
    if n_x2 < fr_x2 {
        candidates[3] = Some(FreeRect::new(n_x2, free.y, fr_x2 - n_x2, free.h));
    }
    out.extend(candidates.into_iter().flatten().filter(|r| !r.is_degenerate()));
}

/// Removes every rectangle fully contained in another one. O(n²).
pub fn prune_contained(free: &mut Vec<FreeRect>) {
    let mut i = 0;
    while i < free.len() {
        let a = free[i];
        let mut remove_i = false;
        let mut j = i + 1;
        while j < free.len() {
            let b = free[j];
            if b.contains(&a) {
                remove_i = true;
                break;
            }
            if a.contains(&b) {
                free.remove(j);
                continue;
            }
            j += 1;
        }
        if remove_i {
            free.remove(i);
        } else {
            i += 1;
        }
    }
}

/// Maximal free rectangles of a roll, shared by the MaxRects and guillotine packers.
#[derive(Debug, Clone)]
pub struct FreeList {
    free: Vec<FreeRect>,
}

impl FreeList {
    /// An empty roll of `roll_width`, unbounded along its length.
    ///
    /// Footprints carry a trailing `spacing`, so the seed is widened by it: the
    /// kerf of a piece flush with the far edge falls off the roll.
    pub fn new(roll_width: f64, spacing: f64) -> Self {
        Self {
            free: vec![FreeRect::new(0.0, 0.0, roll_width + spacing, f64::INFINITY)],
        }
    }

    /// Marks `footprint` as used: splits every free rectangle it touches, then prunes.
    pub fn reserve(&mut self, footprint: &FreeRect) {
        let mut next: Vec<FreeRect> = Vec::with_capacity(self.free.len() + 4);
        let mut split: Vec<FreeRect> = Vec::new();
        for fr in &self.free {
            if intersects(fr, footprint) {
                split_free_rect(fr, footprint, &mut split);
            } else {
                next.push(*fr);
            }
        }
        next.extend(split);
        prune_contained(&mut next);
        self.free = next;
    }

    pub fn iter(&self) -> impl Iterator<Item = &FreeRect> {
        self.free.iter()
    }
}
