use crate::config::LENGTH_TIE_BAND;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One physical piece to cut. `width` runs across the roll, `height` along it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Unique per piece instance (a quantity of N is N items).
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(alias = "w")]
    pub width: f64,
    #[serde(alias = "h")]
    pub height: f64,
}

impl Item {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            width,
            height,
        }
    }
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// A piece as the strategies see it, after locked/forced handling.
///
/// `rotated` is true when `width`/`height` are already swapped relative to the
/// natural orientation. `orientation_locked` pins the current orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedItem {
    pub id: String,
    pub label: String,
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
    pub orientation_locked: bool,
}

impl PreparedItem {
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            label: item.label.clone(),
            width: item.width,
            height: item.height,
            rotated: false,
            orientation_locked: false,
        }
    }

    /// Same piece turned by 90°.
    pub fn turned(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
            rotated: !self.rotated,
            ..self.clone()
        }
    }

    pub fn can_rotate(&self, allow_rotation: bool) -> bool {
        allow_rotation && !self.orientation_locked
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
    pub fn max_side(&self) -> f64 {
        self.width.max(self.height)
    }

    /// True if both pieces have the same dimensions in either orientation.
    pub fn same_size(&self, other: &PreparedItem) -> bool {
        (self.width == other.width && self.height == other.height)
            || (self.width == other.height && self.height == other.width)
    }

    /// Places the piece at `(x, y)`, optionally turned relative to its current orientation.
    pub fn place_at(&self, x: f64, y: f64, turned: bool) -> PlacedRect {
        let (width, height) = if turned {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        };
        PlacedRect {
            id: self.id.clone(),
            label: self.label.clone(),
            x,
            y,
            width,
            height,
            rotated: self.rotated != turned,
        }
    }
}

/// A piece placed on the roll. `x` runs across the roll, `y` along it;
/// `width`/`height` are post-rotation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacedRect {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub x: f64,
    pub y: f64,
    #[serde(alias = "w")]
    pub width: f64,
    #[serde(alias = "h")]
    pub height: f64,
    /// True if the piece was turned 90° relative to its natural orientation.
    #[serde(default)]
    pub rotated: bool,
}

impl PlacedRect {
    /// Exclusive right edge (`x + width`).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
    /// Exclusive far edge along the roll (`y + height`).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
    /// Open-interval overlap test; touching edges do not overlap.
    pub fn overlaps(&self, other: &PlacedRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Layout produced by one strategy, or the winner picked by the optimizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizationResult {
    pub placed_items: Vec<PlacedRect>,
    /// Consumed roll length: `max(y + height)` over all placements.
    pub total_length: f64,
    /// Used area over consumed area, in percent.
    pub efficiency: f64,
    pub roll_width: f64,
    /// Name of the strategy that produced this layout.
    #[serde(default)]
    pub strategy: String,
}

impl OptimizationResult {
    /// Builds a result from placements, deriving length and efficiency.
    ///
    /// Every strategy goes through here so metrics are computed the same way.
    pub fn from_placements(
        placed_items: Vec<PlacedRect>,
        roll_width: f64,
        strategy: impl Into<String>,
    ) -> Self {
        let total_length = placed_items
            .iter()
            .map(PlacedRect::bottom)
            .fold(0.0_f64, f64::max);
        let used_area: f64 = placed_items.iter().map(PlacedRect::area).sum();
        let total_area = roll_width * total_length;
        let efficiency = if total_area > 0.0 {
            used_area / total_area * 100.0
        } else {
            0.0
        };
        Self {
            placed_items,
            total_length,
            efficiency,
            roll_width,
            strategy: strategy.into(),
        }
    }

    pub fn empty(roll_width: f64) -> Self {
        Self::from_placements(Vec::new(), roll_width, "")
    }

    /// Ranking rule: shorter wins, unless lengths are within `LENGTH_TIE_BAND`,
    /// in which case strictly higher efficiency wins.
    pub fn beats(&self, other: &OptimizationResult) -> bool {
        self.total_length < other.total_length
            || ((self.total_length - other.total_length).abs() < LENGTH_TIE_BAND
                && self.efficiency > other.efficiency)
    }

    /// Ids of `items` that do not appear in this layout.
    pub fn unplaced<'a>(&self, items: &'a [Item]) -> Vec<&'a str> {
        let placed: HashSet<&str> = self.placed_items.iter().map(|p| p.id.as_str()).collect();
        items
            .iter()
            .filter(|it| !placed.contains(it.id.as_str()))
            .map(|it| it.id.as_str())
            .collect()
    }

    /// Computes summary statistics for this layout.
    pub fn stats(&self) -> CutStats {
        let used_area: f64 = self.placed_items.iter().map(PlacedRect::area).sum();
        CutStats {
            num_pieces: self.placed_items.len(),
            num_rotated: self.placed_items.iter().filter(|p| p.rotated).count(),
            roll_width: self.roll_width,
            total_length: self.total_length,
            used_area,
            total_area: self.roll_width * self.total_length,
            efficiency: self.efficiency,
        }
    }
}

/// Statistics about a layout's material usage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CutStats {
    pub num_pieces: usize,
    pub num_rotated: usize,
    pub roll_width: f64,
    pub total_length: f64,
    /// Sum of piece areas.
    pub used_area: f64,
    /// Consumed roll area (`roll_width * total_length`).
    pub total_area: f64,
    /// Percent of consumed area covered by pieces.
    pub efficiency: f64,
}

impl CutStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Pieces: {}, Length: {:.2}, Efficiency: {:.2}%, Used Area: {:.2}, Roll Area: {:.2}, Rotated: {}",
            self.num_pieces,
            self.total_length,
            self.efficiency,
            self.used_area,
            self.total_area,
            self.num_rotated,
        )
    }

    /// Returns the consumed roll area not covered by pieces.
    pub fn wasted_area(&self) -> f64 {
        (self.total_area - self.used_area).max(0.0)
    }

    /// Returns wasted area as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.total_area > 0.0 {
            self.wasted_area() / self.total_area * 100.0
        } else {
            0.0
        }
    }
}
