use crate::config::{OptimizerConfig, Orientation, SortOrder};
use crate::model::{OptimizationResult, PlacedRect, PreparedItem};
use crate::packer::guillotine::{GuillotinePacker, prepare_pass};
use crate::packer::maxrects::MaxRectsPacker;
use crate::packer::row::RowPacker;
use crate::packer::skyline::SkylinePacker;
use crate::packer::{pack_sequence, sort_items};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of layout strategies the optimizer compares.
///
/// Each run builds fresh packer state, so strategies are independent of one
/// another and safe to evaluate concurrently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Shelves of equal-height pieces. No fixed obstacles.
    RowBased,
    /// Skyline bottom-left. No fixed obstacles.
    Skyline,
    /// MaxRects, Best Short Side Fit, pieces by area descending.
    MaxRects,
    /// Bottom-left over the free list after an orientation pass and a sort.
    Guillotine {
        sort: SortOrder,
        orientation: Orientation,
    },
    /// MaxRects over a caller-shuffled order (pieces are used as given).
    DeepSearch { iteration: usize },
}

impl Strategy {
    /// Whether the strategy can pack around locked pieces.
    pub fn supports_locked(&self) -> bool {
        !matches!(self, Strategy::RowBased | Strategy::Skyline)
    }

    /// Deterministic strategies in evaluation order.
    ///
    /// Row and skyline come first and only when nothing is locked; the
    /// guillotine family is orientation-major and limited to `Orientation::None`
    /// when rotation is disabled.
    pub fn portfolio(config: &OptimizerConfig, has_locked: bool) -> Vec<Strategy> {
        let mut out = Vec::with_capacity(15);
        if !has_locked {
            out.push(Strategy::RowBased);
            out.push(Strategy::Skyline);
        }
        out.push(Strategy::MaxRects);
        for orientation in Orientation::ALL {
            if !config.allow_rotation && orientation != Orientation::None {
                continue;
            }
            for sort in SortOrder::ALL {
                out.push(Strategy::Guillotine { sort, orientation });
            }
        }
        out
    }

    /// Runs the strategy on `items` around `locked`.
    ///
    /// Returns `None` when the strategy cannot honour locked pieces. Locked
    /// rectangles are echoed unchanged at the front of the placements.
    pub fn run(
        &self,
        config: &OptimizerConfig,
        items: &[PreparedItem],
        locked: &[PlacedRect],
    ) -> Option<OptimizationResult> {
        if !locked.is_empty() && !self.supports_locked() {
            return None;
        }
        let placed = match *self {
            Strategy::RowBased => RowPacker::new(config).pack_all(items),
            Strategy::Skyline => {
                let mut order = items.to_vec();
                SkylinePacker::sort_items(&mut order);
                let mut packer = SkylinePacker::new(config);
                let mut placed = Vec::with_capacity(order.len());
                pack_sequence(&mut packer, &order, &mut placed);
                placed
            }
            Strategy::MaxRects | Strategy::DeepSearch { .. } => {
                let mut packer = MaxRectsPacker::new(config);
                let mut placed = Vec::with_capacity(locked.len() + items.len());
                for obstacle in locked {
                    packer.reserve(obstacle);
                    placed.push(obstacle.clone());
                }
                if matches!(self, Strategy::MaxRects) {
                    let mut order = items.to_vec();
                    sort_items(&mut order, SortOrder::AreaDesc);
                    pack_sequence(&mut packer, &order, &mut placed);
                } else {
                    pack_sequence(&mut packer, items, &mut placed);
                }
                placed
            }
            Strategy::Guillotine { sort, orientation } => {
                let order = prepare_pass(items, sort, orientation);
                let mut packer = GuillotinePacker::new(config);
                let mut placed = Vec::with_capacity(locked.len() + order.len());
                for obstacle in locked {
                    packer.reserve(obstacle);
                    placed.push(obstacle.clone());
                }
                pack_sequence(&mut packer, &order, &mut placed);
                placed
            }
        };
        Some(OptimizationResult::from_placements(
            placed,
            config.roll_width,
            self.to_string(),
        ))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::RowBased => f.write_str("Row-based"),
            Strategy::Skyline => f.write_str("Skyline"),
            Strategy::MaxRects => f.write_str("MaxRects-BSSF"),
            Strategy::Guillotine { sort, orientation } => {
                write!(f, "Guillotine-{sort}-{orientation}")
            }
            Strategy::DeepSearch { iteration } => write!(f, "DeepSearch-Iter{iteration}"),
        }
    }
}
