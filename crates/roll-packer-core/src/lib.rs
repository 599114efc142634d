//! Core library for laying out rectangular pieces on a roll of fixed width.
//!
//! - Strategies: Row-based shelves, Skyline, MaxRects (Best Short Side Fit), and a
//!   Guillotine family (4 sort orders x 3 orientation modes, bottom-left placement)
//! - Optimizer: runs every applicable strategy, optionally a randomized deep search,
//!   and keeps the shortest layout (near-ties go to the denser one)
//! - Locked pieces are packed around; forced rotations pin a piece's orientation
//! - Data model is serde-serializable; JSON exporters live in [`export`].
//!
//! Quick example:
//! ```no_run
//! use roll_packer_core::prelude::*;
//! # fn main() -> roll_packer_core::Result<()> {
//! let cfg = OptimizerConfig::builder().roll_width(150.0).blade_spacing(0.3).build();
//! let optimizer = CuttingOptimizer::new(cfg)?;
//! let request = OptimizeRequest::new(vec![
//!     Item::new("a", 50.0, 30.0),
//!     Item::new("b", 70.0, 40.0),
//! ]);
//! let out = optimizer.optimize(&request)?;
//! println!("length: {:.1}, efficiency: {:.1}%", out.total_length, out.efficiency);
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod model;
pub mod optimizer;
pub mod packer;
pub mod strategy;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use optimizer::*;
pub use strategy::*;

/// Convenience prelude for common types and functions.
/// Importing `roll_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{
        OptimizerConfig, OptimizerConfigBuilder, Orientation, SortOrder, LENGTH_TIE_BAND,
        ROW_HEIGHT_TOLERANCE,
    };
    pub use crate::model::{CutStats, Item, OptimizationResult, PlacedRect, PreparedItem};
    pub use crate::optimizer::{CuttingOptimizer, OptimizeRequest, select_best};
    pub use crate::strategy::Strategy;
}
