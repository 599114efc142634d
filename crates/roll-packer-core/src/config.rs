use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Height tolerance (in roll units) for a piece to join an existing row.
pub const ROW_HEIGHT_TOLERANCE: f64 = 0.5;
/// Two candidates whose lengths differ by less than this are ranked by efficiency instead.
pub const LENGTH_TIE_BAND: f64 = 5.0;
/// Number of shuffled MaxRects passes run by deep search.
pub const DEFAULT_DEEP_SEARCH_ITERATIONS: usize = 50;
/// Slack used by every "fits" comparison to absorb floating point drift.
pub const FIT_EPSILON: f64 = 1e-9;

/// Sort orders used by the guillotine heuristic family.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    HeightDesc,
    WidthDesc,
    AreaDesc,
    MaxSideDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::HeightDesc,
        SortOrder::WidthDesc,
        SortOrder::AreaDesc,
        SortOrder::MaxSideDesc,
    ];
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::HeightDesc => "Height",
            SortOrder::WidthDesc => "Width",
            SortOrder::AreaDesc => "Area",
            SortOrder::MaxSideDesc => "MaxSide",
        })
    }
}

impl FromStr for SortOrder {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "height" | "height_desc" => Ok(Self::HeightDesc),
            "width" | "width_desc" => Ok(Self::WidthDesc),
            "area" | "area_desc" => Ok(Self::AreaDesc),
            "maxside" | "max_side_desc" => Ok(Self::MaxSideDesc),
            _ => Err(()),
        }
    }
}

/// Orientation normalization applied to every piece before a guillotine pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Keep pieces as given.
    None,
    /// Shorter side across the roll.
    Vertical,
    /// Longer side across the roll.
    Horizontal,
}

impl Orientation {
    pub const ALL: [Orientation; 3] = [
        Orientation::None,
        Orientation::Vertical,
        Orientation::Horizontal,
    ];
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Orientation::None => "None",
            Orientation::Vertical => "Vertical",
            Orientation::Horizontal => "Horizontal",
        })
    }
}

impl FromStr for Orientation {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            _ => Err(()),
        }
    }
}

/// Roll settings, fixed for the lifetime of one optimizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizerConfig {
    /// Usable width of the roll.
    pub roll_width: f64,
    /// Kerf reserved after every piece, along both axes.
    #[serde(default, alias = "bladeWidth", alias = "bladeSpacing")]
    pub blade_spacing: f64,
    /// Allow 90° rotations. When false nothing is rotated, forced rotations included.
    #[serde(default = "default_allow_rotation", alias = "allowRotation")]
    pub allow_rotation: bool,
    /// Shuffled MaxRects passes to run when deep search is requested.
    #[serde(default = "default_deep_search_iterations")]
    pub deep_search_iterations: usize,
    /// Evaluate candidates in parallel when the `parallel` feature is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            roll_width: 152.0,
            blade_spacing: 0.0,
            allow_rotation: default_allow_rotation(),
            deep_search_iterations: default_deep_search_iterations(),
            parallel: false,
        }
    }
}

impl OptimizerConfig {
    /// Validates the roll settings.
    ///
    /// Returns an error if the roll width is not a positive finite number or the
    /// blade spacing is negative or not finite.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::RollPackerError;

        if !self.roll_width.is_finite() || self.roll_width <= 0.0 {
            return Err(RollPackerError::InvalidRollWidth(self.roll_width));
        }
        if !self.blade_spacing.is_finite() || self.blade_spacing < 0.0 {
            return Err(RollPackerError::InvalidConfig(format!(
                "blade_spacing must be finite and >= 0, got {}",
                self.blade_spacing
            )));
        }
        Ok(())
    }
}

fn default_allow_rotation() -> bool {
    true
}
fn default_deep_search_iterations() -> usize {
    DEFAULT_DEEP_SEARCH_ITERATIONS
}

/// Builder for `OptimizerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct OptimizerConfigBuilder {
    cfg: OptimizerConfig,
}

impl OptimizerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: OptimizerConfig::default(),
        }
    }
    pub fn roll_width(mut self, v: f64) -> Self {
        self.cfg.roll_width = v;
        self
    }
    pub fn blade_spacing(mut self, v: f64) -> Self {
        self.cfg.blade_spacing = v;
        self
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.cfg.allow_rotation = v;
        self
    }
    pub fn deep_search_iterations(mut self, v: usize) -> Self {
        self.cfg.deep_search_iterations = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> OptimizerConfig {
        self.cfg
    }
}

impl OptimizerConfig {
    /// Create a fluent builder for `OptimizerConfig`.
    pub fn builder() -> OptimizerConfigBuilder {
        OptimizerConfigBuilder::new()
    }
}
