use crate::config::OptimizerConfig;
use crate::error::{Result, RollPackerError};
use crate::model::{Item, OptimizationResult, PlacedRect, PreparedItem};
use crate::strategy::Strategy;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Inputs for one optimization run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizeRequest {
    /// One record per physical piece.
    pub items: Vec<Item>,
    /// Piece id -> must be placed rotated (`true`) or unrotated (`false`).
    #[serde(default, alias = "forcedRotations")]
    pub forced_rotations: HashMap<String, bool>,
    /// Adds randomized MaxRects passes over shuffled piece orders.
    #[serde(default, alias = "useDeepSearch")]
    pub use_deep_search: bool,
    /// Pinned placements; pieces with these ids are not repacked.
    #[serde(default, alias = "lockedItems")]
    pub locked_items: Vec<PlacedRect>,
}

impl OptimizeRequest {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }
    pub fn force_rotation(mut self, id: impl Into<String>, rotated: bool) -> Self {
        self.forced_rotations.insert(id.into(), rotated);
        self
    }
    pub fn lock(mut self, rect: PlacedRect) -> Self {
        self.locked_items.push(rect);
        self
    }
    pub fn deep_search(mut self, v: bool) -> Self {
        self.use_deep_search = v;
        self
    }
}

/// One unit of work for the candidate fan-out.
struct Job<'a> {
    strategy: Strategy,
    items: Cow<'a, [PreparedItem]>,
}

/// Lays out pieces on a roll by running every applicable strategy and keeping the best.
#[derive(Debug, Clone)]
pub struct CuttingOptimizer {
    config: OptimizerConfig,
}

impl CuttingOptimizer {
    /// Validates `config` and builds an optimizer. Fails fast on a non-positive roll width.
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Runs the optimizer with the thread-local RNG.
    ///
    /// Without deep search the result is a pure function of the request. With
    /// deep search it is not reproducible; use [`Self::optimize_with_rng`] with a
    /// seeded generator when that matters.
    pub fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizationResult> {
        self.optimize_with_rng(request, &mut rand::thread_rng())
    }

    /// Runs the optimizer, drawing deep-search shuffles from `rng`.
    #[instrument(skip_all, fields(items = request.items.len(), locked = request.locked_items.len(), deep = request.use_deep_search))]
    pub fn optimize_with_rng<R: Rng + ?Sized>(
        &self,
        request: &OptimizeRequest,
        rng: &mut R,
    ) -> Result<OptimizationResult> {
        validate_items(&request.items)?;
        let prepared = self.prepare_items(request);
        let locked = request.locked_items.as_slice();

        let mut jobs: Vec<Job<'_>> = Strategy::portfolio(&self.config, !locked.is_empty())
            .into_iter()
            .map(|strategy| Job {
                strategy,
                items: Cow::Borrowed(prepared.as_slice()),
            })
            .collect();

        if request.use_deep_search {
            // Shuffles are drawn up front so the fan-out below cannot change them.
            for iteration in 0..self.config.deep_search_iterations {
                let mut order = prepared.clone();
                order.shuffle(rng);
                jobs.push(Job {
                    strategy: Strategy::DeepSearch { iteration },
                    items: Cow::Owned(order),
                });
            }
        }

        let candidates = self.run_jobs(&jobs, locked);
        let best = select_best(candidates)
            .unwrap_or_else(|| OptimizationResult::empty(self.config.roll_width));
        debug!(
            strategy = %best.strategy,
            length = best.total_length,
            efficiency = best.efficiency,
            placed = best.placed_items.len(),
            "selected layout"
        );
        Ok(best)
    }

    /// Splits off locked pieces and applies forced orientations.
    ///
    /// Pieces whose id appears in `locked_items` are dropped: they are packed
    /// around, not packed. A forced rotation pre-swaps the piece and pins it;
    /// with rotation disabled only "unrotated" can be honoured.
    pub fn prepare_items(&self, request: &OptimizeRequest) -> Vec<PreparedItem> {
        let locked_ids: HashSet<&str> = request
            .locked_items
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        request
            .items
            .iter()
            .filter(|it| !locked_ids.contains(it.id.as_str()))
            .map(|it| {
                let mut prepared = PreparedItem::from_item(it);
                match request.forced_rotations.get(&it.id) {
                    Some(true) if !self.config.allow_rotation => {
                        debug!(id = %it.id, "forced rotation ignored, rotation is disabled");
                        prepared.orientation_locked = true;
                    }
                    Some(true) => {
                        prepared = prepared.turned();
                        prepared.orientation_locked = true;
                    }
                    Some(false) => prepared.orientation_locked = true,
                    None => {}
                }
                prepared
            })
            .collect()
    }

    fn run_jobs(&self, jobs: &[Job<'_>], locked: &[PlacedRect]) -> Vec<OptimizationResult> {
        let run = |job: &Job<'_>| job.strategy.run(&self.config, &job.items, locked);

        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                // Collect keeps submission order, so ranking matches the sequential path.
                return jobs.par_iter().filter_map(run).collect();
            }
        }

        jobs.iter().filter_map(run).collect()
    }
}

/// Folds candidates in order with [`OptimizationResult::beats`].
///
/// The tie band makes the rule non-transitive, so the fold order is part of
/// the result.
pub fn select_best<I>(candidates: I) -> Option<OptimizationResult>
where
    I: IntoIterator<Item = OptimizationResult>,
{
    let mut best: Option<OptimizationResult> = None;
    for cand in candidates {
        debug!(
            strategy = %cand.strategy,
            length = cand.total_length,
            efficiency = cand.efficiency,
            placed = cand.placed_items.len(),
            "candidate"
        );
        if best.as_ref().is_none_or(|b| cand.beats(b)) {
            best = Some(cand);
        }
    }
    best
}

fn validate_items(items: &[Item]) -> Result<()> {
    for it in items {
        let ok = it.width.is_finite() && it.height.is_finite() && it.width > 0.0 && it.height > 0.0;
        if !ok {
            return Err(RollPackerError::InvalidItem {
                id: it.id.clone(),
                width: it.width,
                height: it.height,
            });
        }
    }
    Ok(())
}
