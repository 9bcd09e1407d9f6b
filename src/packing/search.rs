use clap::ValueEnum;
use log::{debug, info};
use rayon::prelude::*;

use super::packer::pack_unchecked;
use super::{Layout, RectSet};
use crate::error::PackError;

/// Largest atlas side tried when nothing else is configured
pub const DEFAULT_MAX_DIMENSION: u32 = 2048;

/// Strategy for choosing candidate atlas widths
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq, Hash)]
pub enum SearchPolicy {
    /// Try every width from the widest sprite up to all sprites side by side
    #[default]
    #[value(name = "linear")]
    Linear,
    /// Start at the widest sprite and double until the area stops shrinking
    #[value(name = "doubling")]
    Doubling,
}

impl std::str::FromStr for SearchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

/// Picks the atlas width whose packing has the smallest area
#[derive(Debug, Clone, Copy)]
pub struct WidthSearch {
    pub max_dimension: u32,
    pub policy: SearchPolicy,
    pub parallel: bool,
}

impl Default for WidthSearch {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DIMENSION)
    }
}

impl WidthSearch {
    pub fn new(max_dimension: u32) -> Self {
        Self {
            max_dimension,
            policy: SearchPolicy::Linear,
            parallel: true,
        }
    }

    pub fn policy(mut self, policy: SearchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run the search. Both sides of the returned layout are within
    /// `max_dimension`.
    pub fn run(&self, rects: &RectSet) -> Result<Layout, PackError> {
        rects.check_width(self.max_dimension)?;

        let best = match self.policy {
            SearchPolicy::Linear => self.linear(rects),
            SearchPolicy::Doubling => self.doubling(rects),
        };

        let layout = best.ok_or(PackError::NoFeasibleWidth {
            max_dimension: self.max_dimension,
        })?;

        info!(
            "Packed {} rectangles into {}x{} ({:.1}% occupancy, {:?} search)",
            rects.len(),
            layout.width,
            layout.height,
            layout.occupancy() * 100.0,
            self.policy,
        );

        Ok(layout)
    }

    fn try_width(&self, rects: &RectSet, width: u32) -> Option<Layout> {
        pack_unchecked(rects, width, self.max_dimension, |_| {})
    }

    /// Widest-rectangle width, doubled while it stays within both the bound
    /// and the summed widths
    fn doubling_widths(&self, rects: &RectSet) -> impl Iterator<Item = u32> {
        let limit = rects.total_width().min(u64::from(self.max_dimension));
        std::iter::successors(Some(rects.widest().width), move |width| {
            width
                .checked_mul(2)
                .filter(|next| u64::from(*next) <= limit)
        })
    }

    /// Every width from the widest rectangle up to the summed widths,
    /// capped at the bound. Ties keep the narrower width.
    fn linear(&self, rects: &RectSet) -> Option<Layout> {
        let first = rects.widest().width;
        let last = rects
            .total_width()
            .min(u64::from(self.max_dimension))
            .try_into()
            .unwrap_or(self.max_dimension);

        debug!(
            "Trying widths {}..={} ({})",
            first,
            last,
            if self.parallel { "parallel" } else { "sequential" }
        );

        // (area, width) is unique per candidate, so the parallel reduction
        // picks the same layout as the sequential one.
        if self.parallel {
            (first..=last)
                .into_par_iter()
                .filter_map(|width| self.try_width(rects, width))
                .min_by_key(|layout| (layout.area(), layout.width))
        } else {
            (first..=last)
                .filter_map(|width| self.try_width(rects, width))
                .min_by_key(|layout| (layout.area(), layout.width))
        }
    }

    /// Start at the widest rectangle and double the width until the area
    /// stops improving or the width runs past the bound or the summed widths.
    fn doubling(&self, rects: &RectSet) -> Option<Layout> {
        let mut best: Option<Layout> = None;

        for width in self.doubling_widths(rects) {
            let candidate = self.try_width(rects, width);
            let improves = match (&best, &candidate) {
                (_, None) => false,
                (None, Some(_)) => true,
                (Some(current), Some(layout)) => layout.area() < current.area(),
            };

            if improves {
                debug!(
                    "Width {}: area {}",
                    width,
                    candidate.as_ref().map_or(0, Layout::area)
                );
                best = candidate;
            } else if best.is_some() {
                break;
            } else {
                debug!("Width {}: taller than {}", width, self.max_dimension);
            }
        }

        best
    }
}
