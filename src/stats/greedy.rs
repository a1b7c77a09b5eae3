// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Greedy binning of two parameters.
//!
//! Samples are put into a fixed-width 2D histogram. Bins are then taken in
//! decreasing order of occupancy until they hold the requested fraction of the
//! samples; the bins taken are an estimate of the smallest region with that
//! much posterior probability.

use std::collections::HashSet;

use ndarray::prelude::*;

use super::{check_samples, StatsError};

/// Refuse to allocate histograms larger than this.
const MAX_GREEDY_BINS: usize = 4_000_000;

#[derive(Debug, Clone)]
pub struct GreedyBins2D {
    bin_widths: (f64, f64),
    origin: (f64, f64),
    counts: Array2<u32>,
    /// Occupied bins, most occupied first. Ties are broken by bin index so the
    /// order is deterministic.
    order: Vec<(usize, usize)>,
    /// The running total of samples along `order`.
    cumulative: Vec<u64>,
    num_samples: usize,
    injection_bin: Option<(usize, usize)>,
}

impl GreedyBins2D {
    pub fn new(
        xs: &[f64],
        ys: &[f64],
        bin_widths: (f64, f64),
        injection: Option<(f64, f64)>,
    ) -> Result<GreedyBins2D, StatsError> {
        if xs.len() != ys.len() {
            return Err(StatsError::LengthMismatch {
                x: xs.len(),
                y: ys.len(),
            });
        }
        check_samples(xs)?;
        check_samples(ys)?;
        for w in [bin_widths.0, bin_widths.1] {
            if !(w.is_finite() && w > 0.0) {
                return Err(StatsError::InvalidBinWidth(w));
            }
        }

        let range = |v: &[f64]| {
            v.iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
                    (lo.min(s), hi.max(s))
                })
        };
        let (x_min, x_max) = range(xs);
        let (y_min, y_max) = range(ys);
        // Bin counts are checked as floats; a huge range would overflow a usize.
        let num_x = ((x_max - x_min) / bin_widths.0).floor() + 1.0;
        let num_y = ((y_max - y_min) / bin_widths.1).floor() + 1.0;
        let total = num_x * num_y;
        if !total.is_finite() || total > MAX_GREEDY_BINS as f64 {
            return Err(StatsError::TooManyBins(total as usize));
        }
        let (num_x, num_y) = (num_x as usize, num_y as usize);

        let bin_of = |x: f64, y: f64| -> Option<(usize, usize)> {
            let fx = ((x - x_min) / bin_widths.0).floor();
            let fy = ((y - y_min) / bin_widths.1).floor();
            if fx < 0.0 || fy < 0.0 {
                return None;
            }
            let (i, j) = (fx as usize, fy as usize);
            (i < num_x && j < num_y).then_some((i, j))
        };

        let mut counts = Array2::<u32>::zeros((num_x, num_y));
        for (&x, &y) in xs.iter().zip(ys) {
            // Samples at the very edge can land one bin over from float error.
            let i = (((x - x_min) / bin_widths.0) as usize).min(num_x - 1);
            let j = (((y - y_min) / bin_widths.1) as usize).min(num_y - 1);
            counts[(i, j)] += 1;
        }

        let mut order: Vec<(usize, usize)> = counts
            .indexed_iter()
            .filter(|(_, &c)| c > 0)
            .map(|(ij, _)| ij)
            .collect();
        order.sort_by(|a, b| counts[*b].cmp(&counts[*a]).then(a.cmp(b)));
        let cumulative = order
            .iter()
            .scan(0_u64, |acc, ij| {
                *acc += u64::from(counts[*ij]);
                Some(*acc)
            })
            .collect();

        Ok(GreedyBins2D {
            bin_widths,
            origin: (x_min, y_min),
            injection_bin: injection.and_then(|(x, y)| bin_of(x, y)),
            counts,
            order,
            cumulative,
            num_samples: xs.len(),
        })
    }

    /// The number of bins along each axis.
    pub fn shape(&self) -> (usize, usize) {
        self.counts.dim()
    }

    pub fn counts(&self) -> ArrayView2<u32> {
        self.counts.view()
    }

    /// The bins that make up the credible region for the confidence level
    /// `cl`. Regions grow monotonically with `cl`.
    pub fn region(&self, cl: f64) -> Result<&[(usize, usize)], StatsError> {
        if cl.is_nan() || cl <= 0.0 || cl > 1.0 {
            return Err(StatsError::InvalidConfidenceLevel(cl));
        }
        let target = cl * self.num_samples as f64;
        let k = self
            .cumulative
            .partition_point(|&c| (c as f64) < target)
            .saturating_add(1)
            .min(self.order.len());
        Ok(&self.order[..k])
    }

    /// The area of the credible region for the confidence level `cl`, in units
    /// of the two parameters.
    pub fn area(&self, cl: f64) -> Result<f64, StatsError> {
        let region = self.region(cl)?;
        Ok(region.len() as f64 * self.bin_widths.0 * self.bin_widths.1)
    }

    /// The smallest confidence level whose credible region contains the
    /// injection. `None` if there was no injection or it fell outside the
    /// occupied bins.
    pub fn injection_confidence(&self) -> Option<f64> {
        let bin = self.injection_bin?;
        let position = self.order.iter().position(|&ij| ij == bin)?;
        Some(self.cumulative[position] as f64 / self.num_samples as f64)
    }

    /// The lower-left and upper-right corners of a bin.
    pub fn bin_corners(&self, (i, j): (usize, usize)) -> ((f64, f64), (f64, f64)) {
        let (x0, y0) = self.origin;
        let (wx, wy) = self.bin_widths;
        (
            (x0 + i as f64 * wx, y0 + j as f64 * wy),
            (x0 + (i + 1) as f64 * wx, y0 + (j + 1) as f64 * wy),
        )
    }

    /// The line segments separating bins inside the credible region from bins
    /// outside it.
    pub fn region_outline(&self, cl: f64) -> Result<Vec<[(f64, f64); 2]>, StatsError> {
        let region = self.region(cl)?;
        let inside: HashSet<(usize, usize)> = region.iter().copied().collect();
        let is_inside = |i: Option<usize>, j: Option<usize>| match (i, j) {
            (Some(i), Some(j)) => inside.contains(&(i, j)),
            _ => false,
        };

        let mut segments = vec![];
        for &(i, j) in region {
            let ((x0, y0), (x1, y1)) = self.bin_corners((i, j));
            if !is_inside(i.checked_sub(1), Some(j)) {
                segments.push([(x0, y0), (x0, y1)]);
            }
            if !is_inside(Some(i + 1), Some(j)) {
                segments.push([(x1, y0), (x1, y1)]);
            }
            if !is_inside(Some(i), j.checked_sub(1)) {
                segments.push([(x0, y0), (x1, y0)]);
            }
            if !is_inside(Some(i), Some(j + 1)) {
                segments.push([(x0, y1), (x1, y1)]);
            }
        }
        Ok(segments)
    }
}
