// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Statistics of posterior samples: confidence intervals, kernel density
//! estimates, stepped histograms and greedy-binned credible regions.

mod error;
mod greedy;
mod kde;
#[cfg(test)]
mod tests;

pub use error::StatsError;
pub use greedy::GreedyBins2D;
pub use kde::GaussianKde;

/// Check that samples can be summarised; they must be non-empty and finite.
fn check_samples(samples: &[f64]) -> Result<(), StatsError> {
    if samples.is_empty() {
        return Err(StatsError::NoSamples);
    }
    if samples.iter().any(|s| !s.is_finite()) {
        return Err(StatsError::NonFiniteSamples);
    }
    Ok(())
}

/// The interval containing the fraction `cl` of the samples, centred on the
/// median of the sorted samples.
///
/// With `N` samples, the interval contains exactly `max(1, ceil(cl * N))`
/// samples, so the covered fraction is within one sample of `cl`.
pub fn prob_interval(samples: &[f64], cl: f64) -> Result<(f64, f64), StatsError> {
    if cl.is_nan() || cl <= 0.0 || cl >= 1.0 {
        return Err(StatsError::InvalidConfidenceLevel(cl));
    }
    check_samples(samples)?;

    let mut sorted = samples.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    let n = sorted.len();
    let m = ((cl * n as f64).ceil() as usize).clamp(1, n);
    let lower = (n - m) / 2;
    let upper = lower + m - 1;
    Ok((sorted[lower], sorted[upper]))
}

/// A histogram normalised to integrate to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct StepHistogram {
    /// `num_bins + 1` bin edges.
    pub edges: Vec<f64>,

    /// The probability density of each bin.
    pub densities: Vec<f64>,
}

impl StepHistogram {
    /// Bin the samples into `num_bins` equal-width bins spanning the samples.
    /// If all samples are the same value, the bins span that value ± 0.5.
    pub fn new(samples: &[f64], num_bins: usize) -> Result<StepHistogram, StatsError> {
        check_samples(samples)?;
        if num_bins == 0 {
            return Err(StatsError::NoBins);
        }

        let (mut min, mut max) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            });
        if min == max {
            min -= 0.5;
            max += 0.5;
        }
        let width = (max - min) / num_bins as f64;

        let mut counts = vec![0_usize; num_bins];
        for &s in samples {
            // The maximum belongs in the last bin.
            let i = (((s - min) / width) as usize).min(num_bins - 1);
            counts[i] += 1;
        }

        let norm = samples.len() as f64 * width;
        Ok(StepHistogram {
            edges: (0..=num_bins).map(|i| min + i as f64 * width).collect(),
            densities: counts.into_iter().map(|c| c as f64 / norm).collect(),
        })
    }

    pub fn max_density(&self) -> f64 {
        self.densities.iter().copied().fold(0.0, f64::max)
    }

    /// The outline of the histogram as (x, y) points, starting and ending at
    /// zero density.
    pub fn step_points(&self) -> Vec<(f64, f64)> {
        let mut points = Vec::with_capacity(2 * self.densities.len() + 2);
        points.push((self.edges[0], 0.0));
        for (i, &d) in self.densities.iter().enumerate() {
            points.push((self.edges[i], d));
            points.push((self.edges[i + 1], d));
        }
        points.push((self.edges[self.edges.len() - 1], 0.0));
        points
    }
}

/// `n` evenly-spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + i as f64 * step).collect()
        }
    }
}
