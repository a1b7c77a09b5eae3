// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::{check_samples, StatsError};
use crate::constants::PI;

/// A 1D Gaussian kernel density estimate. The kernel bandwidth is derived from
/// the samples with Scott's rule.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    pub fn new(samples: &[f64]) -> Result<GaussianKde, StatsError> {
        check_samples(samples)?;
        let n = samples.len();
        if n < 2 {
            return Err(StatsError::DegenerateSamples {
                num_samples: n,
                std_dev: 0.0,
            });
        }

        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let std_dev = variance.sqrt();
        if !std_dev.is_normal() {
            return Err(StatsError::DegenerateSamples {
                num_samples: n,
                std_dev,
            });
        }

        // Scott's factor for one dimension.
        let factor = (n as f64).powf(-1.0 / 5.0);
        Ok(GaussianKde {
            samples: samples.to_vec(),
            bandwidth: factor * std_dev,
        })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// The density at `x`.
    pub fn density(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let norm = 1.0 / (self.samples.len() as f64 * h * (2.0 * PI).sqrt());
        self.samples
            .iter()
            .map(|s| {
                let u = (x - s) / h;
                (-0.5 * u * u).exp()
            })
            .sum::<f64>()
            * norm
    }

    pub fn evaluate(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.density(x)).collect()
    }
}
