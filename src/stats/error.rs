// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("No samples were supplied")]
    NoSamples,

    #[error("Some samples are NaN or infinite")]
    NonFiniteSamples,

    #[error("The confidence level {0} is not between 0 and 1")]
    InvalidConfidenceLevel(f64),

    #[error("Can't estimate a density from {num_samples} samples with a standard deviation of {std_dev}")]
    DegenerateSamples { num_samples: usize, std_dev: f64 },

    #[error("A histogram needs at least one bin")]
    NoBins,

    #[error("The x and y samples have different lengths ({x} vs {y})")]
    LengthMismatch { x: usize, y: usize },

    #[error("Bin widths must be positive; got {0}")]
    InvalidBinWidth(f64),

    #[error("Greedy binning would need {0} bins; the bin widths are too small for these samples")]
    TooManyBins(usize),
}
