// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The results of a comparison, and the HTML page summarising them.

mod html;

pub(crate) use html::escape;
pub use html::{render_index, sanitise_command_line, PageMeta};

use std::path::PathBuf;

use indexmap::IndexMap;

/// One run's confidence intervals for a parameter. `None` means the interval
/// couldn't be computed for that level.
#[derive(Debug, Clone, PartialEq)]
pub struct ClRow {
    pub run: String,
    /// The run's colour as `#rrggbb`.
    pub colour: String,
    pub intervals: Vec<Option<(f64, f64)>>,
}

/// Confidence intervals of one parameter, for every run and level.
#[derive(Debug, Clone, PartialEq)]
pub struct ClTable {
    pub levels: Vec<f64>,
    pub rows: Vec<ClRow>,
}

impl ClTable {
    pub fn new(levels: &[f64]) -> ClTable {
        ClTable {
            levels: levels.to_vec(),
            rows: vec![],
        }
    }

    /// For each level, the smallest lower bound and the largest upper bound
    /// over the runs that have an interval. `None` if no run does.
    pub fn min_max(&self) -> Vec<Option<(f64, f64)>> {
        (0..self.levels.len())
            .map(|i_level| {
                self.rows
                    .iter()
                    .filter_map(|row| row.intervals.get(i_level).copied().flatten())
                    .fold(None, |acc, (lo, hi)| match acc {
                        None => Some((lo, hi)),
                        Some((min, max)) => Some((f64::min(min, lo), f64::max(max, hi))),
                    })
            })
            .collect()
    }
}

/// Everything produced for a single parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct OneDEntry {
    /// Histogram plot file names, one per confidence level, relative to the
    /// output directory.
    pub plots: Vec<PathBuf>,
    /// The density estimate plot, if one was drawn.
    pub pdf_plot: Option<PathBuf>,
    pub cl_table: ClTable,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonReport {
    /// Keyed by parameter, in comparison order.
    pub one_d: IndexMap<String, OneDEntry>,
    /// Contour plot file names, relative to the output directory.
    pub two_d: Vec<PathBuf>,
}
