// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Posterior samples.
//!
//! A sample table is a whitespace-delimited text file; the first line names the
//! parameters and every subsequent line is one draw from the posterior. Tables
//! are harmonised (see [harmonise]) before being turned into [Posterior]s, so
//! that runs from different pipelines can be compared column by column.

mod error;
pub mod harmonise;
pub mod injection;

pub use error::ReadSampleTableError;
pub use harmonise::{harmonise, Harmonised, HarmoniseReport, HarmoniseStep, SkipReason};
pub use injection::{read_injection, Injection, InjectionError};

use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use indexmap::IndexMap;
use log::trace;
use ndarray::prelude::*;

use crate::{
    constants::ALLOWED_PARAMS,
    stats::{prob_interval, GaussianKde, StatsError},
};

/// The parsed contents of a sample file. Columns are parameters, rows are
/// samples.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    pub names: Vec<String>,
    pub samples: Array2<f64>,
}

impl SampleTable {
    pub fn new(names: Vec<String>, samples: Array2<f64>) -> Result<Self, ReadSampleTableError> {
        if names.len() != samples.len_of(Axis(1)) {
            return Err(ReadSampleTableError::ColumnMismatch {
                names: names.len(),
                columns: samples.len_of(Axis(1)),
            });
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ReadSampleTableError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self { names, samples })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<ArrayView1<f64>> {
        self.column_index(name)
            .map(|i| self.samples.index_axis(Axis(1), i))
    }

    pub fn num_samples(&self) -> usize {
        self.samples.len_of(Axis(0))
    }
}

/// Read a sample table from a file.
pub fn read_sample_table(file: &Path) -> Result<SampleTable, ReadSampleTableError> {
    let f = File::open(file).map_err(|err| ReadSampleTableError::Open {
        file: file.display().to_string(),
        err,
    })?;
    parse_sample_table(&mut BufReader::new(f))
}

/// Parse a buffer containing a sample table.
pub fn parse_sample_table<T: BufRead>(buf: &mut T) -> Result<SampleTable, ReadSampleTableError> {
    let mut line = String::new();
    let mut line_num: u32 = 0;
    let mut names: Option<Vec<String>> = None;
    let mut flat = vec![];
    let mut num_rows = 0;

    while buf.read_line(&mut line)? > 0 {
        line_num += 1;
        let trimmed = line.trim();

        match names.as_ref() {
            None => {
                if trimmed.is_empty() {
                    line.clear();
                    continue;
                }
                let header: Vec<String> = trimmed
                    .trim_start_matches('#')
                    .split_ascii_whitespace()
                    .map(|s| s.to_string())
                    .collect();
                if header.is_empty() {
                    return Err(ReadSampleTableError::NoHeader);
                }
                trace!("Sample table header: {header:?}");
                names = Some(header);
            }

            Some(names) => {
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    line.clear();
                    continue;
                }
                let before = flat.len();
                for item in trimmed.split_ascii_whitespace() {
                    let value: f64 =
                        item.parse()
                            .map_err(|_| ReadSampleTableError::ParseFloat {
                                line_num,
                                string: item.to_string(),
                            })?;
                    flat.push(value);
                }
                let found = flat.len() - before;
                if found != names.len() {
                    return Err(ReadSampleTableError::RaggedRow {
                        line_num,
                        expected: names.len(),
                        found,
                    });
                }
                num_rows += 1;
            }
        }

        line.clear();
    }

    let names = names.ok_or(ReadSampleTableError::NoHeader)?;
    if num_rows == 0 {
        return Err(ReadSampleTableError::NoSamples);
    }
    let samples = Array2::from_shape_vec((num_rows, names.len()), flat)
        .expect("every row was checked to have one value per column");
    SampleTable::new(names, samples)
}

/// The samples of a single parameter, and its injected value, if known.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorParam {
    samples: Vec<f64>,
    injval: Option<f64>,
}

impl PosteriorParam {
    pub fn new(samples: Vec<f64>, injval: Option<f64>) -> Self {
        Self { samples, injval }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn injval(&self) -> Option<f64> {
        self.injval
    }

    pub fn mean(&self) -> f64 {
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    pub fn min(&self) -> f64 {
        self.samples.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// The interval containing the fraction `cl` of these samples. See
    /// [prob_interval].
    pub fn prob_interval(&self, cl: f64) -> Result<(f64, f64), StatsError> {
        prob_interval(&self.samples, cl)
    }

    pub fn gaussian_kde(&self) -> Result<GaussianKde, StatsError> {
        GaussianKde::new(&self.samples)
    }
}

/// The samples of one analysis run. Every parameter has the same number of
/// samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Posterior {
    name: String,
    params: IndexMap<String, PosteriorParam>,
}

impl Posterior {
    /// Create a posterior from a (harmonised) sample table. Injected values are
    /// attached to any parameter the injection knows about.
    pub fn new(name: impl Into<String>, table: &SampleTable, injection: Option<&Injection>) -> Self {
        let params = table
            .names
            .iter()
            .zip(table.samples.axis_iter(Axis(1)))
            .map(|(param, column)| {
                let injval = injection.and_then(|inj| inj.get(param));
                (param.clone(), PosteriorParam::new(column.to_vec(), injval))
            })
            .collect();
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, param: &str) -> Option<&PosteriorParam> {
        self.params.get(param)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(|s| s.as_str())
    }

    pub fn num_samples(&self) -> usize {
        self.params
            .values()
            .next()
            .map(|p| p.samples.len())
            .unwrap_or(0)
    }
}

/// The parameters that every posterior has and that are in the list of
/// comparable parameters. The result is ordered by [ALLOWED_PARAMS], so the
/// order of the posteriors doesn't matter.
pub fn common_parameters(posteriors: &[Posterior]) -> Vec<String> {
    if posteriors.is_empty() {
        return vec![];
    }
    ALLOWED_PARAMS
        .iter()
        .filter(|param| posteriors.iter().all(|p| p.get(param).is_some()))
        .map(|param| param.to_string())
        .collect()
}
