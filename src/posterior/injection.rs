// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Injected ("true") parameter values of simulated signals.
//!
//! An injection file is a table in the same format as a sample table, except
//! that each row describes one injection. Columns may use the SimInspiral
//! names (`mass1`, `inclination`, ...); these are mapped onto the harmonised
//! posterior vocabulary so that injected values can be looked up by the same
//! names as the posterior parameters.

use std::path::Path;

use indexmap::IndexMap;
use log::debug;
use ndarray::prelude::*;
use thiserror::Error;

use super::{harmonise, read_sample_table, ReadSampleTableError, SampleTable};

/// SimInspiral column names and their posterior equivalents. `distance` and
/// `inclination` are handled by harmonisation after this mapping.
const INJECTION_ALIASES: [(&str, &str); 6] = [
    ("mass1", "m1"),
    ("mass2", "m2"),
    ("inclination", "iota"),
    ("longitude", "ra"),
    ("latitude", "dec"),
    ("polarization", "psi"),
];

/// The values of a single injection, keyed by harmonised parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Injection {
    values: IndexMap<String, f64>,
}

impl Injection {
    /// Create an injection from one row of an injection table.
    pub fn from_row(names: &[String], row: ArrayView1<f64>) -> Injection {
        let mut names = names.to_vec();
        for (from, to) in INJECTION_ALIASES {
            if names.iter().any(|n| n == to) {
                continue;
            }
            if let Some(n) = names.iter_mut().find(|n| *n == from) {
                *n = to.to_string();
            }
        }

        let table = SampleTable {
            names,
            samples: row.to_owned().insert_axis(Axis(0)),
        };
        // Injections are never measured with the inverted inclination
        // convention.
        let harmonised = harmonise::harmonise("injection", &table).table;

        let mut values: IndexMap<String, f64> = harmonised
            .names
            .into_iter()
            .zip(harmonised.samples.row(0).iter().copied())
            .collect();
        let mtotal = match (values.get("m1"), values.get("m2")) {
            (Some(m1), Some(m2)) => Some(m1 + m2),
            _ => None,
        };
        if let Some(mtotal) = mtotal {
            values.entry("mtotal".to_string()).or_insert(mtotal);
        }

        Injection { values }
    }

    pub fn get(&self, param: &str) -> Option<f64> {
        self.values.get(param).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Read the injection with index `event` from an injection file.
pub fn read_injection(file: &Path, event: usize) -> Result<Injection, InjectionError> {
    let table = read_sample_table(file).map_err(|err| InjectionError::Read {
        file: file.display().to_string(),
        err,
    })?;
    let num_injections = table.num_samples();
    if event >= num_injections {
        return Err(InjectionError::EventOutOfRange {
            event,
            file: file.display().to_string(),
            num_injections,
        });
    }
    debug!(
        "Using injection {event} of {num_injections} from '{}'",
        file.display()
    );
    Ok(Injection::from_row(&table.names, table.samples.row(event)))
}

#[derive(Error, Debug)]
pub enum InjectionError {
    #[error("You asked for event {event}, but {file} contains only {num_injections} injections")]
    EventOutOfRange {
        event: usize,
        file: String,
        num_injections: usize,
    },

    #[error("Couldn't read injection file '{file}': {err}")]
    Read {
        file: String,
        err: ReadSampleTableError,
    },
}
