// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Bring sample tables from different pipelines onto the same naming and
//! parameterisation conventions.
//!
//! The steps are always attempted in the same order:
//!
//! 1. Rename aliased columns (`distance` -> `dist`, `chirpmass` -> `mchirp`,
//!    `mc` -> `mchirp`);
//! 2. For runs whose inclination is measured the other way around, replace
//!    `iota` with `π - iota`;
//! 3. Replace `iota` with `cos(iota)`;
//! 4. Make sure `m1` is the heavier component by swapping the `m1` and `m2`
//!    labels if the mean of `m1` is smaller.
//!
//! A step that can't be done is not an error, but it is reported, so callers
//! can tell what happened to each table. Harmonising an already-harmonised
//! table changes nothing.

use std::fmt;

use log::{debug, trace};

use super::SampleTable;
use crate::constants::{IOTA_INVERTED_RUN_PATTERNS, PI};

/// Column aliases, applied in this order.
const RENAMES: [(&str, &str); 3] = [
    ("distance", "dist"),
    ("chirpmass", "mchirp"),
    ("mc", "mchirp"),
];

const IOTA: &str = "iota";
const COS_IOTA: &str = "cos(iota)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarmoniseStep {
    Rename {
        from: &'static str,
        to: &'static str,
    },
    InvertIota,
    IotaToCosIota,
    SwapMasses,
}

impl fmt::Display for HarmoniseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarmoniseStep::Rename { from, to } => write!(f, "re-label {from} -> {to}"),
            HarmoniseStep::InvertIota => write!(f, "invert iota"),
            HarmoniseStep::IotaToCosIota => write!(f, "convert iota -> cos(iota)"),
            HarmoniseStep::SwapMasses => write!(f, "swap m1 and m2"),
        }
    }
}

/// Why a harmonisation step wasn't applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The column the step works on isn't in the table.
    MissingColumn(&'static str),

    /// The step would create a column that is already in the table.
    TargetExists(&'static str),

    /// `m1` is already the heavier mass.
    MassesOrdered,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingColumn(c) => write!(f, "no '{c}' column"),
            SkipReason::TargetExists(c) => write!(f, "'{c}' is already present"),
            SkipReason::MassesOrdered => write!(f, "m1 is already the heavier mass"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarmoniseReport {
    pub applied: Vec<HarmoniseStep>,
    pub skipped: Vec<(HarmoniseStep, SkipReason)>,
}

impl HarmoniseReport {
    pub fn was_applied(&self, step: HarmoniseStep) -> bool {
        self.applied.contains(&step)
    }
}

#[derive(Debug, Clone)]
pub struct Harmonised {
    pub table: SampleTable,
    pub report: HarmoniseReport,
}

/// Does this run measure inclination from the opposite direction?
fn inverts_iota(run_name: &str) -> bool {
    IOTA_INVERTED_RUN_PATTERNS
        .iter()
        .any(|pattern| run_name.contains(pattern))
}

/// Harmonise a sample table. The input table is untouched; a new table is
/// returned along with a record of what was (and wasn't) done.
pub fn harmonise(run_name: &str, table: &SampleTable) -> Harmonised {
    let mut names = table.names.clone();
    let mut samples = table.samples.clone();
    let mut report = HarmoniseReport::default();
    let index = |names: &[String], name: &str| names.iter().position(|n| n == name);

    for (from, to) in RENAMES {
        let step = HarmoniseStep::Rename { from, to };
        match (index(&names, from), index(&names, to)) {
            (Some(i), None) => {
                names[i] = to.to_string();
                report.applied.push(step);
            }
            (Some(_), Some(_)) => report.skipped.push((step, SkipReason::TargetExists(to))),
            (None, _) => report.skipped.push((step, SkipReason::MissingColumn(from))),
        }
    }

    if inverts_iota(run_name) {
        match index(&names, IOTA) {
            Some(i) => {
                samples.column_mut(i).mapv_inplace(|v| PI - v);
                report.applied.push(HarmoniseStep::InvertIota);
            }
            None => report
                .skipped
                .push((HarmoniseStep::InvertIota, SkipReason::MissingColumn(IOTA))),
        }
    }

    match (index(&names, IOTA), index(&names, COS_IOTA)) {
        (Some(i), None) => {
            samples.column_mut(i).mapv_inplace(f64::cos);
            names[i] = COS_IOTA.to_string();
            report.applied.push(HarmoniseStep::IotaToCosIota);
        }
        (Some(_), Some(_)) => report.skipped.push((
            HarmoniseStep::IotaToCosIota,
            SkipReason::TargetExists(COS_IOTA),
        )),
        (None, _) => report.skipped.push((
            HarmoniseStep::IotaToCosIota,
            SkipReason::MissingColumn(IOTA),
        )),
    }

    match (index(&names, "m1"), index(&names, "m2")) {
        (Some(i1), Some(i2)) => {
            let mean = |i: usize| samples.column(i).mean().unwrap_or(f64::NAN);
            if mean(i1) < mean(i2) {
                names.swap(i1, i2);
                report.applied.push(HarmoniseStep::SwapMasses);
            } else {
                report
                    .skipped
                    .push((HarmoniseStep::SwapMasses, SkipReason::MassesOrdered));
            }
        }
        (None, _) => report
            .skipped
            .push((HarmoniseStep::SwapMasses, SkipReason::MissingColumn("m1"))),
        (_, None) => report
            .skipped
            .push((HarmoniseStep::SwapMasses, SkipReason::MissingColumn("m2"))),
    }

    for step in &report.applied {
        debug!("{run_name}: {step}");
    }
    for (step, reason) in &report.skipped {
        trace!("{run_name}: didn't {step}: {reason}");
    }

    Harmonised {
        table: SampleTable { names, samples },
        report,
    }
}
