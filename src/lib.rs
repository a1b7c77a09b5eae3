// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tools for compact binary coalescence (CBC) analyses.
//!
//! `compare-pos` compares the posterior samples of several parameter-estimation
//! runs of one event, writing plots and an HTML summary. `followup-dag` writes
//! a Condor DAG to follow up candidate triggers.

mod cli;
pub mod colours;
pub mod compare;
pub mod constants;
pub mod followup;
pub mod io;
mod params;
pub mod plotting;
pub mod posterior;
pub mod report;
pub mod stats;

// Re-exports.
pub use cli::{CbcTools, CbcToolsError};

use crossbeam_utils::atomic::AtomicCell;

lazy_static::lazy_static! {
    /// Are progress bars being drawn? This should only ever be enabled by CLI
    /// code.
    static ref PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
}
