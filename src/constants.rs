// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

Parameter names here must match the *harmonised* column names of posterior
sample tables (e.g. `dist`, not `distance`), except where both spellings are
listed for compatibility with older outputs.
 */

use std::collections::HashMap;

pub use std::f64::consts::PI;

/// Parameters that may be compared. The order here is the order parameters
/// appear in comparison reports.
pub const ALLOWED_PARAMS: [&str; 20] = [
    "mtotal",
    "m1",
    "m2",
    "mchirp",
    "mc",
    "distance",
    "distMPC",
    "dist",
    "iota",
    "cos(iota)",
    "psi",
    "eta",
    "ra",
    "dec",
    "a1",
    "a2",
    "phi1",
    "theta1",
    "phi2",
    "theta2",
];

/// Parameter pairs that get a 2D greedy-binned contour plot. A pair matches in
/// either order; the order here is used to name the plot.
pub const TWO_D_PLOTS: [(&str, &str); 4] =
    [("m1", "m2"), ("mass1", "mass2"), ("RA", "dec"), ("ra", "dec")];

/// The confidence levels used for 1D intervals and plots.
pub const CONFIDENCE_LEVELS: [f64; 3] = [0.67, 0.9, 0.95];

/// The confidence levels drawn on 2D greedy-binned contour plots.
pub const TWO_D_CONFIDENCE_LEVELS: [f64; 1] = [0.95];

/// The number of points a kernel density estimate is evaluated on.
pub const KDE_NUM_POINTS: usize = 101;

/// The number of bins in each run's stepped histogram.
pub const HIST_NUM_BINS: usize = 100;

/// The default seed used to assign colours to runs.
pub const DEFAULT_COLOUR_SEED: u64 = 2010;

/// The name of the sample file inside a post-processing output directory.
pub const POSTERIOR_SAMPLES_FILE: &str = "posterior_samples.dat";

/// Run names containing any of these have their inclination measured from the
/// opposite direction; `iota` is replaced with `π - iota` before conversion.
pub const IOTA_INVERTED_RUN_PATTERNS: [&str; 2] = ["LI_MCMC", "FU_MCMC"];

lazy_static::lazy_static! {
    /// Bin widths for greedy binning, keyed by harmonised parameter name.
    pub static ref GREEDY_BIN_SIZES: HashMap<&'static str, f64> = HashMap::from([
        ("mc", 0.0001),
        ("m1", 0.1),
        ("m2", 0.1),
        ("mass1", 0.1),
        ("mass2", 0.1),
        ("mtotal", 0.1),
        ("eta", 0.001),
        ("iota", 0.01),
        ("time", 1e-4),
        ("distance", 1.0),
        ("dist", 1.0),
        ("mchirp", 0.001),
        ("a1", 0.02),
        ("a2", 0.02),
        ("phi1", 0.05),
        ("phi2", 0.05),
        ("theta1", 0.05),
        ("theta2", 0.05),
        ("ra", 0.05),
        ("dec", 0.005),
        ("psi", 0.1),
        ("cos(iota)", 0.01),
    ]);
}
