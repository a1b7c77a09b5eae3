// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrawError {
    #[cfg(not(feature = "plotting"))]
    #[error("cbc-tools was not compiled with the \"plotting\" feature.\nYou need to compile cbc-tools from source with this feature to make plots.")]
    NoPlottingFeature,

    #[error("Nothing to plot for '{0}'")]
    NoData(String),

    #[error("While drawing '{file}': {msg}")]
    Chart { file: String, msg: String },
}
