// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("Unknown scheme '{scheme}' for input data URL '{url}'; only http, https, file and plain paths are supported")]
    UnknownScheme { scheme: String, url: String },

    #[error("The input data URL '{0}' has no host")]
    NoHost(String),

    #[error("Couldn't run wget to download '{url}': {err}")]
    Wget { url: String, err: std::io::Error },

    #[error("wget failed to download '{url}' ({status})")]
    Download { url: String, status: String },

    #[error("Couldn't remove the cached download '{file}': {err}")]
    RemoveCache { file: String, err: std::io::Error },

    #[error("Couldn't create the downloads directory '{dir}': {err}")]
    CreateDownloadsDir { dir: String, err: std::io::Error },
}
