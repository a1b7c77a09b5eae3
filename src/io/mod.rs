// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Getting posterior sample files onto the local disk, either by pointing at
//! local files or by downloading them.

mod acquire;
mod error;

pub use acquire::{samples_url, Acquirer, Downloader, PosteriorSource, Wget};
pub use error::AcquireError;
