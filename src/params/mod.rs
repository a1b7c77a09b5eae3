// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters for each subcommand.
//!
//! The code here "mirrors" the code within the `cli` module; `cli` is
//! unparsed, user-facing code, whereas parameters have been validated and are
//! ready to be used directly.

mod compare_pos;
mod followup_dag;

pub(crate) use compare_pos::{ComparePosError, ComparePosParams};
pub(crate) use followup_dag::FollowupDagParams;
