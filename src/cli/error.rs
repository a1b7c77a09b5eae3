// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all cbc-tools-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use super::{compare_pos::ComparePosArgsError, followup_dag::FollowupDagArgsError};
use crate::{
    compare::CompareError,
    followup::FollowupError,
    io::AcquireError,
    params::ComparePosError,
    plotting::DrawError,
    posterior::{InjectionError, ReadSampleTableError},
};

/// The *only* publicly visible error from cbc-tools.
#[derive(Error, Debug)]
pub enum CbcToolsError {
    /// An error related to compare-pos arguments or the comparison itself.
    #[error("{0}")]
    ComparePos(String),

    /// An error related to reading posterior sample tables.
    #[error("{0}\n\nSample files are whitespace-delimited tables with a header line of parameter names.")]
    Posterior(String),

    /// An error related to getting posterior samples.
    #[error("{0}")]
    Acquire(String),

    /// An error related to injections.
    #[error("{0}")]
    Injection(String),

    /// An error related to plotting.
    #[error("{0}")]
    Plotting(String),

    /// An error related to followup-dag.
    #[error("{0}")]
    Followup(String),

    /// An error related to argument files.
    #[error("{0}")]
    ArgFile(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<ComparePosArgsError> for CbcToolsError {
    fn from(e: ComparePosArgsError) -> Self {
        let s = e.to_string();
        match e {
            ComparePosArgsError::NoPosteriors | ComparePosArgsError::DuplicateName(_) => {
                Self::ComparePos(s)
            }
            ComparePosArgsError::Acquire(e) => Self::from(e),
        }
    }
}

impl From<ComparePosError> for CbcToolsError {
    fn from(e: ComparePosError) -> Self {
        let s = e.to_string();
        match e {
            ComparePosError::Injection(e) => Self::from(e),
            ComparePosError::Acquire(e) => Self::from(e),
            ComparePosError::Read { .. } => Self::Posterior(s),
            ComparePosError::Compare(e) => Self::from(e),
            ComparePosError::Draw(e) => Self::from(e),
            ComparePosError::CreateDir { .. } | ComparePosError::IO(_) => Self::Generic(s),
        }
    }
}

impl From<FollowupDagArgsError> for CbcToolsError {
    fn from(e: FollowupDagArgsError) -> Self {
        Self::Followup(e.to_string())
    }
}

// Library errors.

impl From<CompareError> for CbcToolsError {
    fn from(e: CompareError) -> Self {
        Self::ComparePos(e.to_string())
    }
}

impl From<ReadSampleTableError> for CbcToolsError {
    fn from(e: ReadSampleTableError) -> Self {
        Self::Posterior(e.to_string())
    }
}

impl From<InjectionError> for CbcToolsError {
    fn from(e: InjectionError) -> Self {
        Self::Injection(e.to_string())
    }
}

impl From<AcquireError> for CbcToolsError {
    fn from(e: AcquireError) -> Self {
        Self::Acquire(e.to_string())
    }
}

impl From<DrawError> for CbcToolsError {
    fn from(e: DrawError) -> Self {
        Self::Plotting(e.to_string())
    }
}

impl From<FollowupError> for CbcToolsError {
    fn from(e: FollowupError) -> Self {
        let s = e.to_string();
        match e {
            FollowupError::Read { .. }
            | FollowupError::Parse { .. }
            | FollowupError::QscanOutput { .. }
            | FollowupError::NoTriggers
            | FollowupError::Node(_) => Self::Followup(s),
            FollowupError::LogFile { .. }
            | FollowupError::CreateDir { .. }
            | FollowupError::Write { .. } => Self::Generic(s),
        }
    }
}

impl From<std::io::Error> for CbcToolsError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
