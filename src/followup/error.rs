// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Problems that stop a single node from being made. The node is left out of
/// the DAG.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    #[error("The inspiral process parameters don't have '{0}'")]
    MissingProcessParam(&'static str),

    #[error("Couldn't get a detector from channel name '{0}'")]
    BadChannelName(String),

    #[error("Process parameter '{param}' isn't a GPS time: '{value}'")]
    BadGpsTime { param: &'static str, value: String },

    #[error("Q-scan section '{section}' has no '{option}' option")]
    MissingQscanOption { section: String, option: String },

    #[error("There's no Q-scan section called '{0}'")]
    UnknownQscanSection(String),

    #[error("The trigger has no GPS time for {0}")]
    NoGpsTime(String),

    #[error("No inspiral output to plot")]
    NoInspiralOutput,
}

#[derive(Error, Debug)]
pub enum FollowupError {
    #[error("Couldn't read '{file}': {err}")]
    Read { file: String, err: std::io::Error },

    #[error("Couldn't parse '{file}': {err}")]
    Parse {
        file: String,
        err: toml::de::Error,
    },

    #[error("Couldn't create a DAG log file in '{dir}': {err}")]
    LogFile { dir: String, err: std::io::Error },

    #[error("Couldn't create directory '{dir}': {err}")]
    CreateDir { dir: String, err: std::io::Error },

    #[error("Couldn't write '{file}': {err}")]
    Write { file: String, err: std::io::Error },

    #[error("Invalid path for Q-scan output '{dir}': {err}")]
    QscanOutput { dir: String, err: std::io::Error },

    #[error("No triggers were given")]
    NoTriggers,

    #[error(transparent)]
    Node(#[from] NodeError),
}
