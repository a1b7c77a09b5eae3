// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with reading sample tables.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadSampleTableError {
    #[error("The sample table has no header line naming its parameters")]
    NoHeader,

    #[error("The sample table has a header but no samples")]
    NoSamples,

    #[error("Line {line_num}: couldn't parse '{string}' as a float")]
    ParseFloat { line_num: u32, string: String },

    #[error("Line {line_num}: expected {expected} values (one per header column), found {found}")]
    RaggedRow {
        line_num: u32,
        expected: usize,
        found: usize,
    },

    #[error("The sample table names {names} parameters but has {columns} columns")]
    ColumnMismatch { names: usize, columns: usize },

    #[error("Parameter '{0}' appears more than once in the sample table header")]
    DuplicateColumn(String),

    #[error("Couldn't open sample table '{file}': {err}")]
    Open { file: String, err: std::io::Error },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
