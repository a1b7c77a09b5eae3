// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod compare_pos;
mod followup_dag;

use std::{
    io::Write,
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};

fn cbc_tools() -> Command {
    Command::cargo_bin("cbc-tools").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// Write a sample table with `m1`, `m2` and `distance` columns. `offset`
/// shifts every sample.
fn write_samples(file: &Path, offset: f64) -> PathBuf {
    let mut f = std::fs::File::create(file).unwrap();
    writeln!(f, "m1\tm2\tdistance\tlogl").unwrap();
    for i in 0..80 {
        let i = i as f64;
        writeln!(
            f,
            "{}\t{}\t{}\t{}",
            1.4 + offset + 0.01 * i,
            1.3 + offset + 0.004 * i,
            35.0 + offset + 0.5 * i,
            -12.0 - 0.1 * i
        )
        .unwrap();
    }
    file.to_path_buf()
}
