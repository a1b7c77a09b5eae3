// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tempfile::TempDir;

use crate::{cbc_tools, get_cmd_output, write_samples};

#[test]
fn test_no_posteriors() {
    let cmd = cbc_tools().args(["compare-pos", "-o", "out"]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("No posteriors"), "{stderr}");
}

#[test]
fn test_unknown_scheme() {
    let tmp = TempDir::new().unwrap();
    let cmd = cbc_tools()
        .current_dir(tmp.path())
        .args(["compare-pos", "--pos", "gopher://example.org/pe"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("gopher"), "{stderr}");
}

#[test]
fn test_event_out_of_range() {
    let tmp = TempDir::new().unwrap();
    let samples = write_samples(&tmp.path().join("a.dat"), 0.0);
    let inj = tmp.path().join("inj.dat");
    std::fs::write(&inj, "mass1 mass2 distance\n1.5 1.3 40.0\n1.6 1.2 50.0\n").unwrap();
    let outdir = tmp.path().join("out");

    #[rustfmt::skip]
    let cmd = cbc_tools()
        .current_dir(tmp.path())
        .args([
            "compare-pos",
            "--pos", &samples.display().to_string(),
            "--inj", &inj.display().to_string(),
            "--eventnum", "2",
            "-o", &outdir.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("event 2"), "{stderr}");
    assert!(!outdir.exists());
}

#[test]
fn test_dry_run() {
    let tmp = TempDir::new().unwrap();
    let samples = write_samples(&tmp.path().join("a.dat"), 0.0);
    let outdir = tmp.path().join("out");

    #[rustfmt::skip]
    let cmd = cbc_tools()
        .current_dir(tmp.path())
        .args([
            "compare-pos",
            "--pos", &samples.display().to_string(),
            "-o", &outdir.display().to_string(),
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    assert!(!outdir.exists());
}

#[test]
fn test_save_toml() {
    let tmp = TempDir::new().unwrap();
    let samples = write_samples(&tmp.path().join("a.dat"), 0.0);
    let toml = tmp.path().join("args.toml");

    #[rustfmt::skip]
    let cmd = cbc_tools()
        .current_dir(tmp.path())
        .args([
            "compare-pos",
            "--pos", &samples.display().to_string(),
            "--name", "A",
            "-u", "albert",
            "-x", "hunter2",
            "--dry-run",
            "--save-toml", &toml.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    let saved = std::fs::read_to_string(&toml).unwrap();
    assert!(saved.contains("albert"));
    assert!(!saved.contains("hunter2"));

    // The saved file reproduces the run.
    let cmd = cbc_tools()
        .current_dir(tmp.path())
        .args(["compare-pos", &toml.display().to_string(), "--dry-run"])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
}

#[cfg(feature = "plotting")]
#[test]
fn test_compare_two_local_runs() {
    let tmp = TempDir::new().unwrap();
    let a = write_samples(&tmp.path().join("a.dat"), 0.0);
    let b = write_samples(&tmp.path().join("b.dat"), 0.1);
    let outdir = tmp.path().join("out");

    #[rustfmt::skip]
    let cmd = cbc_tools()
        .current_dir(tmp.path())
        .args([
            "compare-pos",
            "--pos", &a.display().to_string(), "--name", "first",
            "--pos", &b.display().to_string(), "--name", "second",
            "-o", &outdir.display().to_string(),
            "-u", "albert", "-x", "hunter2",
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    let index = std::fs::read_to_string(outdir.join("index.html")).unwrap();
    assert!(index.contains("first"));
    assert!(index.contains("second"));
    assert!(!index.contains("hunter2"));
    assert!(index.contains("&lt;password&gt;"));
    assert!(tmp.path().join("results").is_dir());
}

#[cfg(not(feature = "plotting"))]
#[test]
fn test_compare_needs_plotting() {
    let tmp = TempDir::new().unwrap();
    let a = write_samples(&tmp.path().join("a.dat"), 0.0);
    let cmd = cbc_tools()
        .current_dir(tmp.path())
        .args(["compare-pos", "--pos", &a.display().to_string()])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("plotting"), "{stderr}");
}
