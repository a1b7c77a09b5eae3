// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use indoc::{formatdoc, indoc};
use tempfile::TempDir;

use crate::{cbc_tools, get_cmd_output};

#[test]
fn test_followup_dag() {
    let tmp = TempDir::new().unwrap();
    let qscan_out = tmp.path().join("qscans");
    std::fs::create_dir(&qscan_out).unwrap();

    let config = tmp.path().join("followup.toml");
    std::fs::write(
        &config,
        formatdoc! {r#"
            [condor]
            inspiral = "/opt/lalapps/lalapps_inspiral"
            plotsnrchisq = "/opt/bin/plotsnrchisq_pipe"
            qscan = "/opt/bin/qscan"
            datafind = "/opt/bin/LSCdataFind"
            convertcache = "/opt/bin/convertlalcache.pl"

            [output]
            page = "https://example.org/followup"

            [inspiral]
            output-path = "inspiral/"

            [inspiral.process-params]
            "--gps-start-time" = "871234000"
            "--gps-end-time" = "871236048"
            "--ifo-tag" = "FOLLOWUP"
            "--channel-name" = "H1:LSC-STRAIN"

            [qscan.foreground-qscan]
            search-time-range = 128.0
            type = "RDS_R_L1"
            H1config-file = "/opt/qscan/H1.txt"
            H1output = "{}"
        "#, qscan_out.display()},
    )
    .unwrap();
    let triggers = tmp.path().join("triggers.toml");
    std::fs::write(
        &triggers,
        indoc! {r#"
            [[trigger]]
            event-id = "7"
            stat-value = 11.5
            gps-time = { H1 = 871234567.5 }
        "#},
    )
    .unwrap();

    #[rustfmt::skip]
    let cmd = cbc_tools()
        .current_dir(tmp.path())
        .args([
            "followup-dag",
            "--config", &config.display().to_string(),
            "--triggers", &triggers.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    let dag = std::fs::read_to_string(tmp.path().join("followup.dag")).unwrap();
    assert!(dag.contains("SCRIPT POST"));
    assert!(dag.contains("qscan-datafind/cacheconv.sh"));
    assert!(tmp.path().join("qscan.sub").exists());
    assert!(tmp.path().join("qscan-datafind/cacheconv.sh").exists());
    assert!(std::fs::read_dir(tmp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .any(|e| e.file_name().to_string_lossy().starts_with("followup.dag.log.")));
}

#[test]
fn test_followup_dag_needs_triggers() {
    let tmp = TempDir::new().unwrap();
    let cmd = cbc_tools()
        .current_dir(tmp.path())
        .args(["followup-dag", "--config", "followup.toml"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("--triggers"), "{stderr}");
}
