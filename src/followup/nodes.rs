// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The jobs and nodes of a follow-up DAG.

use std::path::Path;

use log::debug;

use super::{
    CondorJob, CondorNode, FollowupConfig, FollowupError, NodeError, QscanConfig, Trigger,
    Universe,
};

pub const INSPIRAL_JOB: &str = "followup-inspiral";
pub const PLOT_SNR_CHISQ_JOB: &str = "plot-snr-chisq";
pub const DATAFIND_JOB: &str = "qscan-datafind";
pub const QSCAN_JOB: &str = "qscan";
pub const QSCANLITE_JOB: &str = "qscanlite";

pub const INSPIRAL_CATEGORY: &str = "inspiral";
pub const PLOT_SNR_CHISQ_CATEGORY: &str = "Plot SNR/CHISQ/PSD";
pub const DATAFIND_CATEGORY: &str = "qscan data find";

/// Inspiral options that are set for each trigger, and so are not copied from
/// the process parameters.
const SKIP_PROCESS_PARAMS: [&str; 6] = [
    "minimal-match",
    "bank-file",
    "user-tag",
    "injection-file",
    "trig-start-time",
    "trig-end-time",
];

/// The script (relative to the data-find job's directory) that turns LAL
/// caches into Q-scan caches.
const CACHECONV_SCRIPT: &str = "cacheconv.sh";

pub fn inspiral_job(config: &FollowupConfig) -> CondorJob {
    CondorJob::new(
        INSPIRAL_JOB,
        config.condor.inspiral_universe,
        &config.condor.inspiral,
    )
}

pub fn plot_snr_chisq_job(config: &FollowupConfig) -> CondorJob {
    let mut job = CondorJob::new(
        PLOT_SNR_CHISQ_JOB,
        Universe::Vanilla,
        &config.condor.plotsnrchisq,
    );
    job.add_condor_cmd("getenv", "True");
    job
}

/// The data-find job. Its directory (with a `logs` subdirectory) is made in
/// `dir`, along with the script that converts its caches for Q-scan.
pub fn qscan_datafind_job(config: &FollowupConfig, dir: &Path) -> Result<CondorJob, FollowupError> {
    let job_dir = dir.join(DATAFIND_JOB);
    let logs = job_dir.join("logs");
    std::fs::create_dir_all(&logs).map_err(|err| FollowupError::CreateDir {
        dir: logs.display().to_string(),
        err,
    })?;

    let script = job_dir.join(CACHECONV_SCRIPT);
    let contents = format!(
        "#!/bin/bash\nif [ ${{1}} -ne 0 ] ; then\n  exit 1\nelse\n  {} ${{2}} ${{3}}\nfi\n",
        config.condor.convertcache.display()
    );
    let write_err = |err| FollowupError::Write {
        file: script.display().to_string(),
        err,
    };
    std::fs::write(&script, contents).map_err(write_err)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .map_err(write_err)?;
    }
    debug!("Wrote {}", script.display());

    Ok(CondorJob::new(
        DATAFIND_JOB,
        Universe::Vanilla,
        &config.condor.datafind,
    ))
}

/// The Q-scan job, or the Q-scan-lite job if `lite` is set and a `qscanlite`
/// executable is configured.
pub fn qscan_job(config: &FollowupConfig, lite: bool) -> CondorJob {
    match (lite, &config.condor.qscanlite) {
        (true, Some(exe)) => CondorJob::new(QSCANLITE_JOB, Universe::Vanilla, exe),
        _ => CondorJob::new(QSCAN_JOB, Universe::Vanilla, &config.condor.qscan),
    }
}

/// A GPS time as written in file names and options.
fn gps_string(gps: f64) -> String {
    format!("{gps}")
}

/// Re-run the inspiral code around a trigger, writing out SNR, chi-squared and
/// spectrum time series.
pub fn inspiral_node(
    job: &CondorJob,
    config: &FollowupConfig,
    ifo: &str,
    trigger: &Trigger,
) -> Result<CondorNode, NodeError> {
    let gps = trigger
        .gps_time
        .get(ifo)
        .copied()
        .ok_or_else(|| NodeError::NoGpsTime(ifo.to_string()))?;
    let gps_str = gps_string(gps);
    let user_tag = format!("FOLLOWUP_{gps_str}");

    // Placeholder id; the real one depends on the process parameters.
    let mut node = CondorNode::new(job, "", INSPIRAL_CATEGORY);
    node.add_var_opt("write-snrsq", "");
    node.add_var_opt("write-chisq", "");
    node.add_var_opt("write-spectrum", "");
    node.add_var_opt(
        "bank-file",
        format!("trigTemplateBank/{ifo}-TRIGBANK_FOLLOWUP_{gps_str}.xml.gz"),
    );
    node.add_var_opt("user-tag", &user_tag);
    node.add_var_opt("trig-start-time", gps.trunc() as i64 - 1);
    node.add_var_opt("trig-end-time", gps.trunc() as i64 + 1);
    if let Some(inj) = config.injection_file() {
        node.add_var_opt("injection-file", inj.display());
    }

    let mut start = None;
    let mut end = None;
    let mut ifo_tag = None;
    let mut input_ifo = None;
    let mut compressed = false;
    for (param, value) in &config.inspiral.process_params {
        let param = param.trim_matches('-');
        if SKIP_PROCESS_PARAMS.contains(&param) {
            continue;
        }
        node.add_var_opt(param, value);
        match param {
            "gps-start-time" => start = Some(value.as_str()),
            "gps-end-time" => end = Some(value.as_str()),
            "ifo-tag" => ifo_tag = Some(value.as_str()),
            "channel-name" => {
                input_ifo = Some(
                    value
                        .get(0..2)
                        .ok_or_else(|| NodeError::BadChannelName(value.clone()))?,
                )
            }
            "write-compress" => compressed = true,
            _ => (),
        }
    }
    let start = start.ok_or(NodeError::MissingProcessParam("gps-start-time"))?;
    let end = end.ok_or(NodeError::MissingProcessParam("gps-end-time"))?;
    let ifo_tag = ifo_tag.ok_or(NodeError::MissingProcessParam("ifo-tag"))?;
    let input_ifo = input_ifo.ok_or(NodeError::MissingProcessParam("channel-name"))?;

    let parse = |param: &'static str, value: &str| {
        value.trim().parse::<i64>().map_err(|_| NodeError::BadGpsTime {
            param,
            value: value.to_string(),
        })
    };
    let duration = parse("gps-end-time", end)? - parse("gps-start-time", start)?;

    let extension = if compressed { ".xml.gz" } else { ".xml" };
    let id = format!("{input_ifo}-INSPIRAL_{ifo_tag}_{user_tag}-{start}-{duration}");
    let output_path = &config.inspiral.output_path;
    let output_file = format!("{output_path}{id}{extension}");

    node.output_cache = vec![
        format!("{ifo} INSPIRAL {start} {duration} {output_file}"),
        format!(
            "{ifo} INSPIRAL-FRAME {start} {duration} {}",
            output_file.replace(extension, ".gwf")
        ),
    ];
    node.add_var_opt("output-path", output_path);
    node.id = id;
    node.output_file = Some(output_file);
    Ok(node)
}

/// Plot the SNR and chi-squared time series written by an inspiral node. The
/// inspiral node is only made a parent if it's in the DAG (`inspiral_valid`).
pub fn plot_snr_chisq_node(
    job: &CondorJob,
    ifo: &str,
    inspiral: &CondorNode,
    inspiral_valid: bool,
    trigger: &Trigger,
) -> Result<CondorNode, NodeError> {
    let file = inspiral
        .output_file
        .as_deref()
        .ok_or(NodeError::NoInspiralOutput)?;
    let gps = trigger
        .gps_time
        .get(ifo)
        .copied()
        .ok_or_else(|| NodeError::NoGpsTime(ifo.to_string()))?;

    let id = format!(
        "{}-{ifo}-{}_{}",
        job.name, trigger.stat_value, trigger.event_id
    );
    let mut node = CondorNode::new(job, id, PLOT_SNR_CHISQ_CATEGORY);
    let frame_file = format!(
        "{}.gwf",
        file.trim_end_matches(".gz").trim_end_matches(".xml")
    );
    node.add_var_opt("frame-file", frame_file);
    node.add_var_opt("gps", gps_string(gps));
    node.add_var_opt("inspiral-xml-file", file);
    if inspiral_valid {
        node.add_parent(inspiral);
    }
    Ok(node)
}

/// Find the frames around `time` for a Q-scan, writing a LAL cache that is
/// converted to a Q-scan cache afterwards. `previous` is made a parent; the
/// caller passes the previous data-find node when it's in the DAG.
pub fn qscan_datafind_node(
    job: &CondorJob,
    config: &FollowupConfig,
    time: f64,
    ifo: &str,
    qscan_type: &str,
    previous: Option<&CondorNode>,
) -> Result<CondorNode, NodeError> {
    let section = qscan_section(config, qscan_type)?;
    let frame_type = section
        .frame_type(ifo)
        .ok_or_else(|| NodeError::MissingQscanOption {
            section: qscan_type.to_string(),
            option: "type".to_string(),
        })?;
    let observatory = ifo
        .get(0..1)
        .ok_or_else(|| NodeError::BadChannelName(ifo.to_string()))?;

    // Extra seconds either side so rounding to samples in the scan still fits
    // inside the window.
    let q_time = section.search_time_range / 2.0;
    let start = (time - q_time - 1.0).trunc() as i64;
    let end = (time + q_time + 1.0).trunc() as i64;

    let lal_cache = format!(
        "{}/{observatory}-{frame_type}-{start}-{}.cache",
        job.name,
        end - start
    );
    let q_cache = format!("{}qcache", lal_cache.trim_end_matches("cache"));

    let id = format!("{ifo}-{}-{qscan_type}", gps_string(time));
    let mut node = CondorNode::new(job, id, DATAFIND_CATEGORY);
    node.add_var_opt("observatory", observatory);
    node.add_var_opt("gps-start-time", start);
    node.add_var_opt("gps-end-time", end);
    node.add_var_opt("type", frame_type);
    node.add_var_opt("lal-cache", "");
    node.add_var_opt("url-type", "file");
    node.add_var_opt("output", &lal_cache);
    node.post_script = Some(format!(
        "{}/{CACHECONV_SCRIPT} $RETURN {lal_cache} {q_cache}",
        job.name
    ));
    node.output_file = Some(q_cache);
    if let Some(previous) = previous {
        node.add_parent(previous);
    }
    Ok(node)
}

fn qscan_section<'a>(config: &'a FollowupConfig, name: &str) -> Result<&'a QscanConfig, NodeError> {
    config
        .qscan
        .get(name)
        .ok_or_else(|| NodeError::UnknownQscanSection(name.to_string()))
}

/// Run a Q-scan of `ifo` at `time`. A missing option is a [NodeError], but an
/// output directory that doesn't exist is fatal.
pub fn qscan_node(
    job: &CondorJob,
    time: f64,
    config: &FollowupConfig,
    qcache: &str,
    ifo: &str,
    name: &str,
    datafind: Option<&CondorNode>,
) -> Result<CondorNode, FollowupError> {
    let section = qscan_section(config, name)?;
    let option = |option: &str| {
        section
            .ifo_option(ifo, option)
            .ok_or_else(|| NodeError::MissingQscanOption {
                section: name.to_string(),
                option: format!("{ifo}{option}"),
            })
    };
    let qscan_config = option("config-file")?;
    let output = option("output")?;

    let time_str = gps_string(time);
    let mut node = CondorNode::new(job, format!("{ifo}-{name}-{time_str}"), name);
    node.add_var_arg(&time_str);
    node.add_var_arg(qscan_config);
    node.add_var_arg(qcache);
    node.add_var_arg(output);

    let abs_output =
        std::fs::canonicalize(output).map_err(|err| FollowupError::QscanOutput {
            dir: output.to_string(),
            err,
        })?;
    let output_name = format!("{}/{time_str}", abs_output.display());
    node.output_cache = vec![format!("{ifo} {name} {time_str} {output_name}")];
    node.output_file = Some(output_name);
    node.web_link = section
        .ifo_option(ifo, "web")
        .map(|web| format!("{web}{time_str}"));

    if let Some(datafind) = datafind {
        node.add_parent(datafind);
    }
    Ok(node)
}
