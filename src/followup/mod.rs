// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Condor DAGs to follow up candidate triggers.
//!
//! For each trigger and detector, the DAG re-runs the inspiral code around the
//! trigger (writing SNR and chi-squared time series), plots those time series,
//! finds the frames around the trigger and runs Q-scans on them. Each kind of
//! node can be switched off; a node that is switched off, or that can't be
//! made, isn't put in the DAG and its children don't depend on it.

mod config;
mod dag;
mod error;
pub mod nodes;

pub use config::{
    read_triggers, CondorConfig, FollowupConfig, InspiralConfig, OutputConfig, QscanConfig,
    Trigger, TriggersConfig,
};
pub use dag::{CondorJob, CondorNode, FollowupDag, Universe};
pub use error::{FollowupError, NodeError};

use std::path::Path;

use log::{debug, info};

use crate::cli::Warn;
use nodes::*;

/// Which kinds of node go into the DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stages {
    pub inspiral: bool,
    pub plots: bool,
    pub datafind: bool,
    pub qscan: bool,
}

impl Default for Stages {
    fn default() -> Self {
        Self {
            inspiral: true,
            plots: true,
            datafind: true,
            qscan: true,
        }
    }
}

/// Fill `dag` with jobs and nodes for the triggers. Job directories are made
/// in `dir`.
pub fn build_dag(
    dag: &mut FollowupDag,
    config: &FollowupConfig,
    triggers: &[Trigger],
    stages: Stages,
    dir: &Path,
) -> Result<(), FollowupError> {
    if triggers.is_empty() {
        return Err(FollowupError::NoTriggers);
    }
    dag.page = config.output.page.clone();

    let insp_job = inspiral_job(config);
    let plot_job = plot_snr_chisq_job(config);
    dag.add_job(insp_job.clone());
    dag.add_job(plot_job.clone());

    let datafind_job = if config.qscan.is_empty() {
        None
    } else {
        let job = qscan_datafind_job(config, dir)?;
        dag.add_job(job.clone());
        Some(job)
    };
    let qscan_jobs = config
        .qscan
        .iter()
        .map(|(name, section)| {
            let job = qscan_job(config, section.lite);
            dag.add_job(job.clone());
            (name.as_str(), job)
        })
        .collect::<Vec<_>>();

    let mut prev_datafind: Option<CondorNode> = None;
    for trigger in triggers {
        debug!(
            "Trigger {} (statistic {})",
            trigger.event_id, trigger.stat_value
        );
        for (ifo, &gps) in &trigger.gps_time {
            let inspiral = match inspiral_node(&insp_job, config, ifo, trigger) {
                Ok(node) => {
                    if stages.inspiral {
                        dag.add_node(node.clone());
                    }
                    Some(node)
                }
                Err(e) => {
                    format!("Couldn't add inspiral job for {ifo} @ {gps}: {e}").warn();
                    None
                }
            };

            if let Some(inspiral) = &inspiral {
                match plot_snr_chisq_node(&plot_job, ifo, inspiral, stages.inspiral, trigger) {
                    Ok(node) => {
                        if stages.plots {
                            dag.add_node(node);
                        }
                    }
                    Err(e) => format!("Couldn't add plot job for {ifo} @ {gps}: {e}").warn(),
                }
            }

            let df_job = match &datafind_job {
                Some(j) => j,
                None => continue,
            };
            for (name, qscan_job) in &qscan_jobs {
                let previous = prev_datafind.as_ref().filter(|_| stages.datafind);
                let datafind =
                    match qscan_datafind_node(df_job, config, gps, ifo, name, previous) {
                        Ok(node) => node,
                        Err(e) => {
                            format!("Couldn't set up the datafind job for {name} ({ifo} @ {gps}): {e}")
                                .warn();
                            continue;
                        }
                    };
                if stages.datafind {
                    dag.add_node(datafind.clone());
                }

                let qcache = datafind.output_file.clone().unwrap_or_default();
                let parent = Some(&datafind).filter(|_| stages.datafind);
                match qscan_node(qscan_job, gps, config, &qcache, ifo, name, parent) {
                    Ok(node) => {
                        if stages.qscan {
                            dag.add_node(node);
                        }
                    }
                    Err(FollowupError::Node(e)) => {
                        format!("Couldn't set up the {name} job for {ifo} @ {gps}: {e}").warn()
                    }
                    Err(e) => return Err(e),
                }
                prev_datafind = Some(datafind);
            }
        }
    }

    info!(
        "The DAG has {} jobs and {} nodes",
        dag.jobs().count(),
        dag.nodes().count()
    );
    Ok(())
}
