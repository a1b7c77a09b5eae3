// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{display_warnings, InfoPrinter, ARG_FILE_HELP};
use crate::{
    followup::{read_triggers, FollowupConfig, Stages},
    params::FollowupDagParams,
    CbcToolsError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct FollowupDagArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// The follow-up configuration (TOML). The DAG is named after this file.
    #[clap(short = 'f', long, parse(from_os_str), help_heading = "INPUT")]
    pub(super) config: Option<PathBuf>,

    /// The triggers to follow up (TOML, a [[trigger]] table for each).
    #[clap(short, long, parse(from_os_str), help_heading = "INPUT")]
    pub(super) triggers: Option<PathBuf>,

    /// The directory for the DAG's log file. This should be on a local disk.
    /// Default: the current directory.
    #[clap(short, long, parse(from_os_str), help_heading = "OUTPUT")]
    pub(super) log_path: Option<PathBuf>,

    /// The directory to write the DAG, submit files, cache and web page into.
    /// Default: the current directory.
    #[clap(short, long, parse(from_os_str), help_heading = "OUTPUT")]
    pub(super) output_dir: Option<PathBuf>,

    /// Re-run the inspiral code around each trigger. If none of the stage
    /// flags are given, all stages are run.
    #[clap(long, help_heading = "STAGES")]
    #[serde(default)]
    pub(super) inspiral: bool,

    /// Plot SNR and chi-squared time series.
    #[clap(long, help_heading = "STAGES")]
    #[serde(default)]
    pub(super) plots: bool,

    /// Find frames for the Q-scans.
    #[clap(long, help_heading = "STAGES")]
    #[serde(default)]
    pub(super) datafind: bool,

    /// Run Q-scans.
    #[clap(long, help_heading = "STAGES")]
    #[serde(default)]
    pub(super) qscan: bool,
}

impl FollowupDagArgs {
    pub(super) fn merge(self) -> Result<FollowupDagArgs, CbcToolsError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let FollowupDagArgs {
                args_file: _,
                config,
                triggers,
                log_path,
                output_dir,
                inspiral,
                plots,
                datafind,
                qscan,
            } = unpack_arg_file!(arg_file);

            Ok(FollowupDagArgs {
                args_file: None,
                config: cli_args.config.or(config),
                triggers: cli_args.triggers.or(triggers),
                log_path: cli_args.log_path.or(log_path),
                output_dir: cli_args.output_dir.or(output_dir),
                inspiral: cli_args.inspiral || inspiral,
                plots: cli_args.plots || plots,
                datafind: cli_args.datafind || datafind,
                qscan: cli_args.qscan || qscan,
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<FollowupDagParams, CbcToolsError> {
        let Self {
            args_file: _,
            config: config_file,
            triggers,
            log_path,
            output_dir,
            inspiral,
            plots,
            datafind,
            qscan,
        } = self;

        let config_file = config_file.ok_or(FollowupDagArgsError::NoConfig)?;
        let triggers_file = triggers.ok_or(FollowupDagArgsError::NoTriggers)?;
        let config = FollowupConfig::read(&config_file)?;
        let triggers = read_triggers(&triggers_file)?;

        let stages = if inspiral || plots || datafind || qscan {
            Stages {
                inspiral,
                plots,
                datafind,
                qscan,
            }
        } else {
            Stages::default()
        };

        let mut printer = InfoPrinter::new("Following up triggers".into());
        printer.push_block(vec![
            format!("Configuration: {}", config_file.display()).into(),
            format!(
                "{} triggers from {}",
                triggers.len(),
                triggers_file.display()
            )
            .into(),
        ]);
        let enabled = [
            ("inspiral", stages.inspiral),
            ("plots", stages.plots),
            ("datafind", stages.datafind),
            ("qscan", stages.qscan),
        ]
        .into_iter()
        .filter(|(_, on)| *on)
        .map(|(s, _)| s)
        .collect::<Vec<_>>();
        printer.push_line(format!("Stages: {}", enabled.join(", ")).into());
        printer.display();
        display_warnings();

        Ok(FollowupDagParams {
            config_file,
            config,
            triggers,
            stages,
            log_path: log_path.unwrap_or_else(|| PathBuf::from(".")),
            output_dir: output_dir.unwrap_or_else(|| PathBuf::from(".")),
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), CbcToolsError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum FollowupDagArgsError {
    #[error("No follow-up configuration was given; use --config")]
    NoConfig,

    #[error("No trigger file was given; use --triggers")]
    NoTriggers,
}
