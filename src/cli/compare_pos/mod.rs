// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::{collections::HashSet, path::PathBuf, str::FromStr};

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use vec1::Vec1;

use super::common::{display_warnings, InfoPrinter, Warn, ARG_FILE_HELP};
use crate::{
    compare::CompareOptions,
    constants::{CONFIDENCE_LEVELS, DEFAULT_COLOUR_SEED, TWO_D_CONFIDENCE_LEVELS},
    io::{AcquireError, PosteriorSource},
    params::ComparePosParams,
    CbcToolsError,
};

lazy_static::lazy_static! {
    static ref COLOUR_SEED_HELP: String =
        format!("The seed used to pick each run's colour. Default: {DEFAULT_COLOUR_SEED}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ComparePosArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// The posterior samples of a run. This may be a sample file, a directory
    /// containing posterior_samples.dat, or the http(s) URL of a
    /// post-processing page. Give this once for each run.
    #[clap(short = 'p', long = "pos", multiple_occurrences(true), help_heading = "INPUT")]
    pub(super) pos: Option<Vec<String>>,

    /// A name for each run, in the same order as --pos. The default is to
    /// number the runs.
    #[clap(short = 'n', long = "name", multiple_occurrences(true), help_heading = "INPUT")]
    pub(super) names: Option<Vec<String>>,

    /// A file describing injections; a header line of column names then one
    /// line per injection.
    #[clap(short = 'i', long = "inj", parse(from_os_str), help_heading = "INPUT")]
    pub(super) inj: Option<PathBuf>,

    /// The injection (counting from 0) in the injection file that these runs
    /// analysed.
    #[clap(short = 'e', long, help_heading = "INPUT")]
    pub(super) eventnum: Option<usize>,

    /// Username for downloading samples.
    #[clap(short = 'u', long, help_heading = "DOWNLOADS")]
    pub(super) username: Option<String>,

    /// Password for downloading samples. It isn't saved with --save-toml.
    #[clap(short = 'x', long, help_heading = "DOWNLOADS")]
    #[serde(skip_serializing)]
    pub(super) password: Option<String>,

    /// Download samples again, even if they're already cached.
    #[clap(long, help_heading = "DOWNLOADS")]
    #[serde(default)]
    pub(super) reload: bool,

    /// The directory to write plots and index.html into. Default: the current
    /// directory.
    #[clap(short = 'o', long, parse(from_os_str), help_heading = "OUTPUT")]
    pub(super) outpath: Option<PathBuf>,

    /// Don't draw confidence-interval lines on the histogram plots.
    #[clap(long, help_heading = "OUTPUT")]
    #[serde(default)]
    pub(super) hide_cl_lines: bool,

    /// Also plot kernel density estimates of each parameter.
    #[clap(long, help_heading = "OUTPUT")]
    #[serde(default)]
    pub(super) kde_plots: bool,

    #[clap(long, help = COLOUR_SEED_HELP.as_str(), help_heading = "OUTPUT")]
    pub(super) colour_seed: Option<u64>,
}

impl ComparePosArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    pub(super) fn merge(self) -> Result<ComparePosArgs, CbcToolsError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Ensure all of the file args are accounted for by pattern
            // matching.
            let ComparePosArgs {
                args_file: _,
                pos,
                names,
                inj,
                eventnum,
                username,
                password,
                reload,
                outpath,
                hide_cl_lines,
                kde_plots,
                colour_seed,
            } = unpack_arg_file!(arg_file);

            Ok(ComparePosArgs {
                args_file: None,
                pos: cli_args.pos.or(pos),
                names: cli_args.names.or(names),
                inj: cli_args.inj.or(inj),
                eventnum: cli_args.eventnum.or(eventnum),
                username: cli_args.username.or(username),
                password: cli_args.password.or(password),
                reload: cli_args.reload || reload,
                outpath: cli_args.outpath.or(outpath),
                hide_cl_lines: cli_args.hide_cl_lines || hide_cl_lines,
                kde_plots: cli_args.kde_plots || kde_plots,
                colour_seed: cli_args.colour_seed.or(colour_seed),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<ComparePosParams, CbcToolsError> {
        let Self {
            args_file: _,
            pos,
            names,
            inj,
            eventnum,
            username,
            password,
            reload,
            outpath,
            hide_cl_lines,
            kde_plots,
            colour_seed,
        } = self;

        let pos = match pos {
            Some(p) if !p.is_empty() => p,
            _ => return Err(ComparePosArgsError::NoPosteriors.into()),
        };
        let sources = pos
            .iter()
            .map(|p| PosteriorSource::from_str(p))
            .collect::<Result<Vec<_>, _>>()
            .map_err(ComparePosArgsError::Acquire)?;

        let names = match names {
            Some(names) => {
                if names.len() != sources.len() {
                    format!(
                        "{} names were given for {} posteriors; only the first {} runs will be compared",
                        names.len(),
                        sources.len(),
                        names.len().min(sources.len())
                    )
                    .warn();
                }
                names
            }
            None => (0..sources.len()).map(|i| i.to_string()).collect(),
        };
        let runs: Vec1<(String, PosteriorSource)> =
            Vec1::try_from_vec(names.into_iter().zip(sources).collect())
                .map_err(|_| ComparePosArgsError::NoPosteriors)?;
        let mut seen = HashSet::new();
        for (name, _) in &runs {
            if !seen.insert(name.as_str()) {
                return Err(ComparePosArgsError::DuplicateName(name.clone()).into());
            }
        }

        let injection = match (inj, eventnum) {
            (Some(file), Some(event)) => Some((file, event)),
            (Some(_), None) => {
                "An injection file was given without an event number; ignoring the injection"
                    .warn();
                None
            }
            (None, Some(_)) => {
                "An event number was given without an injection file; ignoring it".warn();
                None
            }
            (None, None) => None,
        };

        let credentials = match (username, password) {
            (Some(u), Some(p)) => Some((u, p)),
            (None, None) => None,
            _ => {
                "Both a username and password are needed for authenticated downloads; not using either".warn();
                None
            }
        };

        let outdir = outpath.unwrap_or_else(|| {
            info!("No output directory was given; using the current directory");
            PathBuf::from(".")
        });

        let mut printer = InfoPrinter::new("Comparing posteriors".into());
        printer.push_block(
            runs.iter()
                .map(|(name, source)| format!("{name}: {source}").into())
                .collect(),
        );
        if let Some((file, event)) = &injection {
            printer.push_line(format!("Injection {event} from {}", file.display()).into());
        }
        printer.push_line(format!("Output directory: {}", outdir.display()).into());
        printer.display();
        display_warnings();

        Ok(ComparePosParams {
            outdir,
            working_dir: PathBuf::from("."),
            runs,
            injection,
            credentials,
            reload,
            options: CompareOptions {
                levels: CONFIDENCE_LEVELS.to_vec(),
                two_d_levels: TWO_D_CONFIDENCE_LEVELS.to_vec(),
                show_cl_lines: !hide_cl_lines,
                kde_plots,
            },
            colour_seed: colour_seed.unwrap_or(DEFAULT_COLOUR_SEED),
            args: std::env::args().collect(),
            build: super::build_string(),
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
pub(super) enum ComparePosArgsError {
    #[error("No posteriors were given; use --pos")]
    NoPosteriors,

    #[error("The run name '{0}' was given more than once")]
    DuplicateName(String),

    #[error(transparent)]
    Acquire(#[from] AcquireError),
}
