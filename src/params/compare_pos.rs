// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;
use vec1::Vec1;

use crate::{
    cli::display_warnings,
    colours::RunColours,
    compare::{compare_posteriors, CompareError, CompareOptions},
    io::{AcquireError, Acquirer, Downloader, PosteriorSource},
    plotting::{DrawError, Renderer},
    posterior::{
        harmonise, read_injection, read_sample_table, Injection, InjectionError, Posterior,
        ReadSampleTableError,
    },
    report::{render_index, PageMeta},
};

/// The directory (under the working directory) that downloads are cached in.
const DOWNLOADS_DIR: &str = "downloads";

/// An old location for results. It's still created, but nothing is written
/// there.
const RESULTS_DIR: &str = "results";

pub(crate) struct ComparePosParams {
    /// Where plots and `index.html` go.
    pub(crate) outdir: PathBuf,

    /// Downloads are cached under here.
    pub(crate) working_dir: PathBuf,

    /// Run names and their sources, in the order given.
    pub(crate) runs: Vec1<(String, PosteriorSource)>,

    /// An injection file and the event to use from it.
    pub(crate) injection: Option<(PathBuf, usize)>,

    /// Username and password for downloads.
    pub(crate) credentials: Option<(String, String)>,

    pub(crate) reload: bool,
    pub(crate) options: CompareOptions,
    pub(crate) colour_seed: u64,

    /// The arguments cbc-tools was called with, for the page's footer.
    pub(crate) args: Vec<String>,
    pub(crate) build: String,
}

impl ComparePosParams {
    pub(crate) fn run(&self) -> Result<(), ComparePosError> {
        #[cfg(feature = "plotting")]
        let result = {
            let wget = crate::io::Wget {
                credentials: self.credentials.clone(),
            };
            let mut renderer = crate::plotting::BitmapRenderer;
            self.run_with(&wget, &mut renderer)
        };

        #[cfg(not(feature = "plotting"))]
        let result = Err(ComparePosError::Draw(DrawError::NoPlottingFeature));

        result
    }

    /// Do the comparison, fetching with `downloader` and drawing with
    /// `renderer`.
    pub(crate) fn run_with(
        &self,
        downloader: &dyn Downloader,
        renderer: &mut dyn Renderer,
    ) -> Result<(), ComparePosError> {
        // Problems with the injection are fatal, so find them before anything
        // is written.
        let injection: Option<Injection> = match &self.injection {
            Some((file, event)) => Some(read_injection(file, *event)?),
            None => None,
        };

        let acquirer = Acquirer::new(
            self.working_dir.join(DOWNLOADS_DIR),
            self.reload,
            downloader,
        );
        let mut posteriors = Vec::with_capacity(self.runs.len());
        for (name, source) in &self.runs {
            let file = acquirer.acquire(name, source)?;
            info!("Reading samples of '{name}' from {}", file.display());
            let table = read_sample_table(&file).map_err(|err| ComparePosError::Read {
                run: name.clone(),
                err,
            })?;
            debug!(
                "'{name}' has {} samples of {} parameters",
                table.num_samples(),
                table.names.len()
            );

            let harmonised = harmonise(name, &table);
            posteriors.push(Posterior::new(
                name.clone(),
                &harmonised.table,
                injection.as_ref(),
            ));
        }

        create_dir(&self.working_dir.join(RESULTS_DIR))?;
        create_dir(&self.outdir)?;

        let names: Vec<&str> = self.runs.iter().map(|(n, _)| n.as_str()).collect();
        let colours = RunColours::new(&names, self.colour_seed);
        let report =
            compare_posteriors(&posteriors, &colours, &self.outdir, &self.options, renderer)?;
        display_warnings();

        let meta = PageMeta {
            inputs: self
                .runs
                .iter()
                .map(|(name, source)| (name.clone(), source.to_string()))
                .collect(),
            args: self.args.clone(),
            generated_at: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S %Z")
                .to_string(),
            build: self.build.clone(),
            hide_cl_lines: !self.options.show_cl_lines,
        };
        let index = self.outdir.join("index.html");
        std::fs::write(&index, render_index(&report, &meta))?;
        info!("Wrote {}", index.display());

        Ok(())
    }
}

fn create_dir(dir: &Path) -> Result<(), ComparePosError> {
    if !dir.exists() {
        debug!("Creating {}", dir.display());
    }
    std::fs::create_dir_all(dir).map_err(|err| ComparePosError::CreateDir {
        dir: dir.display().to_string(),
        err,
    })
}

#[derive(Error, Debug)]
pub(crate) enum ComparePosError {
    #[error(transparent)]
    Injection(#[from] InjectionError),

    #[error(transparent)]
    Acquire(#[from] AcquireError),

    #[error("Couldn't read the samples of run '{run}': {err}")]
    Read {
        run: String,
        err: ReadSampleTableError,
    },

    #[error(transparent)]
    Compare(#[from] CompareError),

    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error("Couldn't create directory '{dir}': {err}")]
    CreateDir { dir: String, err: std::io::Error },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
