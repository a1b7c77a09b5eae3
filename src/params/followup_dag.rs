// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use log::info;

use crate::{
    cli::display_warnings,
    followup::{build_dag, FollowupConfig, FollowupDag, FollowupError, Stages, Trigger},
};

pub(crate) struct FollowupDagParams {
    /// The DAG is named after this.
    pub(crate) config_file: PathBuf,
    pub(crate) config: FollowupConfig,
    pub(crate) triggers: Vec<Trigger>,
    pub(crate) stages: Stages,
    pub(crate) log_path: PathBuf,
    pub(crate) output_dir: PathBuf,
}

impl FollowupDagParams {
    pub(crate) fn run(&self) -> Result<(), FollowupError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|err| FollowupError::CreateDir {
            dir: self.output_dir.display().to_string(),
            err,
        })?;

        let mut dag = FollowupDag::new(&self.config_file, &self.log_path)?;
        build_dag(
            &mut dag,
            &self.config,
            &self.triggers,
            self.stages,
            &self.output_dir,
        )?;
        display_warnings();

        for file in dag.write(&self.output_dir)? {
            info!("Wrote {}", file.display());
        }
        Ok(())
    }
}
