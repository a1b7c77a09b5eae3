// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The follow-up configuration and trigger files. Both are TOML.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{FollowupError, Universe};

/// Executables run by the DAG's jobs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CondorConfig {
    pub inspiral: PathBuf,
    pub plotsnrchisq: PathBuf,
    pub qscan: PathBuf,
    #[serde(default)]
    pub qscanlite: Option<PathBuf>,
    pub datafind: PathBuf,
    pub convertcache: PathBuf,

    /// The universe of the inspiral job. Everything else runs in the vanilla
    /// universe.
    #[serde(default)]
    pub inspiral_universe: Universe,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Where the follow-up web page is published.
    #[serde(default)]
    pub page: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TriggersConfig {
    #[serde(default)]
    pub injection_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InspiralConfig {
    /// Prepended to inspiral output file names; include a trailing slash for a
    /// directory.
    #[serde(default)]
    pub output_path: String,

    /// The options the triggers' inspiral jobs were originally run with.
    /// Options without a value are given an empty string.
    #[serde(default)]
    pub process_params: IndexMap<String, String>,
}

/// A Q-scan section. Per-detector options are keyed by the detector prefix,
/// e.g. `H1config-file`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct QscanConfig {
    /// The duration scanned around each trigger [seconds].
    pub search_time_range: f64,

    /// The default frame type.
    #[serde(default, rename = "type")]
    pub frame_type: Option<String>,

    /// Use the `qscanlite` executable.
    #[serde(default)]
    pub lite: bool,

    #[serde(flatten)]
    pub ifo_options: IndexMap<String, String>,
}

impl QscanConfig {
    /// A per-detector option, e.g. `ifo_option("H1", "config-file")`.
    pub fn ifo_option(&self, ifo: &str, option: &str) -> Option<&str> {
        self.ifo_options
            .get(&format!("{ifo}{option}"))
            .map(|s| s.trim())
    }

    /// The frame type for a detector; either `<ifo>_type`, `<ifo>type` or the
    /// section's default.
    pub fn frame_type(&self, ifo: &str) -> Option<&str> {
        self.ifo_option(ifo, "_type")
            .or_else(|| self.ifo_option(ifo, "type"))
            .or(self.frame_type.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FollowupConfig {
    pub condor: CondorConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub triggers: TriggersConfig,

    #[serde(default)]
    pub inspiral: InspiralConfig,

    /// Q-scan sections, keyed by name.
    #[serde(default)]
    pub qscan: IndexMap<String, QscanConfig>,
}

impl FollowupConfig {
    pub fn read(file: &Path) -> Result<FollowupConfig, FollowupError> {
        let contents = std::fs::read_to_string(file).map_err(|err| FollowupError::Read {
            file: file.display().to_string(),
            err,
        })?;
        toml::from_str(&contents).map_err(|err| FollowupError::Parse {
            file: file.display().to_string(),
            err,
        })
    }

    /// The injection file, if one is configured and its name isn't blank.
    pub fn injection_file(&self) -> Option<&Path> {
        self.triggers
            .injection_file
            .as_deref()
            .filter(|f| !f.as_os_str().is_empty())
    }
}

/// A candidate to be followed up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Trigger {
    pub event_id: String,
    pub stat_value: f64,

    /// The trigger's time in each detector that saw it.
    pub gps_time: IndexMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct TriggerFile {
    #[serde(default)]
    trigger: Vec<Trigger>,
}

/// Read `[[trigger]]` tables from a TOML file.
pub fn read_triggers(file: &Path) -> Result<Vec<Trigger>, FollowupError> {
    let contents = std::fs::read_to_string(file).map_err(|err| FollowupError::Read {
        file: file.display().to_string(),
        err,
    })?;
    let triggers: TriggerFile = toml::from_str(&contents).map_err(|err| FollowupError::Parse {
        file: file.display().to_string(),
        err,
    })?;
    Ok(triggers.trigger)
}
