// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Condor jobs, nodes and DAGs. Nothing is scheduled here; the DAG and its
//! submit files are written out for `condor_submit_dag`.

use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::FollowupError;
use crate::{cli::Warn, report::escape};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Universe {
    #[default]
    Standard,
    Vanilla,
    Local,
    Scheduler,
}

/// A Condor job; i.e. a submit file shared by many nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct CondorJob {
    pub name: String,
    pub universe: Universe,
    pub executable: PathBuf,

    /// Extra submit-file commands.
    pub condor_cmds: IndexMap<String, String>,
}

impl CondorJob {
    pub fn new(name: impl Into<String>, universe: Universe, executable: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            universe,
            executable: executable.into(),
            condor_cmds: IndexMap::new(),
        }
    }

    pub fn add_condor_cmd(&mut self, cmd: &str, value: &str) {
        self.condor_cmds.insert(cmd.to_string(), value.to_string());
    }

    pub fn sub_file(&self) -> PathBuf {
        PathBuf::from(format!("{}.sub", self.name))
    }

    /// The contents of the submit file. Every node's arguments are passed in
    /// through the `macroarguments` DAG variable.
    pub fn submit_file_contents(&self, log_file: &Path) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "universe = {}", self.universe);
        let _ = writeln!(s, "executable = {}", self.executable.display());
        s.push_str("arguments = \"$(macroarguments)\"\n");
        for (cmd, value) in &self.condor_cmds {
            let _ = writeln!(s, "{cmd} = {value}");
        }
        let _ = writeln!(s, "log = {}", log_file.display());
        let _ = writeln!(s, "error = logs/{}-$(cluster)-$(process).err", self.name);
        let _ = writeln!(s, "output = logs/{}-$(cluster)-$(process).out", self.name);
        s.push_str("notification = never\nqueue 1\n");
        s
    }
}

/// An instance of a [CondorJob] in the DAG.
#[derive(Debug, Clone, PartialEq)]
pub struct CondorNode {
    pub id: String,
    /// The name of this node's job.
    pub job: String,
    /// What kind of node this is; nodes are grouped by this on the web page.
    pub category: String,

    /// `--name value` options. Empty values are flags.
    pub opts: IndexMap<String, String>,
    /// Positional arguments; these follow the options.
    pub args: Vec<String>,

    pub parents: Vec<String>,
    /// A script to run after the node, and its arguments.
    pub post_script: Option<String>,

    /// The main output of this node, if other nodes need it.
    pub output_file: Option<String>,
    /// Lines for the DAG's output cache.
    pub output_cache: Vec<String>,
    pub web_link: Option<String>,
}

impl CondorNode {
    pub fn new(job: &CondorJob, id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            job: job.name.clone(),
            category: category.into(),
            opts: IndexMap::new(),
            args: vec![],
            parents: vec![],
            post_script: None,
            output_file: None,
            output_cache: vec![],
            web_link: None,
        }
    }

    pub fn add_var_opt(&mut self, opt: &str, value: impl ToString) {
        self.opts.insert(opt.to_string(), value.to_string());
    }

    pub fn add_var_arg(&mut self, arg: impl ToString) {
        self.args.push(arg.to_string());
    }

    pub fn add_parent(&mut self, parent: &CondorNode) {
        if !self.parents.contains(&parent.id) {
            self.parents.push(parent.id.clone());
        }
    }

    /// The node's command line, minus the executable.
    pub fn arguments(&self) -> String {
        self.opts
            .iter()
            .map(|(opt, value)| {
                if value.is_empty() {
                    format!("--{opt}")
                } else {
                    format!("--{opt} {value}")
                }
            })
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The follow-up DAG.
#[derive(Debug)]
pub struct FollowupDag {
    basename: String,
    log_file: PathBuf,
    jobs: IndexMap<String, CondorJob>,
    nodes: IndexMap<String, CondorNode>,
    /// Where the web page is published.
    pub page: String,
}

impl FollowupDag {
    /// The DAG is named after the configuration file, without its extension.
    /// A new, empty log file is created in `log_path`.
    pub fn new(config_file: &Path, log_path: &Path) -> Result<FollowupDag, FollowupError> {
        let basename = config_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "followup".to_string());

        let log_file = tempfile::Builder::new()
            .prefix(&format!("{basename}.dag.log."))
            .tempfile_in(log_path)
            .and_then(|f| f.into_temp_path().keep().map_err(|e| e.error))
            .map_err(|err| FollowupError::LogFile {
                dir: log_path.display().to_string(),
                err,
            })?;
        debug!("DAG log file: {}", log_file.display());

        Ok(FollowupDag {
            basename,
            log_file,
            jobs: IndexMap::new(),
            nodes: IndexMap::new(),
            page: String::new(),
        })
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    pub fn add_job(&mut self, job: CondorJob) {
        self.jobs.entry(job.name.clone()).or_insert(job);
    }

    pub fn jobs(&self) -> impl Iterator<Item = &CondorJob> {
        self.jobs.values()
    }

    /// Add a node. A node with the same id as one already in the DAG is
    /// skipped, and `false` is returned.
    pub fn add_node(&mut self, node: CondorNode) -> bool {
        if self.nodes.contains_key(&node.id) {
            debug!("Node {} is already in the DAG; skipping", node.id);
            return false;
        }
        trace!("Adding node {}", node.id);
        self.nodes.insert(node.id.clone(), node);
        true
    }

    pub fn node(&self, id: &str) -> Option<&CondorNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &CondorNode> {
        self.nodes.values()
    }

    pub fn dag_file_contents(&self) -> String {
        let mut s = String::new();
        for node in self.nodes.values() {
            let sub_file = self
                .jobs
                .get(&node.job)
                .map(|j| j.sub_file())
                .unwrap_or_else(|| PathBuf::from(format!("{}.sub", node.job)));
            let _ = writeln!(s, "JOB {} {}", node.id, sub_file.display());
            let _ = writeln!(
                s,
                "VARS {} macroarguments=\"{}\"",
                node.id,
                node.arguments().replace('"', "\\\"")
            );
            if let Some(script) = &node.post_script {
                let _ = writeln!(s, "SCRIPT POST {} {script}", node.id);
            }
        }
        for node in self.nodes.values() {
            for parent in &node.parents {
                if self.nodes.contains_key(parent) {
                    let _ = writeln!(s, "PARENT {parent} CHILD {}", node.id);
                } else {
                    format!(
                        "Node {} has parent {parent}, which isn't in the DAG; dropping the dependency",
                        node.id
                    )
                    .warn();
                }
            }
        }
        s
    }

    pub fn cache_file_contents(&self) -> String {
        self.nodes
            .values()
            .flat_map(|n| n.output_cache.iter())
            .fold(String::new(), |mut s, line| {
                s.push_str(line);
                s.push('\n');
                s
            })
    }

    pub fn html_contents(&self) -> String {
        let mut categories: IndexMap<&str, Vec<&CondorNode>> = IndexMap::new();
        for node in self.nodes.values() {
            categories.entry(&node.category).or_default().push(node);
        }

        let mut s = String::new();
        let _ = write!(
            s,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Follow-up: {0}</title>\n</head>\n<body>\n<h1>Follow-up: {0}</h1>\n",
            escape(&self.basename)
        );
        if !self.page.is_empty() {
            let _ = writeln!(
                s,
                "<p>Published at <a href=\"{0}\">{0}</a></p>",
                escape(&self.page)
            );
        }
        for (category, nodes) in categories {
            let _ = writeln!(s, "<h2>{}</h2>\n<ul>", escape(category));
            for node in nodes {
                match node.web_link.as_ref().or(node.output_file.as_ref()) {
                    Some(link) => {
                        let _ = writeln!(
                            s,
                            "<li><a href=\"{}\">{}</a></li>",
                            escape(link),
                            escape(&node.id)
                        );
                    }
                    None => {
                        let _ = writeln!(s, "<li>{}</li>", escape(&node.id));
                    }
                }
            }
            s.push_str("</ul>\n");
        }
        s.push_str("</body>\n</html>\n");
        s
    }

    /// Write the submit files, the DAG, the output cache and the web page into
    /// `dir`. The written files are returned.
    pub fn write(&self, dir: &Path) -> Result<Vec<PathBuf>, FollowupError> {
        let write = |file: PathBuf, contents: String| -> Result<PathBuf, FollowupError> {
            std::fs::write(&file, contents).map_err(|err| FollowupError::Write {
                file: file.display().to_string(),
                err,
            })?;
            debug!("Wrote {}", file.display());
            Ok(file)
        };

        let mut written = vec![];
        for job in self.jobs.values() {
            written.push(write(
                dir.join(job.sub_file()),
                job.submit_file_contents(&self.log_file),
            )?);
        }
        let base = &self.basename;
        written.push(write(dir.join(format!("{base}.dag")), self.dag_file_contents())?);
        written.push(write(
            dir.join(format!("{base}.cache")),
            self.cache_file_contents(),
        )?);
        written.push(write(dir.join(format!("{base}.html")), self.html_contents())?);
        Ok(written)
    }
}
