// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
    process::Command,
    str::FromStr,
};

use log::{debug, info, trace};

use super::AcquireError;
use crate::constants::POSTERIOR_SAMPLES_FILE;

/// Where a run's posterior samples come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosteriorSource {
    /// A sample file, or a directory containing one.
    Local(PathBuf),

    /// An HTTP(S) URL of a post-processing web page or its directory.
    Http(String),
}

impl FromStr for PosteriorSource {
    type Err = AcquireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, rest) = match s.split_once("://") {
            Some(split) => split,
            None => return Ok(Self::Local(PathBuf::from(s))),
        };
        match scheme.to_lowercase().as_str() {
            "http" | "https" => Ok(Self::Http(s.to_string())),
            "file" => Ok(Self::Local(PathBuf::from(rest))),
            _ => Err(AcquireError::UnknownScheme {
                scheme: scheme.to_string(),
                url: s.to_string(),
            }),
        }
    }
}

impl Display for PosteriorSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(p) => write!(f, "{}", p.display()),
            Self::Http(u) => write!(f, "{u}"),
        }
    }
}

/// The URL of the sample file belonging to a post-processing page. A trailing
/// file name (e.g. `posplots.html`) is dropped, as are any query and fragment.
pub fn samples_url(url: &str) -> Result<String, AcquireError> {
    let (scheme, rest) = url.split_once("://").ok_or_else(|| AcquireError::UnknownScheme {
        scheme: String::new(),
        url: url.to_string(),
    })?;
    let rest = rest
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    let (host, path) = match rest.find('/') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    if host.is_empty() {
        return Err(AcquireError::NoHost(url.to_string()));
    }

    let dir = match path.rsplit_once('/') {
        Some((head, tail)) if !tail.is_empty() => head,
        _ => path,
    };
    Ok(format!(
        "{scheme}://{host}{}/{POSTERIOR_SAMPLES_FILE}",
        dir.trim_end_matches('/')
    ))
}

/// Something that can fetch a URL into a file.
pub trait Downloader {
    fn download(&self, url: &str, dest: &Path) -> Result<(), AcquireError>;
}

impl<D: Downloader + ?Sized> Downloader for &D {
    fn download(&self, url: &str, dest: &Path) -> Result<(), AcquireError> {
        (**self).download(url, dest)
    }
}

/// Downloads with the `wget` executable.
#[derive(Debug, Clone, Default)]
pub struct Wget {
    /// A username and password. Certificates aren't checked when these are
    /// given.
    pub credentials: Option<(String, String)>,
}

impl Wget {
    pub(super) fn args(&self, url: &str, dest: &Path) -> Vec<String> {
        let mut args = vec![
            url.to_string(),
            "-O".to_string(),
            dest.display().to_string(),
        ];
        if let Some((user, password)) = &self.credentials {
            args.extend([
                "--user".to_string(),
                user.clone(),
                "--password".to_string(),
                password.clone(),
                "--no-check-certificate".to_string(),
            ]);
        }
        args
    }
}

impl Downloader for Wget {
    fn download(&self, url: &str, dest: &Path) -> Result<(), AcquireError> {
        info!("Downloading {url}");
        let status = Command::new("wget")
            .args(self.args(url, dest))
            .status()
            .map_err(|err| AcquireError::Wget {
                url: url.to_string(),
                err,
            })?;
        if !status.success() {
            return Err(AcquireError::Download {
                url: url.to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Turns [PosteriorSource]s into local files, caching downloads.
pub struct Acquirer<D: Downloader> {
    downloads_dir: PathBuf,
    reload: bool,
    downloader: D,
}

impl<D: Downloader> Acquirer<D> {
    /// If `reload` is set, cached downloads are thrown away and fetched again.
    pub fn new(downloads_dir: PathBuf, reload: bool, downloader: D) -> Self {
        Self {
            downloads_dir,
            reload,
            downloader,
        }
    }

    /// Where a run's download is cached. Path separators in the run name are
    /// replaced so the file always lands directly in the downloads directory.
    pub fn cache_file(&self, run_name: &str) -> PathBuf {
        let stem: String = run_name
            .chars()
            .map(|c| if std::path::is_separator(c) || c == '\\' { '_' } else { c })
            .collect();
        self.downloads_dir.join(format!("{stem}.dat"))
    }

    /// Get the sample file for a run.
    pub fn acquire(&self, run_name: &str, source: &PosteriorSource) -> Result<PathBuf, AcquireError> {
        match source {
            PosteriorSource::Local(p) => {
                let file = if p.is_dir() {
                    p.join(POSTERIOR_SAMPLES_FILE)
                } else {
                    p.clone()
                };
                trace!("Run '{run_name}' uses local file {}", file.display());
                Ok(file)
            }

            PosteriorSource::Http(url) => {
                let url = samples_url(url)?;
                let cache = self.cache_file(run_name);
                let cached = cache.exists();

                if self.reload && cached {
                    debug!("Removing cached download {}", cache.display());
                    std::fs::remove_file(&cache).map_err(|err| AcquireError::RemoveCache {
                        file: cache.display().to_string(),
                        err,
                    })?;
                }
                if self.reload || !cached {
                    std::fs::create_dir_all(&self.downloads_dir).map_err(|err| {
                        AcquireError::CreateDownloadsDir {
                            dir: self.downloads_dir.display().to_string(),
                            err,
                        }
                    })?;
                    self.downloader.download(&url, &cache)?;
                } else {
                    debug!("Using cached download {} for {url}", cache.display());
                }
                Ok(cache)
            }
        }
    }
}
