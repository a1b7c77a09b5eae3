// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Comparing the posteriors of several runs, parameter by parameter and pair
//! by pair.
//!
//! Everything here is best effort. A run whose statistics can't be computed
//! is left out of that plot (with a warning), and a plot that can't be drawn
//! is left out of the report, but the rest of the comparison carries on.

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info, trace};
use thiserror::Error;

use crate::{
    cli::Warn,
    colours::{RunColour, RunColours},
    constants::{
        CONFIDENCE_LEVELS, GREEDY_BIN_SIZES, HIST_NUM_BINS, KDE_NUM_POINTS,
        TWO_D_CONFIDENCE_LEVELS, TWO_D_PLOTS,
    },
    plotting::{HistCurve, PdfCurve, RegionOutline, Renderer},
    posterior::{common_parameters, Posterior, PosteriorParam},
    report::{ClRow, ClTable, ComparisonReport, OneDEntry},
    stats::{linspace, GreedyBins2D, StepHistogram},
    PROGRESS_BARS,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CompareOptions {
    /// Confidence levels of the 1D intervals. Each gets its own histogram
    /// plot.
    pub levels: Vec<f64>,

    /// Confidence levels of the 2D credible regions.
    pub two_d_levels: Vec<f64>,

    /// Draw each run's interval on the histogram plots?
    pub show_cl_lines: bool,

    /// Also plot kernel density estimates?
    pub kde_plots: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            levels: CONFIDENCE_LEVELS.to_vec(),
            two_d_levels: TWO_D_CONFIDENCE_LEVELS.to_vec(),
            show_cl_lines: true,
            kde_plots: false,
        }
    }
}

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("No posteriors were given to compare")]
    NoPosteriors,

    #[error("Run '{0}' hasn't been given a colour")]
    NoColour(String),
}

/// A pair of parameters to be plotted together, and their greedy bin widths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamPair {
    pub x: &'static str,
    pub y: &'static str,
    pub bin_widths: (f64, f64),
}

impl ParamPair {
    /// The name of this pair's plot.
    pub fn file_name(&self) -> PathBuf {
        PathBuf::from(format!("{}-{}.png", self.x, self.y))
    }
}

/// The pairs of common parameters that get a contour plot. Only pairs listed
/// in [TWO_D_PLOTS] are considered, and only if both parameters have a greedy
/// bin width.
pub fn eligible_pairs(common: &[String]) -> Vec<ParamPair> {
    let is_common = |p: &str| common.iter().any(|c| c == p);
    TWO_D_PLOTS
        .iter()
        .filter(|(x, y)| is_common(x) && is_common(y))
        .filter_map(
            |&(x, y)| match (GREEDY_BIN_SIZES.get(x), GREEDY_BIN_SIZES.get(y)) {
                (Some(&wx), Some(&wy)) => Some(ParamPair {
                    x,
                    y,
                    bin_widths: (wx, wy),
                }),
                _ => {
                    debug!("No greedy bin width for {x} and/or {y}; not plotting this pair");
                    None
                }
            },
        )
        .collect()
}

/// The name of the histogram plot of `param` at confidence level `cl`.
pub fn hist_file_name(param: &str, cl: f64) -> PathBuf {
    PathBuf::from(format!("{param}_{}.png", (cl * 100.0).round() as u32))
}

/// The name of the kernel density estimate plot of `param`.
pub fn pdf_file_name(param: &str) -> PathBuf {
    PathBuf::from(format!("{param}_pdf.png"))
}

/// Compare the posteriors, writing plots into `outdir` with `renderer`.
pub fn compare_posteriors(
    posteriors: &[Posterior],
    colours: &RunColours,
    outdir: &Path,
    options: &CompareOptions,
    renderer: &mut dyn Renderer,
) -> Result<ComparisonReport, CompareError> {
    if posteriors.is_empty() {
        return Err(CompareError::NoPosteriors);
    }
    let runs = posteriors
        .iter()
        .map(|p| {
            colours
                .get(p.name())
                .map(|c| (p, c))
                .ok_or_else(|| CompareError::NoColour(p.name().to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let common = common_parameters(posteriors);
    info!("Common parameters: {}", common.join(", "));
    let mut report = ComparisonReport::default();

    if common.len() > 1 {
        for pair in eligible_pairs(&common) {
            if let Some(file) = two_d(&runs, &pair, outdir, &options.two_d_levels, renderer) {
                report.two_d.push(file);
            }
        }
    }

    let pb = ProgressBar::with_draw_target(
        Some(common.len() as _),
        if PROGRESS_BARS.load() {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        },
    )
    .with_style(
        ProgressStyle::default_bar()
            .template("{msg:17}: [{wide_bar:.blue}] {pos:2}/{len:2} parameters ({elapsed_precise}<{eta_precise})").unwrap()
            .progress_chars("=> "),
    )
    .with_position(0)
    .with_message("Plotting");
    for param in &common {
        pb.set_message(format!("Plotting {param}"));
        let entry = one_d(&runs, param, outdir, options, renderer);
        report.one_d.insert(param.clone(), entry);
        pb.inc(1);
    }
    pb.finish_with_message("Finished plotting");

    Ok(report)
}

/// Draw a plot, returning its file name if that worked.
fn draw<F>(outdir: &Path, file: PathBuf, f: F) -> Option<PathBuf>
where
    F: FnOnce(&Path) -> Result<(), crate::plotting::DrawError>,
{
    let path = outdir.join(&file);
    match f(&path) {
        Ok(()) => {
            trace!("Wrote {}", path.display());
            Some(file)
        }
        Err(e) => {
            format!("Couldn't draw {}: {e}", path.display()).warn();
            None
        }
    }
}

fn two_d(
    runs: &[(&Posterior, RunColour)],
    pair: &ParamPair,
    outdir: &Path,
    levels: &[f64],
    renderer: &mut dyn Renderer,
) -> Option<PathBuf> {
    let mut outlines = vec![];
    let mut injection = None;

    for &(posterior, colour) in runs {
        let (x, y) = match (posterior.get(pair.x), posterior.get(pair.y)) {
            (Some(x), Some(y)) => (x, y),
            _ => continue,
        };
        let run_injection = x.injval().zip(y.injval());
        if injection.is_none() {
            injection = run_injection;
        }

        let bins = match GreedyBins2D::new(x.samples(), y.samples(), pair.bin_widths, run_injection)
        {
            Ok(b) => b,
            Err(e) => {
                format!(
                    "Couldn't bin {} and {} for run '{}': {e}",
                    pair.x,
                    pair.y,
                    posterior.name()
                )
                .warn();
                continue;
            }
        };
        if let Some(conf) = bins.injection_confidence() {
            info!(
                "Run '{}': the injection enters the {}-{} credible region at {:.1}%",
                posterior.name(),
                pair.x,
                pair.y,
                conf * 100.0
            );
        }

        for &cl in levels {
            match bins.region_outline(cl) {
                Ok(segments) => outlines.push(RegionOutline {
                    run: posterior.name().to_string(),
                    colour,
                    cl,
                    segments,
                }),
                Err(e) => format!(
                    "Couldn't find the {}% region of {}-{} for run '{}': {e}",
                    (cl * 100.0).round(),
                    pair.x,
                    pair.y,
                    posterior.name()
                )
                .warn(),
            }
        }
    }

    if outlines.is_empty() {
        format!("No run could be binned for {}-{}; not plotting", pair.x, pair.y).warn();
        return None;
    }
    draw(outdir, pair.file_name(), |path| {
        renderer.two_param_contour(path, (pair.x, pair.y), &outlines, injection)
    })
}

/// One run's statistics of a single parameter.
struct RunStats<'a> {
    run: &'a str,
    colour: RunColour,
    intervals: Vec<Option<(f64, f64)>>,
    hist: Option<StepHistogram>,
}

impl<'a> RunStats<'a> {
    fn new(run: &'a str, colour: RunColour, param: &str, pp: &PosteriorParam, levels: &[f64]) -> Self {
        let intervals = levels
            .iter()
            .map(|&cl| match pp.prob_interval(cl) {
                Ok(i) => Some(i),
                Err(e) => {
                    format!(
                        "Run '{run}': couldn't get the {}% interval of {param}: {e}",
                        (cl * 100.0).round()
                    )
                    .warn();
                    None
                }
            })
            .collect();
        let hist = match StepHistogram::new(pp.samples(), HIST_NUM_BINS) {
            Ok(h) => Some(h),
            Err(e) => {
                format!("Run '{run}': couldn't make a histogram of {param}: {e}").warn();
                None
            }
        };
        Self {
            run,
            colour,
            intervals,
            hist,
        }
    }
}

fn one_d(
    runs: &[(&Posterior, RunColour)],
    param: &str,
    outdir: &Path,
    options: &CompareOptions,
    renderer: &mut dyn Renderer,
) -> OneDEntry {
    let params: Vec<(&Posterior, RunColour, &PosteriorParam)> = runs
        .iter()
        .filter_map(|&(p, c)| p.get(param).map(|pp| (p, c, pp)))
        .collect();
    let stats: Vec<RunStats> = params
        .iter()
        .map(|&(p, c, pp)| RunStats::new(p.name(), c, param, pp, &options.levels))
        .collect();

    let mut cl_table = ClTable::new(&options.levels);
    cl_table.rows = stats
        .iter()
        .map(|s| ClRow {
            run: s.run.to_string(),
            colour: s.colour.hex(),
            intervals: s.intervals.clone(),
        })
        .collect();
    for (cl, min_max) in options.levels.iter().zip(cl_table.min_max()) {
        if min_max.is_none() {
            format!(
                "No run has a {}% interval for {param}; its min|max is N/A",
                (cl * 100.0).round()
            )
            .warn();
        }
    }

    let mut plots = vec![];
    for (i_level, &cl) in options.levels.iter().enumerate() {
        let hists: Vec<HistCurve> = stats
            .iter()
            .filter_map(|s| {
                s.hist.as_ref().map(|hist| HistCurve {
                    run: s.run.to_string(),
                    colour: s.colour,
                    hist: hist.clone(),
                    interval: s.intervals[i_level],
                })
            })
            .collect();
        if let Some(file) = draw(outdir, hist_file_name(param, cl), |path| {
            renderer.one_param_line_hist(path, param, &hists, cl, options.show_cl_lines)
        }) {
            plots.push(file);
        }
    }

    let pdf_plot = if options.kde_plots {
        let (min, max) = params.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), (_, _, pp)| (min.min(pp.min()), max.max(pp.max())),
        );
        let xs = linspace(min, max, KDE_NUM_POINTS);
        let curves: Vec<PdfCurve> = params
            .iter()
            .filter_map(|&(p, colour, pp)| match pp.gaussian_kde() {
                Ok(kde) => Some(PdfCurve {
                    run: p.name().to_string(),
                    colour,
                    points: xs.iter().copied().zip(kde.evaluate(&xs)).collect(),
                }),
                Err(e) => {
                    format!("Run '{}': no density estimate of {param}: {e}", p.name()).warn();
                    None
                }
            })
            .collect();
        let injection = params.first().and_then(|(_, _, pp)| pp.injval());
        draw(outdir, pdf_file_name(param), |path| {
            renderer.one_param_pdf(path, param, &curves, injection)
        })
    } else {
        None
    };

    OneDEntry {
        plots,
        pdf_plot,
        cl_table,
    }
}
