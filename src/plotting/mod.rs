// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Figures comparing runs.
//!
//! The comparison code describes *what* to draw with the types here and hands
//! them to a [Renderer]. The real renderer ([BitmapRenderer]) is only
//! available with the "plotting" feature.

#[cfg(feature = "plotting")]
mod bitmap;
mod error;

#[cfg(feature = "plotting")]
pub use bitmap::BitmapRenderer;
pub use error::DrawError;

use std::path::Path;

use crate::{colours::RunColour, stats::StepHistogram};

/// A run's kernel density estimate, evaluated on a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfCurve {
    pub run: String,
    pub colour: RunColour,
    pub points: Vec<(f64, f64)>,
}

/// A run's stepped histogram, and its confidence interval if that could be
/// computed.
#[derive(Debug, Clone, PartialEq)]
pub struct HistCurve {
    pub run: String,
    pub colour: RunColour,
    pub hist: StepHistogram,
    pub interval: Option<(f64, f64)>,
}

/// The boundary of a run's greedy-binned credible region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionOutline {
    pub run: String,
    pub colour: RunColour,
    pub cl: f64,
    pub segments: Vec<[(f64, f64); 2]>,
}

pub trait Renderer {
    /// Kernel density estimates of one parameter for all runs on one axis. If
    /// there's an injected value, it's drawn as a vertical line.
    fn one_param_pdf(
        &mut self,
        path: &Path,
        param: &str,
        curves: &[PdfCurve],
        injection: Option<f64>,
    ) -> Result<(), DrawError>;

    /// Stepped histograms of one parameter. With `show_cl_lines`, each run's
    /// interval for the confidence level `cl` is drawn with dashed lines.
    fn one_param_line_hist(
        &mut self,
        path: &Path,
        param: &str,
        hists: &[HistCurve],
        cl: f64,
        show_cl_lines: bool,
    ) -> Result<(), DrawError>;

    /// Outlines of credible regions for a pair of parameters.
    fn two_param_contour(
        &mut self,
        path: &Path,
        params: (&str, &str),
        outlines: &[RegionOutline],
        injection: Option<(f64, f64)>,
    ) -> Result<(), DrawError>;
}
