// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! PNG figures with `plotters`.

use std::path::Path;

use log::trace;
use plotters::prelude::*;

use super::{DrawError, HistCurve, PdfCurve, RegionOutline, Renderer};
use crate::colours::RunColour;

/// The number of pixels of the KDE plots.
const PDF_PIXELS: (u32, u32) = (1500, 1200);
/// The number of pixels of the histogram plots.
const HIST_PIXELS: (u32, u32) = (1800, 1200);
/// The number of pixels of the contour plots.
const CONTOUR_PIXELS: (u32, u32) = (1200, 1000);

/// Line widths of successive (increasing) confidence levels on contour plots.
const CONTOUR_WIDTHS: [u32; 3] = [3, 2, 1];

const NUM_DASHES: usize = 40;

lazy_static::lazy_static! {
    static ref LEGEND_BACKGROUND: RGBAColor = WHITE.mix(0.8);
}

#[derive(Debug, Default)]
pub struct BitmapRenderer;

/// The legend entry for interval lines, e.g. "90%".
fn cl_label(cl: f64) -> String {
    format!("{}%", (cl * 100.0).round() as u32)
}

/// Tag a plotters error with the file being drawn.
fn chart_error(path: &Path, e: impl std::fmt::Display) -> DrawError {
    DrawError::Chart {
        file: path.display().to_string(),
        msg: e.to_string(),
    }
}

fn rgb(c: RunColour) -> RGBColor {
    let (r, g, b) = c.to_rgb8();
    RGBColor(r, g, b)
}

/// The smallest and largest of some values, padded a little so that lines on
/// the edges are visible.
fn padded_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = (hi - lo) * 0.02;
    if pad > 0.0 {
        (lo - pad, hi + pad)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

/// The pieces of a dashed line between two points.
fn dashes(from: (f64, f64), to: (f64, f64)) -> Vec<Vec<(f64, f64)>> {
    let at = |t: f64| (from.0 + t * (to.0 - from.0), from.1 + t * (to.1 - from.1));
    let n = NUM_DASHES as f64;
    (0..NUM_DASHES)
        .map(|k| vec![at(k as f64 / n), at((k as f64 + 0.6) / n)])
        .collect()
}

/// The pieces of a dash-dotted line between two points.
fn dash_dots(from: (f64, f64), to: (f64, f64)) -> Vec<Vec<(f64, f64)>> {
    let at = |t: f64| (from.0 + t * (to.0 - from.0), from.1 + t * (to.1 - from.1));
    let n = (NUM_DASHES / 2) as f64;
    (0..NUM_DASHES / 2)
        .flat_map(|k| {
            let k = k as f64;
            [
                vec![at(k / n), at((k + 0.5) / n)],
                vec![at((k + 0.7) / n), at((k + 0.8) / n)],
            ]
        })
        .collect()
}

impl Renderer for BitmapRenderer {
    fn one_param_pdf(
        &mut self,
        path: &Path,
        param: &str,
        curves: &[PdfCurve],
        injection: Option<f64>,
    ) -> Result<(), DrawError> {
        if curves.is_empty() {
            return Err(DrawError::NoData(param.to_string()));
        }
        trace!("Drawing {}", path.display());

        let x_min = curves
            .iter()
            .flat_map(|c| c.points.first().map(|p| p.0))
            .fold(f64::INFINITY, f64::min);
        let x_max = curves
            .iter()
            .flat_map(|c| c.points.last().map(|p| p.0))
            .fold(f64::NEG_INFINITY, f64::max);
        let (x_lo, x_hi) = padded_bounds([x_min, x_max].into_iter());
        let y_max = curves
            .iter()
            .flat_map(|c| c.points.iter().map(|p| p.1))
            .fold(0.0, f64::max);
        let y_top = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };

        let root = BitMapBackend::new(path, PDF_PIXELS).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| chart_error(path, e))?;
        let mut chart = ChartBuilder::on(&root)
            .margin(30)
            .x_label_area_size(70)
            .y_label_area_size(100)
            .build_cartesian_2d(x_lo..x_hi, 0.0..y_top)
            .map_err(|e| chart_error(path, e))?;
        chart
            .configure_mesh()
            .x_desc(param)
            .y_desc("Probability density")
            .label_style(("sans-serif", 24))
            .draw()
            .map_err(|e| chart_error(path, e))?;

        for curve in curves {
            let colour = rgb(curve.colour);
            chart
                .draw_series(LineSeries::new(
                    curve.points.iter().copied(),
                    colour.stroke_width(2),
                ))
                .map_err(|e| chart_error(path, e))?
                .label(curve.run.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], colour.stroke_width(2)));
        }

        // Only drawn if it'd be visible.
        if let Some(inj) = injection.filter(|inj| x_min <= *inj && *inj <= x_max) {
            chart
                .draw_series(
                    dash_dots((inj, 0.0), (inj, y_max))
                        .into_iter()
                        .map(|piece| PathElement::new(piece, RED.stroke_width(2))),
                )
                .map_err(|e| chart_error(path, e))?;
        }

        chart
            .configure_series_labels()
            .background_style(&*LEGEND_BACKGROUND)
            .border_style(&BLACK)
            .label_font(("sans-serif", 24))
            .draw()
            .map_err(|e| chart_error(path, e))?;
        root.present()
            .map_err(|e| chart_error(path, e))?;
        Ok(())
    }

    fn one_param_line_hist(
        &mut self,
        path: &Path,
        param: &str,
        hists: &[HistCurve],
        cl: f64,
        show_cl_lines: bool,
    ) -> Result<(), DrawError> {
        if hists.is_empty() {
            return Err(DrawError::NoData(param.to_string()));
        }
        trace!("Drawing {}", path.display());

        let (x_lo, x_hi) = padded_bounds(hists.iter().flat_map(|h| {
            [h.hist.edges[0], h.hist.edges[h.hist.edges.len() - 1]].into_iter()
        }));
        let y_max = hists
            .iter()
            .map(|h| h.hist.max_density())
            .fold(0.0, f64::max);
        let y_top = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };

        let root = BitMapBackend::new(path, HIST_PIXELS).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| chart_error(path, e))?;
        let mut chart = ChartBuilder::on(&root)
            .margin(30)
            .x_label_area_size(70)
            .y_label_area_size(100)
            .build_cartesian_2d(x_lo..x_hi, 0.0..y_top)
            .map_err(|e| chart_error(path, e))?;
        chart
            .configure_mesh()
            .x_desc(param)
            .y_desc("Probability density")
            .label_style(("sans-serif", 24))
            .draw()
            .map_err(|e| chart_error(path, e))?;

        for h in hists {
            let colour = rgb(h.colour);
            chart
                .draw_series(LineSeries::new(h.hist.step_points(), colour.stroke_width(2)))
                .map_err(|e| chart_error(path, e))?
                .label(h.run.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], colour.stroke_width(2)));
        }

        if show_cl_lines {
            for h in hists {
                let Some((lo, hi)) = h.interval else {
                    continue;
                };
                let colour = rgb(h.colour);
                chart
                    .draw_series(
                        dashes((lo, 0.0), (lo, y_top))
                            .into_iter()
                            .chain(dashes((hi, 0.0), (hi, y_top)))
                            .map(|piece| PathElement::new(piece, colour.stroke_width(2))),
                    )
                    .map_err(|e| chart_error(path, e))?;
            }
            // A legend entry for the interval lines.
            chart
                .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())
                .map_err(|e| chart_error(path, e))?
                .label(cl_label(cl))
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], BLACK.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&*LEGEND_BACKGROUND)
            .border_style(&BLACK)
            .label_font(("sans-serif", 24))
            .draw()
            .map_err(|e| chart_error(path, e))?;
        root.present()
            .map_err(|e| chart_error(path, e))?;
        Ok(())
    }

    fn two_param_contour(
        &mut self,
        path: &Path,
        params: (&str, &str),
        outlines: &[RegionOutline],
        injection: Option<(f64, f64)>,
    ) -> Result<(), DrawError> {
        if outlines.iter().all(|o| o.segments.is_empty()) {
            return Err(DrawError::NoData(format!("{}-{}", params.0, params.1)));
        }
        trace!("Drawing {}", path.display());

        let points = || {
            outlines
                .iter()
                .flat_map(|o| o.segments.iter().flatten().copied())
                .chain(injection)
        };
        let (x_lo, x_hi) = padded_bounds(points().map(|p| p.0));
        let (y_lo, y_hi) = padded_bounds(points().map(|p| p.1));

        // Thicker lines for smaller confidence levels.
        let mut levels: Vec<f64> = outlines.iter().map(|o| o.cl).collect();
        levels.sort_unstable_by(f64::total_cmp);
        levels.dedup();
        let width_of = |cl: f64| {
            let i = levels.iter().position(|&l| l == cl).unwrap_or(0);
            CONTOUR_WIDTHS[i.min(CONTOUR_WIDTHS.len() - 1)]
        };

        let root = BitMapBackend::new(path, CONTOUR_PIXELS).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| chart_error(path, e))?;
        let mut chart = ChartBuilder::on(&root)
            .margin(30)
            .x_label_area_size(70)
            .y_label_area_size(100)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(|e| chart_error(path, e))?;
        chart
            .configure_mesh()
            .x_desc(params.0)
            .y_desc(params.1)
            .label_style(("sans-serif", 24))
            .draw()
            .map_err(|e| chart_error(path, e))?;

        let mut labelled: Vec<&str> = vec![];
        for outline in outlines {
            let colour = rgb(outline.colour);
            let style = colour.stroke_width(width_of(outline.cl));
            let anno = chart
                .draw_series(
                    outline
                        .segments
                        .iter()
                        .map(|s| PathElement::new(s.to_vec(), style)),
                )
                .map_err(|e| chart_error(path, e))?;
            if !labelled.contains(&outline.run.as_str()) {
                labelled.push(&outline.run);
                anno.label(outline.run.as_str()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 25, y)], colour.stroke_width(2))
                });
            }
        }

        if let Some((x, y)) = injection {
            chart
                .draw_series(std::iter::once(Cross::new((x, y), 10, RED.stroke_width(3))))
                .map_err(|e| chart_error(path, e))?;
        }

        chart
            .configure_series_labels()
            .background_style(&*LEGEND_BACKGROUND)
            .border_style(&BLACK)
            .label_font(("sans-serif", 24))
            .draw()
            .map_err(|e| chart_error(path, e))?;
        root.present()
            .map_err(|e| chart_error(path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_padded_bounds() {
        let (lo, hi) = padded_bounds([0.0, 10.0, 5.0].into_iter());
        assert_abs_diff_eq!(lo, -0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(hi, 10.2, epsilon = 1e-12);

        let (lo, hi) = padded_bounds([3.0, 3.0].into_iter());
        assert_abs_diff_eq!(lo, 2.5);
        assert_abs_diff_eq!(hi, 3.5);

        assert_eq!(padded_bounds(std::iter::empty()), (0.0, 1.0));
    }

    #[test]
    fn test_cl_label() {
        assert_eq!(cl_label(0.29), "29%");
        assert_eq!(cl_label(0.67), "67%");
        assert_eq!(cl_label(0.95), "95%");
    }

    #[test]
    fn test_errors_name_the_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("missing_dir").join("m1_pdf.png");
        let curves = [PdfCurve {
            run: "A".to_string(),
            colour: RunColour {
                r: 0.5,
                g: 0.2,
                b: 0.9,
            },
            points: vec![(0.0, 0.1), (1.0, 0.5), (2.0, 0.1)],
        }];
        match BitmapRenderer.one_param_pdf(&path, "m1", &curves, None) {
            Err(DrawError::Chart { file, .. }) => assert!(file.ends_with("m1_pdf.png"), "{file}"),
            other => panic!("expected a chart error, got {other:?}"),
        }
    }

    #[test]
    fn test_dashes_stay_on_the_line() {
        let pieces = dashes((1.0, 0.0), (1.0, 2.0));
        assert_eq!(pieces.len(), NUM_DASHES);
        for piece in pieces.iter().chain(dash_dots((1.0, 0.0), (1.0, 2.0)).iter()) {
            for &(x, y) in piece {
                assert_abs_diff_eq!(x, 1.0);
                assert!((0.0..=2.0).contains(&y));
            }
        }
    }
}
