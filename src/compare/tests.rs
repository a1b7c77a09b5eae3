// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use ndarray::prelude::*;

use super::*;
use crate::{
    plotting::DrawError,
    posterior::{harmonise, SampleTable},
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Pdf {
        file: String,
        num_curves: usize,
        injection: Option<f64>,
    },
    Hist {
        file: String,
        num_hists: usize,
        intervals: Vec<Option<(f64, f64)>>,
    },
    Contour {
        file: String,
        num_outlines: usize,
    },
}

/// Remembers what it was asked to draw. Files whose names are in `fail` aren't
/// drawn.
#[derive(Default)]
struct RecordingRenderer {
    calls: Vec<Call>,
    fail: Vec<String>,
}

impl RecordingRenderer {
    fn check(&self, path: &Path) -> Result<String, DrawError> {
        let file = path.file_name().unwrap().to_string_lossy().to_string();
        if self.fail.contains(&file) {
            return Err(DrawError::Chart {
                file,
                msg: "refused".to_string(),
            });
        }
        Ok(file)
    }
}

impl Renderer for RecordingRenderer {
    fn one_param_pdf(
        &mut self,
        path: &Path,
        _param: &str,
        curves: &[PdfCurve],
        injection: Option<f64>,
    ) -> Result<(), DrawError> {
        let file = self.check(path)?;
        self.calls.push(Call::Pdf {
            file,
            num_curves: curves.len(),
            injection,
        });
        Ok(())
    }

    fn one_param_line_hist(
        &mut self,
        path: &Path,
        _param: &str,
        hists: &[HistCurve],
        _cl: f64,
        _show_cl_lines: bool,
    ) -> Result<(), DrawError> {
        let file = self.check(path)?;
        self.calls.push(Call::Hist {
            file,
            num_hists: hists.len(),
            intervals: hists.iter().map(|h| h.interval).collect(),
        });
        Ok(())
    }

    fn two_param_contour(
        &mut self,
        path: &Path,
        _params: (&str, &str),
        outlines: &[RegionOutline],
        _injection: Option<(f64, f64)>,
    ) -> Result<(), DrawError> {
        let file = self.check(path)?;
        self.calls.push(Call::Contour {
            file,
            num_outlines: outlines.len(),
        });
        Ok(())
    }
}

/// A run with `m1`, `m2` and `distance` columns. `offset` shifts every
/// sample.
fn run(name: &str, offset: f64) -> Posterior {
    let n = 50;
    let mut samples = Array2::zeros((n, 3));
    for i in 0..n {
        let i_f = i as f64;
        samples[(i, 0)] = 1.5 + offset + 0.01 * i_f;
        samples[(i, 1)] = 1.2 + offset + 0.005 * i_f;
        samples[(i, 2)] = 40.0 + offset + i_f;
    }
    let table = SampleTable::new(
        vec!["m1".to_string(), "m2".to_string(), "distance".to_string()],
        samples,
    )
    .unwrap();
    let harmonised = harmonise(name, &table);
    Posterior::new(name, &harmonised.table, None)
}

fn colours(posteriors: &[Posterior]) -> RunColours {
    let names: Vec<&str> = posteriors.iter().map(|p| p.name()).collect();
    RunColours::new(&names, 1)
}

fn files(plots: &[PathBuf]) -> Vec<String> {
    plots.iter().map(|p| p.display().to_string()).collect()
}

#[test]
fn test_eligible_pairs() {
    let common = |s: &[&str]| s.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    let pairs = eligible_pairs(&common(&["m1", "m2", "ra", "dec", "dist"]));
    assert_eq!(pairs.len(), 2);
    assert_eq!((pairs[0].x, pairs[0].y), ("m1", "m2"));
    assert_eq!(pairs[0].bin_widths, (0.1, 0.1));
    assert_eq!(pairs[0].file_name(), PathBuf::from("m1-m2.png"));
    assert_eq!((pairs[1].x, pairs[1].y), ("ra", "dec"));

    // Order doesn't matter.
    let pairs = eligible_pairs(&common(&["dec", "m2", "ra", "m1"]));
    assert_eq!(pairs.len(), 2);

    // "RA" has no bin width.
    assert!(eligible_pairs(&common(&["RA", "dec"])).is_empty());
    assert!(eligible_pairs(&common(&["m1", "dec"])).is_empty());
}

#[test]
fn test_file_names() {
    assert_eq!(hist_file_name("m1", 0.67), PathBuf::from("m1_67.png"));
    assert_eq!(hist_file_name("cos(iota)", 0.9), PathBuf::from("cos(iota)_90.png"));
    assert_eq!(hist_file_name("dist", 0.95), PathBuf::from("dist_95.png"));
    assert_eq!(pdf_file_name("dist"), PathBuf::from("dist_pdf.png"));
}

#[test]
fn test_two_runs() {
    let posteriors = vec![run("A", 0.0), run("B", 0.1)];
    let mut renderer = RecordingRenderer::default();
    let report = compare_posteriors(
        &posteriors,
        &colours(&posteriors),
        Path::new("out"),
        &CompareOptions::default(),
        &mut renderer,
    )
    .unwrap();

    assert_eq!(
        report.one_d.keys().collect::<Vec<_>>(),
        ["m1", "m2", "dist"]
    );
    for (param, entry) in &report.one_d {
        assert_eq!(
            files(&entry.plots),
            [
                format!("{param}_67.png"),
                format!("{param}_90.png"),
                format!("{param}_95.png")
            ]
        );
        assert_eq!(entry.cl_table.levels, [0.67, 0.9, 0.95]);
        assert_eq!(entry.cl_table.rows.len(), 2);
        assert_eq!(entry.cl_table.rows[0].run, "A");
        assert_eq!(entry.cl_table.rows[1].run, "B");
        assert!(entry
            .cl_table
            .rows
            .iter()
            .all(|r| r.intervals.iter().all(|i| i.is_some())));
    }
    assert_eq!(files(&report.two_d), ["m1-m2.png"]);

    assert_eq!(
        renderer.calls[0],
        Call::Contour {
            file: "m1-m2.png".to_string(),
            num_outlines: 2
        }
    );
    assert_eq!(renderer.calls.len(), 1 + 3 * 3);
    assert!(renderer.calls[1..]
        .iter()
        .all(|c| matches!(c, Call::Hist { num_hists: 2, .. })));
}

#[test]
fn test_kde_plots() {
    let posteriors = vec![run("A", 0.0), run("B", 0.1)];
    let mut renderer = RecordingRenderer::default();
    let options = CompareOptions {
        kde_plots: true,
        ..Default::default()
    };
    let report = compare_posteriors(
        &posteriors,
        &colours(&posteriors),
        Path::new("out"),
        &options,
        &mut renderer,
    )
    .unwrap();

    assert_eq!(
        files(&report.one_d["dist"].plots),
        ["dist_67.png", "dist_90.png", "dist_95.png"]
    );
    assert_eq!(
        report.one_d["dist"].pdf_plot,
        Some(PathBuf::from("dist_pdf.png"))
    );
    assert!(renderer.calls.contains(&Call::Pdf {
        file: "m1_pdf.png".to_string(),
        num_curves: 2,
        injection: None
    }));
}

#[test]
fn test_single_common_param_has_no_pairs() {
    let table = |name: &str| {
        SampleTable::new(
            vec![name.to_string(), "m1".to_string()],
            array![[1.0, 1.4], [2.0, 1.5], [3.0, 1.6]],
        )
        .unwrap()
    };
    let posteriors = vec![
        Posterior::new("A", &table("m2"), None),
        Posterior::new("B", &table("eta"), None),
    ];
    let mut renderer = RecordingRenderer::default();
    let report = compare_posteriors(
        &posteriors,
        &colours(&posteriors),
        Path::new("out"),
        &CompareOptions::default(),
        &mut renderer,
    )
    .unwrap();
    assert_eq!(report.one_d.keys().collect::<Vec<_>>(), ["m1"]);
    assert!(report.two_d.is_empty());
    assert!(!renderer
        .calls
        .iter()
        .any(|c| matches!(c, Call::Contour { .. })));
}

#[test]
fn test_failed_run_keeps_its_row() {
    let mut bad = Array2::zeros((3, 2));
    bad[(0, 0)] = 1.0;
    bad[(1, 0)] = f64::NAN;
    bad[(2, 0)] = 2.0;
    bad.column_mut(1).assign(&array![1.0, 1.1, 1.2]);
    let bad = SampleTable::new(vec!["m1".to_string(), "m2".to_string()], bad).unwrap();
    let posteriors = vec![run("A", 0.0), Posterior::new("broken", &bad, None)];

    let mut renderer = RecordingRenderer::default();
    let report = compare_posteriors(
        &posteriors,
        &colours(&posteriors),
        Path::new("out"),
        &CompareOptions::default(),
        &mut renderer,
    )
    .unwrap();

    let table = &report.one_d["m1"].cl_table;
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[1].run, "broken");
    assert!(table.rows[1].intervals.iter().all(|i| i.is_none()));
    assert!(table.min_max().iter().all(|i| i.is_some()));
    assert_eq!(report.one_d["m1"].plots.len(), 3);

    // The broken run has no histogram, and isn't in the contour plot.
    assert!(renderer.calls.contains(&Call::Hist {
        file: "m1_67.png".to_string(),
        num_hists: 1,
        intervals: vec![table.rows[0].intervals[0]],
    }));
    assert!(renderer.calls.contains(&Call::Contour {
        file: "m1-m2.png".to_string(),
        num_outlines: 1,
    }));
}

#[test]
fn test_failed_render_is_left_out() {
    let posteriors = vec![run("A", 0.0), run("B", 0.1)];
    let mut renderer = RecordingRenderer {
        fail: vec!["m2_90.png".to_string(), "m1-m2.png".to_string()],
        ..Default::default()
    };
    let report = compare_posteriors(
        &posteriors,
        &colours(&posteriors),
        Path::new("out"),
        &CompareOptions::default(),
        &mut renderer,
    )
    .unwrap();

    assert_eq!(files(&report.one_d["m2"].plots), ["m2_67.png", "m2_95.png"]);
    assert_eq!(report.one_d["m2"].cl_table.rows.len(), 2);
    assert!(report.two_d.is_empty());
}

#[test]
fn test_errors() {
    let mut renderer = RecordingRenderer::default();
    assert!(matches!(
        compare_posteriors(
            &[],
            &RunColours::new::<&str>(&[], 1),
            Path::new("out"),
            &CompareOptions::default(),
            &mut renderer
        ),
        Err(CompareError::NoPosteriors)
    ));

    let posteriors = vec![run("A", 0.0)];
    match compare_posteriors(
        &posteriors,
        &RunColours::new(&["B"], 1),
        Path::new("out"),
        &CompareOptions::default(),
        &mut renderer,
    ) {
        Err(CompareError::NoColour(run)) => assert_eq!(run, "A"),
        other => panic!("expected a missing colour, got {other:?}"),
    }
}
