// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;

use super::*;

fn ramp(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

#[test]
fn test_prob_interval_coverage() {
    // Shuffled input shouldn't matter.
    let mut samples = ramp(1000);
    samples.reverse();
    for cl in [0.5, 0.67, 0.9, 0.95, 0.999] {
        let (lo, hi) = prob_interval(&samples, cl).unwrap();
        assert!(lo <= hi);
        let inside = samples.iter().filter(|&&s| lo <= s && s <= hi).count();
        let expected = (cl * 1000.0_f64).ceil() as usize;
        assert_eq!(inside, expected, "cl = {cl}");
    }
}

#[test]
fn test_prob_interval_is_centred() {
    let samples = ramp(101);
    let (lo, hi) = prob_interval(&samples, 0.5).unwrap();
    // 51 samples, with 25 left out on each side.
    assert_abs_diff_eq!(lo, 25.0);
    assert_abs_diff_eq!(hi, 75.0);
}

#[test]
fn test_prob_interval_small_inputs() {
    let (lo, hi) = prob_interval(&[3.0], 0.9).unwrap();
    assert_abs_diff_eq!(lo, 3.0);
    assert_abs_diff_eq!(hi, 3.0);

    // A tiny confidence level still gives a single sample.
    let (lo, hi) = prob_interval(&ramp(10), 1e-6).unwrap();
    assert_abs_diff_eq!(lo, hi);
}

#[test]
fn test_prob_interval_errors() {
    for cl in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
        assert!(matches!(
            prob_interval(&ramp(10), cl),
            Err(StatsError::InvalidConfidenceLevel(_))
        ));
    }
    assert_eq!(prob_interval(&[], 0.9), Err(StatsError::NoSamples));
    assert_eq!(
        prob_interval(&[1.0, f64::NAN], 0.9),
        Err(StatsError::NonFiniteSamples)
    );
}

#[test]
fn test_kde_integrates_to_one() {
    let samples: Vec<f64> = (0..200).map(|i| ((i * 37) % 200) as f64 / 20.0).collect();
    let kde = GaussianKde::new(&samples).unwrap();
    assert!(kde.bandwidth() > 0.0);

    let xs = linspace(-20.0, 30.0, 5001);
    let dx = xs[1] - xs[0];
    let integral: f64 = kde.evaluate(&xs).iter().sum::<f64>() * dx;
    assert_abs_diff_eq!(integral, 1.0, epsilon = 1e-3);
}

#[test]
fn test_kde_bandwidth_uses_scotts_rule() {
    let samples = [1.0, 2.0, 3.0, 4.0, 5.0];
    let kde = GaussianKde::new(&samples).unwrap();
    // Sample standard deviation of 1..=5 is sqrt(2.5).
    let expected = 5.0_f64.powf(-0.2) * 2.5_f64.sqrt();
    assert_abs_diff_eq!(kde.bandwidth(), expected, epsilon = 1e-12);
}

#[test]
fn test_kde_degenerate() {
    assert!(matches!(
        GaussianKde::new(&[1.0]),
        Err(StatsError::DegenerateSamples { num_samples: 1, .. })
    ));
    assert!(matches!(
        GaussianKde::new(&[2.0, 2.0, 2.0]),
        Err(StatsError::DegenerateSamples { num_samples: 3, .. })
    ));
}

#[test]
fn test_histogram_is_normalised() {
    let samples: Vec<f64> = (0..500).map(|i| (i as f64 * 0.7).sin()).collect();
    let hist = StepHistogram::new(&samples, 100).unwrap();
    assert_eq!(hist.edges.len(), 101);
    assert_eq!(hist.densities.len(), 100);
    let integral: f64 = hist
        .densities
        .iter()
        .zip(hist.edges.windows(2))
        .map(|(d, e)| d * (e[1] - e[0]))
        .sum();
    assert_abs_diff_eq!(integral, 1.0, epsilon = 1e-10);
    assert!(hist.max_density() > 0.0);

    let points = hist.step_points();
    assert_eq!(points.len(), 202);
    assert_abs_diff_eq!(points[0].1, 0.0);
    assert_abs_diff_eq!(points[201].1, 0.0);
}

#[test]
fn test_histogram_of_identical_samples() {
    let hist = StepHistogram::new(&[4.0; 10], 10).unwrap();
    assert_abs_diff_eq!(hist.edges[0], 3.5);
    assert_abs_diff_eq!(hist.edges[10], 4.5, epsilon = 1e-12);
    assert_abs_diff_eq!(hist.max_density(), 10.0, epsilon = 1e-10);

    assert_eq!(StepHistogram::new(&[1.0], 0), Err(StatsError::NoBins));
}

#[test]
fn test_linspace() {
    assert_eq!(linspace(0.0, 1.0, 5), [0.0, 0.25, 0.5, 0.75, 1.0]);
    assert_eq!(linspace(2.0, 3.0, 1), [2.0]);
    assert!(linspace(2.0, 3.0, 0).is_empty());
}

/// 100 samples: 50 in one bin, 30 in a second and 20 in a third.
fn clustered() -> (Vec<f64>, Vec<f64>) {
    let mut xs = vec![];
    let mut ys = vec![];
    for (x, y, n) in [(0.25, 0.25, 50), (1.25, 0.25, 30), (2.25, 2.25, 20)] {
        xs.extend(std::iter::repeat(x).take(n));
        ys.extend(std::iter::repeat(y).take(n));
    }
    (xs, ys)
}

#[test]
fn test_greedy_regions() {
    let (xs, ys) = clustered();
    let bins = GreedyBins2D::new(&xs, &ys, (0.5, 0.5), None).unwrap();
    assert_eq!(bins.shape(), (5, 5));
    assert_eq!(bins.counts().sum(), 100);

    assert_eq!(bins.region(0.5).unwrap().len(), 1);
    assert_eq!(bins.region(0.51).unwrap().len(), 2);
    assert_eq!(bins.region(0.8).unwrap().len(), 2);
    assert_eq!(bins.region(0.95).unwrap().len(), 3);
    assert_eq!(bins.region(1.0).unwrap().len(), 3);
    assert_abs_diff_eq!(bins.area(0.8).unwrap(), 0.5);
    assert!(bins.injection_confidence().is_none());
}

#[test]
fn test_greedy_regions_are_nested() {
    let xs: Vec<f64> = (0..1000).map(|i| ((i * 7919) % 1000) as f64 / 100.0).collect();
    let ys: Vec<f64> = (0..1000).map(|i| ((i * 104_729) % 997) as f64 / 100.0).collect();
    let bins = GreedyBins2D::new(&xs, &ys, (1.0, 1.0), None).unwrap();

    let mut previous: &[(usize, usize)] = &[];
    for cl in [0.1, 0.5, 0.67, 0.9, 0.95, 1.0] {
        let region = bins.region(cl).unwrap();
        assert!(region.len() >= previous.len());
        assert_eq!(&region[..previous.len()], previous);
        let covered: u32 = region.iter().map(|ij| bins.counts()[*ij]).sum();
        assert!(covered as f64 >= cl * 1000.0);
        previous = region;
    }
}

#[test]
fn test_greedy_injection_confidence() {
    let (xs, ys) = clustered();
    let bins = GreedyBins2D::new(&xs, &ys, (0.5, 0.5), Some((1.3, 0.3))).unwrap();
    assert_abs_diff_eq!(bins.injection_confidence().unwrap(), 0.8);

    let bins = GreedyBins2D::new(&xs, &ys, (0.5, 0.5), Some((0.3, 0.3))).unwrap();
    assert_abs_diff_eq!(bins.injection_confidence().unwrap(), 0.5);

    // Outside the grid.
    let bins = GreedyBins2D::new(&xs, &ys, (0.5, 0.5), Some((-3.0, 0.0))).unwrap();
    assert!(bins.injection_confidence().is_none());

    // Inside the grid, but in an empty bin.
    let bins = GreedyBins2D::new(&xs, &ys, (0.5, 0.5), Some((1.3, 2.3))).unwrap();
    assert!(bins.injection_confidence().is_none());
}

#[test]
fn test_greedy_outline_of_single_bin() {
    let bins = GreedyBins2D::new(&[0.2, 0.3], &[0.2, 0.3], (1.0, 1.0), None).unwrap();
    let outline = bins.region_outline(0.9).unwrap();
    assert_eq!(outline.len(), 4);
    let ((x0, y0), (x1, y1)) = bins.bin_corners((0, 0));
    assert_abs_diff_eq!(x0, 0.2);
    assert_abs_diff_eq!(y0, 0.2);
    assert_abs_diff_eq!(x1, 1.2, epsilon = 1e-12);
    assert_abs_diff_eq!(y1, 1.2, epsilon = 1e-12);
}

#[test]
fn test_greedy_errors() {
    assert_eq!(
        GreedyBins2D::new(&[1.0, 2.0], &[1.0], (1.0, 1.0), None).unwrap_err(),
        StatsError::LengthMismatch { x: 2, y: 1 }
    );
    assert_eq!(
        GreedyBins2D::new(&[1.0], &[1.0], (0.0, 1.0), None).unwrap_err(),
        StatsError::InvalidBinWidth(0.0)
    );
    assert!(matches!(
        GreedyBins2D::new(&[0.0, 1e6], &[0.0, 1e6], (0.1, 0.1), None),
        Err(StatsError::TooManyBins(_))
    ));
    // A range too big to count in a usize.
    assert!(matches!(
        GreedyBins2D::new(&[0.0, 1e20, 5.0], &[0.0, 1.0, 0.5], (1.0, 0.1), None),
        Err(StatsError::TooManyBins(_))
    ));

    let bins = GreedyBins2D::new(&[1.0], &[1.0], (1.0, 1.0), None).unwrap();
    assert!(bins.region(0.0).is_err());
    assert!(bins.region(1.01).is_err());
}
