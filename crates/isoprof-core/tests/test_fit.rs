mod common;

use std::cell::RefCell;
use std::f64::consts::PI;

use approx::assert_relative_eq;
use isoprof_core::error::IsoprofError;
use isoprof_core::fit::{
    clamp_inner_ellipticity, fit_isophotes, fit_isophotes_reported, fit_isophotes_with_rng,
    repair_collapsed_center, FitConfig, FitStage, ProgressReporter,
};
use isoprof_core::frame::Frame;
use isoprof_core::smooth::smooth_ellipticity;
use isoprof_core::stats::{angle_median, median};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use common::{pa_distance, reference_galaxy, reference_guess, GALAXY_ELLIPTICITY, GALAXY_PA};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingReporter {
    stages: RefCell<Vec<FitStage>>,
    advances: RefCell<usize>,
    finished: RefCell<usize>,
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: FitStage, _total_items: Option<usize>) {
        self.stages.borrow_mut().push(stage);
    }

    fn advance(&self, _items_done: usize) {
        *self.advances.borrow_mut() += 1;
    }

    fn finish_stage(&self) {
        *self.finished.borrow_mut() += 1;
    }
}

fn seeded_config(seed: u64) -> FitConfig {
    FitConfig {
        seed: Some(seed),
        ..FitConfig::default()
    }
}

// ---------------------------------------------------------------------------
// End-to-end
// ---------------------------------------------------------------------------

#[test]
fn test_fit_recovers_galaxy_shape() {
    let frame = reference_galaxy();
    let profile = fit_isophotes(&frame, &reference_guess(), &seeded_config(42)).unwrap();

    let n = profile.len();
    assert_eq!(n, 15);
    for series in [
        &profile.ellipticity,
        &profile.position_angle,
        &profile.ellipticity_error,
        &profile.position_angle_error,
        &profile.smooth_ellipticity,
        &profile.smooth_position_angle,
    ] {
        assert_eq!(series.len(), n);
    }
    assert!(profile.radii.windows(2).all(|w| w[1] > w[0]));
    assert!(profile.ellipticity.iter().all(|&e| (0.0..1.0).contains(&e)));
    assert!(profile.position_angle.iter().all(|&pa| (0.0..PI).contains(&pa)));
    assert!(profile
        .ellipticity_error
        .iter()
        .chain(&profile.position_angle_error)
        .all(|&err| err.is_finite() && err >= 0.0));

    // Inner and outermost rings are the least constrained; judge the middle.
    let e_mid = median(&profile.ellipticity[3..13]).unwrap();
    let pa_mid = angle_median(&profile.position_angle[3..13]).unwrap();
    assert!((e_mid - GALAXY_ELLIPTICITY).abs() < 0.05, "median e = {e_mid}");
    assert!(pa_distance(pa_mid, GALAXY_PA) < 0.05, "median pa = {pa_mid}");

    let smooth_e = median(&profile.smooth_ellipticity[3..13]).unwrap();
    assert!((smooth_e - GALAXY_ELLIPTICITY).abs() < 0.05, "smooth e = {smooth_e}");
}

#[test]
fn test_fit_smooths_clamped_inner_ellipticity() {
    let frame = reference_galaxy();
    let config = FitConfig {
        max_iterations: 20,
        ..seeded_config(8)
    };
    let profile = fit_isophotes(&frame, &reference_guess(), &config).unwrap();

    let inner = &profile.ellipticity[..3];
    assert!(inner.iter().all(|&e| e == inner[0]));

    // The trend is fitted to the returned, already clamped, raw profile.
    let refit = smooth_ellipticity(&profile.radii, &profile.ellipticity, config.smoothing_degree);
    assert_eq!(refit, profile.smooth_ellipticity);
}

#[test]
fn test_fit_annotation_and_summary() {
    let frame = reference_galaxy();
    let config = FitConfig {
        max_iterations: 5,
        ..seeded_config(1)
    };
    let profile = fit_isophotes(&frame, &reference_guess(), &config).unwrap();
    let last = profile.fit_limit().unwrap();
    assert_eq!(
        profile.fit_limit_annotation,
        format!("fit limit semi-major axis: {last:.2} pix")
    );
    assert!(profile.iterations <= 5);
    assert!(profile.median_ellipticity().is_some());
    assert!(profile.median_position_angle().is_some());
}

#[test]
fn test_fit_seed_is_reproducible() {
    let frame = reference_galaxy();
    let config = FitConfig {
        max_iterations: 8,
        ..seeded_config(99)
    };
    let a = fit_isophotes(&frame, &reference_guess(), &config).unwrap();
    let b = fit_isophotes(&frame, &reference_guess(), &config).unwrap();
    assert_eq!(a.ellipticity, b.ellipticity);
    assert_eq!(a.position_angle, b.position_angle);

    let mut rng = StdRng::seed_from_u64(99);
    let c = fit_isophotes_with_rng(&frame, &reference_guess(), &config, &mut rng).unwrap();
    assert_eq!(a.ellipticity, c.ellipticity);
}

#[test]
fn test_fit_reports_every_stage() {
    let frame = reference_galaxy();
    let config = FitConfig {
        max_iterations: 3,
        ..FitConfig::default()
    };
    let reporter = RecordingReporter::default();
    let mut rng = StdRng::seed_from_u64(4);
    let profile =
        fit_isophotes_reported(&frame, &reference_guess(), &config, &mut rng, &reporter).unwrap();

    assert_eq!(
        *reporter.stages.borrow(),
        vec![
            FitStage::SampleRadii,
            FitStage::Optimizing,
            FitStage::Smoothing,
            FitStage::Uncertainty
        ]
    );
    assert_eq!(*reporter.finished.borrow(), 4);
    assert_eq!(*reporter.advances.borrow(), profile.iterations);
}

#[test]
fn test_fit_propagates_initialization_failure() {
    let frame = Frame::new(Array2::zeros((100, 100))).unwrap();
    let mut guess = reference_guess();
    guess.center.x = 50.0;
    guess.center.y = 50.0;
    assert!(matches!(
        fit_isophotes(&frame, &guess, &seeded_config(0)),
        Err(IsoprofError::InitializationFailed { .. })
    ));
}

// ---------------------------------------------------------------------------
// Post-processing
// ---------------------------------------------------------------------------

#[test]
fn test_repair_collapsed_center() {
    let mut e = vec![0.9, 0.85, 0.3, 0.3, 0.31, 0.32, 0.33];
    let mut pa = vec![1.5, 1.4, 0.5, 0.5, 0.5, 0.5, 0.5];
    repair_collapsed_center(&mut e, &mut pa);
    assert_eq!(&e[..3], &[0.3, 0.3, 0.3]);
    assert_eq!(&pa[..3], &[0.5, 0.5, 0.5]);
    assert_eq!(&e[3..], &[0.3, 0.31, 0.32, 0.33]);
}

#[test]
fn test_repair_leaves_smooth_profile() {
    let mut e = vec![0.35, 0.34, 0.33, 0.32, 0.31, 0.3];
    let mut pa = vec![0.5; 6];
    let before = e.clone();
    repair_collapsed_center(&mut e, &mut pa);
    assert_eq!(e, before);
}

#[test]
fn test_repair_only_scans_inner_indices() {
    // A jump between indices 6 and 7 is outside the scanned region.
    let mut e = vec![0.3, 0.3, 0.3, 0.3, 0.3, 0.3, 0.95, 0.2];
    let mut pa = vec![0.5; 8];
    let before = e.clone();
    repair_collapsed_center(&mut e, &mut pa);
    assert_eq!(e, before);
}

#[test]
fn test_clamp_inner_ellipticity() {
    let mut e = vec![0.4, 0.2, 0.3, 0.5, 0.1];
    clamp_inner_ellipticity(&mut e);
    assert_eq!(e, vec![0.2, 0.2, 0.2, 0.5, 0.1]);

    let mut short = vec![0.6, 0.4];
    clamp_inner_ellipticity(&mut short);
    assert_eq!(short, vec![0.4, 0.4]);

    let mut empty: Vec<f64> = vec![];
    clamp_inner_ellipticity(&mut empty);
    assert!(empty.is_empty());
}

#[test]
fn test_repair_threshold_uses_transformed_space() {
    // 0.55 -> 0.45 is a drop of ~0.32 after the transform, below the 0.5 jump.
    let mut e = vec![0.55, 0.45, 0.45, 0.45];
    let mut pa = vec![0.1; 4];
    repair_collapsed_center(&mut e, &mut pa);
    assert_relative_eq!(e[0], 0.55);
}
