mod common;

use std::f64::consts::PI;

use approx::assert_relative_eq;
use isoprof_core::smooth::{huber_polyfit, smooth_ellipticity, smooth_position_angle};

use common::pa_distance;

fn log_radii(n: usize) -> Vec<f64> {
    (0..n).map(|i| 4.5 * 1.2f64.powi(i as i32)).collect()
}

// ---------------------------------------------------------------------------
// huber_polyfit
// ---------------------------------------------------------------------------

#[test]
fn test_polyfit_recovers_exact_polynomial() {
    let x: Vec<f64> = (0..20).map(|i| i as f64 / 19.0).collect();
    let y: Vec<f64> = x.iter().map(|&v| 1.0 + 2.0 * v - 3.0 * v * v).collect();
    let fit = huber_polyfit(&x, &y, 2, 1.35).unwrap();
    for (f, t) in fit.iter().zip(&y) {
        assert_relative_eq!(*f, *t, epsilon = 1e-8);
    }
}

#[test]
fn test_polyfit_resists_outlier() {
    let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
    let mut y: Vec<f64> = (0..20).map(|i| 0.3 + 0.01 * (i as f64).sin()).collect();
    y[10] = 0.9;
    let fit = huber_polyfit(&x, &y, 1, 2.0).unwrap();
    for (i, f) in fit.iter().enumerate() {
        assert!((f - 0.3).abs() < 0.03, "index {i}: {f}");
    }
}

#[test]
fn test_polyfit_reduces_degree_for_few_points() {
    let fit = huber_polyfit(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0], 5, 2.0).unwrap();
    assert_relative_eq!(fit[1], 4.0, epsilon = 1e-6);
}

#[test]
fn test_polyfit_rejects_bad_input() {
    assert!(huber_polyfit(&[], &[], 2, 2.0).is_none());
    assert!(huber_polyfit(&[1.0, 2.0], &[1.0], 1, 2.0).is_none());
}

// ---------------------------------------------------------------------------
// Profile smoothing
// ---------------------------------------------------------------------------

#[test]
fn test_smooth_constant_ellipticity() {
    let radii = log_radii(15);
    let e = vec![0.3; 15];
    let smooth = smooth_ellipticity(&radii, &e, 5);
    assert_eq!(smooth.len(), 15);
    for s in smooth {
        assert_relative_eq!(s, 0.3, epsilon = 1e-9);
    }
}

#[test]
fn test_smooth_ellipticity_ignores_spike() {
    let radii = log_radii(15);
    let mut e = vec![0.4; 15];
    e[7] = 0.9;
    let smooth = smooth_ellipticity(&radii, &e, 5);
    assert!((smooth[7] - 0.4).abs() < 0.1, "smooth[7] = {}", smooth[7]);
    assert!(smooth.iter().all(|&s| (0.0..1.0).contains(&s)));
}

#[test]
fn test_smooth_position_angle_across_wrap() {
    let radii = log_radii(20);
    let pa: Vec<f64> = (0..20)
        .map(|i| if i % 2 == 0 { 0.02 } else { PI - 0.02 })
        .collect();
    let smooth = smooth_position_angle(&radii, &pa, 5);
    for s in smooth {
        assert!((0.0..PI).contains(&s));
        assert!(pa_distance(s, 0.0) < 0.05, "smooth pa = {s}");
    }
}

#[test]
fn test_smooth_position_angle_follows_twist() {
    let radii = log_radii(15);
    let pa: Vec<f64> = (0..15).map(|i| 0.3 + 0.02 * i as f64).collect();
    let smooth = smooth_position_angle(&radii, &pa, 5);
    for (s, p) in smooth.iter().zip(&pa) {
        assert!(pa_distance(*s, *p) < 0.01);
    }
}
