use std::f64::consts::PI;

use approx::assert_relative_eq;
use isoprof_core::uncertainty::{ellipticity_errors, error_window, position_angle_errors};

#[test]
fn test_error_window_edges() {
    assert_eq!(error_window(0, 10), 0..4);
    assert_eq!(error_window(1, 10), 0..4);
    assert_eq!(error_window(9, 10), 6..10);
}

#[test]
fn test_error_window_interior() {
    assert_eq!(error_window(2, 10), 0..4);
    assert_eq!(error_window(5, 10), 3..7);
    assert_eq!(error_window(8, 10), 6..10);
}

#[test]
fn test_error_window_short_profile() {
    assert_eq!(error_window(0, 3), 0..3);
    assert_eq!(error_window(2, 3), 0..3);
}

#[test]
fn test_errors_zero_for_exact_fit() {
    let raw = vec![0.3; 8];
    let errs = ellipticity_errors(&raw, &raw);
    assert!(errs.iter().all(|&e| e == 0.0));
}

#[test]
fn test_errors_constant_offset() {
    let raw = vec![0.4; 8];
    let smooth = vec![0.3; 8];
    for e in ellipticity_errors(&raw, &smooth) {
        assert_relative_eq!(e, 0.1, epsilon = 1e-12);
    }
}

#[test]
fn test_errors_localised_residual() {
    let smooth = vec![0.3; 10];
    let mut raw = smooth.clone();
    raw[9] = 0.5;
    let errs = ellipticity_errors(&raw, &smooth);
    assert_relative_eq!(errs[0], 0.0);
    assert_relative_eq!(errs[9], (0.04f64 / 4.0).sqrt(), epsilon = 1e-12);
}

#[test]
fn test_position_angle_errors_are_circular() {
    let raw = vec![0.01; 6];
    let smooth = vec![PI - 0.01; 6];
    for e in position_angle_errors(&raw, &smooth) {
        assert_relative_eq!(e, 0.02, epsilon = 1e-9);
    }
}
