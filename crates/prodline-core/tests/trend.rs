use prodline_core::error::TrendError;
use prodline_core::trend::fit_trend;

fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn fits_a_perfect_line() {
    let trend = fit_trend(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_close(trend.slope, 1.0);
    assert_close(trend.intercept, 1.0);
    assert_close(trend.r_squared, 1.0);
    for (fitted, expected) in trend.fitted.iter().zip([1.0, 2.0, 3.0, 4.0]) {
        assert_close(*fitted, expected);
    }
}

#[test]
fn constant_series_is_flat() {
    let trend = fit_trend(&[5.0, 5.0, 5.0]).unwrap();
    assert_close(trend.slope, 0.0);
    assert_close(trend.intercept, 5.0);
    assert_eq!(trend.fitted, vec![5.0, 5.0, 5.0]);
}

#[test]
fn matches_reference_least_squares_coefficients() {
    // Reference values from the normal equations over x = 0..4.
    let trend = fit_trend(&[88.0, 84.0, 90.5, 87.0]).unwrap();
    assert_close(trend.slope, 0.35);
    assert_close(trend.intercept, 86.85);
    assert_close(trend.predict(4.0), 88.25);
    assert_eq!(trend.fitted.len(), 4);
    assert!(trend.r_squared > 0.0 && trend.r_squared < 1.0);
}

#[test]
fn large_offsets_stay_precise() {
    let base = 1.0e9;
    let trend = fit_trend(&[base, base + 2.0, base + 4.0]).unwrap();
    assert_close(trend.slope, 2.0);
    assert_close(trend.intercept, base);
}

#[test]
fn single_value_is_a_horizontal_line() {
    let trend = fit_trend(&[42.5]).unwrap();
    assert_eq!(trend.slope, 0.0);
    assert_eq!(trend.intercept, 42.5);
    assert_eq!(trend.fitted, vec![42.5]);
}

#[test]
fn empty_and_non_finite_series_are_rejected() {
    assert_eq!(fit_trend(&[]).unwrap_err(), TrendError::EmptySeries);
    assert!(matches!(
        fit_trend(&[1.0, f64::INFINITY]).unwrap_err(),
        TrendError::NonFiniteValue { index: 1, .. }
    ));
}
