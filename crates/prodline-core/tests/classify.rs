use prodline_core::classify::{classify, PerformanceClass};

#[test]
fn above_target_is_on_target() {
    assert_eq!(classify(10.0, 8.0), PerformanceClass::OnTarget);
}

#[test]
fn below_target_is_flagged() {
    assert_eq!(classify(7.0, 8.0), PerformanceClass::BelowTarget);
}

#[test]
fn meeting_target_exactly_counts() {
    assert_eq!(classify(8.0, 8.0), PerformanceClass::OnTarget);
    assert_eq!(classify(0.0, 0.0), PerformanceClass::OnTarget);
}
