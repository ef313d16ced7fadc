use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PerformanceClass {
    OnTarget,
    BelowTarget,
}

/// Meeting the target exactly counts as on target.
pub fn classify(pr: f64, target: f64) -> PerformanceClass {
    if pr >= target {
        PerformanceClass::OnTarget
    } else {
        PerformanceClass::BelowTarget
    }
}
