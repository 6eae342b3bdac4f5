//! Step limiting between consecutive published readings.

/// Move from `previous` toward `candidate` by at most `max_step`.
///
/// If the candidate is within `max_step` of the previous value it is returned
/// unchanged; otherwise the result is `previous ± max_step` in the candidate's
/// direction.
pub fn smooth(candidate: f64, previous: f64, max_step: f64) -> f64 {
    if (candidate - previous).abs() > max_step {
        if candidate > previous {
            previous + max_step
        } else {
            previous - max_step
        }
    } else {
        candidate
    }
}

/// The last published value of each smoothed vital.
///
/// Starts at fixed resting values rather than the initial snapshot, so the
/// first active tick pulls heart rate toward 100 BPM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviousValues {
    pub trestbps: i64,
    pub thalach: i64,
    pub oldpeak: f64,
}

impl Default for PreviousValues {
    fn default() -> Self {
        Self {
            trestbps: 120,
            thalach: 100,
            oldpeak: 1.0,
        }
    }
}
