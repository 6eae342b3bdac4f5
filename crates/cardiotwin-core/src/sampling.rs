//! Bounded random draws for each simulated vital.
//!
//! Distributions and clamp ranges are fixed clinical constants. The loop owns
//! its generator exclusively; nothing else draws from it.

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Sampling and smoothing parameters for one vital.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalSpec {
    /// Mean of the per-tick normal draw.
    pub mean: f64,
    /// Standard deviation of the per-tick normal draw.
    pub stddev: f64,
    /// Inclusive clamp range.
    pub lower: f64,
    pub upper: f64,
    /// Largest change allowed between consecutive published values.
    pub max_step: f64,
}

/// Resting systolic blood pressure, mmHg.
pub const BLOOD_PRESSURE: VitalSpec = VitalSpec {
    mean: 120.0,
    stddev: 5.0,
    lower: 90.0,
    upper: 200.0,
    max_step: 3.0,
};

/// Heart rate, BPM.
pub const HEART_RATE: VitalSpec = VitalSpec {
    mean: 100.0,
    stddev: 30.0,
    lower: 60.0,
    upper: 200.0,
    max_step: 10.0,
};

/// ST depression, mm.
pub const ST_DEPRESSION: VitalSpec = VitalSpec {
    mean: 1.5,
    stddev: 0.5,
    lower: 0.0,
    upper: 6.2,
    max_step: 0.2,
};

/// Cholesterol is held constant for the whole run.
pub const CHOLESTEROL: i64 = 200;

/// Draw from `N(mean, stddev)` and clamp to `[lower, upper]`.
///
/// A degenerate distribution (negative or non-finite stddev) or a non-finite
/// draw falls back to the clamped mean.
pub fn sample<R: Rng + ?Sized>(rng: &mut R, mean: f64, stddev: f64, lower: f64, upper: f64) -> f64 {
    // rand_distr accepts a negative stddev and mirrors it, so check first.
    if !(stddev.is_finite() && stddev >= 0.0) {
        return clamped_or_lower(mean, lower, upper);
    }
    let draw = match Normal::new(mean, stddev) {
        Ok(normal) => normal.sample(rng),
        Err(_) => mean,
    };
    if draw.is_finite() {
        draw.clamp(lower, upper)
    } else {
        clamped_or_lower(mean, lower, upper)
    }
}

fn clamped_or_lower(value: f64, lower: f64, upper: f64) -> f64 {
    if value.is_finite() {
        value.clamp(lower, upper)
    } else {
        lower
    }
}

/// Round to two decimal places, the precision ST depression is published at.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One set of raw (unsmoothed) candidate readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawReading {
    pub trestbps: i64,
    pub thalach: i64,
    pub oldpeak: f64,
}

/// The loop's private source of simulated readings.
pub struct SampleGenerator<R = StdRng> {
    rng: R,
}

impl SampleGenerator<StdRng> {
    /// Seeded for reproducible runs, or from OS entropy when `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl<R: Rng> SampleGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draw a value from `spec` around an arbitrary mean with a scaled spread.
    pub fn draw(&mut self, spec: &VitalSpec, mean: f64, stddev: f64) -> f64 {
        sample(&mut self.rng, mean, stddev, spec.lower, spec.upper)
    }

    /// Draw raw candidates for the three sampled vitals around their
    /// resting means. Integer vitals are truncated after clamping.
    pub fn raw_reading(&mut self) -> RawReading {
        let trestbps = self.draw(&BLOOD_PRESSURE, BLOOD_PRESSURE.mean, BLOOD_PRESSURE.stddev);
        let thalach = self.draw(&HEART_RATE, HEART_RATE.mean, HEART_RATE.stddev);
        let oldpeak = self.draw(&ST_DEPRESSION, ST_DEPRESSION.mean, ST_DEPRESSION.stddev);
        RawReading {
            trestbps: trestbps as i64,
            thalach: thalach as i64,
            oldpeak: round2(oldpeak),
        }
    }

    /// Exercise-induced angina: a fair coin, 0 or 1.
    pub fn angina(&mut self) -> i64 {
        i64::from(self.rng.gen_bool(0.5))
    }
}
