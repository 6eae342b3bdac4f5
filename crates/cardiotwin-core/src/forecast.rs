//! Short-term projections of the current reading.
//!
//! Each horizon is sampled independently around the *current* base values
//! (never chained from the previous horizon) with a spread that widens the
//! further out the horizon lies. Every projection is classified with the same
//! static attributes, cholesterol, and angina flag as the current reading.

use rand::Rng;

use cardiotwin_contracts::{
    error::CardioResult,
    vitals::{DynamicVitals, FeatureVector, ForecastEntry, RiskLabel, Snapshot, StaticAttributes},
};

use crate::{
    sampling::{round2, SampleGenerator, BLOOD_PRESSURE, HEART_RATE, ST_DEPRESSION},
    traits::Classifier,
};

/// A future offset and the factor its spread is widened by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Horizon {
    pub minutes: u32,
    pub scale: f64,
}

/// The fixed forecast horizons, nearest first.
pub const HORIZONS: [Horizon; 4] = [
    Horizon { minutes: 30, scale: 2.0 },
    Horizon { minutes: 360, scale: 3.0 },
    Horizon { minutes: 1440, scale: 4.0 },
    Horizon { minutes: 2880, scale: 5.0 },
];

/// Base spreads for projections, before the horizon scale is applied.
///
/// Heart rate projects with a tighter spread than the per-tick draw (8 vs
/// 30 BPM).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastSpread {
    pub trestbps: f64,
    pub thalach: f64,
    pub oldpeak: f64,
}

pub const FORECAST_SPREAD: ForecastSpread = ForecastSpread {
    trestbps: 5.0,
    thalach: 8.0,
    oldpeak: 0.5,
};

/// Render an offset as `+{m}min`, `+{h}h`, or `+{d}d` using floor division.
pub fn horizon_label(minutes: u32) -> String {
    if minutes < 60 {
        format!("+{}min", minutes)
    } else if minutes < 1440 {
        format!("+{}h", minutes / 60)
    } else {
        format!("+{}d", minutes / 1440)
    }
}

/// Project every horizon from `base` and classify each projection.
///
/// Fails on the first classifier error; no partial list is returned.
pub fn project<R: Rng>(
    generator: &mut SampleGenerator<R>,
    base: &Snapshot,
    attrs: &StaticAttributes,
    classifier: &dyn Classifier,
) -> CardioResult<Vec<ForecastEntry>> {
    HORIZONS
        .iter()
        .map(|horizon| project_horizon(generator, horizon, base, attrs, classifier))
        .collect()
}

fn project_horizon<R: Rng>(
    generator: &mut SampleGenerator<R>,
    horizon: &Horizon,
    base: &Snapshot,
    attrs: &StaticAttributes,
    classifier: &dyn Classifier,
) -> CardioResult<ForecastEntry> {
    let trestbps = generator.draw(
        &BLOOD_PRESSURE,
        base.trestbps as f64,
        FORECAST_SPREAD.trestbps * horizon.scale,
    ) as i64;
    let thalach = generator.draw(
        &HEART_RATE,
        base.thalach as f64,
        FORECAST_SPREAD.thalach * horizon.scale,
    ) as i64;
    let oldpeak = round2(generator.draw(
        &ST_DEPRESSION,
        base.oldpeak,
        FORECAST_SPREAD.oldpeak * horizon.scale,
    ));

    let features = FeatureVector::assemble(
        attrs,
        &DynamicVitals {
            trestbps: trestbps as f64,
            chol: base.chol as f64,
            thalach: thalach as f64,
            exang: base.exang as f64,
            oldpeak,
        },
    );
    let class = classifier.predict(&features)?;

    Ok(ForecastEntry {
        time: horizon_label(horizon.minutes),
        trestbps,
        thalach,
        oldpeak,
        prediction: RiskLabel::from_class(class),
    })
}
