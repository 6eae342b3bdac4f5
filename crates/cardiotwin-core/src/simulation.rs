//! The simulation loop: the background step runner.
//!
//! Each active tick runs the pipeline
//!
//!   Sample → Smooth → Publish vitals → Alerts → Classify → Forecast
//!
//! as one critical section on the store's data lock. Readers observe either
//! the snapshot from before the tick or the one after it, never a mix.
//!
//! While the running flag is clear the loop only sleeps and re-checks.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use rand::{rngs::StdRng, Rng};
use tracing::{debug, info, warn};

use cardiotwin_alerts::evaluate;
use cardiotwin_contracts::{
    error::CardioResult,
    vitals::{FeatureVector, ForecastEntry, RiskLabel},
};

use crate::{
    config::SimulationConfig,
    forecast::project,
    sampling::{round2, SampleGenerator, BLOOD_PRESSURE, CHOLESTEROL, HEART_RATE, ST_DEPRESSION},
    smoothing::{smooth, PreviousValues},
    store::{DataSection, StateStore},
    traits::Classifier,
};

/// What a call to [`Simulator::tick`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The running flag is clear; nothing was sampled or published.
    Paused,

    /// A new snapshot was published.
    Published {
        /// The risk label now on the snapshot (`Error` if the classifier failed).
        label: RiskLabel,
        /// Alerts appended to the log by this tick.
        alerts_raised: usize,
        /// Whether the forecast list was replaced.
        forecast_updated: bool,
    },
}

/// Drives the store forward one tick at a time.
///
/// One simulator exists per process. It owns its random generator; the store
/// and classifier are shared.
pub struct Simulator<R = StdRng> {
    store: Arc<StateStore>,
    classifier: Arc<dyn Classifier>,
    config: SimulationConfig,
    generator: SampleGenerator<R>,
}

impl Simulator<StdRng> {
    /// Create a simulator seeded from `config.seed`, or from entropy.
    pub fn new(store: Arc<StateStore>, classifier: Arc<dyn Classifier>, config: SimulationConfig) -> Self {
        let generator = SampleGenerator::new(config.seed);
        Self {
            store,
            classifier,
            config,
            generator,
        }
    }
}

impl<R: Rng> Simulator<R> {
    /// Create a simulator drawing from a caller-supplied generator.
    pub fn with_generator(
        store: Arc<StateStore>,
        classifier: Arc<dyn Classifier>,
        config: SimulationConfig,
        generator: SampleGenerator<R>,
    ) -> Self {
        Self {
            store,
            classifier,
            config,
            generator,
        }
    }

    /// Execute one tick.
    ///
    /// # Pipeline
    ///
    /// 1. Draw raw candidates for blood pressure, heart rate, ST depression
    /// 2. Smooth each against its previous value and remember the result
    /// 3. Hold cholesterol constant, draw the angina flag
    /// 4. Evaluate thresholds on the updated snapshot and append alerts
    /// 5. Classify the current reading and set the risk label
    /// 6. Project the forecast horizons and replace the forecast list
    ///
    /// A classifier failure in step 5 or 6 sets the label to `Error` and
    /// leaves the previous forecast list in place. The tick never fails.
    pub fn tick(&mut self) -> TickOutcome {
        let mut data = self.store.lock_data();
        if !data.running {
            return TickOutcome::Paused;
        }

        // ── Steps 1–3: sample, smooth, publish vitals ────────────────────────
        let raw = self.generator.raw_reading();
        let previous = data.previous;
        let trestbps = smooth(
            raw.trestbps as f64,
            previous.trestbps as f64,
            BLOOD_PRESSURE.max_step,
        ) as i64;
        let thalach = smooth(
            raw.thalach as f64,
            previous.thalach as f64,
            HEART_RATE.max_step,
        ) as i64;
        let oldpeak = round2(smooth(raw.oldpeak, previous.oldpeak, ST_DEPRESSION.max_step));

        data.previous = PreviousValues {
            trestbps,
            thalach,
            oldpeak,
        };
        data.snapshot.trestbps = trestbps;
        data.snapshot.thalach = thalach;
        data.snapshot.oldpeak = oldpeak;
        data.snapshot.chol = CHOLESTEROL;
        data.snapshot.exang = self.generator.angina();

        // ── Step 4: alerts, evaluated while the data section is held ─────────
        let alerts_raised = if self.config.features.alerts {
            let mut section = self.store.lock_alerts();
            let fired = evaluate(&data.snapshot, &section.thresholds);
            let raised = fired.len();
            if raised > 0 {
                let total = section.log.append(fired);
                debug!(raised, total, "threshold alerts appended");
            }
            raised
        } else {
            0
        };

        // ── Steps 5–6: classify and forecast ─────────────────────────────────
        let (label, forecast_updated) =
            match classify_and_project(&mut self.generator, &data, self.classifier.as_ref(), &self.config) {
                Ok((label, forecast)) => {
                    let updated = forecast.is_some();
                    if let Some(entries) = forecast {
                        data.snapshot.future_predictions = entries;
                    }
                    (label, updated)
                }
                Err(e) => {
                    warn!(error = %e, "classifier failed during tick");
                    (RiskLabel::Error, false)
                }
            };
        data.snapshot.prediction = label;

        debug!(
            trestbps,
            thalach,
            oldpeak,
            exang = data.snapshot.exang,
            label = %label,
            alerts_raised,
            "tick published"
        );

        TickOutcome::Published {
            label,
            alerts_raised,
            forecast_updated,
        }
    }

    /// Run ticks forever, sleeping the tick interval after each published
    /// tick and the idle interval while paused.
    pub fn run(mut self) {
        info!(
            tick_interval_ms = self.config.tick_interval_ms,
            idle_poll_ms = self.config.idle_poll_ms,
            alerts = self.config.features.alerts,
            forecasting = self.config.features.forecasting,
            "simulation loop started"
        );

        let mut announced_pause = false;
        loop {
            match self.tick() {
                TickOutcome::Paused => {
                    if !announced_pause {
                        info!("simulation paused, waiting for start");
                        announced_pause = true;
                    }
                    thread::sleep(self.config.idle_poll());
                }
                TickOutcome::Published { .. } => {
                    thread::sleep(self.config.tick_interval());
                }
            }
        }
    }
}

impl<R: Rng + Send + 'static> Simulator<R> {
    /// Move the simulator onto its own named thread.
    ///
    /// The thread runs for the life of the process; there is no shutdown
    /// path other than process exit.
    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("cardiotwin-sim".to_string())
            .spawn(move || self.run())
    }
}

/// Steps 5 and 6 of the tick. Returns the new label and, when forecasting is
/// enabled, the replacement forecast list.
fn classify_and_project<R: Rng>(
    generator: &mut SampleGenerator<R>,
    data: &DataSection,
    classifier: &dyn Classifier,
    config: &SimulationConfig,
) -> CardioResult<(RiskLabel, Option<Vec<ForecastEntry>>)> {
    let features = FeatureVector::assemble(&data.attributes, &data.snapshot.dynamic_vitals());
    let label = RiskLabel::from_class(classifier.predict(&features)?);

    let forecast = if config.features.forecasting {
        Some(project(generator, &data.snapshot, &data.attributes, classifier)?)
    } else {
        None
    };
    Ok((label, forecast))
}
