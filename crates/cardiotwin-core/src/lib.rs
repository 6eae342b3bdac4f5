//! # cardiotwin-core
//!
//! The simulation, inference, and alerting loop for CardioTwin.
//!
//! This crate provides:
//! - The `Classifier` trait the risk model is consumed through
//! - Sampling, smoothing, and forecast projection of simulated vitals
//! - The `StateStore` shared between the loop and the query surface
//! - The `Simulator` that advances the store one tick at a time
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cardiotwin_core::{Simulator, StateStore, config::SimulationConfig};
//!
//! let store = Arc::new(StateStore::default());
//! Simulator::new(store.clone(), classifier, SimulationConfig::default()).spawn()?;
//! store.start(attributes);
//! ```

pub mod config;
pub mod forecast;
pub mod sampling;
pub mod simulation;
pub mod smoothing;
pub mod store;
pub mod traits;

pub use simulation::{Simulator, TickOutcome};
pub use store::StateStore;
