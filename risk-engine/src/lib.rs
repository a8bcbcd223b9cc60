//! Risk Engine for PayPredict
//!
//! Estimates the probability that a payment attempt succeeds and sorts it
//! into a risk tier with a human-readable reason.
//!
//! # Pipeline
//!
//! - **Normalize**: loosely typed payload fields become a canonical attempt
//! - **Weigh**: each factor adds a fixed delta to the bank baseline
//! - **Perturb**: bounded live-load noise from an injectable source
//! - **Classify**: clamp, round, tier, explanation
//!
//! Scoring never fails. Malformed input degrades to documented defaults.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod classify;
pub mod config;
pub mod error;
pub mod noise;
pub mod normalize;
pub mod record;
pub mod scoring;
pub mod types;

pub use config::ScoringTables;
pub use error::{Error, Result};
pub use noise::{FixedNoise, NoiseSource, ScriptedNoise, SeededNoise, ThreadRngNoise};
pub use normalize::{Clock, FixedClock, RawAttempt, SystemClock};
pub use record::PredictionRecord;
pub use scoring::RiskScorer;
pub use types::*;
