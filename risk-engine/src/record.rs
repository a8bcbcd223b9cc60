//! Prediction records handed to the persistence layer
//!
//! Field names match the transaction log the dashboard already reads, so a
//! record can be appended without translation.

use crate::normalize::RawAttempt;
use crate::types::{RiskTier, RiskVerdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Verdict plus the attempt fields as the caller sent them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Record identifier
    pub id: Uuid,

    /// Original attempt fields
    #[serde(flatten)]
    pub attempt: RawAttempt,

    /// Success probability in percent
    pub success_prob: f64,

    /// Risk tier
    pub status: RiskTier,

    /// Explanation
    pub reason: String,

    /// When the verdict was produced
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    /// Pair a verdict with the attempt that produced it
    pub fn new(attempt: RawAttempt, verdict: &RiskVerdict) -> Self {
        Self {
            id: Uuid::new_v4(),
            attempt,
            success_prob: verdict.success_probability,
            status: verdict.risk_tier,
            reason: verdict.reason.clone(),
            created_at: Utc::now(),
        }
    }
}
