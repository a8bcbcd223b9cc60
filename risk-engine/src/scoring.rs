//! Risk scoring engine

use crate::classify;
use crate::config::ScoringTables;
use crate::noise::{NoiseSource, ThreadRngNoise};
use crate::normalize::{self, Clock, RawAttempt, SystemClock};
use crate::types::{Assessment, RiskVerdict, ScoreBreakdown, TransactionAttempt};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Sum the bank baseline and each factor's independent delta
pub fn weigh(attempt: &TransactionAttempt, tables: &ScoringTables) -> ScoreBreakdown {
    let bank_baseline = match tables.banks.lookup(&attempt.bank) {
        Some(score) => score,
        None => {
            debug!(bank = %attempt.bank, "Unknown bank, using default baseline");
            tables.banks.default_baseline
        }
    };

    ScoreBreakdown {
        bank_baseline,
        method: tables.method.delta(attempt.method),
        amount: tables.amount.delta(attempt.amount),
        network: tables.network.delta(attempt.network),
        time_of_day: tables.time_of_day.delta(attempt.time_of_day),
        retries: tables.history.retry_delta(attempt.retries),
        past_failures: tables.history.failure_delta(attempt.past_failures),
    }
}

/// Risk scorer
///
/// Cheap to clone and safe to share across threads: tables are read-only and
/// the default noise source keeps its state per thread.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    tables: Arc<ScoringTables>,
    noise: Arc<dyn NoiseSource>,
    clock: Arc<dyn Clock>,
}

impl RiskScorer {
    /// Create a scorer with thread-local noise and the local wall clock
    pub fn new(tables: Arc<ScoringTables>) -> Self {
        Self {
            tables,
            noise: Arc::new(ThreadRngNoise),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the noise source
    pub fn with_noise(mut self, noise: impl NoiseSource + 'static) -> Self {
        self.noise = Arc::new(noise);
        self
    }

    /// Replace the clock used when a payload has no usable time of day
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Scoring tables in use
    pub fn tables(&self) -> &ScoringTables {
        &self.tables
    }

    /// Normalize a payload view
    pub fn normalize(&self, raw: &RawAttempt) -> TransactionAttempt {
        normalize::normalize(raw, &self.tables, self.clock.as_ref())
    }

    /// Score an already normalized attempt, keeping the full trace
    pub fn assess(&self, attempt: TransactionAttempt) -> Assessment {
        let breakdown = weigh(&attempt, &self.tables);
        let noise = self.noise.draw(self.tables.noise.min, self.tables.noise.max);
        let noised = breakdown.total().saturating_add(noise);
        let verdict = classify::verdict(noised, &attempt, &self.tables);

        debug!(
            bank = %attempt.bank,
            method = %attempt.method,
            base_score = breakdown.total(),
            noise,
            success_probability = verdict.success_probability,
            risk_tier = %verdict.risk_tier,
            "Attempt scored"
        );

        Assessment {
            attempt,
            breakdown,
            noise,
            verdict,
        }
    }

    /// Normalize and score a payload view
    pub fn predict(&self, raw: &RawAttempt) -> RiskVerdict {
        self.assess(self.normalize(raw)).verdict
    }

    /// Normalize and score an arbitrary JSON payload
    pub fn predict_json(&self, payload: &Value) -> RiskVerdict {
        self.predict(&RawAttempt::from_json(payload))
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(Arc::new(ScoringTables::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{FixedNoise, ScriptedNoise};
    use crate::normalize::FixedClock;
    use crate::types::RiskTier;
    use serde_json::json;

    fn quiet_scorer() -> RiskScorer {
        RiskScorer::default()
            .with_noise(FixedNoise(0))
            .with_clock(FixedClock(13))
    }

    #[test]
    fn test_best_case_breakdown() {
        let scorer = quiet_scorer();
        let attempt = scorer.normalize(&RawAttempt::from_json(&json!({
            "method": "upi",
            "bank": "HDFC",
            "amount": 500,
            "network": "fast",
            "time_of_day": "Morning",
        })));

        let assessment = scorer.assess(attempt);
        assert_eq!(assessment.breakdown.bank_baseline, 92);
        assert_eq!(assessment.breakdown.total(), 115);
        assert_eq!(assessment.noise, 0);
        assert_eq!(assessment.verdict.success_probability, 95.0);
        assert_eq!(assessment.verdict.risk_tier, RiskTier::LowRisk);
    }

    #[test]
    fn test_unknown_bank_uses_default_baseline() {
        let scorer = quiet_scorer();
        let attempt = scorer.normalize(&RawAttempt::from_json(&json!({ "bank": "Acme Bank" })));
        assert_eq!(weigh(&attempt, scorer.tables()).bank_baseline, 85);
    }

    #[test]
    fn test_factors_are_independent() {
        let scorer = quiet_scorer();
        let base = scorer.normalize(&RawAttempt::from_json(&json!({ "bank": "ICICI" })));
        let card = TransactionAttempt {
            method: crate::types::PaymentMethod::Card,
            ..base.clone()
        };

        let delta = weigh(&card, scorer.tables()).total() - weigh(&base, scorer.tables()).total();
        assert_eq!(delta, -5);
    }

    #[test]
    fn test_noise_is_applied_before_classification() {
        // Empty payload at 13:00: 85 (SBI) + 8 (amount 0) = 93
        let scorer = RiskScorer::default()
            .with_noise(ScriptedNoise::new(vec![-10, 10]))
            .with_clock(FixedClock(13));

        let low = scorer.predict_json(&json!({ "retries": 2, "past_failures": 4, "network": "slow" }));
        // 93 - 10 - 30 - 15 - 10 = 28
        assert_eq!(low.success_probability, 28.0);
        assert_eq!(low.risk_tier, RiskTier::HighRisk);

        let high = scorer.predict_json(&json!({ "retries": 2, "past_failures": 4, "network": "slow" }));
        assert_eq!(high.success_probability, 48.0);
        assert_eq!(high.risk_tier, RiskTier::MediumRisk);
    }
}
