//! Classification and explanation
//!
//! The tier is a pure function of the final clamped score, never of the
//! pre-noise base.

use crate::config::{ScoringTables, TierThresholds};
use crate::types::{NetworkTier, RiskTier, RiskVerdict, TransactionAttempt};

/// Summary for high risk attempts
pub const HIGH_RISK_REASON: &str = "Low chance; bank or network may fail";
/// Summary for medium risk attempts
pub const MEDIUM_RISK_REASON: &str = "Moderate chance; could fail during high load";
/// Summary for low risk attempts
pub const LOW_RISK_REASON: &str = "High chance of success";

const FACTOR_SEPARATOR: &str = " — ";
const CLAUSE_SEPARATOR: &str = "; ";

/// Clamp into `[floor, ceiling]` and round to one decimal
pub fn finalize_score(noised: i32, thresholds: &TierThresholds) -> f64 {
    let clamped = f64::from(noised).clamp(thresholds.floor, thresholds.ceiling);
    (clamped * 10.0).round() / 10.0
}

/// Map a final score to its tier
pub fn classify(score: f64, thresholds: &TierThresholds) -> RiskTier {
    if score < thresholds.high_risk_below {
        RiskTier::HighRisk
    } else if score < thresholds.medium_risk_below {
        RiskTier::MediumRisk
    } else {
        RiskTier::LowRisk
    }
}

/// Tier-level summary
pub fn base_reason(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::HighRisk => HIGH_RISK_REASON,
        RiskTier::MediumRisk => MEDIUM_RISK_REASON,
        RiskTier::LowRisk => LOW_RISK_REASON,
    }
}

/// Contextual clauses, in fixed order
pub fn contributing_factors(attempt: &TransactionAttempt, tables: &ScoringTables) -> Vec<String> {
    let mut factors = Vec::new();

    if tables.amount.is_high_value(attempt.amount) {
        factors.push("High transaction amount".to_string());
    }
    if attempt.retries >= 1 {
        factors.push(format!("{} retry attempt(s)", attempt.retries));
    }
    if attempt.past_failures >= 1 {
        factors.push(format!("{} past failure(s)", attempt.past_failures));
    }
    if attempt.network == NetworkTier::Slow {
        factors.push("Weak network".to_string());
    }
    if attempt.time_of_day.is_low_processing_window() {
        factors.push("Low processing window".to_string());
    }

    factors
}

/// Tier summary followed by any contributing factors
pub fn explain(tier: RiskTier, attempt: &TransactionAttempt, tables: &ScoringTables) -> String {
    let summary = base_reason(tier);
    let factors = contributing_factors(attempt, tables);
    if factors.is_empty() {
        summary.to_string()
    } else {
        format!("{}{}{}", summary, FACTOR_SEPARATOR, factors.join(CLAUSE_SEPARATOR))
    }
}

/// Build the verdict for a noised score
pub fn verdict(noised: i32, attempt: &TransactionAttempt, tables: &ScoringTables) -> RiskVerdict {
    let success_probability = finalize_score(noised, &tables.tiers);
    let risk_tier = classify(success_probability, &tables.tiers);

    RiskVerdict {
        success_probability,
        risk_tier,
        reason: explain(risk_tier, attempt, tables),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentMethod, TimeOfDay};
    use rust_decimal::Decimal;

    fn quiet_attempt() -> TransactionAttempt {
        TransactionAttempt {
            method: PaymentMethod::Upi,
            bank: "HDFC".to_string(),
            amount: Decimal::from(500),
            network: NetworkTier::Fast,
            time_of_day: TimeOfDay::Morning,
            retries: 0,
            past_failures: 0,
        }
    }

    #[test]
    fn test_clamping() {
        let t = TierThresholds::default();
        assert_eq!(finalize_score(115, &t), 95.0);
        assert_eq!(finalize_score(-7, &t), 5.0);
        assert_eq!(finalize_score(47, &t), 47.0);
    }

    #[test]
    fn test_tier_thresholds() {
        let t = TierThresholds::default();
        assert_eq!(classify(5.0, &t), RiskTier::HighRisk);
        assert_eq!(classify(29.9, &t), RiskTier::HighRisk);
        assert_eq!(classify(30.0, &t), RiskTier::MediumRisk);
        assert_eq!(classify(59.9, &t), RiskTier::MediumRisk);
        assert_eq!(classify(60.0, &t), RiskTier::LowRisk);
        assert_eq!(classify(95.0, &t), RiskTier::LowRisk);
    }

    #[test]
    fn test_reason_without_factors_has_no_separator() {
        let tables = ScoringTables::default();
        let reason = explain(RiskTier::LowRisk, &quiet_attempt(), &tables);
        assert_eq!(reason, "High chance of success");
    }

    #[test]
    fn test_reason_factor_order() {
        let tables = ScoringTables::default();
        let attempt = TransactionAttempt {
            amount: Decimal::from(20_000),
            network: NetworkTier::Slow,
            time_of_day: TimeOfDay::LateNight,
            retries: 2,
            past_failures: 4,
            ..quiet_attempt()
        };

        assert_eq!(
            explain(RiskTier::HighRisk, &attempt, &tables),
            "Low chance; bank or network may fail — High transaction amount; \
             2 retry attempt(s); 4 past failure(s); Weak network; Low processing window"
        );
    }

    #[test]
    fn test_single_factor() {
        let tables = ScoringTables::default();
        let attempt = TransactionAttempt {
            retries: 1,
            ..quiet_attempt()
        };
        assert_eq!(
            explain(RiskTier::MediumRisk, &attempt, &tables),
            "Moderate chance; could fail during high load — 1 retry attempt(s)"
        );
    }

    #[test]
    fn test_verdict_tier_follows_clamped_score() {
        let tables = ScoringTables::default();
        let v = verdict(29, &quiet_attempt(), &tables);
        assert_eq!(v.success_probability, 29.0);
        assert_eq!(v.risk_tier, RiskTier::HighRisk);

        let v = verdict(130, &quiet_attempt(), &tables);
        assert_eq!(v.success_probability, 95.0);
        assert_eq!(v.risk_tier, RiskTier::LowRisk);
    }
}
