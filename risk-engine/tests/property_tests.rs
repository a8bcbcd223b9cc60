//! Property-based tests for scoring invariants
//!
//! - Bounds: success probability stays in [5, 95] with one decimal at most
//! - Consistency: tier is a function of the final score alone
//! - Stability: normalizing a normalized attempt changes nothing
//! - Degradation: non-numeric amounts score exactly like zero

use proptest::prelude::*;
use risk_engine::classify;
use risk_engine::normalize::{normalize, time_of_day_from_hour};
use risk_engine::{FixedClock, FixedNoise, RawAttempt, RiskScorer, RiskTier, ScoringTables};
use serde_json::{json, Value};

/// Strategy for method strings, recognized and not
fn method_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!("upi")),
        Just(json!("Card")),
        Just(json!(" WALLET ")),
        Just(json!("other")),
        Just(json!("netbanking")),
        Just(Value::Null),
        "[a-z]{0,8}".prop_map(Value::from),
    ]
}

/// Strategy for bank identifiers
fn bank_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!("hdfc")),
        Just(json!(" Axis ")),
        Just(json!("YESBANK")),
        Just(json!("")),
        Just(Value::Null),
        "[A-Za-z_ ]{0,12}".prop_map(Value::from),
    ]
}

/// Strategy for amounts as numbers, numeric strings and junk
fn amount_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        (0u64..100_000u64).prop_map(Value::from),
        (0.0f64..100_000.0f64).prop_map(Value::from),
        (0u64..100_000u64).prop_map(|v| Value::from(v.to_string())),
        (-100_000i64..0i64).prop_map(Value::from),
        "[a-z]{1,6}".prop_map(Value::from),
        Just(Value::Null),
    ]
}

/// Strategy for free-text network and time descriptors
fn descriptor_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!("fast")),
        Just(json!("Average")),
        Just(json!("slow 2g")),
        Just(json!("Morning")),
        Just(json!("late night")),
        Just(json!("night")),
        Just(json!("afternoon")),
        Just(json!("evening")),
        Just(Value::Null),
        "[a-z ]{0,12}".prop_map(Value::from),
    ]
}

/// Strategy for counts in the shapes callers actually send
fn count_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        (0u32..10u32).prop_map(Value::from),
        (0u32..10u32).prop_map(|v| Value::from(v.to_string())),
        (-5i64..0i64).prop_map(Value::from),
        "[a-z]{1,4}".prop_map(Value::from),
        Just(Value::Null),
    ]
}

/// Strategy for whole payloads
fn payload_strategy() -> impl Strategy<Value = Value> {
    (
        method_strategy(),
        bank_strategy(),
        amount_strategy(),
        descriptor_strategy(),
        descriptor_strategy(),
        count_strategy(),
        count_strategy(),
    )
        .prop_map(|(method, bank, amount, network, time_of_day, retries, past_failures)| {
            json!({
                "method": method,
                "bank": bank,
                "amount": amount,
                "network": network,
                "time_of_day": time_of_day,
                "retries": retries,
                "past_failures": past_failures,
            })
        })
}

fn tier_for(score: f64) -> RiskTier {
    if score < 30.0 {
        RiskTier::HighRisk
    } else if score < 60.0 {
        RiskTier::MediumRisk
    } else {
        RiskTier::LowRisk
    }
}

proptest! {
    /// Property: probability is clamped and carries at most one decimal
    #[test]
    fn probability_is_bounded(payload in payload_strategy(), hour in 0u32..24u32) {
        let scorer = RiskScorer::default().with_clock(FixedClock(hour));
        let verdict = scorer.predict_json(&payload);

        prop_assert!(verdict.success_probability >= 5.0);
        prop_assert!(verdict.success_probability <= 95.0);
        prop_assert_eq!((verdict.success_probability * 10.0).round() / 10.0, verdict.success_probability);
    }

    /// Property: tier agrees with the returned probability
    #[test]
    fn tier_matches_final_score(payload in payload_strategy()) {
        let verdict = RiskScorer::default().predict_json(&payload);
        prop_assert_eq!(verdict.risk_tier, tier_for(verdict.success_probability));
    }

    /// Property: clamping never reports certainty
    #[test]
    fn clamping_never_reports_certainty(noised in -1_000i32..1_000i32) {
        let tables = ScoringTables::default();
        let score = classify::finalize_score(noised, &tables.tiers);
        prop_assert!(score > 0.0 && score < 100.0);
    }

    /// Property: normalization is idempotent
    #[test]
    fn normalization_is_idempotent(payload in payload_strategy(), hour in 0u32..24u32) {
        let tables = ScoringTables::default();
        let clock = FixedClock(hour);

        let once = normalize(&RawAttempt::from_json(&payload), &tables, &clock);
        let twice = normalize(&RawAttempt::from(&once), &tables, &clock);
        prop_assert_eq!(once, twice);
    }

    /// Property: a non-numeric amount behaves exactly like zero
    #[test]
    fn junk_amount_equals_zero(junk in "[a-zA-Z]{1,10}", payload in payload_strategy()) {
        // float spellings such as "inf" still parse
        prop_assume!(junk.parse::<f64>().is_err());

        let scorer = RiskScorer::default()
            .with_noise(FixedNoise(0))
            .with_clock(FixedClock(9));

        let mut with_junk = payload.clone();
        with_junk["amount"] = Value::from(junk);
        let mut with_zero = payload;
        with_zero["amount"] = Value::from(0);

        prop_assert_eq!(scorer.predict_json(&with_junk), scorer.predict_json(&with_zero));
    }

    /// Property: every hour maps to exactly the documented window
    #[test]
    fn hour_windows_cover_the_day(hour in 0u32..24u32) {
        let expected = match hour {
            6..=10 => "Morning",
            11..=15 => "Afternoon",
            16..=20 => "Evening",
            21..=23 => "Night",
            _ => "Late Night",
        };
        prop_assert_eq!(time_of_day_from_hour(hour).as_str(), expected);
    }
}
