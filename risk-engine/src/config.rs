//! Scoring tables: bank profile and factor adjustments
//!
//! Tables are built once at start-up, validated, and shared read-only
//! (typically behind an `Arc`) by every scorer.

use crate::types::{NetworkTier, PaymentMethod, TimeOfDay};
use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Environment variable naming a TOML tables file
pub const TABLES_PATH_ENV: &str = "PAYPREDICT_TABLES";

/// Allowed range for every factor delta and noise bound
pub const DELTA_RANGE: std::ops::RangeInclusive<i32> = -100..=100;

/// Complete set of scoring tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringTables {
    /// Per-bank base reliability scores
    pub banks: BankProfile,

    /// Method deltas
    pub method: MethodAdjustments,

    /// Amount bands
    pub amount: AmountBands,

    /// Network deltas
    pub network: NetworkAdjustments,

    /// Time of day deltas
    pub time_of_day: TimeOfDayAdjustments,

    /// Retry and past failure deltas
    pub history: HistoryAdjustments,

    /// Live-load noise range
    pub noise: NoiseRange,

    /// Clamp bounds and tier thresholds
    pub tiers: TierThresholds,
}

/// Bank base reliability scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankProfile {
    /// Identifier substituted when the caller gives no bank
    pub default_bank: String,

    /// Baseline for banks missing from `baselines`
    pub default_baseline: i32,

    /// Normalized (uppercase) identifier -> base score in [0, 100]
    pub baselines: BTreeMap<String, i32>,
}

impl Default for BankProfile {
    fn default() -> Self {
        let baselines = [
            ("HDFC", 92),
            ("AXIS", 90),
            ("ICICI", 88),
            ("IDFC", 87),
            ("SBI", 85),
            ("BOB", 83),
            ("PNB", 80),
            ("KOTAK", 86),
            ("CANARA", 82),
            ("YESBANK", 79),
        ]
        .into_iter()
        .map(|(bank, score)| (bank.to_string(), score))
        .collect();

        Self {
            default_bank: "SBI".to_string(),
            default_baseline: 85,
            baselines,
        }
    }
}

impl BankProfile {
    /// Baseline for a normalized bank identifier, if the bank is known
    pub fn lookup(&self, bank: &str) -> Option<i32> {
        self.baselines.get(bank).copied()
    }

    /// Baseline for a normalized bank identifier, falling back to the default
    pub fn baseline(&self, bank: &str) -> i32 {
        self.lookup(bank).unwrap_or(self.default_baseline)
    }
}

/// Payment method deltas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodAdjustments {
    /// UPI
    pub upi: i32,
    /// Card
    pub card: i32,
    /// Wallet
    pub wallet: i32,
    /// Other
    pub other: i32,
}

impl Default for MethodAdjustments {
    fn default() -> Self {
        Self {
            upi: 0,
            card: -5,
            wallet: -3,
            other: 0,
        }
    }
}

impl MethodAdjustments {
    /// Delta for a method
    pub fn delta(&self, method: PaymentMethod) -> i32 {
        match method {
            PaymentMethod::Upi => self.upi,
            PaymentMethod::Card => self.card,
            PaymentMethod::Wallet => self.wallet,
            PaymentMethod::Other => self.other,
        }
    }
}

/// Amount bands
///
/// `amount < small_limit` is small, `small_limit..=standard_limit` is
/// standard, `..=large_limit` is large, anything above is very large.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountBands {
    /// Exclusive upper bound of the small band
    pub small_limit: Decimal,
    /// Inclusive upper bound of the standard band
    pub standard_limit: Decimal,
    /// Inclusive upper bound of the large band
    pub large_limit: Decimal,
    /// Small band delta
    pub small: i32,
    /// Standard band delta
    pub standard: i32,
    /// Large band delta
    pub large: i32,
    /// Very large band delta
    pub very_large: i32,
}

impl Default for AmountBands {
    fn default() -> Self {
        Self {
            small_limit: Decimal::from(2_000),
            standard_limit: Decimal::from(5_000),
            large_limit: Decimal::from(15_000),
            small: 8,
            standard: 0,
            large: -10,
            very_large: -20,
        }
    }
}

impl AmountBands {
    /// Delta for an amount
    pub fn delta(&self, amount: Decimal) -> i32 {
        if amount < self.small_limit {
            self.small
        } else if amount <= self.standard_limit {
            self.standard
        } else if amount <= self.large_limit {
            self.large
        } else {
            self.very_large
        }
    }

    /// Amount falls in the very large band
    pub fn is_high_value(&self, amount: Decimal) -> bool {
        amount > self.large_limit
    }
}

/// Network tier deltas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkAdjustments {
    /// Fast
    pub fast: i32,
    /// Average
    pub average: i32,
    /// Slow
    pub slow: i32,
    /// Unrecognized descriptor
    pub unknown: i32,
}

impl Default for NetworkAdjustments {
    fn default() -> Self {
        Self {
            fast: 10,
            average: 0,
            slow: -15,
            unknown: -2,
        }
    }
}

impl NetworkAdjustments {
    /// Delta for a network tier
    pub fn delta(&self, tier: NetworkTier) -> i32 {
        match tier {
            NetworkTier::Fast => self.fast,
            NetworkTier::Average => self.average,
            NetworkTier::Slow => self.slow,
            NetworkTier::Unknown => self.unknown,
        }
    }
}

/// Time of day deltas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeOfDayAdjustments {
    /// Morning
    pub morning: i32,
    /// Afternoon
    pub afternoon: i32,
    /// Evening
    pub evening: i32,
    /// Night
    pub night: i32,
    /// Late night
    pub late_night: i32,
}

impl Default for TimeOfDayAdjustments {
    fn default() -> Self {
        Self {
            morning: 5,
            afternoon: 0,
            evening: -5,
            night: -10,
            late_night: -12,
        }
    }
}

impl TimeOfDayAdjustments {
    /// Delta for a time of day
    pub fn delta(&self, time_of_day: TimeOfDay) -> i32 {
        match time_of_day {
            TimeOfDay::Morning => self.morning,
            TimeOfDay::Afternoon => self.afternoon,
            TimeOfDay::Evening => self.evening,
            TimeOfDay::Night => self.night,
            TimeOfDay::LateNight => self.late_night,
        }
    }
}

/// Retry and past failure deltas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryAdjustments {
    /// Exactly one retry
    pub single_retry: i32,
    /// Two or more retries
    pub repeated_retries: i32,
    /// Failure count at which `repeated_failures` applies
    pub repeated_failure_threshold: u32,
    /// Applied when failures reach `repeated_failure_threshold`
    pub repeated_failures: i32,
    /// Failure count at which `chronic_failures` applies
    pub chronic_failure_threshold: u32,
    /// Applied on top of `repeated_failures` when failures reach
    /// `chronic_failure_threshold`
    pub chronic_failures: i32,
}

impl Default for HistoryAdjustments {
    fn default() -> Self {
        Self {
            single_retry: -5,
            repeated_retries: -10,
            repeated_failure_threshold: 2,
            repeated_failures: -10,
            chronic_failure_threshold: 4,
            chronic_failures: -20,
        }
    }
}

impl HistoryAdjustments {
    /// Delta for a retry count
    pub fn retry_delta(&self, retries: u32) -> i32 {
        match retries {
            0 => 0,
            1 => self.single_retry,
            _ => self.repeated_retries,
        }
    }

    /// Delta for a past failure count; both penalties stack
    pub fn failure_delta(&self, past_failures: u32) -> i32 {
        let mut delta = 0;
        if past_failures >= self.repeated_failure_threshold {
            delta += self.repeated_failures;
        }
        if past_failures >= self.chronic_failure_threshold {
            delta += self.chronic_failures;
        }
        delta
    }
}

/// Inclusive range of the live-load noise draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseRange {
    /// Lowest draw
    pub min: i32,
    /// Highest draw
    pub max: i32,
}

impl Default for NoiseRange {
    fn default() -> Self {
        Self { min: -10, max: 10 }
    }
}

/// Clamp bounds and tier thresholds, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    /// Lowest reportable probability
    pub floor: f64,
    /// Highest reportable probability
    pub ceiling: f64,
    /// Scores below this are high risk
    pub high_risk_below: f64,
    /// Scores below this (and not high risk) are medium risk
    pub medium_risk_below: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            floor: 5.0,
            ceiling: 95.0,
            high_risk_below: 30.0,
            medium_risk_below: 60.0,
        }
    }
}

impl ScoringTables {
    /// Load from a TOML file; sections left out keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let tables: ScoringTables = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse scoring tables: {}", e)))?;
        tables.validated()
    }

    /// Load the file named by `PAYPREDICT_TABLES`, or the built-in tables
    pub fn from_env() -> Result<Self> {
        match std::env::var(TABLES_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::info!(path = %path, "Loading scoring tables from file");
                Self::from_file(path.trim())
            }
            _ => Self::default().validated(),
        }
    }

    /// Every factor delta and noise bound, by table path
    fn deltas(&self) -> [(&'static str, i32); 23] {
        [
            ("method.upi", self.method.upi),
            ("method.card", self.method.card),
            ("method.wallet", self.method.wallet),
            ("method.other", self.method.other),
            ("amount.small", self.amount.small),
            ("amount.standard", self.amount.standard),
            ("amount.large", self.amount.large),
            ("amount.very_large", self.amount.very_large),
            ("network.fast", self.network.fast),
            ("network.average", self.network.average),
            ("network.slow", self.network.slow),
            ("network.unknown", self.network.unknown),
            ("time_of_day.morning", self.time_of_day.morning),
            ("time_of_day.afternoon", self.time_of_day.afternoon),
            ("time_of_day.evening", self.time_of_day.evening),
            ("time_of_day.night", self.time_of_day.night),
            ("time_of_day.late_night", self.time_of_day.late_night),
            ("history.single_retry", self.history.single_retry),
            ("history.repeated_retries", self.history.repeated_retries),
            ("history.repeated_failures", self.history.repeated_failures),
            ("history.chronic_failures", self.history.chronic_failures),
            ("noise.min", self.noise.min),
            ("noise.max", self.noise.max),
        ]
    }

    /// Normalize bank identifiers and check invariants
    pub fn validated(mut self) -> Result<Self> {
        self.banks.default_bank = self.banks.default_bank.trim().to_uppercase();
        if self.banks.default_bank.is_empty() {
            return Err(Error::InvalidConfig("default bank must not be empty".to_string()));
        }

        let mut baselines = BTreeMap::new();
        for (bank, score) in std::mem::take(&mut self.banks.baselines) {
            if !(0..=100).contains(&score) {
                return Err(Error::InvalidConfig(format!(
                    "baseline for {} is {}, expected 0..=100",
                    bank, score
                )));
            }
            baselines.insert(bank.trim().to_uppercase(), score);
        }
        self.banks.baselines = baselines;

        if !(0..=100).contains(&self.banks.default_baseline) {
            return Err(Error::InvalidConfig(format!(
                "default baseline is {}, expected 0..=100",
                self.banks.default_baseline
            )));
        }

        let bands = &self.amount;
        if bands.small_limit.is_sign_negative()
            || bands.small_limit > bands.standard_limit
            || bands.standard_limit > bands.large_limit
        {
            return Err(Error::InvalidConfig(format!(
                "amount bands must be non-negative and ascending, got {} / {} / {}",
                bands.small_limit, bands.standard_limit, bands.large_limit
            )));
        }

        let history = &self.history;
        if history.repeated_failure_threshold == 0
            || history.repeated_failure_threshold > history.chronic_failure_threshold
        {
            return Err(Error::InvalidConfig(format!(
                "failure thresholds must satisfy 0 < repeated ({}) <= chronic ({})",
                history.repeated_failure_threshold, history.chronic_failure_threshold
            )));
        }

        for (name, delta) in self.deltas() {
            if !DELTA_RANGE.contains(&delta) {
                return Err(Error::InvalidConfig(format!(
                    "{} delta is {}, expected {}..={}",
                    name,
                    delta,
                    DELTA_RANGE.start(),
                    DELTA_RANGE.end()
                )));
            }
        }

        if self.noise.min > self.noise.max {
            return Err(Error::InvalidConfig(format!(
                "noise range {}..={} is empty",
                self.noise.min, self.noise.max
            )));
        }

        let tiers = &self.tiers;
        let ordered = 0.0 < tiers.floor
            && tiers.floor < tiers.ceiling
            && tiers.ceiling < 100.0
            && tiers.high_risk_below <= tiers.medium_risk_below;
        if !ordered {
            return Err(Error::InvalidConfig(format!(
                "tiers must satisfy 0 < floor ({}) < ceiling ({}) < 100 and high ({}) <= medium ({})",
                tiers.floor, tiers.ceiling, tiers.high_risk_below, tiers.medium_risk_below
            )));
        }

        Ok(self)
    }
}
