//! Core types for risk engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment method of an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Unified Payments Interface (also the fallback for unrecognized methods)
    Upi,
    /// Debit or credit card
    Card,
    /// Prepaid wallet
    Wallet,
    /// Any other explicitly declared method
    Other,
}

impl PaymentMethod {
    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Upi => "upi",
            PaymentMethod::Card => "card",
            PaymentMethod::Wallet => "wallet",
            PaymentMethod::Other => "other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network quality tier derived from a free-text descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkTier {
    /// Fast connection
    Fast,
    /// Average connection
    Average,
    /// Slow connection
    Slow,
    /// Descriptor matched no keyword
    Unknown,
}

impl NetworkTier {
    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkTier::Fast => "fast",
            NetworkTier::Average => "average",
            NetworkTier::Slow => "slow",
            NetworkTier::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NetworkTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing window of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    /// [06:00, 11:00)
    Morning,
    /// [11:00, 16:00)
    Afternoon,
    /// [16:00, 21:00)
    Evening,
    /// [21:00, 24:00)
    Night,
    /// [00:00, 06:00)
    #[serde(rename = "Late Night")]
    LateNight,
}

impl TimeOfDay {
    /// Display label, e.g. `"Late Night"`
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
            TimeOfDay::LateNight => "Late Night",
        }
    }

    /// Night and late night are low processing windows
    pub fn is_low_processing_window(&self) -> bool {
        matches!(self, TimeOfDay::Night | TimeOfDay::LateNight)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk tier derived from the final clamped score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskTier {
    /// Score at or above the medium threshold
    LowRisk,
    /// Score between the high and medium thresholds
    MediumRisk,
    /// Score below the high threshold
    HighRisk,
}

impl RiskTier {
    /// Wire name, e.g. `"high-risk"`
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::LowRisk => "low-risk",
            RiskTier::MediumRisk => "medium-risk",
            RiskTier::HighRisk => "high-risk",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical, fully normalized payment attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAttempt {
    /// Payment method
    pub method: PaymentMethod,

    /// Bank identifier, trimmed and uppercased
    pub bank: String,

    /// Amount in currency units, never negative
    pub amount: Decimal,

    /// Network tier
    pub network: NetworkTier,

    /// Processing window
    pub time_of_day: TimeOfDay,

    /// Retry attempts so far
    pub retries: u32,

    /// Prior failures for this payer/context
    pub past_failures: u32,
}

/// Per-factor contributions to the pre-noise score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Bank base reliability score
    pub bank_baseline: i32,
    /// Method delta
    pub method: i32,
    /// Amount band delta
    pub amount: i32,
    /// Network delta
    pub network: i32,
    /// Time of day delta
    pub time_of_day: i32,
    /// Retry delta
    pub retries: i32,
    /// Past failure delta (stacked)
    pub past_failures: i32,
}

impl ScoreBreakdown {
    /// Weighted base score before noise
    pub fn total(&self) -> i32 {
        [
            self.method,
            self.amount,
            self.network,
            self.time_of_day,
            self.retries,
            self.past_failures,
        ]
        .into_iter()
        .fold(self.bank_baseline, i32::saturating_add)
    }
}

/// Risk verdict returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskVerdict {
    /// Success probability in percent, clamped and rounded to one decimal
    pub success_probability: f64,

    /// Risk tier
    pub risk_tier: RiskTier,

    /// Tier summary plus contributing factors
    pub reason: String,
}

/// Full trace of one scoring call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Normalized attempt that was scored
    pub attempt: TransactionAttempt,

    /// Factor deltas
    pub breakdown: ScoreBreakdown,

    /// Live-load noise drawn for this call
    pub noise: i32,

    /// Final verdict
    pub verdict: RiskVerdict,
}
