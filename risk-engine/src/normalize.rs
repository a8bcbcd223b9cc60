//! Input normalization
//!
//! Turns loosely typed, possibly missing payload fields into a canonical
//! [`TransactionAttempt`]. Nothing here fails: malformed values fall back to
//! documented defaults.

use crate::config::ScoringTables;
use crate::types::{NetworkTier, PaymentMethod, TimeOfDay, TransactionAttempt};
use chrono::Timelike;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Network keywords, checked in order; the first substring hit wins
pub const NETWORK_RULES: &[(&str, NetworkTier)] = &[
    ("fast", NetworkTier::Fast),
    ("average", NetworkTier::Average),
    ("slow", NetworkTier::Slow),
];

/// Time of day keywords, checked in order; the first substring hit wins.
///
/// `late` must stay ahead of `night` so that "late night" is not read as
/// plain night.
pub const TIME_OF_DAY_RULES: &[(&str, TimeOfDay)] = &[
    ("morn", TimeOfDay::Morning),
    ("after", TimeOfDay::Afternoon),
    ("even", TimeOfDay::Evening),
    ("late", TimeOfDay::LateNight),
    ("night", TimeOfDay::Night),
];

/// Source of the current local hour, used when a payload has no usable
/// time of day
pub trait Clock: Send + Sync + fmt::Debug {
    /// Hour of the day in 0..24
    fn current_hour(&self) -> u32;
}

/// Local wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_hour(&self) -> u32 {
        chrono::Local::now().hour()
    }
}

/// Clock pinned to one hour
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn current_hour(&self) -> u32 {
        self.0 % 24
    }
}

/// Payload view of an attempt, as received from a caller
///
/// Each field keeps the raw JSON value. Synonyms are resolved when the view
/// is built; the first key present wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawAttempt {
    /// `method`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<Value>,
    /// `bank`, `bank_name` or `bankCode`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<Value>,
    /// `amount` or `amt`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
    /// `network` or `network_speed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Value>,
    /// `time_of_day`, `timeOfDay` or `timeofday`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<Value>,
    /// `retries`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<Value>,
    /// `past_failures` or `pastFailures`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub past_failures: Option<Value>,
}

fn pick(object: &Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
        .cloned()
}

impl RawAttempt {
    /// Build from an arbitrary JSON payload; non-objects read as empty
    pub fn from_json(payload: &Value) -> Self {
        let Some(object) = payload.as_object() else {
            return Self::default();
        };

        Self {
            method: pick(object, &["method"]),
            bank: pick(object, &["bank", "bank_name", "bankCode"]),
            amount: pick(object, &["amount", "amt"]),
            network: pick(object, &["network", "network_speed"]),
            time_of_day: pick(object, &["time_of_day", "timeOfDay", "timeofday"]),
            retries: pick(object, &["retries"]),
            past_failures: pick(object, &["past_failures", "pastFailures"]),
        }
    }
}

impl<'de> Deserialize<'de> for RawAttempt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let payload = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&payload))
    }
}

impl From<&TransactionAttempt> for RawAttempt {
    fn from(attempt: &TransactionAttempt) -> Self {
        Self {
            method: Some(Value::from(attempt.method.as_str())),
            bank: Some(Value::from(attempt.bank.clone())),
            amount: Some(Value::from(attempt.amount.normalize().to_string())),
            network: Some(Value::from(attempt.network.as_str())),
            time_of_day: Some(Value::from(attempt.time_of_day.as_str())),
            retries: Some(Value::from(attempt.retries)),
            past_failures: Some(Value::from(attempt.past_failures)),
        }
    }
}

/// Normalize a payload view into a canonical attempt
pub fn normalize(raw: &RawAttempt, tables: &ScoringTables, clock: &dyn Clock) -> TransactionAttempt {
    TransactionAttempt {
        method: normalize_method(raw.method.as_ref()),
        bank: normalize_bank(raw.bank.as_ref(), &tables.banks.default_bank),
        amount: parse_amount(raw.amount.as_ref()),
        network: classify_network(raw.network.as_ref()),
        time_of_day: classify_time_of_day(raw.time_of_day.as_ref(), clock),
        retries: parse_count(raw.retries.as_ref(), "retries"),
        past_failures: parse_count(raw.past_failures.as_ref(), "past_failures"),
    }
}

/// Text form of a scalar; objects, arrays, booleans and null have none
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Non-empty text, before trimming
fn present(value: Option<&Value>) -> Option<String> {
    text(value).filter(|s| !s.is_empty())
}

/// Exact match on card/wallet/other; everything else behaves as UPI
pub fn normalize_method(value: Option<&Value>) -> PaymentMethod {
    match present(value).map(|s| s.trim().to_lowercase()).as_deref() {
        Some("card") => PaymentMethod::Card,
        Some("wallet") => PaymentMethod::Wallet,
        Some("other") => PaymentMethod::Other,
        _ => PaymentMethod::Upi,
    }
}

/// Trim and uppercase; empty or absent becomes `default_bank`
pub fn normalize_bank(value: Option<&Value>, default_bank: &str) -> String {
    let bank = text(value).map(|s| s.trim().to_uppercase()).unwrap_or_default();
    if bank.is_empty() {
        default_bank.to_string()
    } else {
        bank
    }
}

/// Parse an amount; anything unusable, negative or NaN becomes zero.
/// Positive infinity saturates to `Decimal::MAX`.
pub fn parse_amount(value: Option<&Value>) -> Decimal {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_u64().map(Decimal::from))
            .or_else(|| n.as_f64().and_then(decimal_from_f64)),
        Some(Value::String(s)) => parse_decimal_text(s.trim()),
        _ => None,
    };

    match parsed {
        Some(amount) if !amount.is_sign_negative() => amount,
        Some(amount) if amount.is_zero() => Decimal::ZERO,
        _ => {
            if value.is_some() {
                debug!(amount = ?value, "Unusable amount, defaulting to 0");
            }
            Decimal::ZERO
        }
    }
}

fn parse_decimal_text(s: &str) -> Option<Decimal> {
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
        .or_else(|| s.parse::<f64>().ok().and_then(decimal_from_f64))
}

/// NaN has no value; infinities and magnitudes beyond `Decimal` saturate
fn decimal_from_f64(f: f64) -> Option<Decimal> {
    if f.is_nan() {
        return None;
    }
    Decimal::from_f64(f).or(Some(if f > 0.0 { Decimal::MAX } else { Decimal::MIN }))
}

/// Parse a non-negative count; fractions truncate, anything else is zero
pub fn parse_count(value: Option<&Value>, field: &str) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
            .or_else(|| n.as_i64().map(|_| 0))
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.trunc() as u32)
            }),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
                .or_else(|| s.parse::<i64>().ok().map(|_| 0))
        }
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        if value.is_some() {
            debug!(field, value = ?value, "Unusable count, defaulting to 0");
        }
        0
    })
}

fn first_match<T: Copy>(text: &str, rules: &[(&str, T)]) -> Option<T> {
    rules
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, category)| *category)
}

/// Classify a network descriptor; absent or empty reads as average
pub fn classify_network(value: Option<&Value>) -> NetworkTier {
    match present(value) {
        None => NetworkTier::Average,
        Some(s) => first_match(&s.trim().to_lowercase(), NETWORK_RULES).unwrap_or(NetworkTier::Unknown),
    }
}

/// Classify a time of day descriptor, deriving it from the clock when the
/// descriptor is absent or matches no keyword
pub fn classify_time_of_day(value: Option<&Value>, clock: &dyn Clock) -> TimeOfDay {
    if let Some(tod) = present(value).and_then(|s| first_match(&s.trim().to_lowercase(), TIME_OF_DAY_RULES)) {
        return tod;
    }

    let hour = clock.current_hour();
    let tod = time_of_day_from_hour(hour);
    debug!(hour, time_of_day = %tod, "Derived time of day from clock");
    tod
}

/// Fixed hour boundaries: [6,11) [11,16) [16,21) [21,24) and the rest
pub fn time_of_day_from_hour(hour: u32) -> TimeOfDay {
    match hour {
        6..=10 => TimeOfDay::Morning,
        11..=15 => TimeOfDay::Afternoon,
        16..=20 => TimeOfDay::Evening,
        21..=23 => TimeOfDay::Night,
        _ => TimeOfDay::LateNight,
    }
}
