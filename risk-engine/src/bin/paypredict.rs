//! PayPredict scoring driver
//!
//! Reads one JSON payload per line from stdin and writes one JSON verdict per
//! line to stdout. With `--records`, writes prediction records instead, ready
//! to append to the transaction log.
//!
//! Logs go to stderr at `info` by default. Per-factor scoring events are
//! emitted at `debug` by the library, so enable them with
//! `RUST_LOG=risk_engine=debug`. Set `PAYPREDICT_LOG_JSON=1` for JSON logs.

use anyhow::Result;
use risk_engine::{PredictionRecord, RawAttempt, RiskScorer, ScoringTables};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    if std::env::var("PAYPREDICT_LOG_JSON").as_deref() == Ok("1") {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Score one input line and write its output line. Non-JSON input is scored
/// like an empty payload.
fn score_line<W: Write>(scorer: &RiskScorer, line: &str, emit_records: bool, out: &mut W) -> Result<()> {
    let payload = serde_json::from_str::<Value>(line).unwrap_or_else(|e| {
        warn!(error = %e, "Payload is not JSON, scoring it as empty");
        Value::Null
    });
    let raw = RawAttempt::from_json(&payload);
    let verdict = scorer.predict(&raw);

    if emit_records {
        serde_json::to_writer(&mut *out, &PredictionRecord::new(raw, &verdict))?;
    } else {
        serde_json::to_writer(&mut *out, &verdict)?;
    }
    writeln!(out)?;
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let emit_records = std::env::args().skip(1).any(|arg| arg == "--records");

    let tables = Arc::new(ScoringTables::from_env()?);
    info!(
        banks = tables.banks.baselines.len(),
        noise_min = tables.noise.min,
        noise_max = tables.noise.max,
        "Scoring tables loaded"
    );
    let scorer = RiskScorer::new(tables);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut scored = 0u64;

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        score_line(&scorer, &line, emit_records, &mut out)?;
        scored += 1;
    }

    out.flush()?;
    info!(scored, "Input exhausted");
    Ok(())
}
