use std::io::{self, Write};

use serde::Serialize;
use sigdet_core::{ResponseValue, TrialKind, TrialOutcome};

use crate::config::ExperimentConfig;

/// Everything the analysis side needs to reproduce a run: who, how the trial
/// order was seeded, the configuration, and the ordered outcome log.
#[derive(Debug, Serialize)]
pub struct RunRecord<'a> {
    pub participant: &'a str,
    pub seed: Option<u64>,
    pub config: &'a ExperimentConfig,
    pub outcomes: &'a [TrialOutcome],
}

pub fn write_json<W: Write>(writer: W, record: &RunRecord) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, record)
}

/// One row per trial in a stable delimited format. Detection and rating
/// columns are both present; the one the phase did not collect stays empty.
///
/// The participant id is interpolated into every row, so an id that carries
/// the delimiter or a line break is rejected rather than quietly misaligning
/// the columns.
pub fn write_csv<W: Write>(
    mut writer: W,
    participant: &str,
    outcomes: &[TrialOutcome],
) -> io::Result<()> {
    if participant.is_empty() || participant.contains([',', '\n', '\r']) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("participant id {participant:?} would break the delimited format"),
        ));
    }
    writeln!(
        writer,
        "participant,trial_index,kind,present,heard,confidence,reliance,response_latency_ms,timing_reliable"
    )?;
    for outcome in outcomes {
        let kind = match outcome.kind {
            TrialKind::Practice => "practice",
            TrialKind::Main => "main",
        };
        let (heard, confidence, reliance) = match outcome.response {
            ResponseValue::Detection { heard } => (heard.to_string(), String::new(), String::new()),
            ResponseValue::Ratings {
                confidence,
                reliance,
            } => (String::new(), confidence.to_string(), reliance.to_string()),
        };
        writeln!(
            writer,
            "{participant},{},{kind},{},{heard},{confidence},{reliance},{:.3},{}",
            outcome.trial_index,
            outcome.present,
            outcome.response_latency_ms,
            outcome.timing_reliable,
        )?;
    }
    Ok(())
}
