//! One collection run: settings → client → collector → stdout.
//!
//! [`run`] yields either every event of the run or a single error;
//! [`emit`] turns that result into lines on a writer and an [`Outcome`].
//! Together they guarantee that a failed run writes exactly one error event
//! and nothing else.

use crate::application::collectors::Collector;
use crate::config::AsmConfig;
use crate::domain::errors::CollectorError;
use crate::domain::events::ErrorEvent;
use crate::domain::ports::SettingsSource;
use crate::infrastructure::asm::AsmHttpClient;
use serde_json::Value;
use std::fmt;
use std::io::Write;
use tracing::{error, info};

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Succeeded => 0,
            Outcome::Failed => 1,
        }
    }
}

/// Resolve settings, build a client and run `collector` against the live API.
///
/// Configuration errors are returned before any request is made.
pub async fn run(
    collector: &dyn Collector,
    settings: &dyn SettingsSource,
) -> Result<Vec<Value>, CollectorError> {
    let config = AsmConfig::from_source(settings)?;
    info!(
        "Running {} against {} (timeout {:?}, proxy {})",
        collector.name(),
        config.base_url,
        config.timeout,
        if config.proxy.is_some() { "on" } else { "off" }
    );

    let client = AsmHttpClient::new(&config)?;
    collector.collect(&client, &config).await
}

/// Write the result of a run as JSON lines.
///
/// Success writes every event; failure writes one error event of type
/// `error_event_type`. A write failure on success is reported as a failed
/// run so the scheduler does not mistake a truncated batch for a clean one.
pub fn emit<W, E>(out: &mut W, error_event_type: &str, result: Result<Vec<Value>, E>) -> Outcome
where
    W: Write,
    E: fmt::Display,
{
    let (lines, outcome) = match result {
        Ok(events) => {
            info!("Emitting {} event(s)", events.len());
            (
                events.iter().map(Value::to_string).collect::<Vec<_>>(),
                Outcome::Succeeded,
            )
        }
        Err(err) => {
            error!("Collection failed: {:#}", err);
            (
                vec![ErrorEvent::new(error_event_type, err).to_line()],
                Outcome::Failed,
            )
        }
    };

    for line in &lines {
        if let Err(e) = writeln!(out, "{}", line) {
            error!("Failed to write event to stdout: {}", e);
            return Outcome::Failed;
        }
    }
    if let Err(e) = out.flush() {
        error!("Failed to flush stdout: {}", e);
        return Outcome::Failed;
    }

    outcome
}
