use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;
use crate::metadata::Metadata;

/// JSON document printed for every successful command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub data: Value,
    pub meta: Metadata,
}

pub fn render(envelope: &Envelope, pretty: bool) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    write_envelope(&mut stdout.lock(), envelope, pretty)
}

fn write_envelope<W: Write>(
    out: &mut W,
    envelope: &Envelope,
    pretty: bool,
) -> Result<(), CliError> {
    writeln!(out, "{}", to_json(envelope, pretty)?)?;
    out.flush()?;
    Ok(())
}

fn to_json(envelope: &Envelope, pretty: bool) -> Result<String, CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(envelope)?
    } else {
        serde_json::to_string(envelope)?
    };
    Ok(payload)
}
