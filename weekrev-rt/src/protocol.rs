//! Parser for RT REST 1.0 search responses.
//!
//! The endpoint speaks a line-oriented text format: an `RT/<version>
//! <code> <text>` status line, a blank line, then one `Name: value`
//! block per ticket with blocks separated by `--` lines. Multi-line
//! values continue on indented lines.

use anyhow::{Context as _, Result};
use weekrev_sdk::TicketRecord;

const NO_MATCHES: &str = "No matching results.";
const RECORD_SEPARATOR: &str = "--";

pub fn parse_search_response(body: &str) -> Result<Vec<TicketRecord>> {
    let mut lines = body.lines();
    let status = lines.next().context("empty response from tracker")?;
    check_status_line(status)?;

    let rest = lines.collect::<Vec<_>>().join("\n");
    let rest = rest.trim();
    if rest.is_empty() || rest == NO_MATCHES {
        return Ok(Vec::new());
    }

    Ok(rest
        .split('\n')
        .collect::<Vec<_>>()
        .split(|line| line.trim_end() == RECORD_SEPARATOR)
        .filter_map(parse_record)
        .collect())
}

/// The HTTP layer reports 200 even for protocol errors; the real status
/// lives in the first body line.
fn check_status_line(line: &str) -> Result<()> {
    let mut parts = line.split_whitespace();
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("RT/") {
        anyhow::bail!("unrecognized tracker response: {}", line.trim());
    }

    let code = parts.next().unwrap_or_default();
    if code != "200" {
        let text = parts.collect::<Vec<_>>().join(" ");
        anyhow::bail!("tracker returned {} {}", code, text);
    }

    Ok(())
}

fn parse_record(lines: &[&str]) -> Option<TicketRecord> {
    let mut record = TicketRecord::new();
    let mut current: Option<(String, String)> = None;

    for line in lines {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            // Continuation of the previous field's value.
            if let Some((_, value)) = current.as_mut() {
                value.push('\n');
                value.push_str(line.trim());
            }
            continue;
        }

        let Some((name, value)) = line.split_once(':') else {
            continue;
        };

        if let Some((name, value)) = current.take() {
            record.set(name, value);
        }
        current = Some((name.trim().to_string(), value.trim().to_string()));
    }

    if let Some((name, value)) = current.take() {
        record.set(name, value);
    }

    if record.is_empty() { None } else { Some(record) }
}
