//! Continue/abort decision after a failed connection test.

use std::io::{self, BufRead, IsTerminal, Write};

use folio_engine::ProbeFailure;
use folio_logging::{folio_error, folio_info, folio_warn};

const PROMPT: &str = "Continue with batch download anyway? (y/n): ";

/// Decides whether the batch should run after `failure`.
///
/// `--yes` always continues. Without a terminal to ask on, the run is aborted.
pub fn should_continue(failure: &ProbeFailure, assume_yes: bool) -> io::Result<bool> {
    report_probe_failure(failure);
    if assume_yes {
        folio_warn!("Continuing despite the failed connection test (--yes)");
        return Ok(true);
    }

    let stdin = io::stdin();
    if !stdin.is_terminal() {
        folio_warn!("No terminal to confirm on; pass --yes to continue after a failed test");
        return Ok(false);
    }
    ask(&mut stdin.lock(), &mut io::stdout())
}

fn report_probe_failure(failure: &ProbeFailure) {
    folio_error!("Connection test failed for {}: {}", failure.url, failure.reason);
    if failure.debug_path.is_some() {
        folio_info!("Inspect the saved error content to see what the server returned");
    }
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "{PROMPT}")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
