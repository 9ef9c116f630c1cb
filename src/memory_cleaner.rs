use crate::platform::{ProcessEntry, SystemBackend};
use crate::sweep::{sweep, Step, SweepOutcome};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Session reserved for services and system processes; never trimmed.
pub const SYSTEM_SESSION: u32 = 0;

/// Result of one RAM cleaning pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimReport {
    pub current_process_trimmed: bool,
    pub sweep: SweepOutcome,
}

/// Decide whether a process is eligible and, if so, trim it
fn trim_one<B: SystemBackend + ?Sized>(backend: &B, process: &ProcessEntry) -> Step {
    match process.session_id {
        Some(SYSTEM_SESSION) => Step::Skipped,
        None => {
            log::debug!(
                "Skipping {} (PID: {}): session unknown",
                process.name,
                process.pid
            );
            Step::Skipped
        }
        Some(_) => match backend.trim_process(process.pid) {
            Ok(()) => Step::Applied,
            Err(e) => Step::Failed(e),
        },
    }
}

/// Menu action 2: trim this process, then every user-session process
pub fn clean_ram<B, W>(backend: &B, out: &mut W) -> io::Result<TrimReport>
where
    B: SystemBackend + ?Sized,
    W: Write + ?Sized,
{
    writeln!(out, "\nCleaning RAM by emptying standby list...")?;

    let current_process_trimmed = match backend.trim_current_process() {
        Ok(()) => {
            writeln!(out, "Freed memory from current process.")?;
            true
        }
        Err(e) => {
            log::debug!("Current process trim failed: {}", e);
            writeln!(out, "Failed to free memory from current process.")?;
            false
        }
    };

    let processes = backend.processes().unwrap_or_else(|e| {
        log::warn!("Process enumeration failed: {}", e);
        Vec::new()
    });

    let mut freed = Vec::new();
    let outcome = sweep(&processes, |process: &ProcessEntry| {
        let step = trim_one(backend, process);
        if matches!(step, Step::Applied) {
            freed.push((process.name.clone(), process.pid));
        }
        step
    });

    for (name, pid) in freed {
        writeln!(out, "Freed memory from process: {} (PID: {})", name, pid)?;
    }
    writeln!(
        out,
        "Successfully freed memory on {} processes. You may need to run as Administrator.",
        outcome.succeeded
    )?;

    Ok(TrimReport {
        current_process_trimmed,
        sweep: outcome,
    })
}
