use crate::platform::{ProcessEntry, SystemBackend};
use crate::sweep::{sweep, Step, SweepOutcome};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

// Apps that commonly sit in the background eating RAM and CPU.
// Matched as case-insensitive substrings of the process name.
pub const HEAVY_APPS: &[&str] = &[
    "OneDrive",
    "Dropbox",
    "Spotify",
    "Discord",
    "Teams",
    "Edge",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillReport {
    pub killed: Vec<String>,
    pub sweep: SweepOutcome,
}

/// Denylist entry matched by a process name, if any
pub fn matching_entry(process_name: &str) -> Option<&'static str> {
    let lower = process_name.to_lowercase();
    HEAVY_APPS
        .iter()
        .copied()
        .find(|app| lower.contains(&app.to_lowercase()))
}

/// Menu action 4: terminate every process on the denylist.
///
/// There is no confirmation prompt and no session filter.
pub fn kill_background_apps<B, W>(backend: &B, out: &mut W) -> io::Result<KillReport>
where
    B: SystemBackend + ?Sized,
    W: Write + ?Sized,
{
    writeln!(out, "\nKilling common background apps...")?;

    let processes = backend.processes().unwrap_or_else(|e| {
        log::warn!("Process enumeration failed: {}", e);
        Vec::new()
    });

    let mut killed = Vec::new();
    let outcome = sweep(&processes, |process: &ProcessEntry| {
        let Some(app) = matching_entry(&process.name) else {
            return Step::Skipped;
        };
        match backend.terminate_process(process.pid) {
            Ok(()) => {
                log::debug!("Killed {} (PID: {}) matching {}", process.name, process.pid, app);
                killed.push(process.name.clone());
                Step::Applied
            }
            Err(e) => Step::Failed(e),
        }
    });

    for name in &killed {
        writeln!(out, "Killed {}", name)?;
    }
    writeln!(out, "Killed {} processes. Use with caution.", outcome.succeeded)?;

    Ok(KillReport {
        killed,
        sweep: outcome,
    })
}
