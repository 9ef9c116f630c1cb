// Stub backend for non-Windows hosts.
// Every OS facility reports Unsupported, so the actions take their
// documented degraded paths (sentinels, zero counts, failure messages).

use super::{ProcessEntry, SystemBackend, Terminal};
use crate::error::{OptimizerError, Result};
use std::io::{self, Write};

#[derive(Debug, Default)]
pub struct UnsupportedPlatform;

impl UnsupportedPlatform {
    pub fn new() -> Self {
        UnsupportedPlatform
    }
}

impl SystemBackend for UnsupportedPlatform {
    fn cpu_name(&self) -> Result<String> {
        Err(OptimizerError::Unsupported("CPU query"))
    }

    fn gpu_name(&self) -> Result<String> {
        Err(OptimizerError::Unsupported("GPU query"))
    }

    fn total_memory_kb(&self) -> Result<u64> {
        Err(OptimizerError::Unsupported("memory query"))
    }

    fn available_memory_kb(&self) -> Result<u64> {
        Err(OptimizerError::Unsupported("memory query"))
    }

    fn processes(&self) -> Result<Vec<ProcessEntry>> {
        Err(OptimizerError::Unsupported("process enumeration"))
    }

    fn trim_current_process(&self) -> Result<()> {
        Err(OptimizerError::Unsupported("working set trimming"))
    }

    fn trim_process(&self, _pid: u32) -> Result<()> {
        Err(OptimizerError::Unsupported("working set trimming"))
    }

    fn terminate_process(&self, _pid: u32) -> Result<()> {
        Err(OptimizerError::Unsupported("process termination"))
    }

    fn run_hidden(&self, _program: &str, _args: &[&str]) -> Result<()> {
        Err(OptimizerError::Unsupported("power plan switching"))
    }

    fn is_elevated(&self) -> Result<bool> {
        Err(OptimizerError::Unsupported("elevation check"))
    }
}

impl Terminal for UnsupportedPlatform {
    fn set_title(&self, title: &str) {
        print!("\x1B]0;{}\x07", title);
        let _ = io::stdout().flush();
    }

    // Nothing waits for a key here, so clearing would wipe the action's
    // output before it can be read.
    fn clear_screen(&self) {
        log::debug!("Screen clearing skipped on this platform");
    }

    // stdin belongs to the menu for the whole session
    fn wait_for_key(&self) {
        log::debug!("Keypress wait skipped on this platform");
    }
}
