use crate::error::{OptimizerError, Result};
use crate::platform::SystemBackend;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

pub const UNKNOWN_CPU: &str = "Unknown CPU";
pub const UNKNOWN_GPU: &str = "Unknown GPU";

/// Outcome of one OS info query
#[derive(Debug)]
pub enum Reading<T> {
    Value(T),
    Unavailable(OptimizerError),
}

impl<T> Reading<T> {
    /// The value, or `sentinel` when the query was unavailable.
    pub fn or_sentinel(self, sentinel: T) -> T {
        match self {
            Reading::Value(value) => value,
            Reading::Unavailable(e) => {
                log::debug!("Using fallback value: {}", e);
                sentinel
            }
        }
    }
}

impl<T> From<Result<T>> for Reading<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Reading::Value(value),
            Err(e) => Reading::Unavailable(e),
        }
    }
}

/// Treat a blank name as no data
fn non_empty(what: &'static str, name: String) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(OptimizerError::NoData { what })
    } else {
        Ok(trimmed.to_string())
    }
}

fn kb_to_mb(kb: u64) -> u64 {
    kb / 1024
}

/// Point-in-time hardware summary shown by the info action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub cpu_name: String,
    pub total_ram_mb: u64,
    pub available_ram_mb: u64,
    pub gpu_name: String,
}

impl SystemSnapshot {
    /// Query every field independently; a failed query yields its sentinel.
    pub fn capture<B: SystemBackend + ?Sized>(backend: &B) -> Self {
        let cpu: Reading<String> = backend
            .cpu_name()
            .and_then(|name| non_empty("CPU name", name))
            .into();
        let total: Reading<u64> = backend.total_memory_kb().map(kb_to_mb).into();
        let available: Reading<u64> = backend.available_memory_kb().map(kb_to_mb).into();
        let gpu: Reading<String> = backend
            .gpu_name()
            .and_then(|name| non_empty("GPU name", name))
            .into();

        SystemSnapshot {
            cpu_name: cpu.or_sentinel(UNKNOWN_CPU.to_string()),
            total_ram_mb: total.or_sentinel(0),
            available_ram_mb: available.or_sentinel(0),
            gpu_name: gpu.or_sentinel(UNKNOWN_GPU.to_string()),
        }
    }

    pub fn write_report<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\n-- System Info --")?;
        writeln!(out, "CPU: {}", self.cpu_name)?;
        writeln!(out, "Total RAM: {} MB", self.total_ram_mb)?;
        writeln!(out, "Available RAM: {} MB", self.available_ram_mb)?;
        writeln!(out, "GPU: {}", self.gpu_name)?;
        Ok(())
    }
}

/// Menu action 1: print the system info block
pub fn show_system_info<B, W>(backend: &B, out: &mut W) -> io::Result<SystemSnapshot>
where
    B: SystemBackend + ?Sized,
    W: Write + ?Sized,
{
    let snapshot = SystemSnapshot::capture(backend);
    snapshot.write_report(out)?;
    Ok(snapshot)
}
