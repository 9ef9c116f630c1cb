// Recording backend for tests: canned query results, per-pid failures,
// and a log of every action attempted.

use super::{ProcessEntry, SystemBackend, Terminal};
use crate::error::{OptimizerError, Result};
use std::cell::RefCell;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Processes,
    TrimCurrent,
    Trim(u32),
    Terminate(u32),
    Run(String, Vec<String>),
    SetTitle(String),
    ClearScreen,
    WaitForKey,
}

#[derive(Debug, Default)]
pub struct MockPlatform {
    pub cpu: Option<String>,
    pub gpu: Option<String>,
    pub total_kb: Option<u64>,
    pub available_kb: Option<u64>,
    /// `None` makes enumeration itself fail.
    pub processes: Option<Vec<ProcessEntry>>,
    /// Pids whose trim/terminate is denied.
    pub denied: HashSet<u32>,
    pub current_trim_fails: bool,
    pub command_missing: bool,
    pub command_exit_code: Option<i32>,
    pub elevated: Option<bool>,
    pub calls: RefCell<Vec<Call>>,
}

impl MockPlatform {
    /// Every query answers and every action succeeds.
    pub fn healthy() -> Self {
        MockPlatform {
            cpu: Some("AMD Ryzen 7 5800H with Radeon Graphics".to_string()),
            gpu: Some("NVIDIA GeForce RTX 3060 Laptop GPU".to_string()),
            total_kb: Some(16_664_372),
            available_kb: Some(8_123_456),
            processes: Some(Vec::new()),
            elevated: Some(false),
            ..Default::default()
        }
    }

    /// Every query and action fails.
    pub fn broken() -> Self {
        MockPlatform {
            current_trim_fails: true,
            command_missing: true,
            ..Default::default()
        }
    }

    pub fn with_processes(mut self, processes: Vec<ProcessEntry>) -> Self {
        self.processes = Some(processes);
        self
    }

    pub fn deny(mut self, pid: u32) -> Self {
        self.denied.insert(pid);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Pids that received a trim or terminate attempt, in order.
    pub fn touched_pids(&self) -> Vec<u32> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Trim(pid) | Call::Terminate(pid) => Some(*pid),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn per_pid(&self, pid: u32) -> Result<()> {
        if self.denied.contains(&pid) {
            Err(OptimizerError::ProcessAccess {
                pid,
                reason: "Access is denied.".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl SystemBackend for MockPlatform {
    fn cpu_name(&self) -> Result<String> {
        self.cpu.clone().ok_or(OptimizerError::NoData { what: "CPU name" })
    }

    fn gpu_name(&self) -> Result<String> {
        self.gpu.clone().ok_or(OptimizerError::Query {
            what: "GPU name",
            reason: "Invalid class".to_string(),
        })
    }

    fn total_memory_kb(&self) -> Result<u64> {
        self.total_kb.ok_or(OptimizerError::NoData { what: "total memory" })
    }

    fn available_memory_kb(&self) -> Result<u64> {
        self.available_kb.ok_or(OptimizerError::NoData { what: "available memory" })
    }

    fn processes(&self) -> Result<Vec<ProcessEntry>> {
        self.record(Call::Processes);
        self.processes.clone().ok_or(OptimizerError::Query {
            what: "process list",
            reason: "snapshot failed".to_string(),
        })
    }

    fn trim_current_process(&self) -> Result<()> {
        self.record(Call::TrimCurrent);
        if self.current_trim_fails {
            Err(OptimizerError::ProcessAccess {
                pid: std::process::id(),
                reason: "Access is denied.".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn trim_process(&self, pid: u32) -> Result<()> {
        self.record(Call::Trim(pid));
        self.per_pid(pid)
    }

    fn terminate_process(&self, pid: u32) -> Result<()> {
        self.record(Call::Terminate(pid));
        self.per_pid(pid)
    }

    fn run_hidden(&self, program: &str, args: &[&str]) -> Result<()> {
        self.record(Call::Run(
            program.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        ));

        if self.command_missing {
            return Err(OptimizerError::Launch {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "program not found"),
            });
        }
        match self.command_exit_code {
            Some(code) if code != 0 => Err(OptimizerError::CommandFailed {
                program: program.to_string(),
                status: format!("exit code: {}", code),
            }),
            _ => Ok(()),
        }
    }

    fn is_elevated(&self) -> Result<bool> {
        self.elevated.ok_or(OptimizerError::NoData { what: "token elevation" })
    }
}

impl Terminal for MockPlatform {
    fn set_title(&self, title: &str) {
        self.record(Call::SetTitle(title.to_string()));
    }

    fn clear_screen(&self) {
        self.record(Call::ClearScreen);
    }

    fn wait_for_key(&self) {
        self.record(Call::WaitForKey);
    }
}
