// Windows backend: Win32 process APIs, plus wmic/PowerShell for the WMI
// queries behind the system info report.

use super::{wmic, ProcessEntry, SystemBackend, Terminal};
use crate::error::{OptimizerError, Result};
use std::ffi::c_void;
use std::os::windows::process::CommandExt;
use std::process::{Command, Stdio};
use windows::core::PCWSTR;
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::Security::{GetTokenInformation, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY};
use windows::Win32::System::Console::SetConsoleTitleW;
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W, TH32CS_SNAPPROCESS,
};
use windows::Win32::System::ProcessStatus::EmptyWorkingSet;
use windows::Win32::System::RemoteDesktop::ProcessIdToSessionId;
use windows::Win32::System::Threading::*;

/// Closes the wrapped handle when dropped.
struct OwnedHandle(HANDLE);

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// Open a process with the given access rights
fn open_process(pid: u32, access: PROCESS_ACCESS_RIGHTS) -> Result<OwnedHandle> {
    unsafe {
        OpenProcess(access, false, pid)
            .map(OwnedHandle)
            .map_err(|e| OptimizerError::ProcessAccess {
                pid,
                reason: e.to_string(),
            })
    }
}

/// Run a query tool and capture its stdout
fn capture(what: &'static str, program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .creation_flags(CREATE_NO_WINDOW.0)
        .output()
        .map_err(|e| OptimizerError::Query {
            what,
            reason: format!("could not start {}: {}", program, e),
        })?;

    if !output.status.success() {
        return Err(OptimizerError::Query {
            what,
            reason: format!("{} exited with {}", program, output.status),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Read the first instance's property of a WMI class.
///
/// wmic is tried first; recent Windows builds no longer ship it, so
/// PowerShell's Get-CimInstance is the fallback.
fn wmi_property(what: &'static str, class: &str, property: &str) -> Result<String> {
    match capture(what, "wmic", &["path", class, "get", property, "/value"]) {
        Ok(output) => {
            if let Some(value) = wmic::parse_value_output(&output, property) {
                return Ok(value);
            }
            log::debug!("wmic returned no {} for {}", property, class);
        }
        Err(e) => log::debug!("wmic unavailable, trying PowerShell: {}", e),
    }

    let script = format!(
        "Get-CimInstance -ClassName {} | Select-Object -First 1 -ExpandProperty {}",
        class, property
    );
    let output = capture(
        what,
        "powershell",
        &["-NoProfile", "-NonInteractive", "-Command", &script],
    )?;

    wmic::parse_plain_output(&output).ok_or(OptimizerError::NoData { what })
}

/// Native Windows implementation of the backend and terminal.
#[derive(Debug, Default)]
pub struct WindowsPlatform;

impl WindowsPlatform {
    pub fn new() -> Self {
        WindowsPlatform
    }
}

impl SystemBackend for WindowsPlatform {
    fn cpu_name(&self) -> Result<String> {
        wmi_property("CPU name", "Win32_Processor", "Name")
    }

    fn gpu_name(&self) -> Result<String> {
        wmi_property("GPU name", "Win32_VideoController", "Name")
    }

    fn total_memory_kb(&self) -> Result<u64> {
        let what = "total memory";
        let raw = wmi_property(what, "Win32_OperatingSystem", "TotalVisibleMemorySize")?;
        wmic::parse_kilobytes(what, &raw)
    }

    fn available_memory_kb(&self) -> Result<u64> {
        let what = "available memory";
        let raw = wmi_property(what, "Win32_OperatingSystem", "FreePhysicalMemory")?;
        wmic::parse_kilobytes(what, &raw)
    }

    fn processes(&self) -> Result<Vec<ProcessEntry>> {
        let what = "process list";
        unsafe {
            let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0).map_err(|e| {
                OptimizerError::Query {
                    what,
                    reason: e.to_string(),
                }
            })?;
            let snapshot = OwnedHandle(snapshot);

            let mut entry = PROCESSENTRY32W {
                dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
                ..Default::default()
            };

            let mut processes = Vec::new();
            if Process32FirstW(snapshot.0, &mut entry).is_err() {
                return Ok(processes);
            }

            loop {
                let pid = entry.th32ProcessID;
                let len = entry
                    .szExeFile
                    .iter()
                    .position(|&c| c == 0)
                    .unwrap_or(entry.szExeFile.len());
                let exe_name = String::from_utf16_lossy(&entry.szExeFile[..len]);

                let mut session = 0u32;
                let session_id = match ProcessIdToSessionId(pid, &mut session) {
                    Ok(()) => Some(session),
                    Err(_) => None,
                };

                processes.push(ProcessEntry::new(pid, &exe_name, session_id));

                if Process32NextW(snapshot.0, &mut entry).is_err() {
                    break;
                }
            }

            Ok(processes)
        }
    }

    fn trim_current_process(&self) -> Result<()> {
        unsafe {
            EmptyWorkingSet(GetCurrentProcess()).map_err(|e| OptimizerError::ProcessAccess {
                pid: std::process::id(),
                reason: e.to_string(),
            })
        }
    }

    fn trim_process(&self, pid: u32) -> Result<()> {
        let process = open_process(pid, PROCESS_QUERY_INFORMATION | PROCESS_SET_QUOTA)?;
        unsafe {
            EmptyWorkingSet(process.0).map_err(|e| OptimizerError::ProcessAccess {
                pid,
                reason: e.to_string(),
            })
        }
    }

    fn terminate_process(&self, pid: u32) -> Result<()> {
        let process = open_process(pid, PROCESS_TERMINATE)?;
        unsafe {
            TerminateProcess(process.0, 1).map_err(|e| OptimizerError::ProcessAccess {
                pid,
                reason: e.to_string(),
            })
        }
    }

    fn run_hidden(&self, program: &str, args: &[&str]) -> Result<()> {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .creation_flags(CREATE_NO_WINDOW.0)
            .status()
            .map_err(|source| OptimizerError::Launch {
                program: program.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(OptimizerError::CommandFailed {
                program: program.to_string(),
                status: status.to_string(),
            })
        }
    }

    fn is_elevated(&self) -> Result<bool> {
        let what = "token elevation";
        unsafe {
            let mut token = HANDLE::default();
            OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token).map_err(|e| {
                OptimizerError::Query {
                    what,
                    reason: e.to_string(),
                }
            })?;
            let token = OwnedHandle(token);

            let mut elevation = TOKEN_ELEVATION::default();
            let mut returned = 0u32;
            GetTokenInformation(
                token.0,
                TokenElevation,
                Some(&mut elevation as *mut TOKEN_ELEVATION as *mut c_void),
                std::mem::size_of::<TOKEN_ELEVATION>() as u32,
                &mut returned,
            )
            .map_err(|e| OptimizerError::Query {
                what,
                reason: e.to_string(),
            })?;

            Ok(elevation.TokenIsElevated != 0)
        }
    }
}

impl Terminal for WindowsPlatform {
    fn set_title(&self, title: &str) {
        let wide: Vec<u16> = title.encode_utf16().chain(std::iter::once(0)).collect();
        unsafe {
            if let Err(e) = SetConsoleTitleW(PCWSTR(wide.as_ptr())) {
                log::debug!("Failed to set console title: {}", e);
            }
        }
    }

    fn clear_screen(&self) {
        if let Err(e) = Command::new("cmd").args(["/C", "cls"]).status() {
            log::debug!("Failed to clear screen: {}", e);
        }
    }

    fn wait_for_key(&self) {
        // Read the keypress from the console itself so piped menu input is untouched
        let console = std::fs::File::open("CONIN$")
            .map(Stdio::from)
            .unwrap_or_else(|_| Stdio::null());
        if let Err(e) = Command::new("cmd").args(["/C", "pause >nul"]).stdin(console).status() {
            log::debug!("Failed to wait for key: {}", e);
        }
    }
}
