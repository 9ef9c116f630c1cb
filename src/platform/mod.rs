// Platform-specific access to the OS query and control facilities.
// Windows is the real target; other hosts get a stub that reports
// every facility as unsupported so the core logic still builds and tests.

use crate::error::Result;

#[cfg(any(target_os = "windows", test))]
pub mod wmic;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(not(target_os = "windows"))]
pub mod unsupported;

#[cfg(test)]
pub mod mock;

// Re-export the native implementation as 'Native'
#[cfg(target_os = "windows")]
pub use self::windows::WindowsPlatform as Native;

#[cfg(not(target_os = "windows"))]
pub use self::unsupported::UnsupportedPlatform as Native;

/// A live OS process as seen by one enumeration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    /// Executable name without the `.exe` suffix (e.g. "Discord").
    pub name: String,
    /// `None` when the session lookup was denied.
    pub session_id: Option<u32>,
}

#[cfg(any(target_os = "windows", test))]
impl ProcessEntry {
    pub fn new(pid: u32, exe_name: &str, session_id: Option<u32>) -> Self {
        ProcessEntry {
            pid,
            name: strip_exe_suffix(exe_name).to_string(),
            session_id,
        }
    }
}

/// Drop a trailing ".exe" (any case) from an executable file name.
#[cfg(any(target_os = "windows", test))]
pub fn strip_exe_suffix(exe_name: &str) -> &str {
    let len = exe_name.len();
    if len > 4 && exe_name.is_char_boundary(len - 4) && exe_name[len - 4..].eq_ignore_ascii_case(".exe") {
        &exe_name[..len - 4]
    } else {
        exe_name
    }
}

// OS query and control backend.
// All methods report failure through Result; callers decide whether a
// failure degrades to a sentinel or is skipped.
pub trait SystemBackend {
    /// Name of the first processor.
    fn cpu_name(&self) -> Result<String>;

    /// Name of the first video controller.
    fn gpu_name(&self) -> Result<String>;

    /// Total visible physical memory in kilobytes.
    fn total_memory_kb(&self) -> Result<u64>;

    /// Free physical memory in kilobytes.
    fn available_memory_kb(&self) -> Result<u64>;

    /// Snapshot of all visible processes.
    fn processes(&self) -> Result<Vec<ProcessEntry>>;

    /// Trim the working set of this process.
    fn trim_current_process(&self) -> Result<()>;

    /// Trim the working set of another process.
    fn trim_process(&self, pid: u32) -> Result<()>;

    /// Forcibly terminate a process.
    fn terminate_process(&self, pid: u32) -> Result<()>;

    /// Run an external program with no window and discarded output,
    /// blocking until it exits. A non-zero exit is an error.
    fn run_hidden(&self, program: &str, args: &[&str]) -> Result<()>;

    /// Whether this process holds an elevated (administrator) token.
    fn is_elevated(&self) -> Result<bool>;
}

/// Console operations the menu needs besides reading and writing text.
pub trait Terminal {
    fn set_title(&self, title: &str);

    fn clear_screen(&self);

    /// Block until the user presses a key.
    fn wait_for_key(&self);
}
