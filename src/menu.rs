use crate::app_killer::{self, KillReport};
use crate::memory_cleaner::{self, TrimReport};
use crate::platform::{SystemBackend, Terminal};
use crate::power_plan::{self, PowerPlanReport};
use crate::system_info::{self, SystemSnapshot};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};

pub const CONSOLE_TITLE: &str = "Laptop Gaming Optimizer Console";
const HEADER: &str = "=== Laptop Gaming Optimizer ===";

/// Everything the menu can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ShowSystemInfo,
    CleanRam,
    HighPerformancePower,
    KillBackgroundApps,
    Exit,
}

pub struct MenuEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub action: MenuAction,
}

/// Menu options in display order
pub const MENU: &[MenuEntry] = &[
    MenuEntry {
        key: "1",
        label: "Show System Info",
        action: MenuAction::ShowSystemInfo,
    },
    MenuEntry {
        key: "2",
        label: "Clean RAM (Empty Standby Memory)",
        action: MenuAction::CleanRam,
    },
    MenuEntry {
        key: "3",
        label: "Set Power Plan to High Performance",
        action: MenuAction::HighPerformancePower,
    },
    MenuEntry {
        key: "4",
        label: "Kill Background Apps (simple)",
        action: MenuAction::KillBackgroundApps,
    },
    MenuEntry {
        key: "5",
        label: "Exit",
        action: MenuAction::Exit,
    },
];

impl MenuAction {
    /// Exact-match lookup; surrounding whitespace makes the choice invalid.
    pub fn from_input(input: &str) -> Option<Self> {
        MENU.iter()
            .find(|entry| entry.key == input)
            .map(|entry| entry.action)
    }
}

/// What an action produced, for the debug log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionSummary {
    SystemInfo(SystemSnapshot),
    CleanRam(TrimReport),
    PowerPlan(PowerPlanReport),
    KillBackgroundApps(KillReport),
}

#[derive(Debug, Serialize)]
struct ActionLogEntry<'a> {
    timestamp: String,
    summary: &'a ActionSummary,
}

fn log_summary(summary: &ActionSummary) {
    let entry = ActionLogEntry {
        timestamp: chrono::Local::now().to_rfc3339(),
        summary,
    };
    if let Ok(json) = serde_json::to_string(&entry) {
        log::debug!("{}", json);
    }
}

/// Interactive menu loop over a platform and a pair of text streams
pub struct Menu<'a, P, R, W> {
    platform: &'a P,
    input: R,
    out: W,
}

impl<'a, P, R, W> Menu<'a, P, R, W>
where
    P: SystemBackend + Terminal,
    R: BufRead,
    W: Write,
{
    pub fn new(platform: &'a P, input: R, out: W) -> Self {
        Menu {
            platform,
            input,
            out,
        }
    }

    /// Run until the user picks Exit or input ends.
    ///
    /// Only console I/O errors escape; action failures are printed.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.platform.clear_screen();
            self.print_menu()?;

            let choice = match self.read_choice()? {
                Some(choice) => choice,
                None => {
                    log::debug!("Input closed");
                    writeln!(self.out, "\nExiting...")?;
                    return Ok(());
                }
            };

            match MenuAction::from_input(&choice) {
                Some(MenuAction::Exit) => {
                    writeln!(self.out, "Exiting...")?;
                    self.out.flush()?;
                    return Ok(());
                }
                Some(action) => {
                    if let Some(summary) = self.dispatch(action)? {
                        log_summary(&summary);
                    }
                }
                None => {
                    log::debug!("Rejected menu input {:?}", choice);
                    writeln!(self.out, "Invalid choice, try again.")?;
                }
            }

            writeln!(self.out, "Press any key to continue...")?;
            self.out.flush()?;
            self.platform.wait_for_key();
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", HEADER)?;
        for entry in MENU {
            writeln!(self.out, "{}. {}", entry.key, entry.label)?;
        }
        write!(self.out, "Choose an option: ")?;
        self.out.flush()
    }

    /// One line with its terminator removed, or None at end of input
    fn read_choice(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn dispatch(&mut self, action: MenuAction) -> io::Result<Option<ActionSummary>> {
        let platform = self.platform;
        let out = &mut self.out;

        let summary = match action {
            MenuAction::ShowSystemInfo => {
                ActionSummary::SystemInfo(system_info::show_system_info(platform, out)?)
            }
            MenuAction::CleanRam => ActionSummary::CleanRam(memory_cleaner::clean_ram(platform, out)?),
            MenuAction::HighPerformancePower => {
                ActionSummary::PowerPlan(power_plan::set_high_performance(platform, out)?)
            }
            MenuAction::KillBackgroundApps => {
                ActionSummary::KillBackgroundApps(app_killer::kill_background_apps(platform, out)?)
            }
            MenuAction::Exit => return Ok(None),
        };

        Ok(Some(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{Call, MockPlatform};
    use crate::platform::ProcessEntry;
    use std::io::Cursor;

    fn run_session(platform: &MockPlatform, input: &str) -> String {
        let mut out = Vec::new();
        Menu::new(platform, Cursor::new(input.as_bytes()), &mut out)
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_menu_table_lookup() {
        assert_eq!(MenuAction::from_input("1"), Some(MenuAction::ShowSystemInfo));
        assert_eq!(MenuAction::from_input("2"), Some(MenuAction::CleanRam));
        assert_eq!(MenuAction::from_input("3"), Some(MenuAction::HighPerformancePower));
        assert_eq!(MenuAction::from_input("4"), Some(MenuAction::KillBackgroundApps));
        assert_eq!(MenuAction::from_input("5"), Some(MenuAction::Exit));
        assert_eq!(MenuAction::from_input("6"), None);
        assert_eq!(MenuAction::from_input(""), None);
        assert_eq!(MenuAction::from_input(" 1"), None);
        assert_eq!(MenuAction::from_input("1 "), None);
        assert_eq!(MenuAction::from_input("exit"), None);
    }

    #[test]
    fn test_menu_text() {
        let platform = MockPlatform::healthy();
        let text = run_session(&platform, "5\n");

        assert!(text.starts_with(
            "=== Laptop Gaming Optimizer ===\n\
             1. Show System Info\n\
             2. Clean RAM (Empty Standby Memory)\n\
             3. Set Power Plan to High Performance\n\
             4. Kill Background Apps (simple)\n\
             5. Exit\n\
             Choose an option: "
        ));
    }

    #[test]
    fn test_exit_runs_no_action() {
        let platform = MockPlatform::healthy().with_processes(vec![ProcessEntry {
            pid: 200,
            name: "Discord".to_string(),
            session_id: Some(1),
        }]);

        let text = run_session(&platform, "5\n");

        assert!(text.ends_with("Exiting...\n"));
        assert_eq!(platform.calls(), vec![Call::ClearScreen]);
        assert!(!text.contains("Press any key"));
    }

    #[test]
    fn test_info_then_exit() {
        let platform = MockPlatform::healthy();
        let text = run_session(&platform, "1\n5\n");

        assert_eq!(text.matches("-- System Info --").count(), 1);
        assert!(text.contains("CPU: AMD Ryzen 7 5800H with Radeon Graphics"));
        assert!(!text.contains("Invalid choice"));
        assert!(text.ends_with("Exiting...\n"));
        assert_eq!(
            platform.calls(),
            vec![Call::ClearScreen, Call::WaitForKey, Call::ClearScreen]
        );
    }

    #[test]
    fn test_invalid_then_info_then_exit() {
        let platform = MockPlatform::healthy();
        let text = run_session(&platform, "9\n1\n5\n");

        assert_eq!(text.matches("Invalid choice, try again.").count(), 1);
        assert_eq!(text.matches("-- System Info --").count(), 1);
        let invalid_at = text.find("Invalid choice").unwrap();
        let info_at = text.find("-- System Info --").unwrap();
        assert!(invalid_at < info_at);
        assert!(text.ends_with("Exiting...\n"));
        assert_eq!(text.matches("=== Laptop Gaming Optimizer ===").count(), 3);
    }

    #[test]
    fn test_invalid_input_changes_nothing() {
        let platform = MockPlatform::healthy();
        let text = run_session(&platform, "hello\n 2\n\n5\n");

        assert_eq!(text.matches("Invalid choice, try again.").count(), 3);
        // only screen handling, no backend action
        assert!(platform
            .calls()
            .iter()
            .all(|call| matches!(call, Call::ClearScreen | Call::WaitForKey)));
    }

    #[test]
    fn test_crlf_input_is_accepted() {
        let platform = MockPlatform::healthy();
        let text = run_session(&platform, "3\r\n5\r\n");

        assert!(text.contains("Power Plan set to High Performance."));
        assert!(!text.contains("Invalid choice"));
    }

    #[test]
    fn test_each_action_dispatches() {
        let platform = MockPlatform::healthy().with_processes(vec![ProcessEntry {
            pid: 300,
            name: "msedge".to_string(),
            session_id: Some(1),
        }]);

        let text = run_session(&platform, "2\n3\n4\n5\n");

        assert!(text.contains("Cleaning RAM by emptying standby list..."));
        assert!(text.contains("Setting Power Plan to High Performance..."));
        assert!(text.contains("Killed msedge"));
        assert_eq!(
            platform
                .calls()
                .iter()
                .filter(|call| matches!(call, Call::WaitForKey))
                .count(),
            3
        );
        assert!(platform.calls().contains(&Call::Terminate(300)));
        assert!(platform.calls().contains(&Call::Trim(300)));
    }

    #[test]
    fn test_action_failures_keep_menu_alive() {
        let platform = MockPlatform::broken();
        let text = run_session(&platform, "1\n2\n3\n4\n5\n");

        assert!(text.contains("CPU: Unknown CPU"));
        assert!(text.contains("Failed to free memory from current process."));
        assert!(text.contains("Failed to set power plan:"));
        assert!(text.contains("Killed 0 processes. Use with caution."));
        assert!(text.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let platform = MockPlatform::healthy();
        let text = run_session(&platform, "1\n");

        assert_eq!(text.matches("-- System Info --").count(), 1);
        assert!(text.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_summary_serializes_with_tag() {
        let summary = ActionSummary::SystemInfo(SystemSnapshot {
            cpu_name: "Unknown CPU".to_string(),
            total_ram_mb: 0,
            available_ram_mb: 0,
            gpu_name: "Unknown GPU".to_string(),
        });

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["action"], "system_info");
        assert_eq!(json["cpu_name"], "Unknown CPU");

        let back: ActionSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, summary);
    }
}
