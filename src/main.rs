mod app_killer;
mod error;
mod memory_cleaner;
mod menu;
mod platform;
mod power_plan;
mod sweep;
mod system_info;

use menu::{Menu, CONSOLE_TITLE};
use platform::{Native, SystemBackend, Terminal};
use std::io;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Console output belongs to the menu; logs go to stderr and stay quiet
    // unless RUST_LOG asks for more.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let platform = Native::new();
    platform.set_title(CONSOLE_TITLE);

    match platform.is_elevated() {
        Ok(true) => log::info!("Running as Administrator"),
        Ok(false) => log::info!("Not elevated; some processes will refuse trimming"),
        Err(e) => log::info!("Elevation unknown: {}", e),
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(&platform, stdin.lock(), stdout.lock()).run()?;

    Ok(())
}
