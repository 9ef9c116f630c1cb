use crate::platform::SystemBackend;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// powercfg alias of the built-in High performance plan
pub const HIGH_PERFORMANCE_SCHEME: &str = "SCHEME_MIN";

const POWERCFG: &str = "powercfg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerPlanReport {
    pub scheme: String,
    pub activated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Menu action 3: activate the high performance power scheme.
///
/// Blocks until powercfg exits. Failures are printed, never returned.
pub fn set_high_performance<B, W>(backend: &B, out: &mut W) -> io::Result<PowerPlanReport>
where
    B: SystemBackend + ?Sized,
    W: Write + ?Sized,
{
    writeln!(out, "\nSetting Power Plan to High Performance...")?;

    let result = backend.run_hidden(POWERCFG, &["/setactive", HIGH_PERFORMANCE_SCHEME]);
    let report = match result {
        Ok(()) => {
            writeln!(out, "Power Plan set to High Performance.")?;
            PowerPlanReport {
                scheme: HIGH_PERFORMANCE_SCHEME.to_string(),
                activated: true,
                error: None,
            }
        }
        Err(e) => {
            log::debug!("powercfg failed: {:?}", e);
            writeln!(out, "Failed to set power plan: {}", e)?;
            PowerPlanReport {
                scheme: HIGH_PERFORMANCE_SCHEME.to_string(),
                activated: false,
                error: Some(e.to_string()),
            }
        }
    };

    Ok(report)
}
