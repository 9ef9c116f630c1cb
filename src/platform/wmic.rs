// Parsing of WMI query output.
// The Windows backend shells out to `wmic ... /value` (and PowerShell when
// wmic is missing); parsing lives here so it can be tested anywhere.

use crate::error::{OptimizerError, Result};

/// Extract the first non-empty `Property=value` line from `wmic ... /value`
/// output.
///
/// wmic prints one block per instance separated by blank lines, so the
/// first match is the first instance (first CPU, first video controller).
pub fn parse_value_output(output: &str, property: &str) -> Option<String> {
    let prefix = format!("{}=", property);

    for line in output.lines() {
        let line = line.trim();
        match line.get(..prefix.len()) {
            Some(head) if head.eq_ignore_ascii_case(&prefix) => {}
            _ => continue,
        }
        let value = line[prefix.len()..].trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    None
}

/// First non-empty line of PowerShell `-ExpandProperty` output.
pub fn parse_plain_output(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Parse a WMI kilobyte counter such as `TotalVisibleMemorySize`.
pub fn parse_kilobytes(what: &'static str, raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|e| OptimizerError::Query {
        what,
        reason: format!("unexpected value {:?}: {}", raw, e),
    })
}
