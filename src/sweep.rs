use crate::error::OptimizerError;
use serde::{Deserialize, Serialize};

/// Result of applying an action to one element of a sweep
#[derive(Debug)]
pub enum Step {
    /// The action ran and succeeded.
    Applied,
    /// The element was not a target; no action was attempted.
    Skipped,
    /// The action was attempted and failed.
    Failed(OptimizerError),
}

/// Tally of a best-effort sweep over a process snapshot
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepOutcome {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SweepOutcome {
    pub fn record(mut self, step: Step) -> Self {
        match step {
            Step::Applied => {
                self.attempted += 1;
                self.succeeded += 1;
            }
            Step::Skipped => self.skipped += 1,
            Step::Failed(e) => {
                log::debug!("Skipping after failure: {}", e);
                self.attempted += 1;
                self.failed += 1;
            }
        }
        self
    }
}

/// Apply `action` to every item, counting outcomes.
///
/// A failure on one item never stops the sweep.
pub fn sweep<T, I, F>(items: I, mut action: F) -> SweepOutcome
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Step,
{
    items
        .into_iter()
        .fold(SweepOutcome::default(), |outcome, item| outcome.record(action(item)))
}
