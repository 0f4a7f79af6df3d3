use std::time::Duration;

/// One execution of the target command within a retry sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    /// 0-based position in the sequence.
    pub number: u32,
    /// Delay slept immediately before this attempt ran.
    pub delay_before_run: Duration,
    /// Exit status observed for this attempt (0 = success).
    pub exit_status: i32,
}

impl Attempt {
    pub fn succeeded(&self) -> bool {
        self.exit_status == 0
    }
}
