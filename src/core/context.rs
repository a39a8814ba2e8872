use std::fmt;

/// Execution context a task ran on.
///
/// Replaces ambient thread identity: every progress event carries the tag of the
/// lane that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecContext {
    /// The caller's own context (strategy `NoQueue`).
    Caller,
    /// The single interactive context owned by the presentation layer.
    Interactive,
    /// The single-lane serial executor (also the background worker and the join follow-up).
    Serial,
    /// The multi-lane concurrent executor.
    Concurrent,
}

impl ExecContext {
    /// Returns a short stable label.
    pub fn as_label(self) -> &'static str {
        match self {
            ExecContext::Caller => "caller",
            ExecContext::Interactive => "interactive",
            ExecContext::Serial => "serial",
            ExecContext::Concurrent => "concurrent",
        }
    }
}

impl fmt::Display for ExecContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
