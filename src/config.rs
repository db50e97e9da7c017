use std::time::Duration;

/// Knobs the surfaces pass to the workflow runner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Give up on a processing attempt after this long. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl WorkflowConfig {
    /// Zero seconds means no timeout.
    pub fn with_timeout_secs(secs: Option<u64>) -> Self {
        Self {
            timeout: secs.filter(|s| *s > 0).map(Duration::from_secs),
        }
    }
}
