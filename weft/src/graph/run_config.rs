//! Per-invocation run settings.

use tokio_util::sync::CancellationToken;

/// Settings for one `invoke`: step cap override and an optional cancellation signal.
///
/// The cancellation token is checked at the top of every loop iteration, before the
/// next node runs; a node already in flight is allowed to finish.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Overrides the graph's default step cap for this run.
    pub max_steps: Option<usize>,
    pub cancel: Option<CancellationToken>,
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}
