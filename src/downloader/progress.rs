//! Progress reporting and the caller-facing event contract
//!
//! The orchestrator never talks to a UI directly. It emits typed
//! [`DownloadEvent`]s through an [`EventSink`], and computes percentages
//! with the pure helpers on [`ProgressReporter`]. Percentages are
//! monotonically non-decreasing across a run: 0 at start, 10 once the task
//! list is known, `10 + floor(completed/total * 80)` per completed task,
//! then 90/95/100 through the archival steps.

/// Run lifecycle states.
///
/// `Cancelling` is the soft sub-state entered when cancellation has been
/// requested but an in-flight request has not yet observed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// No run started yet
    #[default]
    Idle,
    /// Run in progress
    Running,
    /// Cancellation requested, worker not yet stopped
    Cancelling,
    /// Run finished successfully, archival included
    Completed,
    /// Run stopped cooperatively before completion
    Cancelled,
    /// Run aborted on an unrecoverable error
    Failed,
}

impl RunState {
    /// Whether this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Completed | RunState::Cancelled | RunState::Failed
        )
    }
}

/// Typed event emitted during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    /// Progress update with percent (0-100) and status text
    Progress {
        /// Completion percentage
        percent: u8,
        /// Human-readable status text
        text: String,
    },
    /// Terminal failure with a user-visible message
    Error {
        /// User-visible message
        message: String,
    },
    /// Terminal success notification
    Completed,
    /// Terminal cancellation notification
    Cancelled,
}

/// Caller-facing callback contract.
///
/// Completion and cancellation are mutually exclusive terminal
/// notifications; exactly one of `completed`, `cancelled`, or `error` fires
/// per run.
pub trait EventSink: Send + Sync {
    /// Progress update.
    fn progress(&self, percent: u8, text: &str);

    /// Terminal failure.
    fn error(&self, message: &str);

    /// Terminal success.
    fn completed(&self);

    /// Terminal cancellation.
    fn cancelled(&self);
}

/// Sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn progress(&self, _percent: u8, _text: &str) {}
    fn error(&self, _message: &str) {}
    fn completed(&self) {}
    fn cancelled(&self) {}
}

/// Pure progress computation helpers.
#[derive(Debug, Clone, Copy)]
pub struct ProgressReporter;

impl ProgressReporter {
    /// Percentage reserved for the download phase start.
    pub const DOWNLOAD_PHASE_START: u8 = 10;

    /// Percent and status text for `completed` of `total` finished tasks.
    ///
    /// Guards against `total == 0` (upstream validation makes that
    /// unreachable, but the helper never divides by zero).
    pub fn task_progress(completed: u64, total: u64) -> (u8, String) {
        let percent = if total == 0 {
            Self::DOWNLOAD_PHASE_START
        } else {
            Self::DOWNLOAD_PHASE_START + (completed * 80 / total) as u8
        };
        (percent, format!("Downloaded {completed} of {total} files"))
    }

    /// Status text for a finished run.
    pub fn completion_text(total: u64) -> String {
        format!("Complete! Downloaded {total} files")
    }
}
