//! Action lifecycle trait and status types.

use crate::{ActionContext, ActionError, ActionFailure, WorkflowAction};
use std::fmt;

/// Placeholder the job substitutes with its final status in the callback URL.
pub const JOB_STATUS_VAR: &str = "$jobStatus";

/// Status string an action reports back to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalStatus {
    /// The action succeeded.
    Ok,
    Fail,
    Killed,
    /// Reserved, never reported.
    FailedKilled,
}

impl ExternalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Fail => "FAIL",
            Self::Killed => "KILLED",
            Self::FailedKilled => "FAILED/KILLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OK" => Some(Self::Ok),
            "FAIL" => Some(Self::Fail),
            "KILLED" => Some(Self::Killed),
            "FAILED/KILLED" => Some(Self::FailedKilled),
            _ => None,
        }
    }
}

impl fmt::Display for ExternalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final status the engine records when an action ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndStatus {
    Ok,
    Error,
}

impl EndStatus {
    /// Transition signal the engine follows out of the action.
    pub fn signal(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Error => "ERROR",
        }
    }
}

/// Static information about an executor.
#[derive(Debug, Clone)]
pub struct ActionInfo {
    /// Action type name the engine dispatches on (e.g., "hbase-export-snapshot").
    pub action_type: &'static str,
    pub description: &'static str,
}

/// Lifecycle the workflow engine drives for every action instance.
///
/// Executors are synchronous: `start` runs the whole action, so `check` has
/// nothing to poll and `is_completed` is always true. Only `start` differs
/// between executors; the rest have shared default implementations.
pub trait ActionExecutor: Send + Sync {
    /// Get executor information.
    fn info(&self) -> &ActionInfo;

    /// Run the action and record its execution data.
    fn start(&self, ctx: &mut dyn ActionContext, action: &WorkflowAction)
    -> Result<(), ActionFailure>;

    /// Translate the recorded external status into the end status.
    fn end(&self, ctx: &mut dyn ActionContext, action: &WorkflowAction) -> Result<(), ActionFailure> {
        let status = match action.external_status.as_deref() {
            Some(s) if s == ExternalStatus::Ok.as_str() => EndStatus::Ok,
            _ => EndStatus::Error,
        };
        ctx.set_end_data(status, status.signal());
        Ok(())
    }

    /// Poll an in-flight action. Never valid for synchronous executors.
    fn check(
        &self,
        _ctx: &mut dyn ActionContext,
        action: &WorkflowAction,
    ) -> Result<(), ActionFailure> {
        tracing::error!(
            action = %action.name,
            action_type = self.info().action_type,
            "check called on a synchronous action"
        );
        Err(ActionError::Unsupported("check").into())
    }

    /// Mark the action killed, whatever its prior state.
    fn kill(&self, ctx: &mut dyn ActionContext, _action: &WorkflowAction) -> Result<(), ActionFailure> {
        ctx.set_external_status(ExternalStatus::Killed);
        ctx.set_execution_data(ExternalStatus::Killed);
        Ok(())
    }

    fn is_completed(&self, _external_status: &str) -> bool {
        true
    }
}

/// An executor that succeeds without doing anything.
#[cfg(test)]
pub(crate) struct NoopExecutor {
    info: ActionInfo,
}

#[cfg(test)]
impl NoopExecutor {
    pub(crate) fn new(action_type: &'static str) -> Self {
        Self {
            info: ActionInfo {
                action_type,
                description: "Succeeds without doing anything",
            },
        }
    }
}

#[cfg(test)]
impl ActionExecutor for NoopExecutor {
    fn info(&self) -> &ActionInfo {
        &self.info
    }

    fn start(
        &self,
        ctx: &mut dyn ActionContext,
        _action: &WorkflowAction,
    ) -> Result<(), ActionFailure> {
        ctx.set_execution_data(ExternalStatus::Ok);
        Ok(())
    }
}
