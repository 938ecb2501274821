//! Host-side view of a running action.
//!
//! The workflow engine owns the real state. Executors only read workflow
//! identity from it and record status changes through [`ActionContext`].

use crate::{EndStatus, ExternalStatus};

/// Identity of the workflow run an action belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowInfo {
    /// Workflow run id.
    pub id: String,
    /// Workflow application name.
    pub app_name: String,
}

impl WorkflowInfo {
    pub fn new(id: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            app_name: app_name.into(),
        }
    }
}

/// A single action instance as the engine hands it to an executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowAction {
    pub id: String,
    pub name: String,
    /// Declared action type, used to pick the executor.
    pub action_type: String,
    /// Raw XML action definition.
    pub conf: String,
    /// External status recorded by a previous lifecycle call, if any.
    pub external_status: Option<String>,
}

impl WorkflowAction {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        action_type: impl Into<String>,
        conf: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            action_type: action_type.into(),
            conf: conf.into(),
            external_status: None,
        }
    }

    pub fn with_external_status(mut self, status: impl Into<String>) -> Self {
        self.external_status = Some(status.into());
        self
    }
}

/// Callbacks an executor uses to talk to the engine.
pub trait ActionContext {
    /// Workflow run the action belongs to.
    fn workflow(&self) -> &WorkflowInfo;

    /// URL the job calls when it ends. `external_status_var` is substituted
    /// by the job with its final status.
    fn callback_url(&self, external_status_var: &str) -> String;

    /// Record the outcome of `start` (or `kill`).
    fn set_execution_data(&mut self, external_status: ExternalStatus);

    fn set_external_status(&mut self, external_status: ExternalStatus);

    /// Record the final status and the transition signal for `end`.
    fn set_end_data(&mut self, status: EndStatus, signal: &str);
}

/// In-memory [`ActionContext`] that keeps everything it is told.
#[derive(Debug, Clone)]
pub struct RecordingContext {
    workflow: WorkflowInfo,
    callback_base: String,
    execution_data: Option<ExternalStatus>,
    external_status: Option<ExternalStatus>,
    end_data: Option<(EndStatus, String)>,
}

impl RecordingContext {
    pub fn new(workflow: WorkflowInfo, callback_base: impl Into<String>) -> Self {
        Self {
            workflow,
            callback_base: callback_base.into(),
            execution_data: None,
            external_status: None,
            end_data: None,
        }
    }

    pub fn execution_data(&self) -> Option<ExternalStatus> {
        self.execution_data
    }

    pub fn external_status(&self) -> Option<ExternalStatus> {
        self.external_status
    }

    pub fn end_data(&self) -> Option<(EndStatus, &str)> {
        self.end_data.as_ref().map(|(s, signal)| (*s, signal.as_str()))
    }
}

impl ActionContext for RecordingContext {
    fn workflow(&self) -> &WorkflowInfo {
        &self.workflow
    }

    fn callback_url(&self, external_status_var: &str) -> String {
        let sep = if self.callback_base.contains('?') { '&' } else { '?' };
        format!("{}{}status={}", self.callback_base, sep, external_status_var)
    }

    fn set_execution_data(&mut self, external_status: ExternalStatus) {
        self.execution_data = Some(external_status);
    }

    fn set_external_status(&mut self, external_status: ExternalStatus) {
        self.external_status = Some(external_status);
    }

    fn set_end_data(&mut self, status: EndStatus, signal: &str) {
        self.end_data = Some((status, signal.to_string()));
    }
}
