//! Shared contract for workflow actions.
//!
//! The workflow engine owns scheduling and state; an action executor is
//! handed a context and an action definition and drives one lifecycle:
//!
//! ```text
//! CREATED ──start──▶ STARTED ──▶ OK | FAIL | KILLED
//! ```
//!
//! - [`ActionExecutor`]: the lifecycle (`start`, `end`, `check`, `kill`,
//!   `is_completed`)
//! - [`ActionContext`]: callbacks into the engine, with [`RecordingContext`]
//!   as an in-memory implementation
//! - [`JobConf`] and [`DisallowedProperties`]: job configuration assembly
//!   and the keys user configuration may not touch
//! - [`ActionError`] / [`ActionFailure`]: internal errors and their
//!   classification through [`ERROR_TABLE`]
//!
//! # Example
//!
//! ```ignore
//! use hbase_actions_core::{ActionRegistry, RecordingContext, WorkflowAction, WorkflowInfo};
//!
//! let mut ctx = RecordingContext::new(WorkflowInfo::new("wf-1", "backup"), callback);
//! let action = WorkflowAction::new("wf-1@export", "export", "hbase-export-snapshot", xml);
//! let executor = registry.for_action(&action).expect("registered");
//! executor.start(&mut ctx, &action)?;
//! ```

mod conf;
mod context;
mod error;
mod executor;
mod merge;
mod registry;

pub use conf::{DisallowedProperties, JobConf, keys};
pub use context::{ActionContext, RecordingContext, WorkflowAction, WorkflowInfo};
pub use error::{
    ActionError, ActionFailure, ERROR_TABLE, ErrorCategory, ErrorMapping, FailureKind,
    UNCLASSIFIED_CODE, classify,
};
pub use executor::{ActionExecutor, ActionInfo, EndStatus, ExternalStatus, JOB_STATUS_VAR};
pub use merge::Merge;
pub use registry::ActionRegistry;
