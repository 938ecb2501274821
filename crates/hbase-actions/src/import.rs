//! Snapshot import action.
//!
//! Declared so workflows that reference the action type load, but the import
//! itself is not implemented: `start` reports success without touching any
//! cluster.

use hbase_actions_core::{
    ActionContext, ActionExecutor, ActionFailure, ActionInfo, ExternalStatus, WorkflowAction,
};

/// Action type name of the import action.
pub const IMPORT_ACTION_TYPE: &str = "hbase-import-snapshot";

/// Import action executor (stub).
pub struct ImportSnapshotAction {
    info: ActionInfo,
}

impl ImportSnapshotAction {
    pub fn new() -> Self {
        Self {
            info: ActionInfo {
                action_type: IMPORT_ACTION_TYPE,
                description: "Import an HBase snapshot (not implemented; always succeeds)",
            },
        }
    }
}

impl Default for ImportSnapshotAction {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionExecutor for ImportSnapshotAction {
    fn info(&self) -> &ActionInfo {
        &self.info
    }

    // TODO: parse the import definition and run the snapshot import tool the
    // way ExportSnapshotAction runs the export tool.
    fn start(
        &self,
        ctx: &mut dyn ActionContext,
        action: &WorkflowAction,
    ) -> Result<(), ActionFailure> {
        tracing::warn!(
            action = %action.name,
            "{} is not implemented; reporting success without importing",
            IMPORT_ACTION_TYPE
        );
        ctx.set_execution_data(ExternalStatus::Ok);
        Ok(())
    }
}
