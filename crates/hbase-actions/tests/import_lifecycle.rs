//! Integration tests for the import action stub.

use hbase_actions::{IMPORT_ACTION_TYPE, ImportSnapshotAction};
use hbase_actions_core::{
    ActionExecutor, EndStatus, ExternalStatus, RecordingContext, WorkflowAction, WorkflowInfo,
};

fn context() -> RecordingContext {
    RecordingContext::new(WorkflowInfo::new("wf-9", "hbase-dr"), "http://engine/callback")
}

fn action() -> WorkflowAction {
    WorkflowAction::new("wf-9@import", "import", IMPORT_ACTION_TYPE, "not even xml")
}

#[test]
fn test_start_always_succeeds() {
    let exec = ImportSnapshotAction::new();
    let mut ctx = context();

    exec.start(&mut ctx, &action()).unwrap();
    assert_eq!(ctx.execution_data(), Some(ExternalStatus::Ok));
    assert_eq!(exec.info().action_type, "hbase-import-snapshot");
}

#[test]
fn test_lifecycle_matches_export() {
    let exec = ImportSnapshotAction::new();
    let mut ctx = context();

    exec.end(&mut ctx, &action().with_external_status("OK")).unwrap();
    assert_eq!(ctx.end_data(), Some((EndStatus::Ok, "OK")));

    exec.kill(&mut ctx, &action()).unwrap();
    assert_eq!(ctx.execution_data(), Some(ExternalStatus::Killed));

    assert!(exec.check(&mut ctx, &action()).is_err());
    assert!(exec.is_completed("anything"));
}
