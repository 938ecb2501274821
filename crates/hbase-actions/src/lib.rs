//! Workflow actions that export and import HBase snapshots.
//!
//! Both actions plug into a workflow engine through
//! [`hbase_actions_core::ActionExecutor`]:
//!
//! - **hbase-export-snapshot**: reads the action XML, assembles a job
//!   configuration (identity, cluster endpoints and callback URL are forced;
//!   inline configuration may not override them) and runs the snapshot
//!   export tool with `-snapshot <name> -copyTo <uri>`.
//! - **hbase-import-snapshot**: placeholder that always succeeds.
//!
//! # Example
//!
//! ```ignore
//! use hbase_actions::{ActionsConfig, default_registry};
//!
//! let registry = default_registry(&ActionsConfig::load(None));
//! let executor = registry.get("hbase-export-snapshot").unwrap();
//! executor.start(&mut ctx, &action)?;
//! ```

mod config;
mod definition;
mod export;
mod import;
mod tool;

pub use config::{ActionsConfig, DEFAULT_EXPORT_COMMAND, DEFAULT_USER, ExportConfig};
pub use definition::ExportDefinition;
pub use export::{EXPORT_ACTION_TYPE, ExportSettings, ExportSnapshotAction, default_job_name};
pub use import::{IMPORT_ACTION_TYPE, ImportSnapshotAction};
pub use tool::{CommandTool, ExportArgs, RecordingTool, SnapshotTool, classify_output};

use hbase_actions_core::{ActionRegistry, DisallowedProperties};
use std::sync::Arc;

/// Create a registry with both snapshot actions, exporting through `tool`.
pub fn registry_with_tool(config: &ActionsConfig, tool: Arc<dyn SnapshotTool>) -> ActionRegistry {
    let disallowed = Arc::new(DisallowedProperties::standard());
    let export = ExportSnapshotAction::new(tool, disallowed)
        .with_settings(ExportSettings::from_config(config));

    let mut registry = ActionRegistry::new();
    registry.register(Box::new(export));
    registry.register(Box::new(ImportSnapshotAction::new()));
    registry
}

/// Create a registry with both snapshot actions, exporting through the
/// configured command.
pub fn default_registry(config: &ActionsConfig) -> ActionRegistry {
    let tool = CommandTool::new(config.export.command()).with_env(config.export.env.clone());
    if !tool.is_available() {
        tracing::warn!(
            command = tool.name(),
            "export tool not found on PATH; exports will fail until it is installed"
        );
    }
    registry_with_tool(config, Arc::new(tool))
}
