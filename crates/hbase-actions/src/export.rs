//! Snapshot export action.
//!
//! Copies an HBase snapshot to another filesystem by running the export tool
//! synchronously inside `start`.

use crate::ActionsConfig;
use crate::definition::ExportDefinition;
use crate::tool::{ExportArgs, SnapshotTool};
use hbase_actions_core::{
    ActionContext, ActionError, ActionExecutor, ActionFailure, ActionInfo, DisallowedProperties,
    ExternalStatus, JOB_STATUS_VAR, JobConf, WorkflowAction, keys,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Action type name of the export action.
pub const EXPORT_ACTION_TYPE: &str = "hbase-export-snapshot";

/// Name used for the inline `<configuration>` block in policy errors.
const INLINE_CONF_NAME: &str = "inline configuration";

/// Job name used when the configuration does not set one.
pub fn default_job_name(
    action_type: &str,
    app_name: &str,
    action_name: &str,
    workflow_id: &str,
) -> String {
    format!("oozie:action:T={action_type}:W={app_name}:A={action_name}:ID={workflow_id}")
}

/// Administrator-controlled inputs to every export job.
#[derive(Debug, Clone, Default)]
pub struct ExportSettings {
    /// Identity forced on the job.
    pub user: String,
    /// Engine-level defaults; only fill keys that are still unset.
    pub action_defaults: JobConf,
    /// Base properties keyed by job tracker address.
    pub clusters: HashMap<String, JobConf>,
}

impl ExportSettings {
    pub fn from_config(config: &ActionsConfig) -> Self {
        Self {
            user: config.export.user().to_string(),
            action_defaults: config.action_defaults(EXPORT_ACTION_TYPE),
            clusters: config
                .clusters
                .keys()
                .map(|jt| (jt.clone(), config.cluster_conf(jt)))
                .collect(),
        }
    }
}

/// Export action executor.
pub struct ExportSnapshotAction {
    info: ActionInfo,
    tool: Arc<dyn SnapshotTool>,
    disallowed: Arc<DisallowedProperties>,
    settings: ExportSettings,
}

impl ExportSnapshotAction {
    pub fn new(tool: Arc<dyn SnapshotTool>, disallowed: Arc<DisallowedProperties>) -> Self {
        Self {
            info: ActionInfo {
                action_type: EXPORT_ACTION_TYPE,
                description: "Export an HBase snapshot to a filesystem URI",
            },
            tool,
            disallowed,
            settings: ExportSettings {
                user: crate::config::DEFAULT_USER.to_string(),
                ..ExportSettings::default()
            },
        }
    }

    pub fn with_settings(mut self, settings: ExportSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    fn apply_forced(&self, conf: &mut JobConf, definition: &ExportDefinition) {
        conf.set(keys::USER, self.settings.user.as_str());
        conf.set(keys::JOB_TRACKER, definition.job_tracker.as_str());
        conf.set(keys::JOB_TRACKER_ADDRESS, definition.job_tracker.as_str());
        conf.set(keys::RESOURCE_MANAGER, definition.job_tracker.as_str());
        conf.set(keys::DEFAULT_FS, definition.name_node.as_str());
        conf.set(keys::MARK_SUCCESSFUL_JOBS, "true");
    }

    /// Assemble the job configuration for an export.
    ///
    /// Layers, lowest precedence first: cluster base, forced values, action
    /// defaults (fill-only), inline configuration, forced values again. The
    /// inline block is checked against the disallowed properties before it
    /// is applied.
    pub fn build_job_conf(
        &self,
        definition: &ExportDefinition,
        ctx: &dyn ActionContext,
        action: &WorkflowAction,
    ) -> Result<JobConf, ActionError> {
        let mut conf = self
            .settings
            .clusters
            .get(&definition.job_tracker)
            .cloned()
            .unwrap_or_default();

        self.apply_forced(&mut conf, definition);
        conf.inject_defaults(&self.settings.action_defaults);

        if let Some(inline) = &definition.inline_conf {
            self.disallowed.check(inline, INLINE_CONF_NAME)?;
            conf.overlay(inline);
        }
        self.apply_forced(&mut conf, definition);

        if conf.get(keys::JOB_NAME).is_none_or(str::is_empty) {
            let workflow = ctx.workflow();
            let job_name = default_job_name(
                self.info.action_type,
                &workflow.app_name,
                &action.name,
                &workflow.id,
            );
            conf.set(keys::JOB_NAME, job_name);
        }

        if conf.contains(keys::JOB_END_NOTIFICATION_URL) {
            tracing::warn!(action = %action.name, "overriding the action job end notification URL");
        }
        conf.set(keys::JOB_END_NOTIFICATION_URL, ctx.callback_url(JOB_STATUS_VAR));

        Ok(conf)
    }

    fn export(&self, ctx: &mut dyn ActionContext, action: &WorkflowAction) -> Result<(), ActionError> {
        let definition = ExportDefinition::parse(&action.conf)?;
        tracing::debug!(
            action = %action.name,
            snapshot = %definition.snapshot_name,
            job_tracker = %definition.job_tracker,
            "starting {}",
            EXPORT_ACTION_TYPE
        );

        let conf = self.build_job_conf(&definition, &*ctx, action)?;
        let args = ExportArgs::new(&definition.snapshot_name, &definition.destination_uri);
        self.tool.run(&conf, &args)?;

        tracing::info!(
            action = %action.name,
            snapshot = %definition.snapshot_name,
            destination = %definition.destination_uri,
            "snapshot exported"
        );
        ctx.set_execution_data(ExternalStatus::Ok);
        Ok(())
    }
}

impl ActionExecutor for ExportSnapshotAction {
    fn info(&self) -> &ActionInfo {
        &self.info
    }

    fn start(
        &self,
        ctx: &mut dyn ActionContext,
        action: &WorkflowAction,
    ) -> Result<(), ActionFailure> {
        self.export(ctx, action).map_err(|err| {
            let failure = ActionFailure::from(err);
            tracing::warn!(
                action = %action.name,
                code = failure.code,
                kind = failure.kind.as_str(),
                category = failure.category.as_str(),
                tool = self.tool.name(),
                "{}",
                failure.message
            );
            failure
        })
    }
}
