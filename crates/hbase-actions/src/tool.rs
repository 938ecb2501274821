//! The external snapshot export tool.
//!
//! All data movement happens in the tool; actions only assemble its job
//! configuration and arguments and interpret how it exits.

use hbase_actions_core::{ActionError, FailureKind, JobConf, keys};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Mutex;

/// Positional arguments of a snapshot export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArgs {
    pub snapshot: String,
    pub copy_to: String,
}

impl ExportArgs {
    pub fn new(snapshot: impl Into<String>, copy_to: impl Into<String>) -> Self {
        Self {
            snapshot: snapshot.into(),
            copy_to: copy_to.into(),
        }
    }

    /// `-snapshot <name> -copyTo <uri>`
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "-snapshot".to_string(),
            self.snapshot.clone(),
            "-copyTo".to_string(),
            self.copy_to.clone(),
        ]
    }
}

/// Trait for snapshot export tools.
pub trait SnapshotTool: Send + Sync {
    /// Tool name, for logs.
    fn name(&self) -> &str;

    /// Check if the tool can be run on this host.
    fn is_available(&self) -> bool;

    /// Run the export to completion. Returns once the tool has exited.
    fn run(&self, conf: &JobConf, args: &ExportArgs) -> Result<(), ActionError>;
}

/// Exception names the export tool prints on failure, most specific first.
const FAILURE_MARKERS: &[(&str, FailureKind)] = &[
    ("UnknownHostException", FailureKind::UnknownHost),
    ("AccessControlException", FailureKind::PermissionDenied),
    ("DiskOutOfSpaceException", FailureKind::DiskOutOfSpace),
    ("QuotaExceededException", FailureKind::QuotaExceeded),
    ("SafeModeException", FailureKind::SafeMode),
    ("ConnectException", FailureKind::ConnectionRefused),
    ("FileNotFoundException", FailureKind::PathNotFound),
    ("IOException", FailureKind::Io),
];

/// Classify tool error output by the first known exception it mentions.
pub fn classify_output(stderr: &str) -> FailureKind {
    FAILURE_MARKERS
        .iter()
        .find(|(marker, _)| stderr.contains(marker))
        .map(|(_, kind)| *kind)
        .unwrap_or(FailureKind::Unclassified)
}

/// Runs the export tool as a subprocess.
///
/// The job configuration is passed as `-D key=value` generic options between
/// the command and the export arguments.
pub struct CommandTool {
    command: Vec<String>,
    env: BTreeMap<String, String>,
}

impl CommandTool {
    /// `command[0]` is the program, the rest are leading arguments.
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            env: BTreeMap::new(),
        }
    }

    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    fn program(&self) -> Result<PathBuf, ActionError> {
        let program = self
            .command
            .first()
            .ok_or_else(|| ActionError::ToolNotFound("empty command".to_string()))?;
        which::which(program).map_err(|e| ActionError::ToolNotFound(format!("{program}: {e}")))
    }

    /// Full argument list after the program.
    pub fn build_args(&self, conf: &JobConf, args: &ExportArgs) -> Vec<String> {
        let mut out: Vec<String> = self.command.iter().skip(1).cloned().collect();
        out.extend(conf.to_generic_options());
        out.extend(args.to_args());
        out
    }
}

impl SnapshotTool for CommandTool {
    fn name(&self) -> &str {
        self.command.first().map(|s| s.as_str()).unwrap_or("")
    }

    fn is_available(&self) -> bool {
        self.program().is_ok()
    }

    fn run(&self, conf: &JobConf, args: &ExportArgs) -> Result<(), ActionError> {
        let program = self.program()?;
        let tool_args = self.build_args(conf, args);
        tracing::debug!(program = %program.display(), args = ?tool_args, "running export tool");

        let mut cmd = Command::new(&program);
        cmd.args(&tool_args).envs(&self.env);
        if let Some(user) = conf.get(keys::USER) {
            cmd.env("HADOOP_USER_NAME", user);
        }

        let output = cmd.output()?;
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} exited with {}", self.name(), output.status));

        Err(ActionError::ToolFailed {
            kind: classify_output(&stderr),
            status: output.status.code(),
            message,
        })
    }
}

/// A tool that records its invocations and never leaves the process
/// (for testing and dry runs).
pub struct RecordingTool {
    failure: Option<(FailureKind, String)>,
    invocations: Mutex<Vec<(JobConf, ExportArgs)>>,
}

impl RecordingTool {
    /// A tool whose every run succeeds.
    pub fn succeeding() -> Self {
        Self {
            failure: None,
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// A tool whose every run fails with the given kind.
    pub fn failing(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            failure: Some((kind, message.into())),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Job configuration and arguments of every run so far.
    pub fn invocations(&self) -> Vec<(JobConf, ExportArgs)> {
        self.invocations
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl SnapshotTool for RecordingTool {
    fn name(&self) -> &str {
        "recording"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn run(&self, conf: &JobConf, args: &ExportArgs) -> Result<(), ActionError> {
        if let Ok(mut calls) = self.invocations.lock() {
            calls.push((conf.clone(), args.clone()));
        }
        match &self.failure {
            Some((kind, message)) => Err(ActionError::ToolFailed {
                kind: *kind,
                status: Some(1),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}
