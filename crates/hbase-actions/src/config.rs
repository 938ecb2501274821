//! Configuration for the snapshot actions.
//!
//! Loads config from:
//! 1. Global: $XDG_CONFIG_HOME/hbase-actions/config.toml (default ~/.config)
//! 2. An explicit file handed to [`ActionsConfig::load`] (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [export]
//! command = ["hbase", "org.apache.hadoop.hbase.snapshot.ExportSnapshot"]
//! user = "hbase"                      # identity forced on every export job
//! env = { JAVA_HOME = "/usr/lib/jvm/default" }
//!
//! # Defaults for one action type; only fill keys the action did not set
//! [action-defaults.hbase-export-snapshot]
//! "mapreduce.job.queuename" = "backup"
//!
//! # Base job properties for a cluster, keyed by job tracker address
//! [clusters."rm.example.com:8032"]
//! "mapreduce.map.memory.mb" = "2048"
//! ```

use hbase_actions_core::{JobConf, Merge};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Default export command.
pub const DEFAULT_EXPORT_COMMAND: &[&str] = &["hbase", "org.apache.hadoop.hbase.snapshot.ExportSnapshot"];

/// Default identity export jobs run as.
pub const DEFAULT_USER: &str = "hbase";

/// Export tool configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ExportConfig {
    /// Command line of the export tool. Default: `hbase org.apache.hadoop.hbase.snapshot.ExportSnapshot`
    pub command: Option<Vec<String>>,
    /// Identity forced on every export job. Default: "hbase"
    pub user: Option<String>,
    /// Extra environment for the tool process.
    pub env: BTreeMap<String, String>,
}

impl ExportConfig {
    pub fn command(&self) -> Vec<String> {
        self.command
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_EXPORT_COMMAND.iter().map(|s| s.to_string()).collect())
    }

    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or(DEFAULT_USER)
    }
}

impl Merge for ExportConfig {
    fn merge(self, other: Self) -> Self {
        Self {
            command: self.command.merge(other.command),
            user: self.user.merge(other.user),
            env: self.env.merge(other.env),
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ActionsConfig {
    pub export: ExportConfig,
    /// Engine-level defaults per action type.
    #[serde(rename = "action-defaults")]
    pub action_defaults: HashMap<String, BTreeMap<String, String>>,
    /// Base job properties per cluster, keyed by job tracker address.
    pub clusters: HashMap<String, BTreeMap<String, String>>,
}

impl Merge for ActionsConfig {
    fn merge(self, other: Self) -> Self {
        Self {
            export: self.export.merge(other.export),
            action_defaults: self.action_defaults.merge(other.action_defaults),
            clusters: self.clusters.merge(other.clusters),
        }
    }
}

impl ActionsConfig {
    /// Load configuration.
    ///
    /// Merges `hbase-actions/config.toml` under `$XDG_CONFIG_HOME` (or
    /// `~/.config`) with `path` if given. Unreadable files are skipped.
    pub fn load(path: Option<&Path>) -> Self {
        let global = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .map(|dir| dir.join("hbase-actions").join("config.toml"));

        [global.as_deref(), path]
            .into_iter()
            .flatten()
            .filter_map(Self::load_file)
            .fold(Self::default(), Self::merge)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Engine-level defaults for an action type.
    pub fn action_defaults(&self, action_type: &str) -> JobConf {
        self.action_defaults
            .get(action_type)
            .cloned()
            .map(JobConf::from)
            .unwrap_or_default()
    }

    /// Base job properties for the cluster behind `job_tracker`.
    pub fn cluster_conf(&self, job_tracker: &str) -> JobConf {
        self.clusters
            .get(job_tracker)
            .cloned()
            .map(JobConf::from)
            .unwrap_or_default()
    }

    /// Load config from a file path.
    fn load_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read config");
                return None;
            }
        };
        match Self::parse(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse config");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ActionsConfig::default();
        assert_eq!(
            config.export.command(),
            vec!["hbase", "org.apache.hadoop.hbase.snapshot.ExportSnapshot"]
        );
        assert_eq!(config.export.user(), "hbase");
        assert!(config.action_defaults("hbase-export-snapshot").is_empty());
        assert!(config.cluster_conf("rm:8032").is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config = ActionsConfig::parse(
            r#"
[export]
command = ["/opt/hbase/bin/hbase", "snapshot-export"]
user = "backup"
env = { JAVA_HOME = "/usr/lib/jvm/default" }

[action-defaults.hbase-export-snapshot]
"mapreduce.job.queuename" = "backup"

[clusters."rm:8032"]
"mapreduce.map.memory.mb" = "2048"
"#,
        )
        .unwrap();

        assert_eq!(
            config.export.command(),
            vec!["/opt/hbase/bin/hbase", "snapshot-export"]
        );
        assert_eq!(config.export.user(), "backup");
        assert_eq!(
            config.export.env.get("JAVA_HOME").map(|s| s.as_str()),
            Some("/usr/lib/jvm/default")
        );
        assert_eq!(
            config
                .action_defaults("hbase-export-snapshot")
                .get("mapreduce.job.queuename"),
            Some("backup")
        );
        assert_eq!(
            config.cluster_conf("rm:8032").get("mapreduce.map.memory.mb"),
            Some("2048")
        );
    }

    #[test]
    fn test_empty_command_falls_back() {
        let config = ActionsConfig::parse("[export]\ncommand = []\n").unwrap();
        assert_eq!(config.export.command()[0], "hbase");
    }

    #[test]
    fn test_invalid_config_is_error() {
        assert!(ActionsConfig::parse("[export]\nuser = 42\n").is_err());
    }

    #[test]
    fn test_merge_layers() {
        let global = ActionsConfig::parse(
            r#"
[export]
user = "hbase"
command = ["hbase", "export"]

[action-defaults.hbase-export-snapshot]
"a" = "global"
"b" = "global"
"#,
        )
        .unwrap();
        let project = ActionsConfig::parse(
            r#"
[export]
user = "backup"

[action-defaults.hbase-export-snapshot]
"b" = "project"
"#,
        )
        .unwrap();

        let config = global.merge(project);
        assert_eq!(config.export.user(), "backup");
        assert_eq!(config.export.command(), vec!["hbase", "export"]);
        let defaults = config.action_defaults("hbase-export-snapshot");
        assert_eq!(defaults.get("a"), Some("global"));
        assert_eq!(defaults.get("b"), Some("project"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("actions.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[export]
user = "snapshotter"
"#
        )
        .unwrap();

        let config = ActionsConfig::load(Some(&path));
        assert_eq!(config.export.user(), "snapshotter");
    }

    #[test]
    fn test_load_skips_unparseable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[export\nuser = ").unwrap();
        assert!(ActionsConfig::load_file(&path).is_none());
        assert!(ActionsConfig::load_file(&dir.path().join("missing.toml")).is_none());
    }
}
