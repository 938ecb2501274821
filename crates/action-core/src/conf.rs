//! Job configuration and the disallowed-property policy.

use crate::ActionError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Well-known job configuration keys.
pub mod keys {
    /// Identity the job runs as.
    pub const USER: &str = "user.name";
    /// Job tracker address (classic name).
    pub const JOB_TRACKER: &str = "mapred.job.tracker";
    /// Job tracker address (newer name).
    pub const JOB_TRACKER_ADDRESS: &str = "mapreduce.jobtracker.address";
    /// Resource manager address.
    pub const RESOURCE_MANAGER: &str = "yarn.resourcemanager.address";
    /// Default filesystem.
    pub const DEFAULT_FS: &str = "fs.default.name";
    pub const JOB_NAME: &str = "mapred.job.name";
    /// Write `_SUCCESS` markers into job output directories.
    pub const MARK_SUCCESSFUL_JOBS: &str = "mapreduce.fileoutputcommitter.marksuccessfuljobs";
    pub const JOB_END_NOTIFICATION_URL: &str = "job.end.notification.url";
}

/// Ordered string properties handed to a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobConf {
    props: BTreeMap<String, String>,
}

impl JobConf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.props.get(key).map(|s| s.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.props.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy properties from `defaults` whose keys are not already set.
    pub fn inject_defaults(&mut self, defaults: &JobConf) {
        for (key, value) in defaults.iter() {
            if !self.contains(key) {
                self.set(key, value);
            }
        }
    }

    /// Copy every property from `other`, replacing existing values.
    pub fn overlay(&mut self, other: &JobConf) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    /// Render as `-D key=value` generic options.
    pub fn to_generic_options(&self) -> Vec<String> {
        self.props
            .iter()
            .flat_map(|(k, v)| ["-D".to_string(), format!("{k}={v}")])
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for JobConf {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            props: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for JobConf {
    fn from(props: BTreeMap<String, String>) -> Self {
        Self { props }
    }
}

/// Property keys that user-supplied configuration may never set.
///
/// Built once and shared (`Arc`) between every action that checks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisallowedProperties {
    keys: BTreeSet<String>,
}

impl DisallowedProperties {
    /// Identity, job tracker (both names), resource manager, default filesystem.
    pub fn standard() -> Self {
        Self::from_keys([
            keys::USER,
            keys::JOB_TRACKER,
            keys::JOB_TRACKER_ADDRESS,
            keys::RESOURCE_MANAGER,
            keys::DEFAULT_FS,
        ])
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|s| s.as_str())
    }

    /// Fail on the first disallowed key (in sorted order) present in `conf`.
    ///
    /// A key is compared up to its first `=`, since that is where the job
    /// splits a `-D key=value` option.
    pub fn check(&self, conf: &JobConf, conf_name: &str) -> Result<(), ActionError> {
        let forbidden = conf
            .iter()
            .map(|(key, _)| key.split_once('=').map_or(key, |(name, _)| name).trim())
            .filter(|name| self.contains(name))
            .min();
        match forbidden {
            Some(property) => Err(ActionError::ForbiddenProperty {
                property: property.to_string(),
                conf_name: conf_name.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for DisallowedProperties {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_defaults_keeps_existing() {
        let mut conf: JobConf = [("a", "1")].into_iter().collect();
        let defaults: JobConf = [("a", "default"), ("b", "2")].into_iter().collect();
        conf.inject_defaults(&defaults);
        assert_eq!(conf.get("a"), Some("1"));
        assert_eq!(conf.get("b"), Some("2"));
    }

    #[test]
    fn test_overlay_replaces() {
        let mut conf: JobConf = [("a", "1"), ("c", "3")].into_iter().collect();
        let inline: JobConf = [("a", "override"), ("b", "2")].into_iter().collect();
        conf.overlay(&inline);
        assert_eq!(conf.get("a"), Some("override"));
        assert_eq!(conf.get("b"), Some("2"));
        assert_eq!(conf.get("c"), Some("3"));
    }

    #[test]
    fn test_generic_options_sorted() {
        let conf: JobConf = [("z.key", "1"), ("a.key", "x y")].into_iter().collect();
        assert_eq!(
            conf.to_generic_options(),
            vec!["-D", "a.key=x y", "-D", "z.key=1"]
        );
    }

    #[test]
    fn test_standard_set() {
        let disallowed = DisallowedProperties::standard();
        assert_eq!(disallowed.iter().count(), 5);
        assert!(disallowed.contains("user.name"));
        assert!(disallowed.contains("fs.default.name"));
        assert!(!disallowed.contains(keys::MARK_SUCCESSFUL_JOBS));
    }

    #[test]
    fn test_check_allows_clean_conf() {
        let conf: JobConf = [("mapreduce.job.queuename", "backup")].into_iter().collect();
        assert!(DisallowedProperties::standard().check(&conf, "inline").is_ok());
        assert!(DisallowedProperties::standard().check(&JobConf::new(), "inline").is_ok());
    }

    #[test]
    fn test_check_rejects_each_key() {
        let disallowed = DisallowedProperties::standard();
        for key in disallowed.iter() {
            let conf: JobConf = [(key, "x")].into_iter().collect();
            let err = disallowed.check(&conf, "inline configuration").unwrap_err();
            match err {
                ActionError::ForbiddenProperty { property, conf_name } => {
                    assert_eq!(property, key);
                    assert_eq!(conf_name, "inline configuration");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_check_reports_first_sorted_key() {
        let conf: JobConf = [("yarn.resourcemanager.address", "rm"), ("user.name", "x")]
            .into_iter()
            .collect();
        let err = DisallowedProperties::standard()
            .check(&conf, "inline")
            .unwrap_err();
        assert!(err.to_string().contains("[user.name]"));
    }

    #[test]
    fn test_check_rejects_key_with_embedded_value() {
        let disallowed = DisallowedProperties::standard();
        for key in ["user.name=attacker", "fs.default.name=hdfs://evil", "user.name ="] {
            let conf: JobConf = [(key, "")].into_iter().collect();
            let err = disallowed.check(&conf, "inline").unwrap_err();
            assert!(
                matches!(err, ActionError::ForbiddenProperty { .. }),
                "key {key:?}"
            );
        }
    }
}
