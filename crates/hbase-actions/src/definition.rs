//! Reading action definitions from workflow XML.
//!
//! An export action looks like:
//!
//! ```xml
//! <hbase-export-snapshot xmlns="uri:oozie:hbase-export-snapshot-action:0.1">
//!     <job-tracker>rm.example.com:8032</job-tracker>
//!     <name-node>hdfs://nn.example.com:8020</name-node>
//!     <snapshot-name>snap1</snapshot-name>
//!     <destination-uri>hdfs://backup/snap1</destination-uri>
//!     <configuration>
//!         <property>
//!             <name>mapreduce.job.queuename</name>
//!             <value>backup</value>
//!         </property>
//!     </configuration>
//! </hbase-export-snapshot>
//! ```

use hbase_actions_core::{ActionError, JobConf};
use quick_xml::de::from_str;
use serde::Deserialize;

// quick_xml serde ignores the root element name and the xmlns attribute,
// so any namespace for the action element is accepted.
#[derive(Debug, Deserialize)]
struct ActionXml {
    #[serde(rename = "job-tracker", default)]
    job_tracker: Option<String>,
    #[serde(rename = "name-node", default)]
    name_node: Option<String>,
    #[serde(rename = "snapshot-name", default)]
    snapshot_name: Option<String>,
    #[serde(rename = "destination-uri", default)]
    destination_uri: Option<String>,
    #[serde(default)]
    configuration: Option<ConfigurationXml>,
}

#[derive(Debug, Deserialize)]
struct ConfigurationXml {
    #[serde(rename = "property", default)]
    properties: Vec<PropertyXml>,
}

#[derive(Debug, Deserialize)]
struct PropertyXml {
    name: String,
    #[serde(default)]
    value: Option<String>,
}

impl ConfigurationXml {
    fn into_job_conf(self) -> Result<JobConf, ActionError> {
        self.properties
            .into_iter()
            .map(|p| {
                let name = p.name.trim();
                // Rendered as `-D name=value`, so a name may not carry its own `=`.
                if name.is_empty() || name.contains(|c: char| c == '=' || c.is_whitespace()) {
                    return Err(ActionError::MalformedXml(format!(
                        "invalid property name {:?}",
                        p.name
                    )));
                }
                Ok((name.to_string(), p.value.unwrap_or_default()))
            })
            .collect()
    }
}

/// Validated parameters of an export action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDefinition {
    /// Coordination (resource manager / job tracker) endpoint.
    pub job_tracker: String,
    /// Filesystem endpoint.
    pub name_node: String,
    pub snapshot_name: String,
    /// Where the snapshot is copied to.
    pub destination_uri: String,
    /// Author-supplied `<configuration>` block, if any.
    pub inline_conf: Option<JobConf>,
}

impl ExportDefinition {
    /// Parse and validate an export action element.
    pub fn parse(xml: &str) -> Result<Self, ActionError> {
        let raw: ActionXml = from_str(xml).map_err(|e| ActionError::MalformedXml(e.to_string()))?;

        Ok(Self {
            job_tracker: required(raw.job_tracker, "job-tracker")?,
            name_node: required(raw.name_node, "name-node")?,
            snapshot_name: required(raw.snapshot_name, "snapshot-name")?,
            destination_uri: required(raw.destination_uri, "destination-uri")?,
            inline_conf: raw
                .configuration
                .map(ConfigurationXml::into_job_conf)
                .transpose()?,
        })
    }
}

fn required(value: Option<String>, element: &'static str) -> Result<String, ActionError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ActionError::MissingField(element)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hbase_actions_core::FailureKind;

    const MINIMAL: &str = r#"
<hbase-export-snapshot xmlns="uri:oozie:hbase-export-snapshot-action:0.1">
    <job-tracker> rm:8032 </job-tracker>
    <name-node>hdfs://nn:8020</name-node>
    <snapshot-name>snap1</snapshot-name>
    <destination-uri>hdfs://backup/snap1</destination-uri>
</hbase-export-snapshot>
"#;

    #[test]
    fn test_parse_minimal() {
        let def = ExportDefinition::parse(MINIMAL).unwrap();
        assert_eq!(def.job_tracker, "rm:8032");
        assert_eq!(def.name_node, "hdfs://nn:8020");
        assert_eq!(def.snapshot_name, "snap1");
        assert_eq!(def.destination_uri, "hdfs://backup/snap1");
        assert!(def.inline_conf.is_none());
    }

    #[test]
    fn test_parse_inline_configuration() {
        let xml = r#"
<hbase-export-snapshot>
    <job-tracker>rm:8032</job-tracker>
    <name-node>hdfs://nn:8020</name-node>
    <snapshot-name>snap1</snapshot-name>
    <destination-uri>hdfs://backup/snap1</destination-uri>
    <configuration>
        <property>
            <name>mapreduce.job.queuename</name>
            <value>backup</value>
            <description>queue for backups</description>
        </property>
        <property>
            <name>mapreduce.map.maxattempts</name>
            <value>2</value>
        </property>
    </configuration>
</hbase-export-snapshot>
"#;
        let def = ExportDefinition::parse(xml).unwrap();
        let inline = def.inline_conf.unwrap();
        assert_eq!(inline.len(), 2);
        assert_eq!(inline.get("mapreduce.job.queuename"), Some("backup"));
        assert_eq!(inline.get("mapreduce.map.maxattempts"), Some("2"));
    }

    #[test]
    fn test_missing_fields_in_order() {
        let xml = r#"
<hbase-export-snapshot>
    <job-tracker>rm:8032</job-tracker>
    <name-node>hdfs://nn:8020</name-node>
</hbase-export-snapshot>
"#;
        let err = ExportDefinition::parse(xml).unwrap_err();
        assert!(matches!(err, ActionError::MissingField("snapshot-name")));
        assert_eq!(err.kind(), FailureKind::MissingField);
    }

    #[test]
    fn test_blank_field_is_missing() {
        let xml = r#"
<hbase-export-snapshot>
    <job-tracker>   </job-tracker>
    <name-node>hdfs://nn:8020</name-node>
    <snapshot-name>snap1</snapshot-name>
    <destination-uri>hdfs://backup/snap1</destination-uri>
</hbase-export-snapshot>
"#;
        let err = ExportDefinition::parse(xml).unwrap_err();
        assert!(matches!(err, ActionError::MissingField("job-tracker")));
    }

    #[test]
    fn test_malformed_xml() {
        for xml in ["", "<hbase-export-snapshot><job-tracker>rm:8032"] {
            let err = ExportDefinition::parse(xml).unwrap_err();
            assert_eq!(err.kind(), FailureKind::MalformedXml, "input: {xml:?}");
        }
    }

    #[test]
    fn test_invalid_property_names() {
        for name in ["user.name=attacker", "", "  ", "mapreduce.job queuename"] {
            let xml = format!(
                r#"
<hbase-export-snapshot>
    <job-tracker>rm:8032</job-tracker>
    <name-node>hdfs://nn:8020</name-node>
    <snapshot-name>snap1</snapshot-name>
    <destination-uri>hdfs://backup/snap1</destination-uri>
    <configuration>
        <property><name>{name}</name><value></value></property>
    </configuration>
</hbase-export-snapshot>
"#
            );
            let err = ExportDefinition::parse(&xml).unwrap_err();
            assert_eq!(err.kind(), FailureKind::MalformedXml, "name: {name:?}");
        }
    }
}
