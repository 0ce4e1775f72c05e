use serde::{Deserialize, Serialize};

/// Records which software command produced or transformed a set of tables.
///
/// The serialisation backend wraps this record into a complete provenance
/// document (schema version, environment) when the tables are written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceRow {
    pub software: ProvenanceSoftware,
    pub command: String,
    pub parameters: serde_json::Value,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceSoftware {
    pub name: String,
    pub version: String,
}

impl ProvenanceRow {
    #[must_use]
    pub fn new(
        software: &str,
        version: &str,
        command: &str,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            software: ProvenanceSoftware {
                name: software.to_owned(),
                version: version.to_owned(),
            },
            command: command.to_owned(),
            parameters,
        }
    }
}
