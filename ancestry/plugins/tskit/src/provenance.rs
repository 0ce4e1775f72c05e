use std::io;

use serde::Serialize;

use ancestry_core::provenance::ProvenanceRow;

/// Root of a provenance record in tskit's JSON schema version 1.0.0
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Serialize)]
pub struct TskitProvenance {
    schema_version: &'static str,
    software: TskitProvenanceSoftware,
    parameters: serde_json::Value,
    environment: TskitProvenanceEnvironment,
}

impl TskitProvenance {
    /// Wraps a `provenance` row with the environment of this process
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the operating system cannot be queried.
    pub fn try_new(provenance: &ProvenanceRow) -> io::Result<Self> {
        let mut parameters = serde_json::Map::new();
        parameters.insert(
            String::from("command"),
            serde_json::Value::String(provenance.command.clone()),
        );

        // Flatten the command parameters next to the command name
        match &provenance.parameters {
            serde_json::Value::Object(fields) => {
                parameters.extend(fields.iter().map(|(key, value)| (key.clone(), value.clone())));
            },
            serde_json::Value::Null => (),
            other => {
                parameters.insert(String::from("parameters"), other.clone());
            },
        }

        Ok(Self {
            schema_version: "1.0.0",
            software: TskitProvenanceSoftware {
                name: provenance.software.name.clone(),
                version: provenance.software.version.clone(),
                commit: match git_version::git_version!(fallback = "unknown") {
                    "unknown" => None,
                    commit => Some(commit),
                },
            },
            parameters: serde_json::Value::Object(parameters),
            environment: TskitProvenanceEnvironment::try_new()?,
        })
    }
}

#[derive(Debug, Serialize)]
struct TskitProvenanceSoftware {
    name: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct TskitProvenanceEnvironment {
    os: TskitProvenanceEnvironmentOs,
    rustc: TskitProvenanceEnvironmentRustc,
}

impl TskitProvenanceEnvironment {
    fn try_new() -> io::Result<Self> {
        Ok(Self {
            os: TskitProvenanceEnvironmentOs::try_new()?,
            rustc: TskitProvenanceEnvironmentRustc::new(rustc_version::version_meta()),
        })
    }
}

#[derive(Debug, Serialize)]
struct TskitProvenanceEnvironmentOs {
    system: String,
    node: String,
    release: String,
    version: String,
    machine: String,
}

impl TskitProvenanceEnvironmentOs {
    fn try_new() -> io::Result<Self> {
        let uname = uname::uname()?;

        Ok(Self {
            system: uname.sysname,
            node: uname.nodename,
            release: uname.release,
            version: uname.version,
            machine: uname.machine,
        })
    }
}

#[derive(Debug, Serialize)]
struct TskitProvenanceEnvironmentRustc {
    version: semver::Version,
    channel: String,
    host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    llvm_version: Option<String>,
}

impl TskitProvenanceEnvironmentRustc {
    fn new(meta: ::rustc_version::VersionMeta) -> Self {
        Self {
            version: meta.semver,
            channel: format!("{:?}", meta.channel),
            host: meta.host,
            commit_hash: meta.commit_hash,
            commit_date: meta.commit_date,
            llvm_version: meta.llvm_version.map(|llvm| llvm.to_string()),
        }
    }
}

mod rustc_version {
    include!(concat!(env!("OUT_DIR"), "/rustc_version.rs"));
}
