use std::{env, fs, path::PathBuf};

use rustc_version::{Channel, VersionMeta};

/// Embeds the version of the compiling `rustc` into the crate, such that
/// provenance records can describe the environment that built them.
fn main() {
    let version = rustc_version::version_meta().expect("Failed to query the rustc version.");

    let mut path = PathBuf::from(env::var_os("OUT_DIR").expect("Cargo did not set OUT_DIR."));
    path.push("rustc_version.rs");

    fs::write(&path, generate(&version)).expect("Failed to write rustc_version.rs.");
}

fn quoted(value: Option<&String>) -> String {
    value.map_or_else(
        || String::from("None"),
        |value| format!("Some(String::from({value:?}))"),
    )
}

fn generate(version: &VersionMeta) -> String {
    let channel = match version.channel {
        Channel::Dev => "Dev",
        Channel::Nightly => "Nightly",
        Channel::Beta => "Beta",
        Channel::Stable => "Stable",
    };

    let llvm_version = version.llvm_version.as_ref().map_or_else(
        || String::from("None"),
        |llvm| {
            format!(
                "Some(LlvmVersion {{ major: {}, minor: {} }})",
                llvm.major, llvm.minor
            )
        },
    );

    format!(
        "use rustc_version::{{Channel, LlvmVersion, VersionMeta}};
use semver::{{BuildMetadata, Prerelease, Version}};

/// Returns the `rustc` version metadata captured at build time
pub fn version_meta() -> VersionMeta {{
    VersionMeta {{
        semver: Version {{
            major: {major},
            minor: {minor},
            patch: {patch},
            pre: Prerelease::new({pre:?}).unwrap_or(Prerelease::EMPTY),
            build: BuildMetadata::new({build:?}).unwrap_or(BuildMetadata::EMPTY),
        }},
        commit_hash: {commit_hash},
        commit_date: {commit_date},
        build_date: {build_date},
        channel: Channel::{channel},
        host: String::from({host:?}),
        short_version_string: String::from({short:?}),
        llvm_version: {llvm_version},
    }}
}}
",
        major = version.semver.major,
        minor = version.semver.minor,
        patch = version.semver.patch,
        pre = version.semver.pre.as_str(),
        build = version.semver.build.as_str(),
        commit_hash = quoted(version.commit_hash.as_ref()),
        commit_date = quoted(version.commit_date.as_ref()),
        build_date = quoted(version.build_date.as_ref()),
        host = version.host,
        short = version.short_version_string,
    )
}
