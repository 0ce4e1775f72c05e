#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
extern crate log;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tskit::{TableOutputOptions, TreeSequenceFlags};

use ancestry_core::TreeSequence;

mod metadata;
mod provenance;
mod table;

pub use metadata::PopulationJsonMetadata;
pub use provenance::TskitProvenance;

#[cfg(test)]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum TskitWriterError {
    #[error("tskit rejected the tree sequence: {0}")]
    Tskit(#[from] tskit::TskitError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to encode a provenance record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("the output path {0:?} is not valid UTF-8")]
    NonUtf8Path(PathBuf),
    #[error("the {table} id {id} does not fit into a tskit id")]
    IdOverflow { table: &'static str, id: u32 },
}

/// Writes the `tree_sequence` to `path` in tskit's binary `.trees` format,
/// replacing any existing file and creating missing parent directories.
///
/// # Errors
///
/// Returns `TskitWriterError` if the tables cannot be converted into a tskit
/// tree sequence or if writing the file fails.
pub fn dump_tree_sequence(
    tree_sequence: &TreeSequence,
    path: &Path,
) -> Result<(), TskitWriterError> {
    let output = path
        .to_str()
        .ok_or_else(|| TskitWriterError::NonUtf8Path(path.to_owned()))?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let collection = table::table_collection(tree_sequence.tables())?;

    collection
        .tree_sequence(TreeSequenceFlags::BUILD_INDEXES)?
        .dump(output, TableOutputOptions::default())?;

    info!(
        "Wrote a tree sequence with {} nodes, {} edges and {} mutations to {:?}.",
        tree_sequence.tables().nodes().len(),
        tree_sequence.tables().edges().len(),
        tree_sequence.tables().mutations().len(),
        path,
    );

    Ok(())
}

/// Reads a tree sequence in tskit's binary `.trees` format from `path`
///
/// # Errors
///
/// Returns `TskitWriterError` if the file cannot be read by tskit.
pub fn load_tree_sequence(path: &Path) -> Result<tskit::TreeSequence, TskitWriterError> {
    let input = path
        .to_str()
        .ok_or_else(|| TskitWriterError::NonUtf8Path(path.to_owned()))?;

    Ok(tskit::TreeSequence::load(input)?)
}
