#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
extern crate log;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use ancestry_algorithms_hudson::simulate_ancestry;
use ancestry_algorithms_mutations::simulate_mutations;
use ancestry_core::TreeSequence;
use ancestry_plugins_tskit::dump_tree_sequence;

pub mod plan;

use plan::FixturePlan;

/// A tree sequence together with the path it is written to
#[derive(Debug)]
pub struct Fixture {
    pub path: PathBuf,
    pub tree_sequence: TreeSequence,
}

/// Simulates the ancestry and mutations described by the `plan` and derives
/// one tree sequence per output.
///
/// # Errors
///
/// Returns an error if the plan is inconsistent or if any simulation step
/// fails.
pub fn generate(plan: &FixturePlan) -> Result<Vec<Fixture>> {
    let demography = plan.build_demography()?;
    let samples = plan.build_samples(&demography)?;

    let ancestry = simulate_ancestry(&demography, &samples, &plan.ancestry)
        .context("Failed to simulate the ancestry.")?;
    let mutated =
        simulate_mutations(&ancestry, &plan.mutations).context("Failed to simulate mutations.")?;

    plan.outputs
        .iter()
        .map(|output| -> Result<Fixture> {
            let tree_sequence = match output.intervals(mutated.sequence_length())? {
                Some(intervals) => mutated
                    .keep_intervals(&intervals, output.record_provenance)
                    .with_context(|| {
                        format!(
                            "Failed to keep the intervals {} for {}.",
                            intervals,
                            output.path.display()
                        )
                    })?,
                None => mutated.clone(),
            };

            Ok(Fixture {
                path: output.path.clone(),
                tree_sequence,
            })
        })
        .collect()
}

/// Writes every fixture relative to `base_dir`, overwriting existing files
///
/// # Errors
///
/// Returns an error if any fixture cannot be written.
pub fn write(fixtures: &[Fixture], base_dir: &Path) -> Result<()> {
    for fixture in fixtures {
        let path = base_dir.join(&fixture.path);

        dump_tree_sequence(&fixture.tree_sequence, &path)
            .with_context(|| format!("Failed to write the tree sequence to {}.", path.display()))?;
    }

    info!("Wrote {} fixtures into {}.", fixtures.len(), base_dir.display());

    Ok(())
}
