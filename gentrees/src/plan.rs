use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use ancestry_algorithms_hudson::AncestryArguments;
use ancestry_algorithms_mutations::MutationArguments;
use ancestry_core::{
    demography::Demography,
    intervals::GenomicIntervals,
    samples::Samples,
};
use ancestry_core_bond::{NonNegativeF64, PositiveF64};

/// The fixture plan that is compiled into the binary
pub const FIXTURES_RON: &str = include_str!("../fixtures.ron");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixturePlan {
    pub demography: DemographyPlan,
    pub samples: Vec<SamplePlan>,
    pub ancestry: AncestryArguments,
    pub mutations: MutationArguments,
    pub outputs: Vec<OutputPlan>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemographyPlan {
    pub populations: Vec<PopulationPlan>,
    #[serde(default)]
    pub splits: Vec<SplitPlan>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PopulationPlan {
    pub name: String,
    pub initial_size: PositiveF64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitPlan {
    pub time: NonNegativeF64,
    pub derived: Vec<String>,
    pub ancestral: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplePlan {
    pub population: String,
    pub individuals: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputPlan {
    pub path: PathBuf,
    /// Restricts the simulated sequence to these intervals before writing
    #[serde(default)]
    pub keep_intervals: Option<Vec<(NonNegativeF64, NonNegativeF64)>>,
    #[serde(default)]
    pub record_provenance: bool,
}

impl FixturePlan {
    /// Parses the fixture plan that ships with the binary
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending field if the plan is invalid.
    pub fn embedded() -> Result<Self> {
        Self::try_parse(FIXTURES_RON)
    }

    /// # Errors
    ///
    /// Returns an error naming the offending field if `ron_plan` is invalid.
    pub fn try_parse(ron_plan: &str) -> Result<Self> {
        try_partial_parse("fixtures", ron_plan)
    }

    /// # Errors
    ///
    /// Returns an error if a population or split is invalid.
    pub fn build_demography(&self) -> Result<Demography> {
        let mut demography = Demography::new();

        for population in &self.demography.populations {
            demography
                .add_population(&population.name, population.initial_size)
                .with_context(|| format!("Failed to add the population {:?}.", population.name))?;
        }

        for split in &self.demography.splits {
            let derived = split.derived.iter().map(String::as_str).collect::<Vec<_>>();

            demography
                .add_population_split(split.time, &derived, &split.ancestral)
                .with_context(|| {
                    format!(
                        "Failed to add the split of {:?} into {:?} at time {}.",
                        split.derived, split.ancestral, split.time
                    )
                })?;
        }

        Ok(demography)
    }

    /// # Errors
    ///
    /// Returns an error if a sampled population is unknown or inactive.
    pub fn build_samples(&self, demography: &Demography) -> Result<Samples> {
        let samples = self
            .samples
            .iter()
            .map(|sample| (sample.population.as_str(), sample.individuals))
            .collect::<Vec<_>>();

        Samples::new(demography, &samples).context("Failed to configure the samples.")
    }
}

impl OutputPlan {
    /// # Errors
    ///
    /// Returns an error if the intervals are invalid for `sequence_length`.
    pub fn intervals(&self, sequence_length: PositiveF64) -> Result<Option<GenomicIntervals>> {
        self.keep_intervals
            .as_ref()
            .map(|intervals| {
                GenomicIntervals::new(intervals.iter().copied(), sequence_length).with_context(
                    || format!("Invalid intervals to keep for {}.", self.path.display()),
                )
            })
            .transpose()
    }
}

fn try_partial_parse<'de, D: Deserialize<'de>>(subcommand: &str, ron_args: &'de str) -> Result<D> {
    let mut de_ron = ron::Deserializer::from_str(ron_args)
        .with_context(|| format!("Failed to create the {subcommand} argument parser."))?;

    let mut track = serde_path_to_error::Track::new();
    let de = serde_path_to_error::Deserializer::new(&mut de_ron, &mut track);

    match D::deserialize(de) {
        Ok(args) => Ok(args),
        Err(err) => {
            let path = track.path();

            Err(anyhow::Error::msg(format!(
                "{}{}{}{}: {}",
                subcommand,
                if path.iter().count() >= 1 { "." } else { "" },
                path,
                if path.iter().count() >= 1 { "" } else { "*" },
                err,
            )))
        },
    }
}
