use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use ancestry_core_bond::NonNegativeF64;

use crate::{
    demography::{Demography, DemographyError},
    tables::PopulationId,
};

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error(transparent)]
    Demography(#[from] DemographyError),
    #[error("the population {0:?} is not active at the sampling time")]
    InactivePopulation(String),
    #[error("the population {0:?} is sampled more than once")]
    DuplicateSampleSet(String),
}

/// A number of individuals sampled from one population at time zero
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSet {
    pub population: PopulationId,
    pub num_individuals: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Samples {
    sets: Vec<SampleSet>,
    ploidy: NonZeroU32,
}

impl Samples {
    /// # Errors
    ///
    /// Returns `SampleError` if a population is not part of the `demography`,
    /// is already inactive at time zero, or is named more than once.
    pub fn new(demography: &Demography, samples: &[(&str, u32)]) -> Result<Self, SampleError> {
        let mut sets: Vec<SampleSet> = Vec::with_capacity(samples.len());

        for (name, num_individuals) in samples {
            let population = demography.population_id(name)?;

            if !demography.is_active(population, NonNegativeF64::zero()) {
                return Err(SampleError::InactivePopulation((*name).to_owned()));
            }

            if sets.iter().any(|set| set.population == population) {
                return Err(SampleError::DuplicateSampleSet((*name).to_owned()));
            }

            sets.push(SampleSet {
                population,
                num_individuals: *num_individuals,
            });
        }

        Ok(Self {
            sets,
            ploidy: Self::default_ploidy(),
        })
    }

    #[must_use]
    pub fn with_ploidy(mut self, ploidy: NonZeroU32) -> Self {
        self.ploidy = ploidy;
        self
    }

    #[must_use]
    pub fn sets(&self) -> &[SampleSet] {
        &self.sets
    }

    #[must_use]
    pub fn ploidy(&self) -> NonZeroU32 {
        self.ploidy
    }

    #[must_use]
    pub fn num_individuals(&self) -> u64 {
        self.sets
            .iter()
            .map(|set| u64::from(set.num_individuals))
            .sum()
    }

    /// Every sampled individual contributes `ploidy` sample nodes
    #[must_use]
    pub fn num_nodes(&self) -> u64 {
        self.num_individuals() * u64::from(self.ploidy.get())
    }

    fn default_ploidy() -> NonZeroU32 {
        NonZeroU32::MIN.saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroU32;

    use ancestry_core_bond::{NonNegativeF64, PositiveF64};

    use crate::{demography::Demography, tables::PopulationId};

    use super::{SampleError, Samples};

    fn demography() -> Demography {
        let mut demography = Demography::new();

        demography
            .add_population("A", PositiveF64::new(10_000.0).unwrap())
            .unwrap();
        demography
            .add_population("B", PositiveF64::new(5_000.0).unwrap())
            .unwrap();
        demography
            .add_population("C", PositiveF64::new(1_000.0).unwrap())
            .unwrap();
        demography
            .add_population_split(NonNegativeF64::new(1000.0).unwrap(), &["A", "B"], "C")
            .unwrap();

        demography
    }

    #[test]
    fn diploid_individuals_by_default() {
        let samples = Samples::new(&demography(), &[("A", 1), ("B", 1)]).unwrap();

        assert_eq!(samples.ploidy().get(), 2);
        assert_eq!(samples.num_individuals(), 2);
        assert_eq!(samples.num_nodes(), 4);
        assert_eq!(samples.sets()[1].population, PopulationId::new(1));

        let haploid = samples.with_ploidy(NonZeroU32::new(1).unwrap());
        assert_eq!(haploid.num_nodes(), 2);
    }

    #[test]
    fn sampled_populations_must_exist_and_be_active() {
        assert!(matches!(
            Samples::new(&demography(), &[("D", 1)]),
            Err(SampleError::Demography(_))
        ));
        assert!(matches!(
            Samples::new(&demography(), &[("A", 1), ("A", 2)]),
            Err(SampleError::DuplicateSampleSet(_))
        ));

        let mut demography = demography();
        demography
            .add_population("E", PositiveF64::new(100.0).unwrap())
            .unwrap();
        demography
            .add_population_split(NonNegativeF64::zero(), &["E"], "C")
            .unwrap();

        assert!(matches!(
            Samples::new(&demography, &[("E", 3)]),
            Err(SampleError::InactivePopulation(name)) if name == "E"
        ));
        assert!(Samples::new(&demography, &[("C", 3)]).is_ok());
    }
}
