use serde::{Deserialize, Serialize};

use ancestry_core_bond::{NonNegativeF64, PositiveF64};

use crate::tables::{PopulationId, TableError};

#[cfg(test)]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum DemographyError {
    #[error("populations must have a non-empty name")]
    EmptyName,
    #[error("the population {0:?} is defined more than once")]
    DuplicatePopulation(String),
    #[error("the population {0:?} is not part of the demography")]
    UnknownPopulation(String),
    #[error("a population split requires at least one derived population")]
    NoDerivedPopulations,
    #[error("the population {0:?} cannot be derived from itself")]
    SelfDerived(String),
    #[error("the population {0:?} is already derived in an earlier split")]
    AlreadyDerived(String),
    #[error("the population {name:?} is no longer active at time {time}")]
    InactiveAncestral { name: String, time: NonNegativeF64 },
    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Population {
    pub name: String,
    pub initial_size: PositiveF64,
}

/// Backwards in time, all lineages in the `derived` populations move into
/// the `ancestral` population at `time`, after which the derived
/// populations become inactive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationSplit {
    pub time: NonNegativeF64,
    pub derived: Vec<PopulationId>,
    pub ancestral: PopulationId,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Demography {
    populations: Vec<Population>,
    splits: Vec<PopulationSplit>,
}

impl Demography {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `DemographyError` if the name is empty or already in use.
    pub fn add_population(
        &mut self,
        name: &str,
        initial_size: PositiveF64,
    ) -> Result<PopulationId, DemographyError> {
        if name.is_empty() {
            return Err(DemographyError::EmptyName);
        }

        if self.populations.iter().any(|population| population.name == name) {
            return Err(DemographyError::DuplicatePopulation(name.to_owned()));
        }

        let id = PopulationId::from_index(self.populations.len())?;

        self.populations.push(Population {
            name: name.to_owned(),
            initial_size,
        });

        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `DemographyError` if any population is unknown, if there are
    /// no derived populations, if the ancestral population is also derived,
    /// if a derived population was already derived in another split, or if
    /// a split would move lineages into an inactive population.
    pub fn add_population_split(
        &mut self,
        time: NonNegativeF64,
        derived: &[&str],
        ancestral: &str,
    ) -> Result<(), DemographyError> {
        if derived.is_empty() {
            return Err(DemographyError::NoDerivedPopulations);
        }

        let ancestral_id = self.population_id(ancestral)?;

        if !self.is_active(ancestral_id, time) {
            return Err(DemographyError::InactiveAncestral {
                name: ancestral.to_owned(),
                time,
            });
        }

        let mut derived_ids = Vec::with_capacity(derived.len());

        for name in derived {
            let id = self.population_id(name)?;

            if id == ancestral_id {
                return Err(DemographyError::SelfDerived((*name).to_owned()));
            }

            if derived_ids.contains(&id)
                || self.splits.iter().any(|split| split.derived.contains(&id))
            {
                return Err(DemographyError::AlreadyDerived((*name).to_owned()));
            }

            // Later splits cannot move lineages into a population derived here
            if let Some(later) = self
                .splits
                .iter()
                .find(|split| split.ancestral == id && split.time >= time)
            {
                return Err(DemographyError::InactiveAncestral {
                    name: (*name).to_owned(),
                    time: later.time,
                });
            }

            derived_ids.push(id);
        }

        self.splits.push(PopulationSplit {
            time,
            derived: derived_ids,
            ancestral: ancestral_id,
        });

        // Splits are kept in the order in which they happen backwards in time
        self.splits.sort_by_key(|split| split.time);

        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DemographyError::UnknownPopulation` if there is no
    /// population called `name`.
    pub fn population_id(&self, name: &str) -> Result<PopulationId, DemographyError> {
        self.populations
            .iter()
            .position(|population| population.name == name)
            .and_then(|index| PopulationId::from_index(index).ok())
            .ok_or_else(|| DemographyError::UnknownPopulation(name.to_owned()))
    }

    #[must_use]
    pub fn population(&self, id: PopulationId) -> Option<&Population> {
        self.populations.get(id.index())
    }

    #[must_use]
    pub fn populations(&self) -> &[Population] {
        &self.populations
    }

    /// Returns the population splits sorted by increasing time
    #[must_use]
    pub fn splits(&self) -> &[PopulationSplit] {
        &self.splits
    }

    /// Checks whether lineages can still live in `population` at `time`,
    /// i.e. whether it has not yet been merged into an ancestral population.
    #[must_use]
    pub fn is_active(&self, population: PopulationId, time: NonNegativeF64) -> bool {
        population.index() < self.populations.len()
            && !self
                .splits
                .iter()
                .any(|split| split.time <= time && split.derived.contains(&population))
    }
}
