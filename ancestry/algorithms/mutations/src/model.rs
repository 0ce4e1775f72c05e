use core::num::NonZeroUsize;

use ancestry_core::rng::{RngCore, RngSampler};

use crate::MutationError;

pub trait MutationModel: core::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Draws the ancestral state of a new site
    fn ancestral_state<G: RngCore>(&self, rng: &mut G) -> &'static str;

    /// Draws the state that a mutation changes `parent_state` into
    ///
    /// # Errors
    ///
    /// Returns `MutationError::UnknownState` if the model has no transitions
    /// out of `parent_state`.
    fn derived_state<G: RngCore>(
        &self,
        parent_state: &str,
        rng: &mut G,
    ) -> Result<&'static str, MutationError>;
}

const NUCLEOTIDES: [&str; 4] = ["A", "C", "G", "T"];

/// Jukes and Cantor's 1969 model with equal nucleotide frequencies, where
/// every mutation changes a nucleotide into one of the three others.
#[derive(Copy, Clone, Debug, Default)]
pub struct JC69;

impl MutationModel for JC69 {
    fn name(&self) -> &'static str {
        "JC69"
    }

    fn ancestral_state<G: RngCore>(&self, rng: &mut G) -> &'static str {
        NUCLEOTIDES[uniform_index(rng, NUCLEOTIDES.len())]
    }

    fn derived_state<G: RngCore>(
        &self,
        parent_state: &str,
        rng: &mut G,
    ) -> Result<&'static str, MutationError> {
        let parent = NUCLEOTIDES
            .iter()
            .position(|nucleotide| *nucleotide == parent_state)
            .ok_or_else(|| MutationError::UnknownState(parent_state.to_owned()))?;

        let mut derived = uniform_index(rng, NUCLEOTIDES.len() - 1);

        // Skip over the parent nucleotide
        if derived >= parent {
            derived += 1;
        }

        Ok(NUCLEOTIDES[derived])
    }
}

fn uniform_index<G: RngCore>(rng: &mut G, length: usize) -> usize {
    NonZeroUsize::new(length).map_or(0, |length| rng.sample_index(length))
}
