use serde::{Deserialize, Serialize};

use ancestry_core_bond::{NonNegativeF64, PositiveF64};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AncestryArguments {
    /// Length of the discrete genome, must be a whole number
    pub sequence_length: PositiveF64,
    /// Per base pair and generation
    pub recombination_rate: NonNegativeF64,
    pub seed: u64,
}
