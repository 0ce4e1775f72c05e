use serde::{Deserialize, Serialize};

use ancestry_core_bond::NonNegativeF64;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MutationArguments {
    /// Per base pair and generation
    pub rate: NonNegativeF64,
    pub seed: u64,
}
