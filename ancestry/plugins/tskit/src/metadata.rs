use std::io;

use serde::{Deserialize, Serialize};
use tskit::metadata::{MetadataError, MetadataRoundtrip, PopulationMetadata};

use ancestry_core::tables::PopulationRow;

/// JSON-encoded population metadata, i.e. `{"name": .., "description": ..}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationJsonMetadata {
    pub name: String,
    pub description: String,
}

impl From<&PopulationRow> for PopulationJsonMetadata {
    fn from(population: &PopulationRow) -> Self {
        Self {
            name: population.name.clone(),
            description: population.description.clone(),
        }
    }
}

impl MetadataRoundtrip for PopulationJsonMetadata {
    fn encode(&self) -> Result<Vec<u8>, MetadataError> {
        serde_json::to_vec(self).map_err(|err| MetadataError::RoundtripError {
            value: Box::new(io::Error::new(io::ErrorKind::InvalidData, err)),
        })
    }

    fn decode(metadata: &[u8]) -> Result<Self, MetadataError>
    where
        Self: Sized,
    {
        serde_json::from_slice(metadata).map_err(|err| MetadataError::RoundtripError {
            value: Box::new(io::Error::new(io::ErrorKind::InvalidData, err)),
        })
    }
}

impl PopulationMetadata for PopulationJsonMetadata {}
