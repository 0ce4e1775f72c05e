#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
extern crate log;

pub mod demography;
pub mod intervals;
pub mod provenance;
pub mod rng;
pub mod samples;
pub mod tables;
pub mod tree_sequence;

pub use tree_sequence::TreeSequence;
