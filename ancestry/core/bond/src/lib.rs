#![deny(clippy::pedantic)]
#![no_std]

#[macro_use]
mod bounded;

mod non_negative_f64;
mod positive_f64;
mod unit_f64;

pub use non_negative_f64::{NonNegativeF64, NonNegativeF64Error};
pub use positive_f64::{PositiveF64, PositiveF64Error};
pub use unit_f64::{
    ClosedOpenUnitF64, ClosedOpenUnitF64Error, OpenClosedUnitF64, OpenClosedUnitF64Error,
};

#[cfg(test)]
mod tests;
