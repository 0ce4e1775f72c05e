use core::num::{NonZeroU64, NonZeroUsize};

use ancestry_core_bond::{ClosedOpenUnitF64, NonNegativeF64, OpenClosedUnitF64, PositiveF64};

pub mod wyhash;

#[allow(clippy::module_name_repetitions)]
pub trait RngCore: Sized + Clone + core::fmt::Debug {
    type Seed: AsMut<[u8]> + Default + Sized;

    #[must_use]
    fn from_seed(seed: Self::Seed) -> Self;

    #[must_use]
    fn sample_u64(&mut self) -> u64;
}

#[allow(clippy::module_name_repetitions)]
pub trait SeedableRng: RngCore {
    #[must_use]
    fn seed_from_u64(mut state: u64) -> Self {
        // Implementation from:
        // https://docs.rs/rand/0.7.3/rand/trait.SeedableRng.html#method.seed_from_u64

        // We use PCG32 to generate a u32 sequence, and copy to the seed
        const MUL: u64 = 6_364_136_223_846_793_005_u64;
        const INC: u64 = 11_634_580_027_462_260_723_u64;

        let mut seed = Self::Seed::default();

        for chunk in seed.as_mut().chunks_mut(4) {
            // We advance the state first (to get away from the input value,
            // in case it has low Hamming Weight).
            state = state.wrapping_mul(MUL).wrapping_add(INC);

            // Use PCG output function with to_le to generate x:
            #[allow(clippy::cast_possible_truncation)]
            let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
            #[allow(clippy::cast_possible_truncation)]
            let rot = (state >> 59) as u32;
            let x = xorshifted.rotate_right(rot).to_le_bytes();

            let len = chunk.len();
            chunk.copy_from_slice(&x[..len]);
        }

        Self::from_seed(seed)
    }
}

impl<R: RngCore> SeedableRng for R {}

#[allow(clippy::module_name_repetitions)]
pub trait RngSampler: RngCore {
    #[must_use]
    #[inline]
    fn sample_uniform_closed_open(&mut self) -> ClosedOpenUnitF64 {
        // http://prng.di.unimi.it -> Generating uniform doubles in the unit interval
        #[allow(clippy::cast_precision_loss)]
        let u01 = ((self.sample_u64() >> 11) as f64) * f64::from_bits(0x3CA0_0000_0000_0000_u64); // 0x1.0p-53

        unsafe { ClosedOpenUnitF64::new_unchecked(u01) }
    }

    #[must_use]
    #[inline]
    fn sample_uniform_open_closed(&mut self) -> OpenClosedUnitF64 {
        #[allow(clippy::cast_precision_loss)]
        let u01 =
            (((self.sample_u64() >> 11) + 1) as f64) * f64::from_bits(0x3CA0_0000_0000_0000_u64); // 0x1.0p-53

        unsafe { OpenClosedUnitF64::new_unchecked(u01) }
    }

    #[must_use]
    #[inline]
    fn sample_index_u64(&mut self, length: NonZeroU64) -> u64 {
        // Sample U(0, length - 1) using a widening multiplication
        // Note: Some slight bias is traded for only needing one u64 sample
        #[allow(clippy::cast_possible_truncation)]
        {
            ((u128::from(self.sample_u64()) * u128::from(length.get())) >> 64) as u64
        }
    }

    #[must_use]
    #[inline]
    fn sample_index(&mut self, length: NonZeroUsize) -> usize {
        #[allow(clippy::cast_possible_truncation)]
        let index = self.sample_index_u64(unsafe { NonZeroU64::new_unchecked(length.get() as u64) })
            as usize;

        index
    }

    #[must_use]
    fn sample_exponential(&mut self, lambda: PositiveF64) -> NonNegativeF64 {
        let u01 = self.sample_uniform_open_closed();

        // Inverse transform sample: X = -ln(U(0,1]) / lambda
        unsafe { NonNegativeF64::new_unchecked(-u01.get().ln() / lambda.get()) }
    }

    #[must_use]
    fn sample_standard_normal_2d(&mut self) -> (f64, f64) {
        // Basic Box-Muller transform
        let u0 = self.sample_uniform_open_closed();
        let u1 = self.sample_uniform_closed_open();

        let r = (-2.0_f64 * u0.get().ln()).sqrt();
        let theta = -core::f64::consts::TAU * u1.get();

        (r * theta.sin(), r * theta.cos())
    }

    #[must_use]
    fn sample_poisson(&mut self, lambda: NonNegativeF64) -> u64 {
        let no_event_probability = (-lambda.get()).exp();

        if no_event_probability <= 0.0_f64 {
            // Fallback in case no_event_probability underflows
            // Note: rust clamps f64 as u64 to [0, 2^64 - 1]
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let normal_as_poisson = (self.sample_standard_normal_2d().0 * lambda.get().sqrt()
                + lambda.get())
            .round() as u64;

            return normal_as_poisson;
        }

        // https://en.wikipedia.org/w/index.php?title=Poisson_distribution&oldid=1088559556#cite_ref-Devroye1986_61-0
        let mut poisson = 0_u64;
        let mut prod = no_event_probability;
        let mut acc = no_event_probability;

        let u = self.sample_uniform_closed_open();

        #[allow(clippy::cast_precision_loss)]
        while u > acc && prod > 0.0_f64 {
            poisson += 1;
            prod *= lambda.get() / (poisson as f64);
            acc += prod;
        }

        poisson
    }
}

impl<R: RngCore> RngSampler for R {}

#[cfg(test)]
mod tests;
