use core::num::{NonZeroU64, NonZeroUsize};

use ancestry_core_bond::{NonNegativeF64, PositiveF64};

use super::{wyhash::WyHash, RngCore, RngSampler, SeedableRng};

#[test]
fn seeded_streams_are_reproducible() {
    let mut a = WyHash::seed_from_u64(12);
    let mut b = WyHash::seed_from_u64(12);
    let mut c = WyHash::seed_from_u64(13);

    let a: Vec<u64> = (0..16).map(|_| a.sample_u64()).collect();
    let b: Vec<u64> = (0..16).map(|_| b.sample_u64()).collect();
    let c: Vec<u64> = (0..16).map(|_| c.sample_u64()).collect();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn uniform_samples_stay_in_range() {
    let mut rng = WyHash::seed_from_u64(42);

    for _ in 0..10_000 {
        let u = rng.sample_uniform_closed_open().get();
        assert!((0.0_f64..1.0_f64).contains(&u));

        let v = rng.sample_uniform_open_closed().get();
        assert!(v > 0.0_f64 && v <= 1.0_f64);

        assert!(rng.sample_index(NonZeroUsize::new(3).unwrap()) < 3);
        assert!(rng.sample_index_u64(NonZeroU64::new(300).unwrap()) < 300);
    }
}

#[test]
fn exponential_mean_is_close_to_inverse_rate() {
    let mut rng = WyHash::seed_from_u64(7);
    let lambda = PositiveF64::new(4.0_f64).unwrap();

    let n = 100_000;
    let total: f64 = (0..n).map(|_| rng.sample_exponential(lambda).get()).sum();

    assert!((total / f64::from(n) - 0.25_f64).abs() < 0.01_f64);
}

#[test]
fn poisson_mean_is_close_to_lambda() {
    let mut rng = WyHash::seed_from_u64(99);

    for lambda in [0.0_f64, 0.5_f64, 3.0_f64, 800.0_f64] {
        let n = 20_000_u32;
        #[allow(clippy::cast_precision_loss)]
        let total: f64 = (0..n)
            .map(|_| rng.sample_poisson(NonNegativeF64::new(lambda).unwrap()) as f64)
            .sum();

        let mean = total / f64::from(n);
        assert!(
            (mean - lambda).abs() <= 0.05_f64 * lambda.max(1.0_f64),
            "Poisson({}) mean was {}",
            lambda,
            mean
        );
    }
}
