use crate::{ClosedOpenUnitF64, NonNegativeF64, OpenClosedUnitF64, PositiveF64};

#[test]
fn non_negative_f64_bounds() {
    assert!(NonNegativeF64::new(0.0_f64).is_ok());
    assert!(NonNegativeF64::new(1000.0_f64).is_ok());
    assert!(NonNegativeF64::new(f64::INFINITY).is_ok());
    assert!(NonNegativeF64::new(-0.5_f64).is_err());
    assert!(NonNegativeF64::new(f64::NAN).is_err());
}

#[test]
fn positive_f64_bounds() {
    assert!(PositiveF64::new(10_000.0_f64).is_ok());
    assert!(PositiveF64::new(0.0_f64).is_err());
    assert!(PositiveF64::new(-1.0_f64).is_err());
    assert!(PositiveF64::new(f64::NAN).is_err());
}

#[test]
fn unit_f64_bounds() {
    assert!(ClosedOpenUnitF64::new(0.0_f64).is_ok());
    assert!(ClosedOpenUnitF64::new(1.0_f64).is_err());
    assert!(OpenClosedUnitF64::new(0.0_f64).is_err());
    assert!(OpenClosedUnitF64::new(1.0_f64).is_ok());
}

#[test]
fn mixed_arithmetic() {
    let time = NonNegativeF64::new(1000.0_f64).unwrap();
    let size = PositiveF64::new(0.5_f64).unwrap();

    assert_eq!((time * size).get(), 500.0_f64);
    assert_eq!((time + size).get(), 1000.5_f64);
    assert!(time > 999.0_f64);
    assert!(NonNegativeF64::zero() < time);
}
