use ancestry_core_bond::{NonNegativeF64, PositiveF64};

use crate::tables::PopulationId;

use super::{Demography, DemographyError};

fn size(value: f64) -> PositiveF64 {
    PositiveF64::new(value).unwrap()
}

fn time(value: f64) -> NonNegativeF64 {
    NonNegativeF64::new(value).unwrap()
}

fn three_populations() -> Demography {
    let mut demography = Demography::new();

    demography.add_population("A", size(10_000.0)).unwrap();
    demography.add_population("B", size(5_000.0)).unwrap();
    demography.add_population("C", size(1_000.0)).unwrap();

    demography
}

#[test]
fn populations_are_numbered_in_insertion_order() {
    let demography = three_populations();

    assert_eq!(demography.population_id("A").unwrap(), PopulationId::new(0));
    assert_eq!(demography.population_id("C").unwrap(), PopulationId::new(2));
    assert_eq!(
        demography.population(PopulationId::new(1)).unwrap().initial_size,
        size(5_000.0)
    );
    assert!(demography.population(PopulationId::new(3)).is_none());

    assert!(matches!(
        demography.population_id("D"),
        Err(DemographyError::UnknownPopulation(name)) if name == "D"
    ));
}

#[test]
fn population_names_must_be_unique_and_non_empty() {
    let mut demography = three_populations();

    assert!(matches!(
        demography.add_population("B", size(1.0)),
        Err(DemographyError::DuplicatePopulation(_))
    ));
    assert!(matches!(
        demography.add_population("", size(1.0)),
        Err(DemographyError::EmptyName)
    ));
    assert_eq!(demography.populations().len(), 3);
}

#[test]
fn split_deactivates_derived_populations() {
    let mut demography = three_populations();

    demography
        .add_population_split(time(1000.0), &["A", "B"], "C")
        .unwrap();

    let split = &demography.splits()[0];
    assert_eq!(split.derived, vec![PopulationId::new(0), PopulationId::new(1)]);
    assert_eq!(split.ancestral, PopulationId::new(2));

    assert!(demography.is_active(PopulationId::new(0), time(999.0)));
    assert!(!demography.is_active(PopulationId::new(0), time(1000.0)));
    assert!(!demography.is_active(PopulationId::new(1), time(5000.0)));
    assert!(demography.is_active(PopulationId::new(2), time(0.0)));
    assert!(demography.is_active(PopulationId::new(2), time(5000.0)));
}

#[test]
fn invalid_splits_are_rejected() {
    let mut demography = three_populations();

    assert!(matches!(
        demography.add_population_split(time(10.0), &[], "C"),
        Err(DemographyError::NoDerivedPopulations)
    ));
    assert!(matches!(
        demography.add_population_split(time(10.0), &["A", "X"], "C"),
        Err(DemographyError::UnknownPopulation(name)) if name == "X"
    ));
    assert!(matches!(
        demography.add_population_split(time(10.0), &["C"], "C"),
        Err(DemographyError::SelfDerived(_))
    ));
    assert!(matches!(
        demography.add_population_split(time(10.0), &["A", "A"], "C"),
        Err(DemographyError::AlreadyDerived(_))
    ));

    demography
        .add_population_split(time(10.0), &["A"], "B")
        .unwrap();

    assert!(matches!(
        demography.add_population_split(time(20.0), &["A"], "C"),
        Err(DemographyError::AlreadyDerived(_))
    ));
    assert_eq!(demography.splits().len(), 1);
}

#[test]
fn splits_are_sorted_by_time() {
    let mut demography = three_populations();

    demography
        .add_population_split(time(50.0), &["B"], "C")
        .unwrap();
    demography
        .add_population_split(time(10.0), &["A"], "B")
        .unwrap();

    let times: Vec<f64> = demography
        .splits()
        .iter()
        .map(|split| split.time.get())
        .collect();

    assert_eq!(times, vec![10.0, 50.0]);
}

#[test]
fn splits_require_an_active_ancestral_population() {
    let mut demography = three_populations();

    demography
        .add_population_split(time(5.0), &["B"], "C")
        .unwrap();

    assert!(matches!(
        demography.add_population_split(time(10.0), &["A"], "B"),
        Err(DemographyError::InactiveAncestral { name, .. }) if name == "B"
    ));
    assert_eq!(demography.splits().len(), 1);

    let mut demography = three_populations();

    demography
        .add_population_split(time(10.0), &["A"], "B")
        .unwrap();

    assert!(matches!(
        demography.add_population_split(time(5.0), &["B"], "C"),
        Err(DemographyError::InactiveAncestral { name, time: later }) if name == "B" && later == time(10.0)
    ));
    assert_eq!(demography.splits().len(), 1);

    demography
        .add_population_split(time(10.0), &["B"], "C")
        .unwrap_err();
    demography
        .add_population_split(time(20.0), &["B"], "C")
        .unwrap();
    assert!(demography.is_active(PopulationId::new(2), time(20.0)));
}
