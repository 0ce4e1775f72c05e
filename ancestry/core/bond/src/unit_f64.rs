bounded_f64!(
    /// A uniform sample in `[0.0, 1.0)`, e.g. to pick a position
    ClosedOpenUnitF64, ClosedOpenUnitF64Error, "[0.0, 1.0)", |value| (0.0..1.0).contains(&value)
);

bounded_f64!(
    /// A uniform sample in `(0.0, 1.0]`, safe to pass to `ln`
    OpenClosedUnitF64, OpenClosedUnitF64Error, "(0.0, 1.0]", |value| value > 0.0 && value <= 1.0
);
