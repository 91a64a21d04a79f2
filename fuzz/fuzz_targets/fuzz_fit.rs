//! Fuzz target for fitting and evaluation on arbitrary trials.
//!
//! Any finite two-class input must yield finite parameters.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sc_core::{fit_calibration, Labels, OptimizerSettings};

#[derive(Debug, Arbitrary)]
struct FitInput {
    trials: Vec<(f64, bool)>,
    max_iterations: u8,
}

fuzz_target!(|input: FitInput| {
    let scores: Vec<f64> = input.trials.iter().map(|(s, _)| *s).collect();
    let labels: Labels = input.trials.iter().map(|(_, l)| *l).collect();
    let settings = OptimizerSettings {
        max_iterations: usize::from(input.max_iterations).max(1),
        ..OptimizerSettings::default()
    };

    if let Ok(fit) = fit_calibration(&scores, &labels, &settings) {
        assert!(fit.model.slope.is_finite());
        assert!(fit.model.intercept.is_finite());
    }
});
