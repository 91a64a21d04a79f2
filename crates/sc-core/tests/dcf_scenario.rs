//! End-to-end calibration scenario on synthetic Gaussian scores.
//!
//! 1000 target scores ~ N(0, 1) and 10000 non-target scores ~ N(-3, 1),
//! evaluated at p_target = 0.01 (theta = ln 99).

use sc_config::SyntheticSection;
use sc_core::synthetic::{generate, SyntheticTrials};
use sc_core::{
    apply_calibration, evaluate, fit_calibration, CalibrationError, Labels, OperatingPoint,
    OptimizerSettings,
};

fn scenario() -> (SyntheticSection, SyntheticTrials) {
    let section = SyntheticSection::default();
    let trials = generate(&section).expect("default synthetic section is valid");
    (section, trials)
}

#[test]
fn calibration_narrows_the_dcf_gap() {
    let (_, trials) = scenario();
    let point = OperatingPoint::from_p_target(0.01).unwrap();

    let before = evaluate(&trials.labels, &trials.scores, &point).unwrap();
    // Raw scores almost never exceed ln 99, so nearly every target is missed.
    assert!(before.act_dcf > before.min_dcf);
    assert!(before.act_dcf > 0.95, "actDCF before = {}", before.act_dcf);

    let fit = fit_calibration(&trials.scores, &trials.labels, &OptimizerSettings::default())
        .unwrap()
        .ensure_converged()
        .unwrap();
    let calibrated = apply_calibration(&trials.scores, fit.model.slope, fit.model.intercept);
    let after = evaluate(&trials.labels, &calibrated, &point).unwrap();

    assert!((after.min_dcf - before.min_dcf).abs() < 1e-12);
    assert!(
        after.calibration_gap < before.calibration_gap,
        "gap before {} after {}",
        before.calibration_gap,
        after.calibration_gap
    );
    assert!(after.act_dcf < 0.8, "actDCF after = {}", after.act_dcf);
    assert!(after.min_dcf <= after.act_dcf);
}

#[test]
fn fit_recovers_the_true_llr_roughly() {
    let (section, trials) = scenario();
    let (true_slope, true_intercept) = SyntheticTrials::true_llr(&section);
    let fit = fit_calibration(&trials.scores, &trials.labels, &OptimizerSettings::default()).unwrap();

    assert!(fit.converged, "termination: {}", fit.termination);
    assert!(
        (fit.model.slope - true_slope).abs() < 0.5,
        "slope {} vs {}",
        fit.model.slope,
        true_slope
    );
    assert!(
        (fit.model.intercept - true_intercept).abs() < 0.7,
        "intercept {} vs {}",
        fit.model.intercept,
        true_intercept
    );
}

#[test]
fn refitting_calibrated_scores_is_a_fixed_point() {
    let (_, trials) = scenario();
    let settings = OptimizerSettings::default();
    let first = fit_calibration(&trials.scores, &trials.labels, &settings).unwrap();
    let calibrated = first.model.apply(&trials.scores);

    let second = fit_calibration(&calibrated, &trials.labels, &settings).unwrap();
    assert!(
        (second.model.slope - 1.0).abs() < 1e-3,
        "refit slope {}",
        second.model.slope
    );
    assert!(
        second.model.intercept.abs() < 1e-2,
        "refit intercept {}",
        second.model.intercept
    );
}

#[test]
fn single_class_input_is_a_domain_error() {
    let (_, trials) = scenario();
    let targets_only: Labels = vec![true; trials.scores.len()].into();
    let err = fit_calibration(&trials.scores, &targets_only, &OptimizerSettings::default())
        .unwrap_err();
    assert!(err.is_domain_error());
    assert!(matches!(err, CalibrationError::SingleClass { negatives: 0, .. }));

    let point = OperatingPoint::from_p_target(0.01).unwrap();
    assert!(evaluate(&targets_only, &trials.scores, &point).is_err());
}
