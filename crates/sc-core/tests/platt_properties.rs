//! Property-based tests for calibration and DCF invariants.

use proptest::prelude::*;
use sc_core::{
    compute_actual_dcf, compute_min_dcf, fit_calibration, Labels, OptimizerSettings, PlattModel,
    SmoothedTargets,
};

/// Labeled scores with both classes guaranteed present.
fn trials_strategy() -> impl Strategy<Value = (Vec<f64>, Labels)> {
    prop::collection::vec((-8.0f64..8.0, any::<bool>()), 2..80).prop_map(|mut trials| {
        trials[0].1 = true;
        trials[1].1 = false;
        let scores = trials.iter().map(|(s, _)| *s).collect();
        let labels = trials.iter().map(|(_, l)| *l).collect();
        (scores, labels)
    })
}

/// Integer-valued scores, so positive affine maps cannot merge distinct values.
fn integer_trials_strategy() -> impl Strategy<Value = (Vec<f64>, Labels)> {
    prop::collection::vec((-500i32..500, any::<bool>()), 2..80).prop_map(|mut trials| {
        trials[0].1 = true;
        trials[1].1 = false;
        let scores = trials.iter().map(|(s, _)| f64::from(*s)).collect();
        let labels = trials.iter().map(|(_, l)| *l).collect();
        (scores, labels)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn smoothed_targets_lie_strictly_inside_unit_interval((_, labels) in trials_strategy()) {
        let targets = SmoothedTargets::from_labels(&labels).expect("both classes present");
        prop_assert_eq!(targets.len(), labels.len());
        for &t in &targets.targets {
            prop_assert!(t > 0.0 && t < 1.0, "target {t} outside (0, 1)");
        }
        prop_assert!(targets.hi_target > targets.lo_target);
    }

    #[test]
    fn fit_is_finite_for_two_class_data((scores, labels) in trials_strategy()) {
        let fit = fit_calibration(&scores, &labels, &OptimizerSettings::default())
            .expect("two-class data must fit");
        prop_assert!(fit.model.slope.is_finite(), "slope {}", fit.model.slope);
        prop_assert!(fit.model.intercept.is_finite(), "intercept {}", fit.model.intercept);
        prop_assert!(fit.loss.is_finite() && fit.loss >= 0.0);
    }

    #[test]
    fn positive_slope_preserves_strict_order(
        slope in 1e-3f64..50.0,
        intercept in -20.0f64..20.0,
        a in -100.0f64..100.0,
        gap in 1e-3f64..50.0,
    ) {
        let model = PlattModel::new(slope, intercept);
        let b = a + gap;
        prop_assert!(model.calibrate(a) < model.calibrate(b));
    }

    #[test]
    fn min_dcf_never_exceeds_actual_dcf(
        (scores, labels) in trials_strategy(),
        theta in -10.0f64..10.0,
        beta in 0.01f64..200.0,
    ) {
        let min_dcf = compute_min_dcf(&labels, &scores, beta).unwrap();
        let act_dcf = compute_actual_dcf(&labels, &scores, theta, beta).unwrap();
        prop_assert!(min_dcf <= act_dcf, "min {min_dcf} > act {act_dcf}");
        prop_assert!(min_dcf >= 0.0);
        // Accept-all and reject-all bound the minimum.
        prop_assert!(min_dcf <= 1.0_f64.min(beta) + 1e-12);
    }

    #[test]
    fn min_dcf_is_invariant_under_positive_affine_maps(
        (scores, labels) in integer_trials_strategy(),
        slope in 0.25f64..8.0,
        shift in -50.0f64..50.0,
        beta in 0.1f64..100.0,
    ) {
        let mapped = PlattModel::new(slope, shift).apply(&scores);
        let raw = compute_min_dcf(&labels, &scores, beta).unwrap();
        let transformed = compute_min_dcf(&labels, &mapped, beta).unwrap();
        prop_assert!((raw - transformed).abs() < 1e-12, "{raw} vs {transformed}");
    }
}
