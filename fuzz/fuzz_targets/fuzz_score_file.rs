//! Fuzz target for score file parsing.
//!
//! Text and JSON score files come from arbitrary users; parsing must return
//! an error on bad input, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sc_core::input::{into_scores_and_labels, parse_json, parse_scores, parse_text};
use sc_core::{evaluate, LabelPolicy, OperatingPoint};

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };

    let _ = parse_scores(content);
    let _ = parse_json(content);

    let Ok(trials) = parse_text(content) else {
        return;
    };
    for policy in [LabelPolicy::Permissive, LabelPolicy::Strict] {
        if let Ok((scores, labels)) = into_scores_and_labels(&trials, policy) {
            if let Ok(point) = OperatingPoint::from_p_target(0.01) {
                let _ = evaluate(&labels, &scores, &point);
            }
        }
    }
});
