//! Null calibration: with zero true improvement, detection rates must sit
//! at the analytically expected false-positive levels.
//!
//! The directional criterion halves the two-sided rejection rate (wrong-sign
//! rejections are not detections), so per-comparison null rates are:
//!   uncorrected  alpha / 2 = 0.025
//!   Bonferroni   alpha / 4 = 0.0125
//! The omnibus ANOVA has no directional filter and sits at alpha itself.
//!
//! Bands are ~5 standard errors wide at 10,000 trials.

use elicit_power::config::{OmnibusConfig, PairwiseConfig, WithinSubjectsConfig};
use elicit_power::power::{
    estimate_omnibus_power, estimate_pairwise_power, estimate_within_subjects_power, Progress,
};

const TRIALS: usize = 10_000;
const SEED: u64 = 42;

fn null_pairwise(bonferroni: bool) -> PairwiseConfig {
    PairwiseConfig {
        bws_improvement: 0.0,
        pp_improvement: 0.0,
        bonferroni_correction: bonferroni,
        n_simulations: TRIALS,
        ..PairwiseConfig::default()
    }
}

#[test]
fn test_omnibus_null_rate_matches_alpha() {
    let cfg = OmnibusConfig {
        bws_improvement: 0.0,
        pp_improvement: 0.0,
        n_simulations: TRIALS,
        ..OmnibusConfig::default()
    };
    let est = estimate_omnibus_power(&cfg, SEED, Progress::Silent).unwrap();
    assert!(
        (est.power - 0.05).abs() < 0.011,
        "omnibus null rate {} should be near 0.05",
        est.power
    );
    // Null p-values are uniform on [0, 1].
    assert!((est.p_values.mean - 0.5).abs() < 0.02);
    assert!((est.p_values.median - 0.5).abs() < 0.03);
}

#[test]
fn test_pairwise_null_rate_uncorrected() {
    let est = estimate_pairwise_power(&null_pairwise(false), SEED, Progress::Silent).unwrap();
    assert!(
        (est.power_bws - 0.025).abs() < 0.008,
        "uncorrected null rate {} should be near 0.025",
        est.power_bws
    );
    assert!((est.power_pp - 0.025).abs() < 0.008);
}

#[test]
fn test_pairwise_null_rate_bonferroni() {
    let est = estimate_pairwise_power(&null_pairwise(true), SEED, Progress::Silent).unwrap();
    assert!(
        (est.power_bws - 0.0125).abs() < 0.006,
        "corrected null rate {} should be near 0.0125",
        est.power_bws
    );
    assert!((est.power_pp - 0.0125).abs() < 0.006);
}

#[test]
fn test_within_subjects_null_rate() {
    // Drift zeroed so the paired differences are exactly exchangeable under
    // the null; the directional criterion again halves the corrected rate.
    let cfg = WithinSubjectsConfig {
        bws_improvement: 0.0,
        pp_improvement: 0.0,
        learning_effect: 0.0,
        fatigue_effect: 0.0,
        n_simulations: TRIALS,
        ..WithinSubjectsConfig::default()
    };
    let est = estimate_within_subjects_power(&cfg, SEED, Progress::Silent).unwrap();
    let expected = cfg.alpha_threshold() / 2.0;
    assert!(
        (est.power_bws - expected).abs() < 0.008,
        "within null rate {} should be near {}",
        est.power_bws,
        expected
    );
    assert!((est.power_pp - expected).abs() < 0.008);
}
