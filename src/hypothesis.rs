//! Hypothesis tester — maps one simulated dataset to detection decisions.
//!
//! The pairwise and within-subjects designs share the same decision rule:
//! per comparison, the two-sided p-value must clear the (possibly
//! Bonferroni-adjusted) threshold AND the statistic must point in the
//! improving direction. A significant effect in the wrong direction is not
//! counted as a detection.

use crate::config::{Format, PairwiseConfig, WithinSubjectsConfig};
use crate::simulate::{IndependentSamples, Observation};
use crate::stats::{one_sample_t, one_way_anova, two_sample_t, StatError, TestOutcome};

/// Outcome of one omnibus (one-way ANOVA) trial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OmnibusTrial {
    pub f_stat: f64,
    pub p_value: f64,
    pub detected: bool,
}

/// Outcome of one two-comparison trial (pairwise or within-subjects).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrialResult {
    pub p_value_bws: f64,
    pub p_value_pp: f64,
    /// Signed statistics; positive means the alternative beat baseline.
    pub t_bws: f64,
    pub t_pp: f64,
    pub detected_bws: bool,
    pub detected_pp: bool,
    pub detected_either: bool,
    pub detected_both: bool,
}

/// Directional criterion: significant AND pointing the hypothesized way.
fn directional_detected(out: TestOutcome, threshold: f64) -> bool {
    out.p_value < threshold && out.statistic > 0.0
}

fn combine(bws: TestOutcome, pp: TestOutcome, threshold: f64) -> TrialResult {
    let detected_bws = directional_detected(bws, threshold);
    let detected_pp = directional_detected(pp, threshold);
    TrialResult {
        p_value_bws: bws.p_value,
        p_value_pp: pp.p_value,
        t_bws: bws.statistic,
        t_pp: pp.statistic,
        detected_bws,
        detected_pp,
        detected_either: detected_bws || detected_pp,
        detected_both: detected_bws && detected_pp,
    }
}

/// One-way ANOVA across the three arms; detection is `p < alpha` with no
/// directional requirement (the omnibus test is inherently unsigned).
pub fn test_omnibus(alpha: f64, samples: &IndependentSamples) -> Result<OmnibusTrial, StatError> {
    let out = one_way_anova(&[
        samples.pairwise.as_slice(),
        samples.bws.as_slice(),
        samples.pp.as_slice(),
    ])?;
    Ok(OmnibusTrial {
        f_stat: out.statistic,
        p_value: out.p_value,
        detected: out.p_value < alpha,
    })
}

/// Two independent two-sample t tests against the baseline arm.
pub fn test_pairwise(
    cfg: &PairwiseConfig,
    samples: &IndependentSamples,
) -> Result<TrialResult, StatError> {
    let bws = two_sample_t(&samples.bws, &samples.pairwise)?;
    let pp = two_sample_t(&samples.pp, &samples.pairwise)?;
    Ok(combine(bws, pp, cfg.alpha_threshold()))
}

/// Paired testing for the within-subjects design: collapse each labeler's
/// annotations to one mean per format, difference against baseline per
/// labeler, and run one-sample t tests of the differences against zero.
///
/// The per-labeler differencing is what cancels the stable ability offset.
pub fn test_within_subjects(
    cfg: &WithinSubjectsConfig,
    observations: &[Observation],
) -> Result<TrialResult, StatError> {
    let means = per_labeler_format_means(cfg.n_labelers, observations)?;

    let mut bws_diff = Vec::with_capacity(cfg.n_labelers);
    let mut pp_diff = Vec::with_capacity(cfg.n_labelers);
    for m in &means {
        bws_diff.push(m[Format::BestWorst.index()] - m[Format::Pairwise.index()]);
        pp_diff.push(m[Format::PeerPrediction.index()] - m[Format::Pairwise.index()]);
    }

    let bws = one_sample_t(&bws_diff, 0.0)?;
    let pp = one_sample_t(&pp_diff, 0.0)?;
    Ok(combine(bws, pp, cfg.alpha_threshold()))
}

/// Mean outcome per labeler per format, indexed `[labeler][format]`.
fn per_labeler_format_means(
    n_labelers: usize,
    observations: &[Observation],
) -> Result<Vec<[f64; 3]>, StatError> {
    if n_labelers == 0 || observations.is_empty() {
        return Err(StatError::TooFewObservations);
    }
    let mut sums = vec![[0.0f64; 3]; n_labelers];
    let mut counts = vec![[0usize; 3]; n_labelers];
    for o in observations {
        if o.labeler_id >= n_labelers {
            return Err(StatError::TooFewObservations);
        }
        sums[o.labeler_id][o.format.index()] += o.value;
        counts[o.labeler_id][o.format.index()] += 1;
    }
    let mut means = Vec::with_capacity(n_labelers);
    for (s, c) in sums.iter().zip(&counts) {
        if c.iter().any(|&n| n == 0) {
            // A labeler missing a format has no paired difference.
            return Err(StatError::TooFewObservations);
        }
        means.push([
            s[0] / c[0] as f64,
            s[1] / c[1] as f64,
            s[2] / c[2] as f64,
        ]);
    }
    Ok(means)
}
