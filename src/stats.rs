//! Statistical primitives: descriptive summaries and the three tests the
//! designs rely on (pooled two-sample t, one-sample t, one-way ANOVA).
//!
//! All tests are two-sided; direction handling lives in the hypothesis
//! module, which combines the two-sided p-value with the statistic's sign.
//! Degenerate inputs (zero variance, too few observations) surface as
//! [`StatError`] instead of NaN so the power estimator can account for
//! excluded trials explicitly.

use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};
use thiserror::Error;

/// Undefined test statistic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StatError {
    #[error("sample too small for the requested test")]
    TooFewObservations,
    #[error("sample variance is exactly zero; test statistic undefined")]
    DegenerateSample,
}

/// A test statistic with its two-sided p-value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TestOutcome {
    pub statistic: f64,
    pub p_value: f64,
}

// ── Descriptive summaries ───────────────────────────────────────────

/// Arithmetic mean. Zero-length input returns 0.0; callers guard lengths.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Unbiased sample variance (n − 1 denominator). Needs at least 2 values.
pub fn sample_variance(xs: &[f64]) -> Result<f64, StatError> {
    if xs.len() < 2 {
        return Err(StatError::TooFewObservations);
    }
    let m = mean(xs);
    let ss: f64 = xs.iter().map(|&x| (x - m).powi(2)).sum();
    Ok(ss / (xs.len() - 1) as f64)
}

/// Median with midpoint interpolation for even lengths.
pub fn median(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

// ── Hypothesis tests ────────────────────────────────────────────────

/// Two-sided p-value from a t statistic with `df` degrees of freedom.
fn t_p_value(t: f64, df: f64) -> Result<f64, StatError> {
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|_| StatError::TooFewObservations)?;
    Ok((2.0 * dist.sf(t.abs())).clamp(0.0, 1.0))
}

/// Student's pooled-variance two-sample t test, `a` against `b`.
///
/// Positive statistic means `a`'s mean exceeds `b`'s. df = n_a + n_b − 2.
pub fn two_sample_t(a: &[f64], b: &[f64]) -> Result<TestOutcome, StatError> {
    let (na, nb) = (a.len(), b.len());
    if na < 2 || nb < 2 {
        return Err(StatError::TooFewObservations);
    }
    let va = sample_variance(a)?;
    let vb = sample_variance(b)?;
    let df = (na + nb - 2) as f64;
    let pooled = ((na - 1) as f64 * va + (nb - 1) as f64 * vb) / df;
    if pooled <= 0.0 {
        return Err(StatError::DegenerateSample);
    }
    let se = (pooled * (1.0 / na as f64 + 1.0 / nb as f64)).sqrt();
    let t = (mean(a) - mean(b)) / se;
    Ok(TestOutcome {
        statistic: t,
        p_value: t_p_value(t, df)?,
    })
}

/// One-sample t test of `xs` against the constant `mu`. df = n − 1.
pub fn one_sample_t(xs: &[f64], mu: f64) -> Result<TestOutcome, StatError> {
    let n = xs.len();
    if n < 2 {
        return Err(StatError::TooFewObservations);
    }
    let var = sample_variance(xs)?;
    if var <= 0.0 {
        return Err(StatError::DegenerateSample);
    }
    let se = (var / n as f64).sqrt();
    let t = (mean(xs) - mu) / se;
    Ok(TestOutcome {
        statistic: t,
        p_value: t_p_value(t, (n - 1) as f64)?,
    })
}

/// One-way ANOVA over `k` independent groups.
///
/// F = (SSB / (k − 1)) / (SSW / (N − k)); p from the F(k−1, N−k) tail.
pub fn one_way_anova(groups: &[&[f64]]) -> Result<TestOutcome, StatError> {
    let k = groups.len();
    if k < 2 {
        return Err(StatError::TooFewObservations);
    }
    let n_total: usize = groups.iter().map(|g| g.len()).sum();
    if n_total <= k || groups.iter().any(|g| g.is_empty()) {
        return Err(StatError::TooFewObservations);
    }

    let grand_sum: f64 = groups.iter().flat_map(|g| g.iter()).sum();
    let grand_mean = grand_sum / n_total as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for g in groups {
        let gm = mean(g);
        ss_between += g.len() as f64 * (gm - grand_mean).powi(2);
        ss_within += g.iter().map(|&x| (x - gm).powi(2)).sum::<f64>();
    }

    let df_between = (k - 1) as f64;
    let df_within = (n_total - k) as f64;
    if ss_within <= 0.0 {
        return Err(StatError::DegenerateSample);
    }

    let f = (ss_between / df_between) / (ss_within / df_within);
    let dist =
        FisherSnedecor::new(df_between, df_within).map_err(|_| StatError::TooFewObservations)?;
    Ok(TestOutcome {
        statistic: f,
        p_value: dist.sf(f).clamp(0.0, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_mean_and_variance() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(close(mean(&xs), 3.0, 1e-12));
        assert!(close(sample_variance(&xs).unwrap(), 2.5, 1e-12));
    }

    #[test]
    fn test_median_odd_and_even() {
        assert!(close(median(&[3.0, 1.0, 2.0]), 2.0, 1e-12));
        assert!(close(median(&[4.0, 1.0, 3.0, 2.0]), 2.5, 1e-12));
    }

    #[test]
    fn test_two_sample_t_known_value() {
        // Shifted copies: means 3 and 4, equal variances 2.5, pooled se = 1.
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 3.0, 4.0, 5.0, 6.0];
        let out = two_sample_t(&a, &b).unwrap();
        assert!(close(out.statistic, -1.0, 1e-12));
        // scipy.stats.ttest_ind: p = 0.34659...
        assert!(close(out.p_value, 0.3466, 1e-3));
    }

    #[test]
    fn test_two_sample_t_sign_follows_mean_ordering() {
        let lo = [1.0, 2.0, 3.0];
        let hi = [4.0, 5.0, 6.0];
        assert!(two_sample_t(&hi, &lo).unwrap().statistic > 0.0);
        assert!(two_sample_t(&lo, &hi).unwrap().statistic < 0.0);
    }

    #[test]
    fn test_one_sample_t_known_value() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let out = one_sample_t(&xs, 0.0).unwrap();
        // t = 3 / (sqrt(2.5)/sqrt(5)) = 4.2426..., scipy p = 0.01324
        assert!(close(out.statistic, 4.2426, 1e-3));
        assert!(close(out.p_value, 0.01324, 1e-4));
    }

    #[test]
    fn test_anova_known_value() {
        // scipy.stats.f_oneway: F = 3.0, p = 0.125 exactly for these groups.
        let g1 = [1.0, 2.0, 3.0];
        let g2 = [2.0, 3.0, 4.0];
        let g3 = [3.0, 4.0, 5.0];
        let out = one_way_anova(&[&g1, &g2, &g3]).unwrap();
        assert!(close(out.statistic, 3.0, 1e-12));
        assert!(close(out.p_value, 0.125, 1e-10));
    }

    #[test]
    fn test_identical_groups_give_p_one_direction() {
        // No between-group separation: F ~ 0, p ~ 1.
        let g = [1.0, 2.0, 3.0, 4.0];
        let out = one_way_anova(&[&g, &g, &g]).unwrap();
        assert!(close(out.statistic, 0.0, 1e-12));
        assert!(out.p_value > 0.999);
    }

    #[test]
    fn test_zero_variance_is_degenerate() {
        let flat = [0.7, 0.7, 0.7, 0.7];
        let other = [0.9, 0.9, 0.9];
        assert_eq!(
            two_sample_t(&flat, &other),
            Err(StatError::DegenerateSample)
        );
        assert_eq!(one_sample_t(&flat, 0.0), Err(StatError::DegenerateSample));
        assert_eq!(
            one_way_anova(&[&flat, &flat, &flat]),
            Err(StatError::DegenerateSample)
        );
    }

    #[test]
    fn test_too_few_observations() {
        assert_eq!(
            two_sample_t(&[1.0], &[2.0, 3.0]),
            Err(StatError::TooFewObservations)
        );
        assert_eq!(one_sample_t(&[1.0], 0.0), Err(StatError::TooFewObservations));
        assert_eq!(one_way_anova(&[]), Err(StatError::TooFewObservations));
    }
}
