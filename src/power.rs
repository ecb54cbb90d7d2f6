//! Power estimator — repeats simulate → test over many independent trials
//! and aggregates detection rates.
//!
//! Trials run in parallel via rayon; trial `i` seeds its own `SmallRng` from
//! `seed.wrapping_add(i)`, so the estimate is bit-for-bit reproducible for a
//! given (config, seed) pair regardless of thread scheduling, and trials
//! never share randomness.
//!
//! ## Degenerate trials
//!
//! A trial whose test statistic is undefined (zero sample variance is the
//! only way to get there with a validated config) is excluded from every
//! aggregate and counted in `degenerate_trials`. Power denominators use
//! `valid_trials`. If every trial is degenerate the estimator returns an
//! error instead of inventing a power of 0 or 1.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::config::{ConfigError, OmnibusConfig, PairwiseConfig, WithinSubjectsConfig};
use crate::hypothesis::{test_omnibus, test_pairwise, test_within_subjects, OmnibusTrial, TrialResult};
use crate::simulate::{simulate_omnibus, simulate_pairwise, simulate_within_subjects};
use crate::stats::{mean, median, StatError};

/// Power estimation failure.
#[derive(Clone, Debug, PartialEq, Error, Serialize)]
pub enum PowerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("all {0} simulated trials were degenerate; no power estimate defined")]
    AllTrialsDegenerate(usize),
}

/// Advisory progress reporting. Never feeds back into the aggregates; the
/// cadence is completion-count based, so lines may appear out of order under
/// parallel execution.
#[derive(Clone, Copy, Debug)]
pub enum Progress {
    Silent,
    /// Report every `n` completed trials.
    Every(usize),
}

impl Progress {
    #[inline]
    fn tick(&self, completed: usize, total: usize) {
        if let Progress::Every(n) = *self {
            if n > 0 && completed % n == 0 {
                eprintln!("  progress: {}/{} trials", completed, total);
            }
        }
    }
}

/// Mean/median summary of one comparison's p-value distribution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PValueSummary {
    pub mean: f64,
    pub median: f64,
}

fn summarize(p_values: &[f64]) -> PValueSummary {
    PValueSummary {
        mean: mean(p_values),
        median: median(p_values),
    }
}

/// Aggregate power over the two-comparison designs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PowerEstimate {
    /// Trials requested by the configuration.
    pub n_trials: usize,
    /// Trials that produced a defined test statistic.
    pub valid_trials: usize,
    /// Trials excluded for undefined statistics.
    pub degenerate_trials: usize,
    pub power_bws: f64,
    pub power_pp: f64,
    pub power_either: f64,
    pub power_both: f64,
    pub p_values_bws: PValueSummary,
    pub p_values_pp: PValueSummary,
}

impl PowerEstimate {
    /// Comparison-name → power mapping for external consumers.
    pub fn comparisons(&self) -> [(&'static str, f64); 2] {
        [
            ("bws_vs_pairwise", self.power_bws),
            ("pp_vs_pairwise", self.power_pp),
        ]
    }
}

/// Aggregate power for the omnibus design (single unsigned comparison).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OmnibusPowerEstimate {
    pub n_trials: usize,
    pub valid_trials: usize,
    pub degenerate_trials: usize,
    pub power: f64,
    pub p_values: PValueSummary,
}

impl OmnibusPowerEstimate {
    pub fn comparisons(&self) -> [(&'static str, f64); 1] {
        [("formats_omnibus", self.power)]
    }
}

// ── Estimators ──────────────────────────────────────────────────────

/// Estimate omnibus (one-way ANOVA) power.
pub fn estimate_omnibus_power(
    cfg: &OmnibusConfig,
    seed: u64,
    progress: Progress,
) -> Result<OmnibusPowerEstimate, PowerError> {
    cfg.validate()?;
    let total = cfg.n_simulations;
    let completed = AtomicUsize::new(0);

    let trials: Vec<Result<OmnibusTrial, StatError>> = (0..total)
        .into_par_iter()
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            let samples = simulate_omnibus(cfg, &mut rng);
            let out = test_omnibus(cfg.alpha, &samples);
            progress.tick(completed.fetch_add(1, Ordering::Relaxed) + 1, total);
            out
        })
        .collect();

    let valid: Vec<OmnibusTrial> = trials.into_iter().filter_map(|t| t.ok()).collect();
    let degenerate = total - valid.len();
    if valid.is_empty() {
        return Err(PowerError::AllTrialsDegenerate(total));
    }

    let detected = valid.iter().filter(|t| t.detected).count();
    let p_values: Vec<f64> = valid.iter().map(|t| t.p_value).collect();

    Ok(OmnibusPowerEstimate {
        n_trials: total,
        valid_trials: valid.len(),
        degenerate_trials: degenerate,
        power: detected as f64 / valid.len() as f64,
        p_values: summarize(&p_values),
    })
}

/// Estimate power for the two-comparison pairwise design.
pub fn estimate_pairwise_power(
    cfg: &PairwiseConfig,
    seed: u64,
    progress: Progress,
) -> Result<PowerEstimate, PowerError> {
    cfg.validate()?;
    let total = cfg.n_simulations;
    let completed = AtomicUsize::new(0);

    let trials: Vec<Result<TrialResult, StatError>> = (0..total)
        .into_par_iter()
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            let samples = simulate_pairwise(cfg, &mut rng);
            let out = test_pairwise(cfg, &samples);
            progress.tick(completed.fetch_add(1, Ordering::Relaxed) + 1, total);
            out
        })
        .collect();

    aggregate_two_comparison(total, trials)
}

/// Estimate power for the within-subjects (paired) design.
pub fn estimate_within_subjects_power(
    cfg: &WithinSubjectsConfig,
    seed: u64,
    progress: Progress,
) -> Result<PowerEstimate, PowerError> {
    cfg.validate()?;
    let total = cfg.n_simulations;
    let completed = AtomicUsize::new(0);

    let trials: Vec<Result<TrialResult, StatError>> = (0..total)
        .into_par_iter()
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            let observations = simulate_within_subjects(cfg, &mut rng);
            let out = test_within_subjects(cfg, &observations);
            progress.tick(completed.fetch_add(1, Ordering::Relaxed) + 1, total);
            out
        })
        .collect();

    aggregate_two_comparison(total, trials)
}

fn aggregate_two_comparison(
    total: usize,
    trials: Vec<Result<TrialResult, StatError>>,
) -> Result<PowerEstimate, PowerError> {
    let valid: Vec<TrialResult> = trials.into_iter().filter_map(|t| t.ok()).collect();
    let degenerate = total - valid.len();
    if valid.is_empty() {
        return Err(PowerError::AllTrialsDegenerate(total));
    }
    let n = valid.len() as f64;

    let count = |f: fn(&TrialResult) -> bool| valid.iter().filter(|t| f(t)).count() as f64 / n;
    let p_bws: Vec<f64> = valid.iter().map(|t| t.p_value_bws).collect();
    let p_pp: Vec<f64> = valid.iter().map(|t| t.p_value_pp).collect();

    Ok(PowerEstimate {
        n_trials: total,
        valid_trials: valid.len(),
        degenerate_trials: degenerate,
        power_bws: count(|t| t.detected_bws),
        power_pp: count(|t| t.detected_pp),
        power_either: count(|t| t.detected_either),
        power_both: count(|t| t.detected_both),
        p_values_bws: summarize(&p_bws),
        p_values_pp: summarize(&p_pp),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_fails_before_simulating() {
        let cfg = PairwiseConfig {
            alpha: 1.5,
            ..PairwiseConfig::default()
        };
        let err = estimate_pairwise_power(&cfg, 42, Progress::Silent).unwrap_err();
        assert!(matches!(err, PowerError::Config(_)));
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let cfg = PairwiseConfig {
            n_simulations: 300,
            ..PairwiseConfig::default()
        };
        let a = estimate_pairwise_power(&cfg, 42, Progress::Silent).unwrap();
        let b = estimate_pairwise_power(&cfg, 42, Progress::Silent).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let cfg = PairwiseConfig {
            n_simulations: 300,
            ..PairwiseConfig::default()
        };
        let a = estimate_pairwise_power(&cfg, 1, Progress::Silent).unwrap();
        let b = estimate_pairwise_power(&cfg, 2, Progress::Silent).unwrap();
        // Same distributional behavior, different realizations.
        assert_ne!(a.p_values_bws, b.p_values_bws);
    }

    #[test]
    fn test_progress_reporting_does_not_change_aggregates() {
        let cfg = PairwiseConfig {
            n_simulations: 200,
            ..PairwiseConfig::default()
        };
        let silent = estimate_pairwise_power(&cfg, 9, Progress::Silent).unwrap();
        let chatty = estimate_pairwise_power(&cfg, 9, Progress::Every(50)).unwrap();
        assert_eq!(silent, chatty);
    }

    #[test]
    fn test_huge_effect_gives_near_certain_detection() {
        let cfg = PairwiseConfig {
            bws_improvement: 1.0,
            pp_improvement: 1.0,
            noise_std: 0.05,
            n_simulations: 300,
            ..PairwiseConfig::default()
        };
        let est = estimate_pairwise_power(&cfg, 42, Progress::Silent).unwrap();
        assert!(est.power_bws > 0.99, "power_bws={}", est.power_bws);
        assert!(est.power_pp > 0.99);
        assert!(est.power_both > 0.99);
        assert_eq!(est.degenerate_trials, 0);
    }

    #[test]
    fn test_zero_noise_makes_every_trial_degenerate() {
        let cfg = PairwiseConfig {
            noise_std: 0.0,
            n_simulations: 50,
            ..PairwiseConfig::default()
        };
        assert_eq!(
            estimate_pairwise_power(&cfg, 42, Progress::Silent),
            Err(PowerError::AllTrialsDegenerate(50))
        );
    }

    #[test]
    fn test_either_and_both_bracket_individual_powers() {
        let cfg = PairwiseConfig {
            n_simulations: 500,
            ..PairwiseConfig::default()
        };
        let est = estimate_pairwise_power(&cfg, 42, Progress::Silent).unwrap();
        let max_individual = est.power_bws.max(est.power_pp);
        let min_individual = est.power_bws.min(est.power_pp);
        assert!(est.power_either >= max_individual);
        assert!(est.power_both <= min_individual);
    }

    #[test]
    fn test_omnibus_estimate_runs() {
        let cfg = OmnibusConfig {
            n_simulations: 400,
            ..OmnibusConfig::default()
        };
        let est = estimate_omnibus_power(&cfg, 42, Progress::Silent).unwrap();
        assert_eq!(est.n_trials, 400);
        assert_eq!(est.valid_trials, 400);
        // Large separation relative to noise: the omnibus test fires often.
        assert!(est.power > 0.5, "power={}", est.power);
        assert_eq!(est.comparisons()[0].0, "formats_omnibus");
    }

    #[test]
    fn test_within_subjects_estimate_runs() {
        let cfg = WithinSubjectsConfig {
            n_simulations: 300,
            ..WithinSubjectsConfig::default()
        };
        let est = estimate_within_subjects_power(&cfg, 42, Progress::Silent).unwrap();
        assert_eq!(est.valid_trials, 300);
        // Paired design with these effect sizes is very well powered.
        assert!(est.power_bws > 0.9, "power_bws={}", est.power_bws);
    }

    #[test]
    fn test_comparison_names() {
        let cfg = PairwiseConfig {
            n_simulations: 50,
            ..PairwiseConfig::default()
        };
        let est = estimate_pairwise_power(&cfg, 42, Progress::Silent).unwrap();
        let names: Vec<&str> = est.comparisons().iter().map(|c| c.0).collect();
        assert_eq!(names, vec!["bws_vs_pairwise", "pp_vs_pairwise"]);
    }
}
