//! Sweep driver — re-estimates power across a grid of study parameters so a
//! planner can read off the cheapest design that clears a power target.
//!
//! Each grid point clones the base configuration, overrides one dimension,
//! and runs the full estimator with a per-point sample budget. A point whose
//! derived configuration fails validation is recorded as an error in place;
//! the sweep keeps going so one bad grid value cannot sink a long run.

use serde::Serialize;

use crate::config::{OmnibusConfig, PairwiseConfig, WithinSubjectsConfig};
use crate::power::{
    estimate_omnibus_power, estimate_pairwise_power, estimate_within_subjects_power,
    OmnibusPowerEstimate, PowerError, PowerEstimate, Progress,
};

/// How pairwise sample sizes scale with the swept per-arm count `n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Allocation {
    /// `n` labelers in every arm.
    Equal,
    /// `2n` in the pairwise control arm, `n` in each treatment arm.
    ControlDouble,
    /// Only the control arm grows; treatment arms stay at the base config.
    ControlOnly,
}

impl Allocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Allocation::Equal => "equal",
            Allocation::ControlDouble => "control_2x",
            Allocation::ControlOnly => "control_only",
        }
    }
}

/// One grid point: the swept value and either an estimate or the error
/// that point produced.
#[derive(Clone, Debug, Serialize)]
pub struct SweepPoint {
    pub value: f64,
    pub outcome: Result<PowerEstimate, PowerError>,
}

/// Grid point for the omnibus design.
#[derive(Clone, Debug, Serialize)]
pub struct OmnibusSweepPoint {
    pub value: f64,
    pub outcome: Result<OmnibusPowerEstimate, PowerError>,
}

// ── Pairwise sweeps ─────────────────────────────────────────────────

/// Sweep per-arm sample size under an allocation rule.
pub fn sweep_sample_size(
    base: &PairwiseConfig,
    sizes: &[usize],
    allocation: Allocation,
    sims_per_point: usize,
    seed: u64,
) -> Vec<SweepPoint> {
    sizes
        .iter()
        .map(|&n| {
            let cfg = PairwiseConfig {
                n_pairwise: match allocation {
                    Allocation::Equal => n,
                    Allocation::ControlDouble => 2 * n,
                    Allocation::ControlOnly => n,
                },
                n_bws: match allocation {
                    Allocation::ControlOnly => base.n_bws,
                    _ => n,
                },
                n_pp: match allocation {
                    Allocation::ControlOnly => base.n_pp,
                    _ => n,
                },
                n_simulations: sims_per_point,
                ..base.clone()
            };
            SweepPoint {
                value: n as f64,
                outcome: estimate_pairwise_power(&cfg, seed, Progress::Silent),
            }
        })
        .collect()
}

/// Sweep the BWS relative improvement; the PP improvement tracks it at 80%,
/// preserving the base config's ordering of the two treatments.
pub fn sweep_effect_size(
    base: &PairwiseConfig,
    effects: &[f64],
    sims_per_point: usize,
    seed: u64,
) -> Vec<SweepPoint> {
    effects
        .iter()
        .map(|&effect| {
            let cfg = PairwiseConfig {
                bws_improvement: effect,
                pp_improvement: effect * 0.8,
                n_simulations: sims_per_point,
                ..base.clone()
            };
            SweepPoint {
                value: effect,
                outcome: estimate_pairwise_power(&cfg, seed, Progress::Silent),
            }
        })
        .collect()
}

// ── Within-subjects sweeps ──────────────────────────────────────────

/// Sweep the labeler count in the within-subjects design.
pub fn sweep_labelers(
    base: &WithinSubjectsConfig,
    counts: &[usize],
    sims_per_point: usize,
    seed: u64,
) -> Vec<SweepPoint> {
    counts
        .iter()
        .map(|&n| {
            let cfg = WithinSubjectsConfig {
                n_labelers: n,
                n_simulations: sims_per_point,
                ..base.clone()
            };
            SweepPoint {
                value: n as f64,
                outcome: estimate_within_subjects_power(&cfg, seed, Progress::Silent),
            }
        })
        .collect()
}

/// Sweep prompts answered per format per labeler.
pub fn sweep_prompts_per_format(
    base: &WithinSubjectsConfig,
    counts: &[usize],
    sims_per_point: usize,
    seed: u64,
) -> Vec<SweepPoint> {
    counts
        .iter()
        .map(|&n| {
            let cfg = WithinSubjectsConfig {
                n_prompts_per_format: n,
                n_simulations: sims_per_point,
                ..base.clone()
            };
            SweepPoint {
                value: n as f64,
                outcome: estimate_within_subjects_power(&cfg, seed, Progress::Silent),
            }
        })
        .collect()
}

// ── Omnibus sweep ───────────────────────────────────────────────────

/// Sweep the BWS relative improvement for the omnibus design, with the PP
/// improvement tracking at 80% as in the pairwise effect sweep.
pub fn sweep_omnibus_effect_size(
    base: &OmnibusConfig,
    effects: &[f64],
    sims_per_point: usize,
    seed: u64,
) -> Vec<OmnibusSweepPoint> {
    effects
        .iter()
        .map(|&effect| {
            let cfg = OmnibusConfig {
                bws_improvement: effect,
                pp_improvement: effect * 0.8,
                n_simulations: sims_per_point,
                ..base.clone()
            };
            OmnibusSweepPoint {
                value: effect,
                outcome: estimate_omnibus_power(&cfg, seed, Progress::Silent),
            }
        })
        .collect()
}

/// Sweep per-format sample size for the omnibus design.
pub fn sweep_omnibus_sample_size(
    base: &OmnibusConfig,
    sizes: &[usize],
    sims_per_point: usize,
    seed: u64,
) -> Vec<OmnibusSweepPoint> {
    sizes
        .iter()
        .map(|&n| {
            let cfg = OmnibusConfig {
                n_labelers_per_format: n,
                n_simulations: sims_per_point,
                ..base.clone()
            };
            OmnibusSweepPoint {
                value: n as f64,
                outcome: estimate_omnibus_power(&cfg, seed, Progress::Silent),
            }
        })
        .collect()
}
