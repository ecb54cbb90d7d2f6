//! # elicit-power — Monte Carlo power analysis for label-elicitation studies
//!
//! Estimates statistical power for an experiment comparing three judgment
//! elicitation formats — pairwise comparison (the control), best-worst
//! scaling (BWS), and peer prediction (PP) — by simulating the planned
//! study thousands of times and counting how often the planned hypothesis
//! tests detect the assumed improvements.
//!
//! ## Pipeline
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | 1 | [`config`] | Validated study configurations for the three designs |
//! | 2 | [`simulate`] | Draw one synthetic dataset from a configuration |
//! | 3 | [`hypothesis`] | Run the planned test(s) on one dataset |
//! | 4 | [`power`] | Repeat simulate → test over many seeded trials, aggregate detection rates |
//! | 5 | [`sweep`] | Re-run the estimator across grids of sample size / effect size |
//!
//! [`scenarios`] bundles conservative / moderate / optimistic parameter
//! sets, and [`stats`] holds the shared t-test and ANOVA machinery
//! (p-values via `statrs` distributions).
//!
//! ## Designs
//!
//! - **Omnibus**: three independent arms, one-way ANOVA. Answers "do the
//!   formats differ at all?" without naming a winner.
//! - **Pairwise**: two directional two-sample t-tests (BWS vs control,
//!   PP vs control), optionally Bonferroni-corrected. A comparison counts
//!   as detected only when significant *and* in the hypothesized direction.
//! - **Within-subjects**: every labeler works all three formats; paired
//!   one-sample t-tests on per-labeler mean differences cancel
//!   between-labeler ability, at the cost of modeling learning and
//!   fatigue drift across the session.
//!
//! ## Reproducibility
//!
//! Trials are embarrassingly parallel (rayon). Trial `i` derives its own
//! `SmallRng` from `seed.wrapping_add(i)`, so results are independent of
//! thread count and scheduling.

pub mod config;
pub mod hypothesis;
pub mod power;
pub mod scenarios;
pub mod simulate;
pub mod stats;
pub mod sweep;
