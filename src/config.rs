//! Design configurations for the three experimental designs.
//!
//! Each design variant gets its own immutable parameter record:
//!
//! - [`OmnibusConfig`]: one-way ANOVA across three independent arms
//! - [`PairwiseConfig`]: two two-sample comparisons against the baseline arm
//! - [`WithinSubjectsConfig`]: repeated measures, every labeler uses all formats
//!
//! Records are plain structs with public fields so sweeps can build variants
//! with struct-update syntax. Every estimator entry point calls `validate()`
//! before simulating, so a degenerate configuration fails fast instead of
//! producing undefined statistics.

use serde::Serialize;
use thiserror::Error;

// ── Elicitation formats ─────────────────────────────────────────────

/// The three judgment elicitation formats under comparison.
/// `Pairwise` is the baseline (standard of care).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum Format {
    Pairwise,
    BestWorst,
    PeerPrediction,
}

/// All formats, in canonical order (baseline first).
pub const FORMATS: [Format; 3] = [Format::Pairwise, Format::BestWorst, Format::PeerPrediction];

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Pairwise => "pairwise",
            Format::BestWorst => "bws",
            Format::PeerPrediction => "pp",
        }
    }

    /// Dense index into per-format arrays (canonical order).
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Format::Pairwise => 0,
            Format::BestWorst => 1,
            Format::PeerPrediction => 2,
        }
    }
}

// ── Validation errors ───────────────────────────────────────────────

/// Rejected configuration. Raised before any trial is simulated.
#[derive(Clone, Debug, PartialEq, Error, Serialize)]
pub enum ConfigError {
    #[error("{field} must be at least {min}, got {got}")]
    SampleTooSmall {
        field: &'static str,
        min: usize,
        got: usize,
    },
    #[error("n_simulations must be positive")]
    ZeroSimulations,
    #[error("alpha must lie in (0, 1), got {0}")]
    AlphaOutOfRange(f64),
    #[error("{field} must be a non-negative finite number, got {got}")]
    NegativeNoise { field: &'static str, got: f64 },
    #[error("baseline_accuracy must be positive and finite, got {0}")]
    BadBaseline(f64),
    #[error("{field} must be finite, got {got}")]
    NonFinite { field: &'static str, got: f64 },
}

fn check_alpha(alpha: f64) -> Result<(), ConfigError> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(ConfigError::AlphaOutOfRange(alpha));
    }
    Ok(())
}

fn check_noise(field: &'static str, sd: f64) -> Result<(), ConfigError> {
    if !(sd.is_finite() && sd >= 0.0) {
        return Err(ConfigError::NegativeNoise { field, got: sd });
    }
    Ok(())
}

fn check_baseline(acc: f64) -> Result<(), ConfigError> {
    if !(acc.is_finite() && acc > 0.0) {
        return Err(ConfigError::BadBaseline(acc));
    }
    Ok(())
}

fn check_finite(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if !v.is_finite() {
        return Err(ConfigError::NonFinite { field, got: v });
    }
    Ok(())
}

fn check_sample(field: &'static str, min: usize, got: usize) -> Result<(), ConfigError> {
    if got < min {
        return Err(ConfigError::SampleTooSmall { field, min, got });
    }
    Ok(())
}

fn check_sims(n: usize) -> Result<(), ConfigError> {
    if n == 0 {
        return Err(ConfigError::ZeroSimulations);
    }
    Ok(())
}

// ── Omnibus design ──────────────────────────────────────────────────

/// Three independent arms of equal size, tested with one-way ANOVA.
#[derive(Clone, Debug, Serialize)]
pub struct OmnibusConfig {
    /// Diagnostic label, free text.
    pub name: String,
    /// Labelers in each of the three arms.
    pub n_labelers_per_format: usize,
    /// Relative improvement of best-worst scaling over the baseline.
    pub bws_improvement: f64,
    /// Relative improvement of peer prediction over the baseline.
    pub pp_improvement: f64,
    /// True accuracy of the baseline (pairwise) format.
    pub baseline_accuracy: f64,
    /// Inter-rater disagreement SD, shared by all arms.
    pub noise_std: f64,
    pub alpha: f64,
    pub n_simulations: usize,
}

impl Default for OmnibusConfig {
    fn default() -> Self {
        Self {
            name: "omnibus".to_string(),
            n_labelers_per_format: 10,
            bws_improvement: 0.30,
            pp_improvement: 0.25,
            baseline_accuracy: 0.70,
            noise_std: 0.15,
            alpha: 0.05,
            n_simulations: 10_000,
        }
    }
}

impl OmnibusConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // ANOVA needs within-group degrees of freedom: N - k > 0.
        check_sample("n_labelers_per_format", 2, self.n_labelers_per_format)?;
        check_finite("bws_improvement", self.bws_improvement)?;
        check_finite("pp_improvement", self.pp_improvement)?;
        check_baseline(self.baseline_accuracy)?;
        check_noise("noise_std", self.noise_std)?;
        check_alpha(self.alpha)?;
        check_sims(self.n_simulations)
    }

    /// True per-arm accuracies in canonical format order.
    pub fn true_accuracies(&self) -> [f64; 3] {
        true_accuracies(
            self.baseline_accuracy,
            self.bws_improvement,
            self.pp_improvement,
        )
    }
}

// ── Pairwise-comparison design ──────────────────────────────────────

/// Two independent two-sample comparisons against the baseline arm,
/// with optional Bonferroni correction for the two-test family.
#[derive(Clone, Debug, Serialize)]
pub struct PairwiseConfig {
    pub name: String,
    /// Baseline (control) arm size.
    pub n_pairwise: usize,
    /// Best-worst scaling arm size.
    pub n_bws: usize,
    /// Peer prediction arm size.
    pub n_pp: usize,
    pub bws_improvement: f64,
    pub pp_improvement: f64,
    pub baseline_accuracy: f64,
    pub noise_std: f64,
    pub alpha: f64,
    /// Divide alpha by 2 (two comparisons share one family budget).
    pub bonferroni_correction: bool,
    pub n_simulations: usize,
}

impl Default for PairwiseConfig {
    fn default() -> Self {
        Self {
            name: "pairwise".to_string(),
            n_pairwise: 10,
            n_bws: 10,
            n_pp: 10,
            bws_improvement: 0.30,
            pp_improvement: 0.25,
            baseline_accuracy: 0.70,
            noise_std: 0.15,
            alpha: 0.05,
            bonferroni_correction: true,
            n_simulations: 10_000,
        }
    }
}

impl PairwiseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Two observations per arm keeps the pooled-variance df positive.
        check_sample("n_pairwise", 2, self.n_pairwise)?;
        check_sample("n_bws", 2, self.n_bws)?;
        check_sample("n_pp", 2, self.n_pp)?;
        check_finite("bws_improvement", self.bws_improvement)?;
        check_finite("pp_improvement", self.pp_improvement)?;
        check_baseline(self.baseline_accuracy)?;
        check_noise("noise_std", self.noise_std)?;
        check_alpha(self.alpha)?;
        check_sims(self.n_simulations)
    }

    pub fn true_accuracies(&self) -> [f64; 3] {
        true_accuracies(
            self.baseline_accuracy,
            self.bws_improvement,
            self.pp_improvement,
        )
    }

    /// Per-comparison significance threshold after correction.
    pub fn alpha_threshold(&self) -> f64 {
        if self.bonferroni_correction {
            self.alpha / 2.0
        } else {
            self.alpha
        }
    }
}

// ── Within-subjects design ──────────────────────────────────────────

/// Repeated measures: every labeler annotates prompts in all three formats,
/// in a uniformly random per-labeler order. Variance splits into a stable
/// per-labeler ability offset and per-annotation measurement noise, with
/// linear learning/fatigue drift over the labeler's whole session.
#[derive(Clone, Debug, Serialize)]
pub struct WithinSubjectsConfig {
    pub name: String,
    pub n_labelers: usize,
    /// Prompts each labeler annotates in each format.
    pub n_prompts_per_format: usize,
    pub bws_improvement: f64,
    pub pp_improvement: f64,
    pub baseline_accuracy: f64,
    /// SD of stable individual differences (cancelled by paired testing).
    pub between_labeler_sd: f64,
    /// SD of per-annotation measurement noise (remains).
    pub within_labeler_sd: f64,
    /// Accuracy change per [`ANNOTATION_BLOCK`] annotations from practice.
    pub learning_effect: f64,
    /// Accuracy change per [`ANNOTATION_BLOCK`] annotations from tiredness.
    pub fatigue_effect: f64,
    pub alpha: f64,
    pub bonferroni_correction: bool,
    pub n_simulations: usize,
}

/// Learning/fatigue drift is expressed per this many annotations.
pub const ANNOTATION_BLOCK: f64 = 5.0;

impl Default for WithinSubjectsConfig {
    fn default() -> Self {
        Self {
            name: "within-subjects".to_string(),
            n_labelers: 10,
            n_prompts_per_format: 5,
            bws_improvement: 0.30,
            pp_improvement: 0.25,
            baseline_accuracy: 0.70,
            between_labeler_sd: 0.12,
            within_labeler_sd: 0.08,
            learning_effect: 0.02,
            fatigue_effect: -0.01,
            alpha: 0.05,
            bonferroni_correction: true,
            n_simulations: 10_000,
        }
    }
}

impl WithinSubjectsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Paired t over per-labeler differences needs n - 1 > 0.
        check_sample("n_labelers", 2, self.n_labelers)?;
        check_sample("n_prompts_per_format", 1, self.n_prompts_per_format)?;
        check_finite("bws_improvement", self.bws_improvement)?;
        check_finite("pp_improvement", self.pp_improvement)?;
        check_baseline(self.baseline_accuracy)?;
        check_noise("between_labeler_sd", self.between_labeler_sd)?;
        check_noise("within_labeler_sd", self.within_labeler_sd)?;
        check_finite("learning_effect", self.learning_effect)?;
        check_finite("fatigue_effect", self.fatigue_effect)?;
        check_alpha(self.alpha)?;
        check_sims(self.n_simulations)
    }

    pub fn true_accuracies(&self) -> [f64; 3] {
        true_accuracies(
            self.baseline_accuracy,
            self.bws_improvement,
            self.pp_improvement,
        )
    }

    pub fn alpha_threshold(&self) -> f64 {
        if self.bonferroni_correction {
            self.alpha / 2.0
        } else {
            self.alpha
        }
    }

    /// Annotations per labeler across the whole session.
    pub fn annotations_per_labeler(&self) -> usize {
        self.n_prompts_per_format * FORMATS.len()
    }
}

/// True per-format accuracies: baseline, baseline·(1+bws), baseline·(1+pp).
fn true_accuracies(baseline: f64, bws: f64, pp: f64) -> [f64; 3] {
    [baseline, baseline * (1.0 + bws), baseline * (1.0 + pp)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(OmnibusConfig::default().validate().is_ok());
        assert!(PairwiseConfig::default().validate().is_ok());
        assert!(WithinSubjectsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_tiny_samples() {
        let cfg = PairwiseConfig {
            n_pairwise: 1,
            ..PairwiseConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::SampleTooSmall {
                field: "n_pairwise",
                min: 2,
                got: 1
            })
        );

        let cfg = WithinSubjectsConfig {
            n_labelers: 0,
            ..WithinSubjectsConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::SampleTooSmall { .. })
        ));
    }

    #[test]
    fn test_rejects_alpha_outside_unit_interval() {
        for alpha in [0.0, 1.0, -0.05, 1.5, f64::NAN] {
            let cfg = OmnibusConfig {
                alpha,
                ..OmnibusConfig::default()
            };
            assert!(matches!(
                cfg.validate(),
                Err(ConfigError::AlphaOutOfRange(_))
            ));
        }
    }

    #[test]
    fn test_rejects_negative_noise() {
        let cfg = PairwiseConfig {
            noise_std: -0.1,
            ..PairwiseConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::NegativeNoise { .. })));

        let cfg = WithinSubjectsConfig {
            within_labeler_sd: f64::INFINITY,
            ..WithinSubjectsConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::NegativeNoise { .. })));
    }

    #[test]
    fn test_zero_noise_is_a_valid_configuration() {
        // Zero noise passes validation; the estimator excludes the resulting
        // degenerate trials instead (see power module).
        let cfg = PairwiseConfig {
            noise_std: 0.0,
            ..PairwiseConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_simulations() {
        let cfg = OmnibusConfig {
            n_simulations: 0,
            ..OmnibusConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroSimulations));
    }

    #[test]
    fn test_negative_improvements_are_allowed() {
        let cfg = PairwiseConfig {
            bws_improvement: -0.2,
            ..PairwiseConfig::default()
        };
        assert!(cfg.validate().is_ok());
        let acc = cfg.true_accuracies();
        assert!(acc[Format::BestWorst.index()] < acc[Format::Pairwise.index()]);
    }

    #[test]
    fn test_true_accuracies() {
        let cfg = PairwiseConfig::default();
        let acc = cfg.true_accuracies();
        assert!((acc[0] - 0.70).abs() < 1e-12);
        assert!((acc[1] - 0.91).abs() < 1e-12);
        assert!((acc[2] - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_alpha_threshold_correction() {
        let cfg = PairwiseConfig::default();
        assert!((cfg.alpha_threshold() - 0.025).abs() < 1e-12);
        let cfg = PairwiseConfig {
            bonferroni_correction: false,
            ..cfg
        };
        assert!((cfg.alpha_threshold() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_format_labels() {
        assert_eq!(Format::Pairwise.as_str(), "pairwise");
        assert_eq!(Format::BestWorst.as_str(), "bws");
        assert_eq!(Format::PeerPrediction.as_str(), "pp");
        for (i, f) in FORMATS.iter().enumerate() {
            assert_eq!(f.index(), i);
        }
    }
}
