//! Named planning scenarios — pessimistic, central, and optimistic effect
//! assumptions applied uniformly across the three study designs.
//!
//! Moderate is the central planning case and equals each config's
//! `Default`; the other two bracket it so a planner can see how sensitive
//! the sample-size decision is to the effect assumptions.

use serde::Serialize;

use crate::config::{OmnibusConfig, PairwiseConfig, WithinSubjectsConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Scenario {
    /// Small improvements, noisy judgments.
    Conservative,
    /// Central planning assumptions.
    Moderate,
    /// Large improvements, clean judgments.
    Optimistic,
}

pub const SCENARIOS: [Scenario; 3] = [
    Scenario::Conservative,
    Scenario::Moderate,
    Scenario::Optimistic,
];

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Conservative => "conservative",
            Scenario::Moderate => "moderate",
            Scenario::Optimistic => "optimistic",
        }
    }

    /// (bws_improvement, pp_improvement) under this scenario.
    fn improvements(&self) -> (f64, f64) {
        match self {
            Scenario::Conservative => (0.15, 0.12),
            Scenario::Moderate => (0.30, 0.25),
            Scenario::Optimistic => (0.50, 0.40),
        }
    }

    /// Observation noise for the between-subjects designs.
    fn noise_std(&self) -> f64 {
        match self {
            Scenario::Conservative => 0.20,
            Scenario::Moderate => 0.15,
            Scenario::Optimistic => 0.10,
        }
    }

    /// (between_labeler_sd, within_labeler_sd) for the paired design.
    fn labeler_sds(&self) -> (f64, f64) {
        match self {
            Scenario::Conservative => (0.15, 0.10),
            Scenario::Moderate => (0.12, 0.08),
            Scenario::Optimistic => (0.10, 0.06),
        }
    }

    pub fn omnibus(&self) -> OmnibusConfig {
        let (bws, pp) = self.improvements();
        OmnibusConfig {
            name: self.as_str().to_string(),
            bws_improvement: bws,
            pp_improvement: pp,
            noise_std: self.noise_std(),
            ..OmnibusConfig::default()
        }
    }

    pub fn pairwise(&self) -> PairwiseConfig {
        let (bws, pp) = self.improvements();
        PairwiseConfig {
            name: self.as_str().to_string(),
            bws_improvement: bws,
            pp_improvement: pp,
            noise_std: self.noise_std(),
            ..PairwiseConfig::default()
        }
    }

    pub fn within_subjects(&self) -> WithinSubjectsConfig {
        let (bws, pp) = self.improvements();
        let (between, within) = self.labeler_sds();
        WithinSubjectsConfig {
            name: self.as_str().to_string(),
            bws_improvement: bws,
            pp_improvement: pp,
            between_labeler_sd: between,
            within_labeler_sd: within,
            ..WithinSubjectsConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_scenario_configs_validate() {
        for s in SCENARIOS {
            s.omnibus().validate().unwrap();
            s.pairwise().validate().unwrap();
            s.within_subjects().validate().unwrap();
        }
    }

    #[test]
    fn test_moderate_matches_defaults() {
        let m = Scenario::Moderate.pairwise();
        let d = PairwiseConfig::default();
        assert_eq!(m.bws_improvement, d.bws_improvement);
        assert_eq!(m.pp_improvement, d.pp_improvement);
        assert_eq!(m.noise_std, d.noise_std);

        let w = Scenario::Moderate.within_subjects();
        let dw = WithinSubjectsConfig::default();
        assert_eq!(w.between_labeler_sd, dw.between_labeler_sd);
        assert_eq!(w.within_labeler_sd, dw.within_labeler_sd);
    }

    #[test]
    fn test_scenarios_are_ordered_by_effect() {
        let c = Scenario::Conservative.pairwise();
        let m = Scenario::Moderate.pairwise();
        let o = Scenario::Optimistic.pairwise();
        assert!(c.bws_improvement < m.bws_improvement);
        assert!(m.bws_improvement < o.bws_improvement);
        assert!(c.noise_std > m.noise_std);
        assert!(m.noise_std > o.noise_std);
    }

    #[test]
    fn test_names_flow_into_configs() {
        assert_eq!(Scenario::Conservative.omnibus().name, "conservative");
        assert_eq!(Scenario::Optimistic.within_subjects().name, "optimistic");
    }
}
