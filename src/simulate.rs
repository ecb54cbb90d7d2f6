//! Trial simulator — draws one synthetic dataset per trial under the
//! assumed generative model for each design.
//!
//! All simulators take a caller-supplied RNG rather than touching any
//! process-global state, so a trial is fully reproducible from its seed and
//! trials on distinct seeds are independent (the power estimator sub-seeds
//! one `SmallRng` per trial index).
//!
//! Simulators expect a configuration that passes `validate()`; the
//! estimators enforce this before their first trial, and direct callers
//! must do the same. The precondition is debug-asserted here, and an
//! unvalidated negative SD panics either way when the normal distribution
//! is built.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::{
    Format, OmnibusConfig, PairwiseConfig, WithinSubjectsConfig, ANNOTATION_BLOCK, FORMATS,
};

/// One trial's draw for the independent designs: measured accuracy per
/// labeler, one vector per arm.
#[derive(Clone, Debug)]
pub struct IndependentSamples {
    pub pairwise: Vec<f64>,
    pub bws: Vec<f64>,
    pub pp: Vec<f64>,
}

/// One synthetic annotation in the within-subjects design.
#[derive(Clone, Copy, Debug)]
pub struct Observation {
    pub format: Format,
    pub labeler_id: usize,
    /// 1-based cumulative position in this labeler's session; drives drift.
    pub annotation_num: usize,
    pub value: f64,
}

/// Draw `n` measured accuracies around a true accuracy.
fn draw_arm(rng: &mut SmallRng, n: usize, true_acc: f64, noise_std: f64) -> Vec<f64> {
    let noise = Normal::new(0.0, noise_std).expect("noise_std must be non-negative and finite");
    (0..n).map(|_| true_acc + noise.sample(rng)).collect()
}

/// Independent one-way model: three mutually independent normal samples of
/// equal size, one per format.
pub fn simulate_omnibus(cfg: &OmnibusConfig, rng: &mut SmallRng) -> IndependentSamples {
    debug_assert!(cfg.validate().is_ok(), "config must pass validate()");
    let acc = cfg.true_accuracies();
    let n = cfg.n_labelers_per_format;
    IndependentSamples {
        pairwise: draw_arm(rng, n, acc[0], cfg.noise_std),
        bws: draw_arm(rng, n, acc[1], cfg.noise_std),
        pp: draw_arm(rng, n, acc[2], cfg.noise_std),
    }
}

/// Same generative structure as the omnibus model, with per-arm sizes; the
/// tester consumes the arms as two separate comparisons against baseline.
pub fn simulate_pairwise(cfg: &PairwiseConfig, rng: &mut SmallRng) -> IndependentSamples {
    debug_assert!(cfg.validate().is_ok(), "config must pass validate()");
    let acc = cfg.true_accuracies();
    IndependentSamples {
        pairwise: draw_arm(rng, cfg.n_pairwise, acc[0], cfg.noise_std),
        bws: draw_arm(rng, cfg.n_bws, acc[1], cfg.noise_std),
        pp: draw_arm(rng, cfg.n_pp, acc[2], cfg.noise_std),
    }
}

/// Within-subjects model: each labeler carries a persistent ability offset,
/// annotates all three formats in a uniformly random order, and drifts
/// linearly (learning + fatigue) over their whole session.
///
/// The format permutation replicates the counterbalancing scheduler's
/// contract — it only decides sequence position, never the statistical
/// identity of a measurement.
pub fn simulate_within_subjects(
    cfg: &WithinSubjectsConfig,
    rng: &mut SmallRng,
) -> Vec<Observation> {
    debug_assert!(cfg.validate().is_ok(), "config must pass validate()");
    let acc = cfg.true_accuracies();
    let ability_dist = Normal::new(0.0, cfg.between_labeler_sd)
        .expect("between_labeler_sd must be non-negative and finite");
    let noise_dist = Normal::new(0.0, cfg.within_labeler_sd)
        .expect("within_labeler_sd must be non-negative and finite");

    let mut observations = Vec::with_capacity(cfg.n_labelers * cfg.annotations_per_labeler());

    for labeler_id in 0..cfg.n_labelers {
        let ability = ability_dist.sample(rng);
        let order = random_format_order(rng);

        let mut annotation_num = 0usize;
        for &format in &order {
            let true_acc = acc[format.index()];
            for _ in 0..cfg.n_prompts_per_format {
                annotation_num += 1;
                // Drift scales with the session-wide annotation count and
                // crosses format boundaries; the random ordering mixes the
                // resulting order effects across formats.
                let blocks = annotation_num as f64 / ANNOTATION_BLOCK;
                let learning = cfg.learning_effect * blocks;
                let fatigue = cfg.fatigue_effect * blocks;
                let value = true_acc + ability + learning + fatigue + noise_dist.sample(rng);
                observations.push(Observation {
                    format,
                    labeler_id,
                    annotation_num,
                    value,
                });
            }
        }
    }

    observations
}

/// Uniformly random format order for one labeler — exposed for callers that
/// need the scheduler contract without a full simulated trial.
pub fn random_format_order<R: Rng + ?Sized>(rng: &mut R) -> [Format; 3] {
    let mut order = FORMATS;
    order.shuffle(rng);
    order
}
