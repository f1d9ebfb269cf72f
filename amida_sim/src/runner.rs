//! Scenario runner - executes audit scenarios against the generator.

use crate::context::{ScriptedRandom, SeededRandom};
use crate::oracle::Oracle;
use crate::scenarios::ScenarioId;
use crate::seeds::{derive_seed, parameter_seed};

use amida_core::lottery::{out_of_range_label, UNDEFINED_RESULT};
use amida_core::{generate, Advisory, Draw, LotteryConfig, PairingHistogram, MAX_HEIGHT};
use amida_env::RandomSource;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

/// Results from running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// Trials completed (including the failing one, if any)
    pub trials: u64,

    /// Failure message if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScenarioMetrics {
    /// Uniform draws consumed by the generator
    pub draws_consumed: u64,

    /// Connectors placed across all trials
    pub connectors: u64,

    /// Largest track count exercised
    pub max_tracks_seen: usize,

    /// Fairness statistics (fairness scenario only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chi_squared: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_deviation: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_point_rate: Option<f64>,
}

impl ScenarioMetrics {
    fn observe(&mut self, draw: &Draw, draws: u64) {
        self.draws_consumed += draws;
        self.connectors += draw.lines.len() as u64;
        self.max_tracks_seen = self.max_tracks_seen.max(draw.tracks);
    }
}

/// Runs audit scenarios.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Trials per scenario
    trials: u64,

    /// Largest participant count sampled
    max_tracks: usize,

    /// Largest level count sampled
    max_height: usize,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            trials: 200,
            max_tracks: 12,
            max_height: 15,
        }
    }

    /// Sets the number of trials per scenario.
    pub fn with_trials(mut self, trials: u64) -> Self {
        self.trials = trials.max(1);
        self
    }

    /// Sets the largest participant count (at least 2).
    pub fn with_max_tracks(mut self, max_tracks: usize) -> Self {
        self.max_tracks = max_tracks.max(2);
        self
    }

    /// Sets the largest level count (capped at `MAX_HEIGHT`).
    pub fn with_max_height(mut self, max_height: usize) -> Self {
        self.max_height = max_height.min(MAX_HEIGHT);
        self
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);

        match scenario {
            ScenarioId::Bijection => self.run_bijection(),
            ScenarioId::HeightZero => self.run_height_zero(),
            ScenarioId::Adjacency => self.run_adjacency(),
            ScenarioId::Single => self.run_single(),
            ScenarioId::Mismatch => self.run_mismatch(),
            ScenarioId::Determinism => self.run_determinism(),
            ScenarioId::TwoTrack => self.run_two_track(),
            ScenarioId::Fairness => self.run_fairness(),
        }
    }

    fn params(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(parameter_seed(self.seed))
    }

    fn trial_rng(&self, trial: u64) -> SeededRandom {
        SeededRandom::new(derive_seed(self.seed, trial))
    }

    fn finish(
        &self,
        scenario: ScenarioId,
        trials: u64,
        metrics: ScenarioMetrics,
        failure: Option<String>,
    ) -> ScenarioResult {
        ScenarioResult {
            scenario,
            seed: self.seed,
            passed: failure.is_none(),
            trials,
            failure_reason: failure,
            metrics,
        }
    }

    /// AMD-001: Bijection - traversal is a permutation and matches the oracle.
    fn run_bijection(&self) -> ScenarioResult {
        let mut params = self.params();
        let mut metrics = ScenarioMetrics::default();

        for trial in 0..self.trials {
            let tracks = params.gen_range(2..=self.max_tracks);
            let height = params.gen_range(0..=self.max_height);
            let density = params.gen::<f64>();
            let config = LotteryConfig::default().with_height(height).with_density(density);

            let names = labels("P", tracks);
            let prizes = labels("R", tracks);
            let mut rng = self.trial_rng(trial);
            let draw = generate(&names, &prizes, &config, &mut rng);
            metrics.observe(&draw, rng.draws());

            let context = format!("trial {} ({} tracks, height {}, density {:.2})", trial, tracks, height, density);
            if let Err(d) = Oracle::check_draw(&draw) {
                return self.finish(ScenarioId::Bijection, trial + 1, metrics, Some(format!("{}: {}", context, d)));
            }
            if let Some(m) = draw.mapping.iter().find(|m| m.result != prizes[m.destination]) {
                return self.finish(
                    ScenarioId::Bijection,
                    trial + 1,
                    metrics,
                    Some(format!("{}: {} got {} instead of the result under track {}", context, m.participant, m.result, m.destination + 1)),
                );
            }
            debug!("  {} -> {} connectors", context, draw.lines.len());
        }

        self.finish(ScenarioId::Bijection, self.trials, metrics, None)
    }

    /// AMD-002: HeightZero - identity pairing for every size.
    fn run_height_zero(&self) -> ScenarioResult {
        let mut params = self.params();
        let mut metrics = ScenarioMetrics::default();
        let config = LotteryConfig::default().with_height(0);

        for trial in 0..self.trials {
            let tracks = params.gen_range(1..=self.max_tracks);
            let names = labels("P", tracks);
            let prizes = labels("R", tracks);
            let mut rng = self.trial_rng(trial);
            let draw = generate(&names, &prizes, &config, &mut rng);
            metrics.observe(&draw, rng.draws());

            if !draw.lines.is_empty() {
                return self.finish(ScenarioId::HeightZero, trial + 1, metrics, Some(format!("trial {}: height 0 produced lines", trial)));
            }
            for (i, m) in draw.mapping.iter().enumerate() {
                if m.result != prizes[i] {
                    return self.finish(
                        ScenarioId::HeightZero,
                        trial + 1,
                        metrics,
                        Some(format!("trial {}: {} moved to {}", trial, m.participant, m.result)),
                    );
                }
            }
        }

        self.finish(ScenarioId::HeightZero, self.trials, metrics, None)
    }

    /// AMD-003: Adjacency - saturate the grid and confirm the exclusion rule.
    ///
    /// At density 1.0 every eligible slot fills, so each level must hold
    /// exactly the even columns.
    fn run_adjacency(&self) -> ScenarioResult {
        let mut params = self.params();
        let mut metrics = ScenarioMetrics::default();

        for trial in 0..self.trials {
            let tracks = params.gen_range(2..=self.max_tracks);
            let height = params.gen_range(1..=self.max_height.max(1));
            let saturated = trial % 2 == 0;
            let density = if saturated { 1.0 } else { params.gen::<f64>() };
            let config = LotteryConfig::default().with_height(height).with_density(density);

            let mut rng = self.trial_rng(trial);
            let draw = generate(&labels("P", tracks), &labels("R", tracks), &config, &mut rng);
            metrics.observe(&draw, rng.draws());

            let well_formed = draw.grid().map(|g| g.is_well_formed()).unwrap_or(false);
            if !well_formed {
                return self.finish(
                    ScenarioId::Adjacency,
                    trial + 1,
                    metrics,
                    Some(format!("trial {}: adjacent connectors with {} tracks", trial, tracks)),
                );
            }
            if saturated && draw.lines.len() != height * (tracks / 2) {
                return self.finish(
                    ScenarioId::Adjacency,
                    trial + 1,
                    metrics,
                    Some(format!(
                        "trial {}: saturated grid has {} connectors, expected {}",
                        trial,
                        draw.lines.len(),
                        height * (tracks / 2)
                    )),
                );
            }
        }

        self.finish(ScenarioId::Adjacency, self.trials, metrics, None)
    }

    /// AMD-004: Single - lone participant never touches the RNG.
    fn run_single(&self) -> ScenarioResult {
        let mut params = self.params();
        let mut metrics = ScenarioMetrics::default();

        for trial in 0..self.trials {
            let height = params.gen_range(0..=self.max_height);
            let density = params.gen::<f64>();
            let prizes = labels("R", params.gen_range(0..=2));
            let config = LotteryConfig::default().with_height(height).with_density(density);

            let mut rng = self.trial_rng(trial);
            let draw = generate(&["Solo"], &prizes, &config, &mut rng);
            metrics.observe(&draw, rng.draws());

            let expected = prizes.first().map(String::as_str).unwrap_or(UNDEFINED_RESULT);
            let ok = rng.draws() == 0
                && draw.lines.is_empty()
                && draw.mapping.len() == 1
                && draw.mapping[0].participant == "Solo"
                && draw.mapping[0].result == expected;
            if !ok {
                return self.finish(
                    ScenarioId::Single,
                    trial + 1,
                    metrics,
                    Some(format!("trial {}: got {:?} with {} draws", trial, draw.summary(), rng.draws())),
                );
            }
        }

        self.finish(ScenarioId::Single, self.trials, metrics, None)
    }

    /// AMD-005: Mismatch - short result lists degrade to numbered placeholders.
    fn run_mismatch(&self) -> ScenarioResult {
        let mut params = self.params();
        let mut metrics = ScenarioMetrics::default();

        for trial in 0..self.trials {
            let tracks = params.gen_range(3..=self.max_tracks.max(3));
            let available = params.gen_range(1..tracks);
            let names = labels("P", tracks);
            let prizes = labels("R", available);

            let mut rng = self.trial_rng(trial);
            let draw = generate(&names, &prizes, &LotteryConfig::default(), &mut rng);
            metrics.observe(&draw, rng.draws());

            let flagged = draw.advisories.contains(&Advisory::LengthMismatch {
                participants: tracks,
                results: available,
            });
            let labelled = draw.mapping.iter().all(|m| match prizes.get(m.destination) {
                Some(prize) => &m.result == prize,
                None => {
                    m.result == out_of_range_label(m.destination)
                        && m.result.contains(&(m.destination + 1).to_string())
                }
            });
            if !flagged || !labelled || draw.mapping.len() != tracks {
                return self.finish(
                    ScenarioId::Mismatch,
                    trial + 1,
                    metrics,
                    Some(format!("trial {}: {} tracks / {} results gave {:?}", trial, tracks, available, draw.summary())),
                );
            }
        }

        self.finish(ScenarioId::Mismatch, self.trials, metrics, None)
    }

    /// AMD-006: Determinism - seeded repeats and scripted replays agree.
    fn run_determinism(&self) -> ScenarioResult {
        let mut params = self.params();
        let mut metrics = ScenarioMetrics::default();

        for trial in 0..self.trials {
            let tracks = params.gen_range(2..=self.max_tracks);
            let config = LotteryConfig::default().with_height(params.gen_range(0..=self.max_height));
            let names = labels("P", tracks);
            let prizes = labels("R", tracks);

            let mut first_rng = self.trial_rng(trial);
            let first = generate(&names, &prizes, &config, &mut first_rng);
            let second = generate(&names, &prizes, &config, &mut self.trial_rng(trial));
            metrics.observe(&first, first_rng.draws());

            // Capture the exact draws and feed them back through a script
            let mut source = self.trial_rng(trial);
            let script: Vec<f64> = (0..first_rng.draws()).map(|_| source.next_uniform()).collect();
            let mut scripted = ScriptedRandom::new(script);
            let third = generate(&names, &prizes, &config, &mut scripted);
            let script_ok = matches!(scripted.finish(), Ok(n) if n as u64 == first_rng.draws());

            if first != second || first != third || !script_ok {
                return self.finish(
                    ScenarioId::Determinism,
                    trial + 1,
                    metrics,
                    Some(format!("trial {}: repeated draws diverged", trial)),
                );
            }
        }

        self.finish(ScenarioId::Determinism, self.trials, metrics, None)
    }

    /// AMD-007: TwoTrack - the canonical swap example.
    fn run_two_track(&self) -> ScenarioResult {
        let mut metrics = ScenarioMetrics::default();
        let config = LotteryConfig::default().with_height(1);
        let names = ["A", "B"];
        let prizes = ["X", "Y"];

        let cases: [(f64, [&str; 2]); 2] = [(0.0, ["Y", "X"]), (0.99, ["X", "Y"])];
        for (trial, (draw_value, expected)) in cases.iter().enumerate() {
            let mut rng = ScriptedRandom::new(vec![*draw_value]);
            let draw = generate(&names, &prizes, &config, &mut rng);
            metrics.observe(&draw, rng.consumed() as u64);

            let got: Vec<&str> = draw.mapping.iter().map(|m| m.result.as_str()).collect();
            if got != expected.as_slice() {
                return self.finish(
                    ScenarioId::TwoTrack,
                    trial as u64 + 1,
                    metrics,
                    Some(format!("draw {} gave {:?}, expected {:?}", draw_value, got, expected)),
                );
            }
        }

        self.finish(ScenarioId::TwoTrack, cases.len() as u64, metrics, None)
    }

    /// AMD-008: Fairness - histogram report at the default configuration.
    fn run_fairness(&self) -> ScenarioResult {
        let tracks = self.max_tracks;
        let names = labels("P", tracks);
        let prizes = labels("R", tracks);
        let config = LotteryConfig::default();
        let mut metrics = ScenarioMetrics::default();
        let mut histogram = PairingHistogram::new(tracks);

        for trial in 0..self.trials {
            let mut rng = self.trial_rng(trial);
            let draw = generate(&names, &prizes, &config, &mut rng);
            metrics.observe(&draw, rng.draws());
            histogram.record(&draw);
        }

        metrics.chi_squared = Some(histogram.chi_squared());
        metrics.max_deviation = Some(histogram.max_deviation());
        metrics.fixed_point_rate = Some(histogram.fixed_point_rate());
        info!(
            "  {} tracks, {} draws: chi2={:.1}, max deviation={:.0}%, keep-own-track={:.1}% (uniform {:.1}%)",
            tracks,
            histogram.trials(),
            histogram.chi_squared(),
            histogram.max_deviation() * 100.0,
            histogram.fixed_point_rate() * 100.0,
            100.0 / tracks as f64
        );

        let failure = if histogram.trials() == self.trials {
            None
        } else {
            Some(format!("recorded {} of {} draws", histogram.trials(), self.trials))
        };
        self.finish(ScenarioId::Fairness, self.trials, metrics, failure)
    }
}

/// `["P1", "P2", ...]`
pub fn labels(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{}{}", prefix, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> ScenarioRunner {
        ScenarioRunner::new(42).with_trials(50).with_max_tracks(8).with_max_height(12)
    }

    #[test]
    fn test_every_scenario_passes() {
        let runner = runner();
        for scenario in ScenarioId::all() {
            let result = runner.run(scenario);
            assert!(result.passed, "{} failed: {:?}", scenario, result.failure_reason);
        }
    }

    #[test]
    fn test_results_are_reproducible() {
        let a = runner().run(ScenarioId::Bijection);
        let b = runner().run(ScenarioId::Bijection);
        assert_eq!(a.metrics.draws_consumed, b.metrics.draws_consumed);
        assert_eq!(a.metrics.connectors, b.metrics.connectors);
    }

    #[test]
    fn test_fairness_reports_statistics() {
        let result = runner().run(ScenarioId::Fairness);
        assert!(result.metrics.chi_squared.is_some());
        let rate = result.metrics.fixed_point_rate.unwrap();
        assert!((0.0..=1.0).contains(&rate));
    }

    #[test]
    fn test_single_never_draws() {
        let result = runner().run(ScenarioId::Single);
        assert_eq!(result.metrics.draws_consumed, 0);
        assert_eq!(result.metrics.connectors, 0);
    }

    #[test]
    fn test_oversized_height_is_capped() {
        let runner = ScenarioRunner::new(7)
            .with_trials(4)
            .with_max_tracks(4)
            .with_max_height(usize::MAX);
        assert_eq!(runner.max_height, MAX_HEIGHT);
        assert!(runner.run(ScenarioId::Adjacency).passed);
        assert!(runner.run(ScenarioId::Single).passed);
    }

    #[test]
    fn test_labels() {
        assert_eq!(labels("R", 3), vec!["R1", "R2", "R3"]);
        assert!(labels("R", 0).is_empty());
    }
}
