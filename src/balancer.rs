/*
 * balancer.rs - Zone balancing for BEES tournament schedules
 * Annealed coordinate ascent over the zone order of each match, maximising the
 * mean Shannon entropy of every team's zone appearances.
 */

use anyhow::*;
use derive_builder::Builder;
use itertools::Itertools;
use log::{debug, info, trace};
use pretty_print_nalgebra::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::arrangement::Arrangement;
use crate::balance_result::BalanceResult;
use crate::zone_histogram::ZoneHistogram;

pub const DEFAULT_ITERATIONS: usize = 1000;

pub const DEFAULT_SEED: u64 = 1;

pub const OPTIMALITY_TOL: f64 = 1.0e-9;

/// Rate at which the reshuffle probability decays over the iteration budget.
const COOLING_RATE: f64 = 10.0;

#[derive(Builder, Debug, Clone, Copy, PartialEq)]
#[builder(build_fn(error = "anyhow::Error"))]
pub struct BalancerConfig {
    /* iterations is the outer iteration budget */
    #[builder(default = "DEFAULT_ITERATIONS")]
    pub iterations: usize,

    /* seed feeds the StdRng that rezone() creates */
    #[builder(default = "DEFAULT_SEED")]
    pub seed: u64,

    /* tolerance is how far below log2(zones) a score may be and still count as optimal */
    #[builder(default = "OPTIMALITY_TOL")]
    pub tolerance: f64,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self { iterations: DEFAULT_ITERATIONS, seed: DEFAULT_SEED, tolerance: OPTIMALITY_TOL }
    }
}

/// Probability of reshuffling a match at outer iteration `n` of `iterations`.
///
/// Starts at 1 and decays exponentially towards `exp(-10)`.
pub fn temperature(n: usize, iterations: usize) -> f64 {
    (-COOLING_RATE * (n as f64 / iterations as f64)).exp()
}

#[derive(Debug)]
pub struct ZoneBalancer<R: Rng> {
    /* arrangement is the working copy, mutated in place */
    arrangement: Arrangement,

    /* histogram is kept in step with arrangement */
    histogram: ZoneHistogram,

    iterations: usize,

    optimal_entropy: f64,

    tolerance: f64,

    rng: R,
}

impl<R: Rng> ZoneBalancer<R> {
    pub fn new(arrangement: Arrangement, config: &BalancerConfig, rng: R) -> Result<Self> {
        if arrangement.n_matches() == 0 || arrangement.n_zones() == 0 {
            bail!("Cannot balance an arrangement without matches or zones");
        }
        let histogram = ZoneHistogram::from_arrangement(&arrangement);
        let optimal_entropy = arrangement.optimal_entropy();
        Ok(Self {
            arrangement,
            histogram,
            iterations: config.iterations,
            optimal_entropy,
            tolerance: config.tolerance,
            rng,
        })
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn entropy(&self) -> f64 {
        self.histogram.mean_entropy()
    }

    fn is_optimal(&self, entropy: f64) -> bool {
        entropy >= self.optimal_entropy - self.tolerance
    }

    /// Gives match `m` a fresh random zone order.
    fn shuffle_match(&mut self, m: usize) {
        let mut order = self.arrangement.match_teams(m);
        self.histogram.remove_match(&order);
        order.shuffle(&mut self.rng);
        self.histogram.add_match(&order);
        self.arrangement.set_match(m, &order);
    }

    /// Tries every zone order of match `m` with all other matches held fixed and keeps
    /// the first one scoring strictly higher than the current order.
    fn optimize_match(&mut self, m: usize) -> f64 {
        let current = self.arrangement.match_teams(m);
        let mut best_entropy = self.entropy();
        let mut best_order = current.clone();

        self.histogram.remove_match(&current);
        for candidate in current.iter().copied().permutations(current.len()) {
            self.histogram.add_match(&candidate);
            let entropy = self.histogram.mean_entropy();
            if entropy > best_entropy {
                best_entropy = entropy;
                best_order = candidate.clone();
            }
            self.histogram.remove_match(&candidate);
        }
        self.histogram.add_match(&best_order);
        self.arrangement.set_match(m, &best_order);

        best_entropy
    }

    /// Runs one outer iteration: every match, in random order, is either reshuffled
    /// (with probability `temperature`) or locally optimised.
    fn step(&mut self, temperature: f64) {
        let mut order: Vec<usize> = (0..self.arrangement.n_matches()).collect();
        order.shuffle(&mut self.rng);
        for m in order {
            if self.rng.gen::<f64>() < temperature {
                self.shuffle_match(m);
            } else {
                self.optimize_match(m);
            }
        }
    }

    /// Balances the arrangement and returns the best one seen.
    ///
    /// `on_update` is called after every outer iteration with the iteration number
    /// (starting at 1) and the best entropy so far.
    pub fn run<F>(mut self, mut on_update: F) -> BalanceResult
    where
        F: FnMut(usize, f64),
    {
        info!(
            "Balancing {} matches of {} teams over {} zones ({} iterations)",
            self.arrangement.n_matches(),
            self.arrangement.n_teams(),
            self.arrangement.n_zones(),
            self.iterations
        );

        for m in 0..self.arrangement.n_matches() {
            self.shuffle_match(m);
        }

        let mut best_entropy = self.entropy();
        let mut best_arrangement = self.arrangement.clone();
        let mut best_iter = 0;
        let mut iterations_run = 0;
        debug!("Initial shuffle scores {:.6}b", best_entropy);

        if !self.is_optimal(best_entropy) {
            for n in 0..self.iterations {
                self.step(temperature(n, self.iterations));
                iterations_run = n + 1;

                let entropy = self.entropy();
                if entropy > best_entropy {
                    best_entropy = entropy;
                    best_arrangement = self.arrangement.clone();
                    best_iter = iterations_run;
                    debug!("Iteration {}: new best {:.6}b", iterations_run, best_entropy);
                }

                on_update(iterations_run, best_entropy);

                if self.is_optimal(best_entropy) {
                    break;
                }
            }
        }

        info!(
            "Got to {:.3}b of entropy (theoretical maximum is {:.3}b) after {} iterations",
            best_entropy, self.optimal_entropy, iterations_run
        );

        let histogram = ZoneHistogram::from_arrangement(&best_arrangement);
        trace!("best zone counts: {}", pretty_print!(&histogram.counts));

        BalanceResult {
            best_arrangement,
            best_entropy,
            optimal_entropy: self.optimal_entropy,
            best_iter,
            iterations_run,
            tolerance: self.tolerance,
            histogram,
        }
    }
}
