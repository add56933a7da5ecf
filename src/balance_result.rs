use crate::arrangement::Arrangement;
use crate::zone_histogram::ZoneHistogram;

/// Represents the result of balancing zones across an arrangement.
///
/// # Fields
///
/// * `best_arrangement` - The arrangement with the highest mean entropy seen, same matches as the input
/// * `best_entropy` - Mean zone entropy of `best_arrangement`, in bits
/// * `optimal_entropy` - The theoretical maximum, `log2(zones)`
/// * `best_iter` - The iteration that produced `best_arrangement`, 0 for the initial shuffle
/// * `iterations_run` - Outer iterations completed before the budget ran out or the optimum was hit
/// * `tolerance` - Slack used when deciding whether `best_entropy` is optimal
/// * `histogram` - Zone counts of `best_arrangement`
#[derive(Debug, Default, Clone)]
pub struct BalanceResult {
    pub best_arrangement: Arrangement,
    pub best_entropy: f64,
    pub optimal_entropy: f64,
    pub best_iter: usize,
    pub iterations_run: usize,
    pub tolerance: f64,
    pub histogram: ZoneHistogram,
}

impl BalanceResult {
    pub fn is_optimal(&self) -> bool {
        self.best_entropy >= self.optimal_entropy - self.tolerance
    }

    /// Each team with its nonzero zone counts, largest first, in roster order.
    pub fn zone_summary(&self) -> Vec<(&str, Vec<usize>)> {
        self.best_arrangement
            .roster()
            .names()
            .enumerate()
            .map(|(team, name)| (name, self.histogram.sorted_counts(team)))
            .collect()
    }
}
