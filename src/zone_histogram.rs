use nalgebra::{DMatrix, DVector};

use crate::arrangement::Arrangement;

/// Counts how often each team plays in each zone.
///
/// `counts` is teams x zones. `entropies` caches the entropy of each team's row and
/// is refreshed whenever that row changes, so it always equals a fresh computation.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct ZoneHistogram {
    pub counts: DMatrix<usize>,
    entropies: DVector<f64>,
}

impl ZoneHistogram {
    pub fn from_arrangement(arrangement: &Arrangement) -> Self {
        let n_teams = arrangement.n_teams();
        let mut counts: DMatrix<usize> = DMatrix::zeros(n_teams, arrangement.n_zones());
        for row in arrangement.matches().row_iter() {
            for (zone, &team) in row.iter().enumerate() {
                counts[(team, zone)] += 1;
            }
        }
        let mut histogram = Self { counts, entropies: DVector::zeros(n_teams) };
        histogram.refresh(&(0..n_teams).collect::<Vec<_>>());
        histogram
    }

    pub fn n_teams(&self) -> usize {
        self.counts.nrows()
    }

    pub fn n_zones(&self) -> usize {
        self.counts.ncols()
    }

    /// Takes one match, with its teams in zone order, out of the counts.
    pub fn remove_match(&mut self, order: &[usize]) {
        for (zone, &team) in order.iter().enumerate() {
            self.counts[(team, zone)] -= 1;
        }
        self.refresh(order);
    }

    /// Puts one match, with its teams in zone order, into the counts.
    pub fn add_match(&mut self, order: &[usize]) {
        for (zone, &team) in order.iter().enumerate() {
            self.counts[(team, zone)] += 1;
        }
        self.refresh(order);
    }

    fn refresh(&mut self, teams: &[usize]) {
        for &team in teams {
            self.entropies[team] = shannon_entropy(&self.team_counts(team));
        }
    }

    pub fn team_entropy(&self, team: usize) -> f64 {
        self.entropies[team]
    }

    /// Mean over all teams of each team's zone entropy, in bits.
    pub fn mean_entropy(&self) -> f64 {
        if self.n_teams() == 0 {
            return 0.0;
        }
        self.entropies.sum() / self.n_teams() as f64
    }

    pub fn team_counts(&self, team: usize) -> Vec<usize> {
        self.counts.row(team).iter().copied().collect()
    }

    /// Nonzero zone counts of `team`, largest first.
    pub fn sorted_counts(&self, team: usize) -> Vec<usize> {
        let mut counts: Vec<usize> = self.counts.row(team).iter().copied().filter(|&c| c > 0).collect();
        counts.sort_unstable_by(|a, b| b.cmp(a));
        counts
    }
}

/// Base-2 Shannon entropy of the distribution given by `counts`.
///
/// Zero counts contribute nothing. An all-zero input has entropy 0.
pub fn shannon_entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    -counts
        .iter()
        .copied()
        .filter(|&c| c > 0)
        .map(|c| {
            let p = c as f64 / total;
            p * p.log2()
        })
        .sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn arrangement(raw: &[&[&str]]) -> Arrangement {
        let rows: Vec<Vec<&str>> = raw.iter().map(|row| row.to_vec()).collect();
        Arrangement::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_shannon_entropy() {
        assert_eq!(shannon_entropy(&[]), 0.0);
        assert_eq!(shannon_entropy(&[0, 0, 0]), 0.0);
        assert_eq!(shannon_entropy(&[5]), 0.0);
        assert_eq!(shannon_entropy(&[0, 3, 0]), 0.0);
        assert!((shannon_entropy(&[1, 1]) - 1.0).abs() < EPS);
        assert!((shannon_entropy(&[2, 2, 2, 2]) - 2.0).abs() < EPS);
        assert!((shannon_entropy(&[2, 1, 1, 0]) - 1.5).abs() < EPS);
    }

    #[test]
    fn test_from_arrangement() {
        let arrangement = arrangement(&[&["a", "b"], &["a", "c"], &["b", "a"]]);
        let histogram = ZoneHistogram::from_arrangement(&arrangement);

        let expected = nalgebra::dmatrix![
            2, 1;
            1, 1;
            0, 1;
        ];
        assert_eq!(histogram.counts, expected);
        assert_eq!(histogram.sorted_counts(0), vec![2, 1]);
        assert_eq!(histogram.sorted_counts(2), vec![1]);
        assert_eq!(histogram.team_counts(2), vec![0, 1]);

        // a: 2/3,1/3  b: 1/2,1/2  c: single appearance
        let a = -(2.0 / 3.0 * (2.0f64 / 3.0).log2() + 1.0 / 3.0 * (1.0f64 / 3.0).log2());
        assert!((histogram.team_entropy(0) - a).abs() < EPS);
        assert!((histogram.team_entropy(1) - 1.0).abs() < EPS);
        assert_eq!(histogram.team_entropy(2), 0.0);
        assert!((histogram.mean_entropy() - (a + 1.0) / 3.0).abs() < EPS);
    }

    #[test]
    fn test_single_appearance_counts_towards_mean() {
        let arrangement = arrangement(&[&["a", "b"], &["b", "a"], &["c", "d"]]);
        let histogram = ZoneHistogram::from_arrangement(&arrangement);
        assert_eq!(histogram.team_entropy(2), 0.0);
        assert_eq!(histogram.team_entropy(3), 0.0);
        assert!((histogram.mean_entropy() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_incremental_update_matches_fresh() {
        let mut arrangement = arrangement(&[
            &["1", "2", "3", "4"],
            &["5", "6", "7", "8"],
            &["1", "5", "2", "6"],
            &["3", "7", "4", "8"],
        ]);
        let mut histogram = ZoneHistogram::from_arrangement(&arrangement);

        let old = arrangement.match_teams(2);
        let new = vec![old[3], old[1], old[0], old[2]];
        histogram.remove_match(&old);
        histogram.add_match(&new);
        arrangement.set_match(2, &new);

        let fresh = ZoneHistogram::from_arrangement(&arrangement);
        assert_eq!(histogram, fresh);
        assert_eq!(histogram.mean_entropy(), fresh.mean_entropy());
    }

    #[test]
    fn test_mean_entropy_is_bounded() {
        let arrangement = arrangement(&[
            &["1", "2", "3"],
            &["2", "3", "1"],
            &["3", "1", "2"],
            &["1", "2", "4"],
        ]);
        let histogram = ZoneHistogram::from_arrangement(&arrangement);
        let entropy = histogram.mean_entropy();
        assert!(entropy >= 0.0);
        assert!(entropy <= arrangement.optimal_entropy() + EPS);
        assert_eq!(entropy, ZoneHistogram::from_arrangement(&arrangement).mean_entropy());
    }
}
