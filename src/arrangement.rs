use std::io;

use anyhow::*;
use nalgebra::DMatrix;

use crate::roster::Roster;

/// Represents an arrangement, which is a matrix where each row represents a match and each column represents a zone.
///
/// # Fields
///
/// * `matches` - Team indices into `roster`, one row per match, one column per zone
/// * `roster` - The teams appearing anywhere in the arrangement
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Arrangement {
    matches: DMatrix<usize>,
    roster: Roster,
}

impl Arrangement {
    /// Builds an arrangement from team names laid out as `rows[match][zone]`.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no matches, if a match has no zones, if the
    /// matches disagree on the number of zones, or if a team appears twice in one match.
    pub fn from_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self> {
        if rows.is_empty() {
            bail!("Arrangement has no matches");
        }
        let n_zones = rows[0].len();
        if n_zones == 0 {
            bail!("Match 1 has no zones");
        }

        for (m, row) in rows.iter().enumerate() {
            if row.len() != n_zones {
                bail!("Match {} has {} zones, expected {}", m + 1, row.len(), n_zones);
            }
            for (z, team) in row.iter().enumerate() {
                let team = team.as_ref();
                if team.is_empty() {
                    bail!("Match {} has no team in zone {}", m + 1, z + 1);
                }
                if row[..z].iter().any(|other| other.as_ref() == team) {
                    bail!("Team {:?} appears more than once in match {}", team, m + 1);
                }
            }
        }

        let roster = Roster::from_names(rows.iter().flatten().map(|team| team.as_ref()));
        let mut matches = DMatrix::zeros(rows.len(), n_zones);
        for (m, row) in rows.iter().enumerate() {
            for (z, team) in row.iter().enumerate() {
                matches[(m, z)] = roster
                    .index_of(team.as_ref())
                    .ok_or_else(|| anyhow!("Team {:?} missing from roster", team.as_ref()))?;
            }
        }

        Ok(Self { matches, roster })
    }

    /// Reads the tabular encoding: no header, one line per match, one field per zone.
    pub fn from_csv_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read match on line {}", line + 1))?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }
        Self::from_rows(&rows)
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for row in self.rows() {
            writer.write_record(&row).context("Failed to write match")?;
        }
        writer.flush().context("Failed to flush arrangement")?;
        Ok(())
    }

    pub fn n_matches(&self) -> usize {
        self.matches.nrows()
    }

    pub fn n_zones(&self) -> usize {
        self.matches.ncols()
    }

    pub fn n_teams(&self) -> usize {
        self.roster.len()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn matches(&self) -> &DMatrix<usize> {
        &self.matches
    }

    /// Team indices of match `m` in zone order.
    pub fn match_teams(&self, m: usize) -> Vec<usize> {
        self.matches.row(m).iter().copied().collect()
    }

    /// Overwrites the zone order of match `m`. The caller keeps the membership unchanged.
    pub fn set_match(&mut self, m: usize, order: &[usize]) {
        debug_assert_eq!(order.len(), self.n_zones());
        for (z, &team) in order.iter().enumerate() {
            self.matches[(m, z)] = team;
        }
    }

    /// The teams of match `m`, ignoring which zone each one is in.
    pub fn membership(&self, m: usize) -> Vec<usize> {
        let mut teams = self.match_teams(m);
        teams.sort_unstable();
        teams
    }

    pub fn same_membership(&self, other: &Arrangement) -> bool {
        self.roster == other.roster
            && self.n_matches() == other.n_matches()
            && (0..self.n_matches()).all(|m| self.membership(m) == other.membership(m))
    }

    /// Best achievable mean entropy: every team spread evenly over all zones.
    pub fn optimal_entropy(&self) -> f64 {
        (self.n_zones() as f64).log2()
    }

    pub fn rows(&self) -> Vec<Vec<&str>> {
        self.matches
            .row_iter()
            .map(|row| row.iter().map(|&team| self.roster.name(team)).collect())
            .collect()
    }

    /// Copy of the match matrix with each match's teams in ascending order.
    pub fn as_sorted(&self) -> DMatrix<usize> {
        let mut sorted = self.matches.clone();
        for m in 0..self.n_matches() {
            for (z, team) in self.membership(m).into_iter().enumerate() {
                sorted[(m, z)] = team;
            }
        }
        sorted
    }
}
