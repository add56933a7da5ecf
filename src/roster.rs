use std::collections::BTreeSet;

/// The set of teams taking part in a tournament.
///
/// Team names are opaque identifiers. They are kept sorted so that a team's
/// index is stable for a given set of names, which keeps reports deterministic.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    teams: Vec<String>,
}

impl Roster {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        Self { teams: unique.into_iter().collect() }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.teams.binary_search_by(|team| team.as_str().cmp(name)).ok()
    }

    pub fn name(&self, index: usize) -> &str {
        &self.teams[index]
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.teams.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_names_sorts_and_dedups() {
        let roster = Roster::from_names(["c", "a", "b", "a", "c"]);
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_index_of() {
        let roster = Roster::from_names(["10", "2", "1"]);
        // lexical, not numeric, order
        assert_eq!(roster.index_of("1"), Some(0));
        assert_eq!(roster.index_of("10"), Some(1));
        assert_eq!(roster.index_of("2"), Some(2));
        assert_eq!(roster.index_of("3"), None);
        assert_eq!(roster.name(1), "10");
    }
}
