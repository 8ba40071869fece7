use football_api::LeagueId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct League {
    pub name: &'static str,
    pub id: LeagueId,
}

/// Competitions the bot knows by name. Order drives the load-all sweep, and
/// with it which league wins a shared global team name.
pub const KNOWN_LEAGUES: [League; 5] = [
    League { name: "Premier League", id: 2021 },
    League { name: "Serie A", id: 2019 },
    League { name: "La Liga", id: 2014 },
    League { name: "Bundesliga", id: 2002 },
    League { name: "Ligue 1", id: 2015 },
];

/// Fixed name → competition id table. Pure lookup, no network access.
#[derive(Debug, Clone)]
pub struct LeagueRegistry {
    leagues: Vec<League>,
}

impl Default for LeagueRegistry {
    fn default() -> Self {
        Self::new(KNOWN_LEAGUES.to_vec())
    }
}

impl LeagueRegistry {
    pub fn new(leagues: Vec<League>) -> Self {
        Self { leagues }
    }

    /// Case- and whitespace-insensitive exact match on the canonical name.
    pub fn resolve(&self, name: &str) -> Option<LeagueId> {
        let wanted = fold(name);
        self.leagues
            .iter()
            .find(|league| fold(league.name) == wanted)
            .map(|league| league.id)
    }

    pub fn name_of(&self, id: LeagueId) -> Option<&'static str> {
        self.leagues.iter().find(|l| l.id == id).map(|l| l.name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.leagues.iter().map(|l| l.name)
    }

    pub fn ids(&self) -> impl Iterator<Item = LeagueId> + '_ {
        self.leagues.iter().map(|l| l.id)
    }

    pub fn leagues(&self) -> &[League] {
        &self.leagues
    }
}

fn fold(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
