use super::names::{self, MatchKind};
use football_api::{LeagueId, TeamId, TeamSummary};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Cache key: a bare normalized name (global) or a name scoped to a league.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Global(String),
    Scoped(String, LeagueId),
}

impl CacheKey {
    pub fn name(&self) -> &str {
        match self {
            CacheKey::Global(name) | CacheKey::Scoped(name, _) => name,
        }
    }

    pub fn league(&self) -> Option<LeagueId> {
        match self {
            CacheKey::Global(_) => None,
            CacheKey::Scoped(_, league) => Some(*league),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Global(name) => write!(f, "{name}"),
            CacheKey::Scoped(name, league) => write!(f, "{name}_{league}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedTeam {
    pub key: CacheKey,
    pub team_id: TeamId,
}

/// Team entries plus the set of fully loaded leagues. Both live in one value
/// so a single lock covers them and a clear can never be observed halfway.
///
/// Entries keep insertion order; partial matches scan in that order.
#[derive(Debug, Default)]
pub struct TeamCache {
    entries: Vec<CachedTeam>,
    index: HashMap<CacheKey, usize>,
    loaded: HashSet<LeagueId>,
    generation: u64,
}

impl TeamCache {
    pub fn is_loaded(&self, league_id: LeagueId) -> bool {
        self.loaded.contains(&league_id)
    }

    pub fn has_any_loaded(&self) -> bool {
        !self.loaded.is_empty()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Bumped by every [`clear`](Self::clear). A roster fetched under an older
    /// generation must not be merged.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Merge a complete roster and mark the league loaded. Scoped entries are
    /// always written; a global entry only when the name has none yet.
    pub fn merge_roster(&mut self, league_id: LeagueId, roster: &[TeamSummary]) {
        for team in roster {
            let name = names::normalize(&team.name);
            self.upsert(CacheKey::Scoped(name.clone(), league_id), team.id);
            let global = CacheKey::Global(name);
            if !self.index.contains_key(&global) {
                self.push(global, team.id);
            }
        }
        self.loaded.insert(league_id);
    }

    /// Exact, then prefix, then substring, among one league's entries.
    pub fn find_scoped(&self, league_id: LeagueId, input: &str) -> Option<(MatchKind, TeamId)> {
        let exact = CacheKey::Scoped(input.to_string(), league_id);
        if let Some(&i) = self.index.get(&exact) {
            return Some((MatchKind::Exact, self.entries[i].team_id));
        }
        let candidates = self
            .entries
            .iter()
            .filter(move |e| e.key.league() == Some(league_id))
            .map(|e| (e.key.name(), e.team_id));
        names::first_partial(candidates, input)
    }

    /// Exact, then prefix, then substring, among global entries.
    pub fn find_global(&self, input: &str) -> Option<(MatchKind, TeamId)> {
        if let Some(&i) = self.index.get(&CacheKey::Global(input.to_string())) {
            return Some((MatchKind::Exact, self.entries[i].team_id));
        }
        let candidates = self
            .entries
            .iter()
            .filter(|e| matches!(e.key, CacheKey::Global(_)))
            .map(|e| (e.key.name(), e.team_id));
        names::first_partial(candidates, input)
    }

    pub fn keys(&self) -> Vec<CacheKey> {
        self.entries.iter().map(|e| e.key.clone()).collect()
    }

    /// Distinct team ids in first-seen order.
    pub fn team_ids(&self) -> Vec<TeamId> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|e| e.team_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.loaded.clear();
        self.generation += 1;
    }

    fn upsert(&mut self, key: CacheKey, team_id: TeamId) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].team_id = team_id,
            None => self.push(key, team_id),
        }
    }

    fn push(&mut self, key: CacheKey, team_id: TeamId) {
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(CachedTeam { key, team_id });
    }
}
