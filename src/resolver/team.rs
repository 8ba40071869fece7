use super::cache::{CacheKey, TeamCache};
use super::league::LeagueRegistry;
use super::names::{self, MatchKind};
use super::source::RosterSource;
use super::ResolveError;
use football_api::client::{ApiError, ApiResult};
use football_api::{LeagueId, TeamDetail, TeamId};
use futures_util::{StreamExt, stream};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

const DEFAULT_DETAIL_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Roster fetched and merged; carries the number of teams.
    Fetched(usize),
    AlreadyLoaded,
}

/// Per-league results of a load-all sweep.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub fetched: Vec<LeagueId>,
    pub already_loaded: Vec<LeagueId>,
    pub failed: Vec<(LeagueId, ApiError)>,
}

impl LoadReport {
    pub fn any_available(&self) -> bool {
        !self.fetched.is_empty() || !self.already_loaded.is_empty()
    }

    fn into_first_failure(self) -> Option<ResolveError> {
        self.failed
            .into_iter()
            .next()
            .map(|(league_id, source)| ResolveError::Upstream { league_id, source })
    }
}

/// Resolves free-form team names to football-data team ids, fetching and
/// caching competition rosters on demand.
///
/// Cache entries and the loaded-league set sit behind one `RwLock`. Roster
/// fetches are serialized per league, so concurrent callers for the same
/// league share a single request.
pub struct TeamResolver<S> {
    source: S,
    leagues: LeagueRegistry,
    cache: RwLock<TeamCache>,
    in_flight: Mutex<HashMap<LeagueId, Arc<Mutex<()>>>>,
    detail_concurrency: usize,
}

impl<S: RosterSource> TeamResolver<S> {
    pub fn new(source: S, leagues: LeagueRegistry) -> Self {
        Self {
            source,
            leagues,
            cache: RwLock::new(TeamCache::default()),
            in_flight: Mutex::new(HashMap::new()),
            detail_concurrency: DEFAULT_DETAIL_CONCURRENCY,
        }
    }

    pub fn with_detail_concurrency(mut self, limit: usize) -> Self {
        self.detail_concurrency = limit.max(1);
        self
    }

    pub fn leagues(&self) -> &LeagueRegistry {
        &self.leagues
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch and merge one league's roster unless it is already loaded.
    /// On failure nothing is merged and the league stays unloaded. A roster
    /// that arrives after a [`clear_cache`](Self::clear_cache) is dropped and
    /// fetched again.
    pub async fn load_teams(&self, league_id: LeagueId) -> ApiResult<LoadOutcome> {
        if self.cache.read().await.is_loaded(league_id) {
            debug!("league {league_id} already loaded");
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        let guard = self.league_guard(league_id).await;
        let _fetching = guard.lock().await;

        loop {
            let generation = {
                let cache = self.cache.read().await;
                // A concurrent caller may have completed the fetch while we waited.
                if cache.is_loaded(league_id) {
                    debug!("league {league_id} loaded by a concurrent request");
                    return Ok(LoadOutcome::AlreadyLoaded);
                }
                cache.generation()
            };

            debug!("fetching roster for league {league_id}");
            let roster = self.source.fetch_roster(league_id).await.inspect_err(|e| {
                warn!("roster fetch for league {league_id} failed: {e}");
            })?;

            let mut cache = self.cache.write().await;
            if cache.generation() != generation {
                // Cleared mid-fetch: this roster predates the refresh.
                debug!("cache cleared during roster fetch for league {league_id}, fetching again");
                continue;
            }
            cache.merge_roster(league_id, &roster);
            info!("loaded {} teams for league {league_id}", roster.len());
            return Ok(LoadOutcome::Fetched(roster.len()));
        }
    }

    /// Load every registry league in registry order. One league failing does
    /// not stop the others.
    pub async fn load_all_teams(&self) -> LoadReport {
        info!("loading teams for all {} leagues", self.leagues.leagues().len());
        let mut report = LoadReport::default();
        for league_id in self.leagues.ids() {
            match self.load_teams(league_id).await {
                Ok(LoadOutcome::Fetched(_)) => report.fetched.push(league_id),
                Ok(LoadOutcome::AlreadyLoaded) => report.already_loaded.push(league_id),
                Err(e) => report.failed.push((league_id, e)),
            }
        }
        info!(
            "teams available from {} leagues, {} failed",
            report.fetched.len() + report.already_loaded.len(),
            report.failed.len()
        );
        report
    }

    /// Team id for `input`, optionally restricted to one league.
    ///
    /// Tries exact, prefix, then substring match; within the prefix and
    /// substring passes the earliest cached entry wins. `Ok(None)` means no
    /// match. An error is returned only when nothing matched and a roster
    /// this call tried to load could not be fetched.
    pub async fn resolve_team(
        &self,
        input: &str,
        league_id: Option<LeagueId>,
    ) -> Result<Option<TeamId>, ResolveError> {
        let wanted = names::normalize(input);
        if wanted.is_empty() {
            return Ok(None);
        }

        let (hit, failure) = match league_id {
            Some(league_id) => {
                let failure = self
                    .load_teams(league_id)
                    .await
                    .err()
                    .map(|source| ResolveError::Upstream { league_id, source });
                let hit = self.cache.read().await.find_scoped(league_id, &wanted);
                (hit, failure)
            }
            None => {
                let failure = if self.cache.read().await.has_any_loaded() {
                    None
                } else {
                    self.load_all_teams().await.into_first_failure()
                };
                let hit = self.cache.read().await.find_global(&wanted);
                (hit, failure)
            }
        };

        match (hit, failure) {
            (Some((kind, team_id)), _) => {
                log_match(input, league_id, kind, team_id);
                Ok(Some(team_id))
            }
            (None, Some(err)) => Err(err),
            (None, None) => {
                debug!("no team matches {input:?} (league {league_id:?})");
                Ok(None)
            }
        }
    }

    /// Snapshot of every cache key, global and league-scoped.
    pub async fn team_keys(&self) -> Vec<CacheKey> {
        self.cache.read().await.keys()
    }

    /// Drop every cached team and forget which leagues were loaded. Returns
    /// the number of entries discarded.
    pub async fn clear_cache(&self) -> usize {
        let mut cache = self.cache.write().await;
        let dropped = cache.len();
        let leagues = cache.loaded_count();
        cache.clear();
        info!("team cache cleared ({dropped} entries, {leagues} leagues)");
        dropped
    }

    /// Teams whose home venue matches `stadium` after normalization.
    ///
    /// There is no venue index upstream, so this fetches the detail record of
    /// every distinct cached team. Teams whose detail fetch fails are skipped.
    pub async fn find_venue(&self, stadium: &str) -> Result<Vec<TeamDetail>, ResolveError> {
        let wanted = names::normalize(stadium);
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        if !self.cache.read().await.has_any_loaded() {
            let report = self.load_all_teams().await;
            if !report.any_available()
                && let Some(err) = report.into_first_failure()
            {
                return Err(err);
            }
        }

        let team_ids = self.cache.read().await.team_ids();
        debug!("scanning {} teams for venue {stadium:?}", team_ids.len());

        let details: Vec<(TeamId, ApiResult<TeamDetail>)> = stream::iter(team_ids)
            .map(|team_id| async move { (team_id, self.source.fetch_team_detail(team_id).await) })
            .buffered(self.detail_concurrency)
            .collect()
            .await;

        let mut matches = Vec::new();
        for (team_id, result) in details {
            match result {
                Ok(detail) => {
                    let venue = detail.venue.as_deref().map(names::normalize);
                    if venue.as_deref() == Some(wanted.as_str()) {
                        matches.push(detail);
                    }
                }
                Err(e) => warn!("skipping team {team_id} in venue scan: {e}"),
            }
        }
        Ok(matches)
    }

    async fn league_guard(&self, league_id: LeagueId) -> Arc<Mutex<()>> {
        let mut guards = self.in_flight.lock().await;
        guards.entry(league_id).or_default().clone()
    }
}

fn log_match(input: &str, league_id: Option<LeagueId>, kind: MatchKind, team_id: TeamId) {
    match kind {
        MatchKind::Exact => debug!("{input:?} -> team {team_id} (exact, league {league_id:?})"),
        MatchKind::Prefix | MatchKind::Contains => {
            debug!("{input:?} -> team {team_id} ({kind:?} fallback, league {league_id:?})")
        }
    }
}
