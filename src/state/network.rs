use crate::commands::{Command, MENU};
use crate::replies;
use crate::resolver::{LeagueRegistry, TeamResolver};
use crate::state::messages::{NetworkRequest, NetworkResponse};
use chrono::Utc;
use football_api::client::{ApiError, FootballApi};
use football_api::{LeagueId, TeamId};
use log::{debug, error};
use std::sync::Arc;
use tokio::sync::mpsc;

const MATCH_LIMIT: u8 = 5;

/// Receives network-backed commands and answers each on its own task, so a
/// slow roster load does not hold up other lookups.
pub struct NetworkWorker {
    handler: CommandHandler,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
}

impl NetworkWorker {
    pub fn new(
        resolver: Arc<TeamResolver<FootballApi>>,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            handler: CommandHandler { resolver },
            requests,
            responses,
        }
    }

    pub async fn run(mut self) {
        while let Some(NetworkRequest { id, command }) = self.requests.recv().await {
            let handler = self.handler.clone();
            let responses = self.responses.clone();

            tokio::spawn(async move {
                debug!("request {id}: {command:?}");
                let response = match handler.handle(command).await {
                    Ok(text) => NetworkResponse::Reply { id, text },
                    Err(err) => {
                        error!("request {id} failed: {err}");
                        NetworkResponse::Error { id, message: replies::api_failure(&err) }
                    }
                };
                if let Err(e) = responses.send(response).await {
                    error!("Failed to send network response: {e}");
                }
            });
        }
        debug!("network worker stopped: request channel closed");
    }
}

/// Answer for commands that need no network access.
pub fn local_reply(command: &Command, leagues: &LeagueRegistry) -> Option<String> {
    match command {
        Command::Start => Some(MENU.to_string()),
        Command::Ping => Some(replies::pong()),
        Command::Leagues => Some(replies::leagues(leagues)),
        _ => None,
    }
}

#[derive(Clone)]
struct CommandHandler {
    resolver: Arc<TeamResolver<FootballApi>>,
}

impl CommandHandler {
    fn api(&self) -> &FootballApi {
        self.resolver.source()
    }

    /// User-facing outcomes (unknown league, unknown team, roster outage) are
    /// `Ok` replies; `Err` is left for direct API calls that failed.
    async fn handle(&self, command: Command) -> Result<String, ApiError> {
        if let Some(text) = local_reply(&command, self.resolver.leagues()) {
            return Ok(text);
        }

        match command {
            Command::League { name } => {
                let Some(league_id) = self.league(&name) else {
                    return Ok(replies::league_not_found(&name));
                };
                let competition = self.api().fetch_competition(league_id).await?;
                Ok(replies::competition(&competition))
            }
            Command::NextMatch { league } => {
                let Some(league_id) = self.league(&league) else {
                    return Ok(replies::league_not_found(&league));
                };
                let matches = self.api().fetch_scheduled_matches(league_id, MATCH_LIMIT).await?;
                Ok(replies::next_match(&matches))
            }
            Command::TopTeams { league } => {
                let Some(league_id) = self.league(&league) else {
                    return Ok(replies::league_not_found(&league));
                };
                let standings = self.api().fetch_standings(league_id).await?;
                Ok(replies::table(&standings))
            }
            Command::Relegation { league } => {
                let Some(league_id) = self.league(&league) else {
                    return Ok(replies::league_not_found(&league));
                };
                let standings = self.api().fetch_standings(league_id).await?;
                Ok(replies::relegation(&standings))
            }
            Command::Today { league } => {
                let Some(league_id) = self.league(&league) else {
                    return Ok(replies::league_not_found(&league));
                };
                let today = Utc::now().date_naive();
                let matches = self.api().fetch_matches_on(league_id, today).await?;
                Ok(replies::today(&matches))
            }
            Command::Last { league } => {
                let Some(league_id) = self.league(&league) else {
                    return Ok(replies::league_not_found(&league));
                };
                let matches = self.api().fetch_finished_matches(league_id, MATCH_LIMIT).await?;
                Ok(replies::last_match(&matches))
            }
            Command::Form { team, league } => {
                let league_id = match league.as_deref() {
                    Some(name) => match self.league(name) {
                        Some(id) => Some(id),
                        None => return Ok(replies::league_not_found(name)),
                    },
                    None => None,
                };
                let (team_id, _) = match self.lookup_team(&team, league_id).await {
                    Ok(found) => found,
                    Err(reply) => return Ok(reply),
                };
                let matches = self.api().fetch_team_form(team_id, MATCH_LIMIT).await?;
                Ok(replies::form(team_id, &matches))
            }
            Command::Team { team, league } => {
                // An unrecognised league qualifier widens the search instead of failing it.
                let league_id = league.as_deref().and_then(|name| {
                    let id = self.league(name);
                    if id.is_none() {
                        debug!("unknown league {name:?} for /team, searching all leagues");
                    }
                    id
                });
                let (team_id, league_name) = match self.lookup_team(&team, league_id).await {
                    Ok(found) => found,
                    Err(reply) => return Ok(reply),
                };
                let detail = self.api().fetch_team(team_id).await?;
                Ok(replies::team(&detail, league_name))
            }
            Command::Teams { league } => {
                let scope = match league.as_deref() {
                    Some(name) => match self.league(name) {
                        Some(id) => self.resolver.leagues().name_of(id).map(|n| (id, n)),
                        None => return Ok(replies::league_not_found(name)),
                    },
                    None => None,
                };
                let keys = self.resolver.team_keys().await;
                Ok(replies::cached_teams(&keys, scope))
            }
            Command::Stadium { name } => match self.resolver.find_venue(&name).await {
                Ok(teams) => Ok(replies::stadium(&name, &teams)),
                Err(err) => Ok(replies::unavailable(&err)),
            },
            Command::Refresh => {
                let dropped = self.resolver.clear_cache().await;
                Ok(replies::cache_cleared(dropped))
            }
            Command::Start | Command::Ping | Command::Leagues | Command::Quit => Ok(String::new()),
        }
    }

    fn league(&self, name: &str) -> Option<LeagueId> {
        self.resolver.leagues().resolve(name)
    }

    /// Team id plus the canonical league name when one was given. `Err`
    /// carries the reply to send instead.
    async fn lookup_team(
        &self,
        team: &str,
        league_id: Option<LeagueId>,
    ) -> Result<(TeamId, Option<&'static str>), String> {
        match self.resolver.resolve_team(team, league_id).await {
            Ok(Some(team_id)) => {
                let league_name = league_id.and_then(|id| self.resolver.leagues().name_of(id));
                Ok((team_id, league_name))
            }
            Ok(None) => Err(replies::team_not_found(team)),
            Err(err) => Err(replies::unavailable(&err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // No API key: every remote call fails before any I/O, which lets these
    // tests exercise the reply paths offline.
    fn offline_handler() -> CommandHandler {
        let resolver = TeamResolver::new(FootballApi::new(None), LeagueRegistry::default());
        CommandHandler { resolver: Arc::new(resolver) }
    }

    #[tokio::test]
    async fn unknown_league_is_a_reply_not_an_error() {
        let handler = offline_handler();
        let reply = handler
            .handle(Command::TopTeams { league: "atlantis".into() })
            .await
            .unwrap();
        assert!(reply.starts_with("League not found: atlantis"));
    }

    #[tokio::test]
    async fn direct_api_call_without_key_is_an_error() {
        let handler = offline_handler();
        let err = handler
            .handle(Command::TopTeams { league: "Premier League".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingCredential));
    }

    #[tokio::test]
    async fn team_lookup_without_key_reports_unavailable() {
        let handler = offline_handler();
        let reply = handler
            .handle(Command::Form { team: "arsenal".into(), league: Some("premier league".into()) })
            .await
            .unwrap();
        assert!(reply.starts_with("Team data is temporarily unavailable"), "{reply}");
    }

    #[tokio::test]
    async fn form_with_unknown_league_is_rejected() {
        let handler = offline_handler();
        let reply = handler
            .handle(Command::Form { team: "arsenal".into(), league: Some("mars league".into()) })
            .await
            .unwrap();
        assert!(reply.starts_with("League not found: mars league"));
    }

    #[tokio::test]
    async fn team_with_unknown_league_searches_every_league() {
        let handler = offline_handler();
        let reply = handler
            .handle(Command::Team { team: "arsenal".into(), league: Some("mars league".into()) })
            .await
            .unwrap();
        // The unscoped sweep ran (and failed without a key) instead of a league rejection.
        assert!(reply.starts_with("Team data is temporarily unavailable"), "{reply}");
    }

    #[tokio::test]
    async fn refresh_and_teams_work_on_an_empty_cache() {
        let handler = offline_handler();
        let reply = handler.handle(Command::Refresh).await.unwrap();
        assert!(reply.starts_with("Cache cleared (0 entries)"));

        let reply = handler.handle(Command::Teams { league: Some("serie a".into()) }).await.unwrap();
        assert!(reply.starts_with("No teams loaded for Serie A"));
    }

    #[test]
    fn local_replies_cover_menu_ping_and_leagues() {
        let leagues = LeagueRegistry::default();
        assert!(local_reply(&Command::Start, &leagues).unwrap().contains("/stadium"));
        assert!(local_reply(&Command::Leagues, &leagues).unwrap().contains("Ligue 1"));
        assert!(local_reply(&Command::Refresh, &leagues).is_none());
    }
}
