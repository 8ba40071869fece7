use crate::wire::{
    CompetitionResponse, MatchesResponse, StandingsResponse, TeamsResponse, WireMatch,
    WireTableRow, WireTeam, WireTeamRef,
};
use crate::{
    Competition, LeagueId, Match, MatchStatus, Standing, TeamDetail, TeamId, TeamRef, TeamSummary,
};
use chrono::NaiveDate;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const FOOTBALL_DATA_V4: &str = "https://api.football-data.org/v4";
const AUTH_HEADER: &str = "X-Auth-Token";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// football-data.org v4 client.
///
/// Every request carries the `X-Auth-Token` header and an explicit timeout.
/// A client without an API key still constructs; each call then fails with
/// [`ApiError::MissingCredential`] before touching the network.
#[derive(Debug, Clone)]
pub struct FootballApi {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl Default for FootballApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("footbot/0.1 (football chat bot)")
                .build()
                .unwrap_or_default(),
            base_url: FOOTBALL_DATA_V4.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    MissingCredential,
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) if e.is_timeout() => write!(f, "Timed out for {url}: {e}"),
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::MissingCredential => write!(f, "API key missing (set FOOTBALL_DATA_API_KEY)"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) | ApiError::Parsing(e, _) => Some(e),
            _ => None,
        }
    }
}

impl FootballApi {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full roster of a competition. The whole response must decode: one
    /// malformed entry fails the call instead of yielding a partial roster.
    pub async fn fetch_teams(&self, league_id: LeagueId) -> ApiResult<Vec<TeamSummary>> {
        let raw: TeamsResponse = self.get(&format!("/competitions/{league_id}/teams")).await?;
        Ok(raw
            .teams
            .into_iter()
            .map(|t| TeamSummary::new(t.id, t.name))
            .collect())
    }

    pub async fn fetch_team(&self, team_id: TeamId) -> ApiResult<TeamDetail> {
        let raw: WireTeam = self.get(&format!("/teams/{team_id}")).await?;
        Ok(map_team_detail(raw))
    }

    /// Upcoming matches of a competition, soonest first.
    pub async fn fetch_scheduled_matches(
        &self,
        league_id: LeagueId,
        limit: u8,
    ) -> ApiResult<Vec<Match>> {
        let path = format!("/competitions/{league_id}/matches?status=SCHEDULED&limit={limit}");
        self.get_matches(&path).await
    }

    pub async fn fetch_finished_matches(
        &self,
        league_id: LeagueId,
        limit: u8,
    ) -> ApiResult<Vec<Match>> {
        let path = format!("/competitions/{league_id}/matches?status=FINISHED&limit={limit}");
        self.get_matches(&path).await
    }

    /// Most recent finished matches of one team, across competitions.
    pub async fn fetch_team_form(&self, team_id: TeamId, limit: u8) -> ApiResult<Vec<Match>> {
        let path = format!("/teams/{team_id}/matches?status=FINISHED&limit={limit}");
        self.get_matches(&path).await
    }

    pub async fn fetch_matches_on(
        &self,
        league_id: LeagueId,
        date: NaiveDate,
    ) -> ApiResult<Vec<Match>> {
        let day = date.format("%Y-%m-%d");
        let path = format!("/competitions/{league_id}/matches?dateFrom={day}&dateTo={day}");
        self.get_matches(&path).await
    }

    /// Overall league table: the `TOTAL` group, or the first group when none
    /// is tagged that way.
    pub async fn fetch_standings(&self, league_id: LeagueId) -> ApiResult<Vec<Standing>> {
        let raw: StandingsResponse = self
            .get(&format!("/competitions/{league_id}/standings"))
            .await?;
        let total = raw
            .standings
            .iter()
            .position(|g| g.group_type.as_deref() == Some("TOTAL"))
            .unwrap_or(0);
        let group = raw
            .standings
            .into_iter()
            .nth(total)
            .ok_or_else(|| ApiError::NotFound(format!("no standings for competition {league_id}")))?;
        Ok(group.table.into_iter().map(map_table_row).collect())
    }

    pub async fn fetch_competition(&self, league_id: LeagueId) -> ApiResult<Competition> {
        let raw: CompetitionResponse = self.get(&format!("/competitions/{league_id}")).await?;
        Ok(map_competition(raw))
    }

    async fn get_matches(&self, path: &str) -> ApiResult<Vec<Match>> {
        let raw: MatchesResponse = self.get(path).await?;
        Ok(raw.matches.into_iter().map(map_match).collect())
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let api_key = self.api_key.as_deref().ok_or(ApiError::MissingCredential)?;
        let url = format!("{}{path}", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(AUTH_HEADER, api_key)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        match response.error_for_status() {
            // The timeout also covers the body; running out mid-body is a
            // network failure, not a malformed response.
            Ok(res) => res.json::<T>().await.map_err(|e| {
                if e.is_timeout() {
                    ApiError::Network(e, url)
                } else {
                    ApiError::Parsing(e, url)
                }
            }),
            Err(e) => Err(ApiError::Api(e, url)),
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: football-data wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_team_detail(t: WireTeam) -> TeamDetail {
    TeamDetail {
        id: t.id,
        name: t.name,
        venue: t.venue.filter(|v| !v.trim().is_empty()),
        founded: t.founded,
    }
}

fn map_team_ref(t: WireTeamRef) -> TeamRef {
    TeamRef {
        id: t.id,
        name: t.name.unwrap_or_else(|| "TBD".to_string()),
    }
}

fn map_match(m: WireMatch) -> Match {
    let score = m
        .score
        .and_then(|s| s.full_time)
        .and_then(|ft| Some((ft.home?, ft.away?)));
    Match {
        id: m.id,
        home: map_team_ref(m.home_team),
        away: map_team_ref(m.away_team),
        status: m.status.as_deref().map(parse_status).unwrap_or_default(),
        score,
        kickoff: m.utc_date,
    }
}

fn map_table_row(row: WireTableRow) -> Standing {
    Standing {
        position: row.position,
        team: map_team_ref(row.team),
        played: row.played_games,
        points: row.points,
    }
}

fn map_competition(c: CompetitionResponse) -> Competition {
    Competition {
        id: c.id,
        name: c.name,
        area: c.area.and_then(|a| a.name),
        first_season: c.first_season.or_else(|| {
            c.current_season
                .as_ref()
                .and_then(|s| s.start_date.as_deref())
                .and_then(|d| d.get(..4))
                .and_then(|y| y.parse().ok())
        }),
        number_of_teams: c.number_of_teams,
        current_matchday: c.current_season.and_then(|s| s.current_matchday),
    }
}

fn parse_status(s: &str) -> MatchStatus {
    match s {
        "IN_PLAY" | "PAUSED" | "LIVE" => MatchStatus::InPlay,
        "FINISHED" | "AWARDED" => MatchStatus::Finished,
        "POSTPONED" | "SUSPENDED" => MatchStatus::Postponed,
        "CANCELLED" => MatchStatus::Cancelled,
        _ => MatchStatus::Scheduled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::io::Write;

    const ROSTER_JSON: &str = r#"{
        "count": 2,
        "teams": [
            {"id": 57, "name": "Arsenal FC", "shortName": "Arsenal", "tla": "ARS", "venue": "Emirates Stadium", "founded": 1886},
            {"id": 61, "name": "Chelsea FC", "shortName": "Chelsea", "tla": "CHE", "venue": "Stamford Bridge", "founded": 1905}
        ]
    }"#;

    fn api_for(server: &mockito::Server) -> FootballApi {
        FootballApi::new(Some("secret".into())).with_base_url(server.url())
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("FINISHED"), MatchStatus::Finished);
        assert_eq!(parse_status("IN_PLAY"), MatchStatus::InPlay);
        assert_eq!(parse_status("PAUSED"), MatchStatus::InPlay);
        assert_eq!(parse_status("TIMED"), MatchStatus::Scheduled);
        assert_eq!(parse_status("POSTPONED"), MatchStatus::Postponed);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        assert!(FootballApi::new(Some("   ".into())).api_key.is_none());
        assert_eq!(
            FootballApi::new(Some(" abc \n".into())).api_key.as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let api = FootballApi::default().with_base_url("http://localhost:1234/v4/");
        assert_eq!(api.base_url, "http://localhost:1234/v4");
    }

    #[test]
    fn match_without_full_time_score_has_no_score() {
        let raw: WireMatch = serde_json::from_str(
            r#"{
                "id": 1,
                "utcDate": "2025-08-16T14:00:00Z",
                "status": "SCHEDULED",
                "homeTeam": {"id": 57, "name": "Arsenal FC"},
                "awayTeam": {"id": null, "name": null},
                "score": {"fullTime": {"home": null, "away": null}}
            }"#,
        )
        .expect("match should parse");
        let m = map_match(raw);
        assert_eq!(m.score, None);
        assert_eq!(m.away.name, "TBD");
        assert_eq!(m.status, MatchStatus::Scheduled);
        assert!(m.kickoff.is_some());
    }

    #[test]
    fn founded_accepts_number_and_string() {
        let numeric: WireTeam =
            serde_json::from_str(r#"{"id": 1, "name": "A", "founded": 1886}"#).unwrap();
        let text: WireTeam =
            serde_json::from_str(r#"{"id": 2, "name": "B", "founded": "1905"}"#).unwrap();
        let absent: WireTeam = serde_json::from_str(r#"{"id": 3, "name": "C"}"#).unwrap();
        assert_eq!(numeric.founded.as_deref(), Some("1886"));
        assert_eq!(text.founded.as_deref(), Some("1905"));
        assert_eq!(absent.founded, None);
    }

    #[test]
    fn competition_first_season_falls_back_to_current_season_start() {
        let raw: CompetitionResponse = serde_json::from_str(
            r#"{
                "id": 2021,
                "name": "Premier League",
                "area": {"name": "England"},
                "currentSeason": {"startDate": "2025-08-15", "currentMatchday": 9}
            }"#,
        )
        .unwrap();
        let c = map_competition(raw);
        assert_eq!(c.first_season, Some(2025));
        assert_eq!(c.area.as_deref(), Some("England"));
        assert_eq!(c.current_matchday, Some(9));
    }

    #[tokio::test]
    async fn fetch_teams_sends_auth_header_and_maps_roster() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/competitions/2021/teams")
            .match_header("x-auth-token", "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(ROSTER_JSON)
            .create_async()
            .await;

        let teams = api_for(&server).fetch_teams(2021).await.expect("roster");

        mock.assert_async().await;
        assert_eq!(
            teams,
            vec![TeamSummary::new(57, "Arsenal FC"), TeamSummary::new(61, "Chelsea FC")]
        );
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/competitions/2021/teams")
            .with_status(429)
            .with_body(r#"{"message": "You reached your request limit."}"#)
            .create_async()
            .await;

        let err = api_for(&server).fetch_teams(2021).await.unwrap_err();
        assert!(matches!(err, ApiError::Api(..)), "got {err}");
    }

    #[tokio::test]
    async fn roster_entry_without_id_fails_the_whole_roster() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/competitions/2019/teams")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"teams": [{"id": 98, "name": "AC Milan"}, {"name": "Broken"}]}"#)
            .create_async()
            .await;

        let err = api_for(&server).fetch_teams(2019).await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(..)), "got {err}");
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let api = FootballApi::new(None).with_base_url(server.url());
        let err = api.fetch_team(57).await.unwrap_err();

        assert!(matches!(err, ApiError::MissingCredential));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_team_maps_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/teams/57")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 57, "name": "Arsenal FC", "venue": "Emirates Stadium", "founded": 1886}"#)
            .create_async()
            .await;

        let team = api_for(&server).fetch_team(57).await.expect("team");
        assert_eq!(team.name, "Arsenal FC");
        assert_eq!(team.venue.as_deref(), Some("Emirates Stadium"));
        assert_eq!(team.founded.as_deref(), Some("1886"));
    }

    #[tokio::test]
    async fn fetch_standings_prefers_total_table() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/competitions/2021/standings")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"standings": [
                    {"type": "HOME", "table": [
                        {"position": 1, "team": {"id": 57, "name": "Arsenal FC"}, "playedGames": 19, "points": 45}
                    ]},
                    {"type": "TOTAL", "table": [
                        {"position": 1, "team": {"id": 64, "name": "Liverpool FC"}, "playedGames": 38, "points": 84},
                        {"position": 2, "team": {"id": 57, "name": "Arsenal FC"}, "playedGames": 38, "points": 74}
                    ]}
                ]}"#,
            )
            .create_async()
            .await;

        let table = api_for(&server).fetch_standings(2021).await.expect("table");
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].team.name, "Liverpool FC");
        assert_eq!(table[1].played, Some(38));
        assert_eq!(table[1].points, Some(74));
    }

    #[tokio::test]
    async fn untagged_standings_fall_back_to_first_group() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/competitions/2001/standings")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"standings": [
                    {"table": [{"position": 1, "team": {"id": 5, "name": "FC Bayern"}, "points": 12}]}
                ]}"#,
            )
            .create_async()
            .await;

        let table = api_for(&server).fetch_standings(2001).await.expect("table");
        assert_eq!(table[0].team.name, "FC Bayern");
        assert_eq!(table[0].played, None);
    }

    #[tokio::test]
    async fn slow_body_times_out_as_network_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/competitions/2021/teams")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_chunked_body(|w| {
                w.write_all(br#"{"teams": ["#)?;
                std::thread::sleep(Duration::from_millis(600));
                w.write_all(br#"{"id": 57, "name": "Arsenal FC"}]}"#)
            })
            .create_async()
            .await;

        let api = api_for(&server).with_timeout(Duration::from_millis(150));
        assert_eq!(api.timeout(), Duration::from_millis(150));

        let err = api.fetch_teams(2021).await.unwrap_err();
        assert!(matches!(&err, ApiError::Network(e, _) if e.is_timeout()), "got {err}");
        assert!(err.to_string().starts_with("Timed out for"), "got {err}");
    }

    #[tokio::test]
    async fn empty_standings_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/competitions/2015/standings")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"standings": []}"#)
            .create_async()
            .await;

        let err = api_for(&server).fetch_standings(2015).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
