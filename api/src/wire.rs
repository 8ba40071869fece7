//! football-data.org v4 wire types: serde shapes for deserializing responses.
//! These map to the domain types via the mapping functions in client.rs.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Teams  (/competitions/{id}/teams, /teams/{id})
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamsResponse {
    pub teams: Vec<WireTeam>,
}

/// `id` and `name` are required: a roster entry without them fails the whole
/// response instead of producing a half-usable team.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireTeam {
    pub id: u32,
    pub name: String,
    pub venue: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub founded: Option<String>,
}

// ---------------------------------------------------------------------------
// Matches  (/competitions/{id}/matches, /teams/{id}/matches)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MatchesResponse {
    #[serde(default)]
    pub matches: Vec<WireMatch>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireMatch {
    pub id: Option<u64>,
    pub utc_date: Option<DateTime<Utc>>,
    pub status: Option<String>, // "SCHEDULED", "TIMED", "IN_PLAY", "PAUSED", "FINISHED", ...
    pub home_team: WireTeamRef,
    pub away_team: WireTeamRef,
    pub score: Option<WireScore>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WireTeamRef {
    pub id: Option<u32>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireScore {
    pub full_time: Option<WireGoals>,
}

/// Both sides are null until the match has a result.
#[derive(Debug, Deserialize, Clone)]
pub struct WireGoals {
    pub home: Option<u16>,
    pub away: Option<u16>,
}

// ---------------------------------------------------------------------------
// Standings  (/competitions/{id}/standings)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StandingsResponse {
    #[serde(default)]
    pub standings: Vec<WireStandingGroup>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireStandingGroup {
    #[serde(rename = "type")]
    pub group_type: Option<String>, // "TOTAL", "HOME", "AWAY"
    #[serde(default)]
    pub table: Vec<WireTableRow>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireTableRow {
    pub position: u16,
    pub team: WireTeamRef,
    pub played_games: Option<u16>,
    pub points: Option<u16>,
}

// ---------------------------------------------------------------------------
// Competition  (/competitions/{id})
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionResponse {
    pub id: Option<u32>,
    pub name: String,
    pub area: Option<WireArea>,
    pub first_season: Option<i32>,
    pub number_of_teams: Option<u32>,
    pub current_season: Option<WireSeason>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireArea {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireSeason {
    pub start_date: Option<String>, // "2024-08-16"
    pub current_matchday: Option<u16>,
}

/// The API sends `founded` as a number; older snapshots send it as a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
