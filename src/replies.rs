//! Plain-text replies for the chat front end. Everything user-visible lives
//! here; the resolver and the API client carry no user-facing text.

use crate::resolver::{CacheKey, LeagueRegistry, ResolveError};
use football_api::client::ApiError;
use football_api::{Competition, LeagueId, Match, Standing, TeamDetail, TeamId};
use std::fmt::Write;

const RELEGATION_SPOTS: usize = 3;

pub fn pong() -> String {
    "Pong! Connection is up.".to_string()
}

pub fn leagues(registry: &LeagueRegistry) -> String {
    let mut out = String::from("Available leagues:\n");
    for name in registry.names() {
        let _ = writeln!(out, "{name}");
    }
    out
}

pub fn league_not_found(name: &str) -> String {
    format!("League not found: {name}. Use /leagues for the list.")
}

pub fn team_not_found(name: &str) -> String {
    format!("Team not found: {name}")
}

pub fn unavailable(err: &ResolveError) -> String {
    format!("Team data is temporarily unavailable, try again later. ({err})")
}

pub fn api_failure(err: &ApiError) -> String {
    match err {
        ApiError::MissingCredential => "The bot has no API key configured.".to_string(),
        _ => format!("The football service did not answer, try again later. ({err})"),
    }
}

pub fn competition(c: &Competition) -> String {
    let mut out = c.name.clone();
    if let Some(area) = &c.area {
        let _ = write!(out, " ({area})");
    }
    if let Some(season) = c.first_season {
        let _ = write!(out, "\nFirst season: {season}");
    }
    if let Some(teams) = c.number_of_teams {
        let _ = write!(out, "\nTeams: {teams}");
    }
    if let Some(matchday) = c.current_matchday {
        let _ = write!(out, "\nCurrent matchday: {matchday}");
    }
    out
}

pub fn next_match(matches: &[Match]) -> String {
    match matches.first() {
        Some(m) => format!("Next match: {} vs {}\n{}", m.home.name, m.away.name, kickoff(m)),
        None => "No scheduled matches.".to_string(),
    }
}

pub fn last_match(matches: &[Match]) -> String {
    // Latest kickoff wins; matches without a date sort first.
    match matches.iter().max_by_key(|m| m.kickoff) {
        Some(m) => format!(
            "Last match: {} vs {} -> {}\n{}",
            m.home.name,
            m.away.name,
            score(m),
            kickoff(m)
        ),
        None => "No recent matches.".to_string(),
    }
}

pub fn today(matches: &[Match]) -> String {
    if matches.is_empty() {
        return "No matches today.".to_string();
    }
    let mut out = String::from("Today's matches:\n");
    for m in matches {
        let time = m
            .kickoff
            .map(|k| k.format("%H:%M UTC").to_string())
            .unwrap_or_else(|| "TBD".to_string());
        let _ = writeln!(out, "{time}  {} vs {}", m.home.name, m.away.name);
    }
    out
}

pub fn form(team_id: TeamId, matches: &[Match]) -> String {
    if matches.is_empty() {
        return "No completed matches yet.".to_string();
    }
    let mut out = format!("Last {} results:\n", matches.len());
    for m in matches {
        let outcome = m.outcome_for(team_id).map(|o| o.label()).unwrap_or("-");
        let date = m
            .kickoff
            .map(|k| k.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{outcome} {} vs {} {} ({date})",
            m.home.name,
            m.away.name,
            score(m)
        );
    }
    out
}

pub fn table(standings: &[Standing]) -> String {
    if standings.is_empty() {
        return "No standings available.".to_string();
    }
    let mut out = String::from("League table:\n");
    for row in standings {
        let _ = write!(out, "{}. {}", row.position, row.team.name);
        if let Some(points) = row.points {
            let _ = write!(out, " - {points} pts");
        }
        if let Some(played) = row.played {
            let _ = write!(out, " ({played} played)");
        }
        out.push('\n');
    }
    out
}

pub fn relegation(standings: &[Standing]) -> String {
    if standings.is_empty() {
        return "No standings available.".to_string();
    }
    let start = standings.len().saturating_sub(RELEGATION_SPOTS);
    let mut out = String::from("Relegation zone:\n");
    for row in &standings[start..] {
        let _ = writeln!(out, "{}. {}", row.position, row.team.name);
    }
    out
}

pub fn team(detail: &TeamDetail, league: Option<&str>) -> String {
    let mut out = detail.name.clone();
    let _ = write!(out, "\nStadium: {}", detail.venue.as_deref().unwrap_or("unknown"));
    let _ = write!(out, "\nFounded: {}", detail.founded.as_deref().unwrap_or("unknown"));
    if let Some(league) = league {
        let _ = write!(out, "\nLeague: {league}");
    }
    out
}

pub fn stadium(name: &str, teams: &[TeamDetail]) -> String {
    if teams.is_empty() {
        return format!("Stadium not found: {name}");
    }
    let mut out = String::new();
    for t in teams {
        let venue = t.venue.as_deref().unwrap_or(name);
        let _ = writeln!(out, "{venue} -> {}", t.name);
    }
    out
}

/// Names currently cached, optionally for one league. Global entries are
/// listed once each; scoped entries only when a league is requested.
pub fn cached_teams(keys: &[CacheKey], league: Option<(LeagueId, &str)>) -> String {
    let names: Vec<&str> = keys
        .iter()
        .filter(|k| k.league() == league.map(|(id, _)| id))
        .map(|k| k.name())
        .collect();
    let title = league.map(|(_, name)| name).unwrap_or("all leagues");
    if names.is_empty() {
        return format!("No teams loaded for {title} yet. Look one up with /team or /form first.");
    }
    let mut out = format!("Teams loaded for {title} ({}):\n", names.len());
    for name in names {
        let _ = writeln!(out, "{name}");
    }
    out
}

pub fn cache_cleared(entries: usize) -> String {
    format!("Cache cleared ({entries} entries). Rosters will reload on the next lookup.")
}

fn kickoff(m: &Match) -> String {
    m.kickoff
        .map(|k| k.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "date TBD".to_string())
}

fn score(m: &Match) -> String {
    m.score
        .map(|(h, a)| format!("{h}-{a}"))
        .unwrap_or_else(|| "n/a".to_string())
}
