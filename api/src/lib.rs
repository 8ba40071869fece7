pub mod client;
pub mod wire;

use chrono::{DateTime, Utc};

/// football-data.org competition identifier (e.g. 2021 = Premier League).
pub type LeagueId = u32;
/// football-data.org team identifier (e.g. 57 = Arsenal FC).
pub type TeamId = u32;

// ---------------------------------------------------------------------------
// Domain types, independent of the football-data wire format
// ---------------------------------------------------------------------------

/// One roster entry as returned by the competition teams endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSummary {
    pub id: TeamId,
    pub name: String,
}

impl TeamSummary {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamDetail {
    pub id: TeamId,
    pub name: String,
    pub venue: Option<String>,
    pub founded: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TeamRef {
    pub id: Option<TeamId>,
    pub name: String, // "TBD" when the API has not assigned the slot yet
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InPlay,
    Finished,
    Postponed,
    Cancelled,
}

/// Result of a finished match from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Win => "W",
            Outcome::Draw => "D",
            Outcome::Loss => "L",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Match {
    pub id: Option<u64>,
    pub home: TeamRef,
    pub away: TeamRef,
    pub status: MatchStatus,
    pub score: Option<(u16, u16)>, // (home, away) full time
    pub kickoff: Option<DateTime<Utc>>,
}

impl Match {
    /// Win/draw/loss for `team_id`, or None when there is no score yet or the
    /// team did not play in this match.
    pub fn outcome_for(&self, team_id: TeamId) -> Option<Outcome> {
        let (home, away) = self.score?;
        let (ours, theirs) = if self.home.id == Some(team_id) {
            (home, away)
        } else if self.away.id == Some(team_id) {
            (away, home)
        } else {
            return None;
        };
        Some(match ours.cmp(&theirs) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Standing {
    pub position: u16,
    pub team: TeamRef,
    pub played: Option<u16>,
    pub points: Option<u16>,
}

#[derive(Debug, Clone, Default)]
pub struct Competition {
    pub id: Option<LeagueId>,
    pub name: String,
    pub area: Option<String>,
    pub first_season: Option<i32>,
    pub number_of_teams: Option<u32>,
    pub current_matchday: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(home: TeamId, away: TeamId, score: (u16, u16)) -> Match {
        Match {
            home: TeamRef { id: Some(home), name: "Home".into() },
            away: TeamRef { id: Some(away), name: "Away".into() },
            status: MatchStatus::Finished,
            score: Some(score),
            ..Default::default()
        }
    }

    #[test]
    fn outcome_is_relative_to_the_requested_team() {
        let m = finished(57, 61, (2, 1));
        assert_eq!(m.outcome_for(57), Some(Outcome::Win));
        assert_eq!(m.outcome_for(61), Some(Outcome::Loss));
    }

    #[test]
    fn outcome_draw_and_unknown_team() {
        let m = finished(57, 61, (1, 1));
        assert_eq!(m.outcome_for(61), Some(Outcome::Draw));
        assert_eq!(m.outcome_for(999), None);
    }

    #[test]
    fn outcome_needs_a_score() {
        let mut m = finished(57, 61, (0, 0));
        m.score = None;
        assert_eq!(m.outcome_for(57), None);
    }
}
