use football_api::client::{ApiResult, FootballApi};
use football_api::{LeagueId, TeamDetail, TeamId, TeamSummary};
use std::future::Future;

/// Remote endpoints the resolver depends on. Implemented by [`FootballApi`];
/// tests substitute a counting stub.
pub trait RosterSource: Send + Sync {
    /// Complete roster for one competition, or an error. Never a partial list.
    fn fetch_roster(
        &self,
        league_id: LeagueId,
    ) -> impl Future<Output = ApiResult<Vec<TeamSummary>>> + Send;

    fn fetch_team_detail(
        &self,
        team_id: TeamId,
    ) -> impl Future<Output = ApiResult<TeamDetail>> + Send;
}

impl RosterSource for FootballApi {
    async fn fetch_roster(&self, league_id: LeagueId) -> ApiResult<Vec<TeamSummary>> {
        self.fetch_teams(league_id).await
    }

    async fn fetch_team_detail(&self, team_id: TeamId) -> ApiResult<TeamDetail> {
        self.fetch_team(team_id).await
    }
}
