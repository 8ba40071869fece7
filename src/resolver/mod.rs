//! Name → id resolution for leagues and teams.
//!
//! [`LeagueRegistry`] is a fixed table. [`TeamResolver`] owns a lazily filled
//! roster cache and is shared by handle across all requests.

pub mod cache;
pub mod league;
pub mod names;
pub mod source;
pub mod team;

pub use cache::CacheKey;
pub use league::LeagueRegistry;
pub use team::TeamResolver;

use football_api::LeagueId;
use football_api::client::ApiError;
use std::fmt;

/// A lookup could not be answered because a roster it needed failed to load.
/// Plain "no such team" is `Ok(None)`, never this.
#[derive(Debug)]
pub enum ResolveError {
    Upstream { league_id: LeagueId, source: ApiError },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Upstream { league_id, source } => {
                write!(f, "roster for league {league_id} unavailable: {source}")
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Upstream { source, .. } => Some(source),
        }
    }
}
