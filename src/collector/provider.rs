use anyhow::Result;
use async_trait::async_trait;

use super::models::{Fixture, FixtureStat, League, Team};

/// Trait that every football data provider must implement.
#[async_trait]
pub trait FootballDataSource: Send + Sync {
    /// Leagues and cups played in `country`.
    async fn leagues(&self, country: &str) -> Result<Vec<League>>;

    async fn teams(&self, league_id: i64, season: i32) -> Result<Vec<Team>>;

    /// Fixtures of a league season, optionally filtered by short status code.
    async fn fixtures(&self, league_id: i64, season: i32, status: Option<&str>)
        -> Result<Vec<Fixture>>;

    async fn fixture_statistics(&self, fixture_id: i64) -> Result<Vec<FixtureStat>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
