pub mod api_football;
pub mod csv_sink;
pub mod models;
pub mod provider;

pub use api_football::ApiFootball;
pub use csv_sink::CsvSink;
pub use provider::FootballDataSource;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use models::League;

/// Short status code of finished matches.
const FINISHED_STATUS: &str = "FT";
/// Only domestic leagues are collected; cups are dropped.
const LEAGUE_KIND: &str = "League";

/// What a collection run wrote out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    pub leagues: usize,
    pub teams: usize,
    pub fixtures: usize,
    pub statistics_files: usize,
    /// Provider requests that failed and were skipped
    pub failed_requests: usize,
}

/// Downloads leagues, teams, fixtures and match statistics into CSV files.
pub struct Collector {
    source: Arc<dyn FootballDataSource>,
    sink: CsvSink,
    /// Extra pause between per-fixture statistics requests
    statistics_delay: Duration,
}

impl Collector {
    pub fn new(
        source: Arc<dyn FootballDataSource>,
        sink: CsvSink,
        statistics_delay: Duration,
    ) -> Self {
        Collector {
            source,
            sink,
            statistics_delay,
        }
    }

    /// Collect every league season of `countries` × `seasons`.
    ///
    /// Provider failures are logged and skipped so one bad league does not
    /// abort the run; file-system failures are returned. If no country's league
    /// listing could be fetched the run fails before anything is written.
    pub async fn run(
        &self,
        countries: &[String],
        seasons: &[i32],
        include_statistics: bool,
    ) -> Result<CollectionSummary> {
        let mut summary = CollectionSummary::default();
        info!(
            "Collecting from {} for countries {:?}, seasons {:?}",
            self.source.name(),
            countries,
            seasons
        );

        let mut leagues: Vec<League> = Vec::new();
        let mut listed = 0;
        for country in countries {
            match self.source.leagues(country).await {
                Ok(found) => {
                    info!("{}: {} league(s)/cup(s)", country, found.len());
                    leagues.extend(found);
                    listed += 1;
                }
                Err(e) => {
                    warn!("Failed to fetch leagues for {}: {:#}", country, e);
                    summary.failed_requests += 1;
                }
            }
        }

        if listed == 0 && !countries.is_empty() {
            anyhow::bail!(
                "no league listing could be fetched from {} for {:?}",
                self.source.name(),
                countries
            );
        }

        leagues.retain(|l| l.kind == LEAGUE_KIND);
        let path = self.sink.write_leagues(&leagues)?;
        summary.leagues = leagues.len();
        info!("Saved {} leagues to {:?}", leagues.len(), path);

        for (i, league) in leagues.iter().enumerate() {
            for &season in seasons {
                info!(
                    "[{}/{}] {} ({}), season {}",
                    i + 1,
                    leagues.len(),
                    league.name,
                    league.league_id,
                    season
                );
                self.collect_season(league, season, include_statistics, &mut summary)
                    .await?;
            }
        }

        info!(
            "Collection finished: {} leagues, {} teams, {} fixtures, {} statistics files, {} failed requests",
            summary.leagues,
            summary.teams,
            summary.fixtures,
            summary.statistics_files,
            summary.failed_requests
        );
        Ok(summary)
    }

    async fn collect_season(
        &self,
        league: &League,
        season: i32,
        include_statistics: bool,
        summary: &mut CollectionSummary,
    ) -> Result<()> {
        let league_id = league.league_id;

        match self.source.teams(league_id, season).await {
            Ok(teams) => {
                let path = self.sink.write_teams(league_id, season, &teams)?;
                summary.teams += teams.len();
                info!("Saved {} teams to {:?}", teams.len(), path);
            }
            Err(e) => {
                warn!("Failed to fetch teams for league {} season {}: {:#}", league_id, season, e);
                summary.failed_requests += 1;
            }
        }

        let fixtures = match self
            .source
            .fixtures(league_id, season, Some(FINISHED_STATUS))
            .await
        {
            Ok(fixtures) => fixtures,
            Err(e) => {
                warn!(
                    "Failed to fetch fixtures for league {} season {}: {:#}",
                    league_id, season, e
                );
                summary.failed_requests += 1;
                return Ok(());
            }
        };
        let path = self.sink.write_fixtures(league_id, season, &fixtures)?;
        summary.fixtures += fixtures.len();
        info!("Saved {} fixtures to {:?}", fixtures.len(), path);

        if !include_statistics {
            return Ok(());
        }

        for fixture in &fixtures {
            match self.source.fixture_statistics(fixture.fixture_id).await {
                Ok(stats) => {
                    if self.sink.write_statistics(fixture.fixture_id, &stats)?.is_some() {
                        summary.statistics_files += 1;
                    }
                }
                Err(e) => {
                    warn!(
                        "Failed to fetch statistics for fixture {}: {:#}",
                        fixture.fixture_id, e
                    );
                    summary.failed_requests += 1;
                }
            }
            if !self.statistics_delay.is_zero() {
                tokio::time::sleep(self.statistics_delay).await;
            }
        }
        Ok(())
    }
}
