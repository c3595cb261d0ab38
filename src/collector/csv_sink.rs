//! CSV output for collected football data.
//!
//! One entity type per file, keyed by league/season/fixture:
//! - `{output_dir}/leagues.csv`
//! - `{output_dir}/teams_league_{league_id}_season_{season}.csv`
//! - `{output_dir}/fixtures_league_{league_id}_season_{season}.csv`
//! - `{output_dir}/statistics_fixture_{fixture_id}.csv`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use super::models::{Fixture, FixtureStat, League, Team};

const LEAGUES_FILE: &str = "leagues.csv";

pub struct CsvSink {
    output_dir: PathBuf,
}

impl CsvSink {
    /// Creates the sink, creating `output_dir` if needed.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;
        Ok(CsvSink { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn write_leagues(&self, leagues: &[League]) -> Result<PathBuf> {
        self.write_records(LEAGUES_FILE, leagues)
    }

    pub fn write_teams(&self, league_id: i64, season: i32, teams: &[Team]) -> Result<PathBuf> {
        let name = format!("teams_league_{}_season_{}.csv", league_id, season);
        self.write_records(&name, teams)
    }

    pub fn write_fixtures(
        &self,
        league_id: i64,
        season: i32,
        fixtures: &[Fixture],
    ) -> Result<PathBuf> {
        let name = format!("fixtures_league_{}_season_{}.csv", league_id, season);
        self.write_records(&name, fixtures)
    }

    /// Statistics files are only written when the provider returned something.
    pub fn write_statistics(&self, fixture_id: i64, stats: &[FixtureStat]) -> Result<Option<PathBuf>> {
        if stats.is_empty() {
            return Ok(None);
        }
        let name = format!("statistics_fixture_{}.csv", fixture_id);
        self.write_records(&name, stats).map(Some)
    }

    /// Overwrites `file_name` with a header row plus one row per record.
    fn write_records<T: Serialize>(&self, file_name: &str, records: &[T]) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create CSV file: {:?}", path))?;
        for record in records {
            writer
                .serialize(record)
                .with_context(|| format!("Failed to write CSV row to {:?}", path))?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to flush CSV file: {:?}", path))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn league(id: i64) -> League {
        League {
            league_id: id,
            name: "Premier League".into(),
            kind: "League".into(),
            country: "England".into(),
            country_code: Some("GB".into()),
            season: None,
        }
    }

    #[test]
    fn test_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let sink = CsvSink::new(&nested).unwrap();
        assert!(sink.output_dir().is_dir());
    }

    #[test]
    fn test_write_leagues_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path()).unwrap();
        let path = sink.write_leagues(&[league(39), league(40)]).unwrap();

        assert_eq!(path, dir.path().join("leagues.csv"));
        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "league_id,name,type,country,country_code,season");
        assert_eq!(lines[1], "39,Premier League,League,England,GB,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_file_names_follow_keys() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path()).unwrap();

        let teams = sink.write_teams(39, 2022, &[]).unwrap();
        let fixtures = sink.write_fixtures(39, 2022, &[]).unwrap();
        assert!(teams.ends_with("teams_league_39_season_2022.csv"));
        assert!(fixtures.ends_with("fixtures_league_39_season_2022.csv"));
        assert!(teams.exists() && fixtures.exists());
    }

    #[test]
    fn test_empty_statistics_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path()).unwrap();
        assert!(sink.write_statistics(1, &[]).unwrap().is_none());
        assert!(!dir.path().join("statistics_fixture_1.csv").exists());

        let stat = FixtureStat {
            fixture_id: 1,
            team_id: 55,
            team_name: "Brentford".into(),
            stat_type: "Ball Possession".into(),
            stat_value: Some("35%".into()),
        };
        let path = sink.write_statistics(1, &[stat]).unwrap().unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("1,55,Brentford,Ball Possession,35%"));
    }
}
