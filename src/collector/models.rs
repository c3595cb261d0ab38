use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A competition as listed by the data provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub league_id: i64,
    pub name: String,
    /// "League" | "Cup"
    #[serde(rename = "type")]
    pub kind: String,
    pub country: String,
    pub country_code: Option<String>,
    /// Most recent season the provider has for this league
    pub season: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: i64,
    pub name: String,
    pub code: Option<String>,
    pub country: Option<String>,
    pub founded: Option<i32>,
    pub logo: Option<String>,
    pub league_id: i64,
    pub season: i32,
}

/// A played (or scheduled) match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub fixture_id: i64,
    pub date: Option<DateTime<Utc>>,
    pub timestamp: Option<i64>,
    pub venue: Option<String>,
    /// Short status code, e.g. "FT", "NS"
    pub status: String,
    pub league_id: i64,
    pub season: i32,
    pub round: Option<String>,
    pub home_team_id: i64,
    pub home_team: String,
    pub away_team_id: i64,
    pub away_team: String,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub home_halftime_goals: Option<i32>,
    pub away_halftime_goals: Option<i32>,
}

/// One statistic line for one team in one fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureStat {
    pub fixture_id: i64,
    pub team_id: i64,
    pub team_name: String,
    /// e.g. "Shots on Goal", "Ball Possession"
    pub stat_type: String,
    /// Raw value as reported ("55%", "12"); missing values stay empty
    pub stat_value: Option<String>,
}
