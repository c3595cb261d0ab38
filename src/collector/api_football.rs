use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::models::{Fixture, FixtureStat, League, Team};
use super::provider::FootballDataSource;

pub const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";

/// Upper bound of the random jitter added to each pause, in milliseconds.
const MAX_JITTER_MS: u64 = 100;

/// Football data provider backed by API-Football v3.
/// Docs: <https://www.api-football.com/documentation-v3>
pub struct ApiFootball {
    http: Client,
    api_key: String,
    base_url: Url,
    /// Pause after every request to stay under the plan's rate limit
    request_delay: Duration,
}

impl ApiFootball {
    pub fn new(api_key: &str, base_url: &str, request_delay: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API base URL: {}", base_url))?;
        // Url::join drops the last path segment unless it ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(ApiFootball {
            http,
            api_key: api_key.to_string(),
            base_url,
            request_delay,
        })
    }

    async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<serde_json::Value> {
        let url = self
            .base_url
            .join(endpoint)
            .with_context(|| format!("Invalid endpoint: {}", endpoint))?;
        debug!("GET {} {:?}", url, params);

        let resp = self
            .http
            .get(url)
            .header("x-apisports-key", &self.api_key)
            .query(params)
            .send()
            .await
            .context("API-Football request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("API-Football error {} on {}: {}", status, endpoint, body);
        }

        let raw: serde_json::Value = resp
            .json()
            .await
            .context("Failed to parse API-Football response")?;

        self.pause().await;

        check_api_errors(&raw)?;
        Ok(raw)
    }

    async fn pause(&self) {
        if self.request_delay.is_zero() {
            return;
        }
        let jitter = rand::thread_rng().gen_range(0..=MAX_JITTER_MS);
        tokio::time::sleep(self.request_delay + Duration::from_millis(jitter)).await;
    }
}

#[async_trait]
impl FootballDataSource for ApiFootball {
    fn name(&self) -> &str {
        "API-Football"
    }

    async fn leagues(&self, country: &str) -> Result<Vec<League>> {
        let raw = self.get("leagues", &[("country", country.to_string())]).await?;
        Ok(parse_leagues(&raw))
    }

    async fn teams(&self, league_id: i64, season: i32) -> Result<Vec<Team>> {
        let params = [("league", league_id.to_string()), ("season", season.to_string())];
        let raw = self.get("teams", &params).await?;
        Ok(parse_teams(&raw, league_id, season))
    }

    async fn fixtures(
        &self,
        league_id: i64,
        season: i32,
        status: Option<&str>,
    ) -> Result<Vec<Fixture>> {
        let mut params = vec![("league", league_id.to_string()), ("season", season.to_string())];
        if let Some(status) = status {
            params.push(("status", status.to_string()));
        }
        let raw = self.get("fixtures", &params).await?;
        Ok(parse_fixtures(&raw))
    }

    async fn fixture_statistics(&self, fixture_id: i64) -> Result<Vec<FixtureStat>> {
        let raw = self
            .get("fixtures/statistics", &[("fixture", fixture_id.to_string())])
            .await?;
        Ok(parse_statistics(&raw, fixture_id))
    }
}

/// API-Football answers 200 with a non-empty `errors` field on bad keys,
/// exhausted quotas and invalid parameters.
fn check_api_errors(raw: &serde_json::Value) -> Result<()> {
    let errors = &raw["errors"];
    let has_errors = match errors {
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
        _ => false,
    };
    if has_errors {
        anyhow::bail!("API-Football rejected the request: {}", errors);
    }
    Ok(())
}

fn response_items(raw: &serde_json::Value) -> &[serde_json::Value] {
    raw["response"].as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn opt_string(v: &serde_json::Value) -> Option<String> {
    v.as_str().map(str::to_string)
}

fn opt_i32(v: &serde_json::Value) -> Option<i32> {
    v.as_i64().map(|n| n as i32)
}

fn parse_leagues(raw: &serde_json::Value) -> Vec<League> {
    response_items(raw)
        .iter()
        .filter_map(|item| {
            let league = &item["league"];
            let country = &item["country"];
            Some(League {
                league_id: league["id"].as_i64()?,
                name: league["name"].as_str()?.to_string(),
                kind: league["type"].as_str().unwrap_or("League").to_string(),
                country: country["name"].as_str().unwrap_or_default().to_string(),
                country_code: opt_string(&country["code"]),
                season: item["seasons"]
                    .as_array()
                    .and_then(|s| s.last())
                    .and_then(|s| opt_i32(&s["year"])),
            })
        })
        .collect()
}

fn parse_teams(raw: &serde_json::Value, league_id: i64, season: i32) -> Vec<Team> {
    response_items(raw)
        .iter()
        .filter_map(|item| {
            let team = &item["team"];
            Some(Team {
                team_id: team["id"].as_i64()?,
                name: team["name"].as_str()?.to_string(),
                code: opt_string(&team["code"]),
                country: opt_string(&team["country"]),
                founded: opt_i32(&team["founded"]),
                logo: opt_string(&team["logo"]),
                league_id,
                season,
            })
        })
        .collect()
}

fn parse_fixtures(raw: &serde_json::Value) -> Vec<Fixture> {
    response_items(raw)
        .iter()
        .filter_map(|item| {
            let fixture = &item["fixture"];
            let league = &item["league"];
            let home = &item["teams"]["home"];
            let away = &item["teams"]["away"];
            let halftime = &item["score"]["halftime"];

            let date = fixture["date"]
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|d| d.with_timezone(&Utc));

            Some(Fixture {
                fixture_id: fixture["id"].as_i64()?,
                date,
                timestamp: fixture["timestamp"].as_i64(),
                venue: opt_string(&fixture["venue"]["name"]),
                status: fixture["status"]["short"].as_str().unwrap_or("NS").to_string(),
                league_id: league["id"].as_i64()?,
                season: opt_i32(&league["season"])?,
                round: opt_string(&league["round"]),
                home_team_id: home["id"].as_i64()?,
                home_team: home["name"].as_str()?.to_string(),
                away_team_id: away["id"].as_i64()?,
                away_team: away["name"].as_str()?.to_string(),
                home_goals: opt_i32(&item["goals"]["home"]),
                away_goals: opt_i32(&item["goals"]["away"]),
                home_halftime_goals: opt_i32(&halftime["home"]),
                away_halftime_goals: opt_i32(&halftime["away"]),
            })
        })
        .collect()
}

fn parse_statistics(raw: &serde_json::Value, fixture_id: i64) -> Vec<FixtureStat> {
    let mut stats = Vec::new();
    for team_stats in response_items(raw) {
        let team = &team_stats["team"];
        let (Some(team_id), Some(team_name)) = (team["id"].as_i64(), team["name"].as_str()) else {
            continue;
        };
        let Some(lines) = team_stats["statistics"].as_array() else {
            continue;
        };
        for line in lines {
            let Some(stat_type) = line["type"].as_str() else {
                continue;
            };
            let stat_value = match &line["value"] {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            };
            stats.push(FixtureStat {
                fixture_id,
                team_id,
                team_name: team_name.to_string(),
                stat_type: stat_type.to_string(),
                stat_value,
            });
        }
    }
    stats
}
