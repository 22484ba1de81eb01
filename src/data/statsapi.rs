//! MLB Stats API client
//!
//! Thin read-only client over the three endpoints the pipeline needs:
//! season lookup, schedule query, and per-game play-by-play. Requests are
//! retried a bounded number of times with linear backoff before failing.

use crate::data::schema::{PlayByPlay, ScheduleResponse, SeasonsResponse};
use crate::{ApiConfig, GamePk, Result, SlgError, TeamId};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Start and end dates of one season
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One game as listed by the schedule endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledGame {
    pub game_pk: GamePk,
    pub date: Option<NaiveDate>,
    pub home: Option<TeamId>,
    pub away: Option<TeamId>,
}

/// Blocking client for the MLB Stats API
pub struct StatsApi {
    client: reqwest::blocking::Client,
    base_url: String,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl StatsApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("slugger/0.1")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(StatsApi {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_attempts: config.max_attempts.max(1),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    /// Resolve a season key (4-digit year) to its start and end dates
    pub fn season(&self, season_id: &str) -> Result<SeasonDates> {
        let url = format!(
            "{}/seasons?sportId=1&seasonId={}",
            self.base_url, season_id
        );
        let response: SeasonsResponse = self.get_json(&url)?;

        let record = response
            .seasons
            .first()
            .ok_or_else(|| SlgError::SeasonNotFound(season_id.to_string()))?;

        let start = record
            .season_start_date
            .as_deref()
            .ok_or_else(|| SlgError::SeasonNotFound(season_id.to_string()))?;
        let end = record
            .season_end_date
            .as_deref()
            .ok_or_else(|| SlgError::SeasonNotFound(season_id.to_string()))?;

        Ok(SeasonDates {
            start: parse_date(start)?,
            end: parse_date(end)?,
        })
    }

    /// List every scheduled game between two dates, in schedule order
    /// (chronological by date block, then listing order within a day)
    pub fn schedule(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ScheduledGame>> {
        let url = format!(
            "{}/schedule?sportId=1&startDate={}&endDate={}",
            self.base_url, start, end
        );
        let response: ScheduleResponse = self.get_json(&url)?;
        Ok(flatten_schedule(&response))
    }

    /// All game pks for one season, in chronological schedule order
    pub fn season_games(&self, season_id: &str) -> Result<Vec<ScheduledGame>> {
        let dates = self.season(season_id)?;
        log::info!(
            "Season {} runs {} to {}",
            season_id,
            dates.start,
            dates.end
        );
        self.schedule(dates.start, dates.end)
    }

    /// Fetch the play-by-play record for one game
    pub fn play_by_play(&self, game_pk: GamePk) -> Result<PlayByPlay> {
        let url = format!("{}/game/{}/playByPlay", self.base_url, game_pk.0);
        self.get_json(&url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            let result = self
                .client
                .get(url)
                .send()
                .and_then(|resp| resp.error_for_status());

            match result {
                Ok(resp) => return Ok(resp.json()?),
                Err(e) => {
                    log::warn!(
                        "Request failed (attempt {}/{}): {}: {}",
                        attempt,
                        self.max_attempts,
                        url,
                        e
                    );
                    last_error = e.to_string();
                    if attempt < self.max_attempts {
                        std::thread::sleep(self.retry_backoff * attempt);
                    }
                }
            }
        }

        Err(SlgError::Fetch {
            url: url.to_string(),
            attempts: self.max_attempts,
            message: last_error,
        })
    }
}

/// Flatten a schedule response into game entries, preserving listing order
pub fn flatten_schedule(response: &ScheduleResponse) -> Vec<ScheduledGame> {
    let mut games = Vec::new();

    for date in &response.dates {
        let day = date
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        for game in &date.games {
            let Some(pk) = game.game_pk else {
                continue;
            };

            games.push(ScheduledGame {
                game_pk: GamePk(pk),
                date: day,
                home: team_id(game.teams.as_ref().and_then(|t| t.home.as_ref())),
                away: team_id(game.teams.as_ref().and_then(|t| t.away.as_ref())),
            });
        }
    }

    games
}

fn team_id(side: Option<&crate::data::schema::ScheduleSide>) -> Option<TeamId> {
    side.and_then(|s| s.team.as_ref())
        .and_then(|t| t.id)
        .map(TeamId)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| SlgError::Parse(format!("Bad date '{}': {}", s, e)))
}
