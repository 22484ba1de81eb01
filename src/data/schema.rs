//! Serde model of the MLB Stats API payloads
//!
//! The upstream JSON is deeply nested and incompletely populated: many plays
//! carry no tracked hit or pitch measurements at all. Every measurement leaf
//! is therefore an `Option`, so "field absent" is an explicit branch the
//! extractor can test rather than a lookup failure.

use serde::Deserialize;

/// Response of `/seasons?sportId=1&seasonId={year}`
#[derive(Debug, Clone, Deserialize)]
pub struct SeasonsResponse {
    #[serde(default)]
    pub seasons: Vec<SeasonRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonRecord {
    pub season_id: Option<String>,
    pub season_start_date: Option<String>,
    pub season_end_date: Option<String>,
}

/// Response of `/schedule?sportId=1&startDate=..&endDate=..`
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub dates: Vec<ScheduleDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleDate {
    pub date: Option<String>,
    #[serde(default)]
    pub games: Vec<ScheduleGame>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGame {
    pub game_pk: Option<i64>,
    pub teams: Option<ScheduleTeams>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleTeams {
    pub home: Option<ScheduleSide>,
    pub away: Option<ScheduleSide>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleSide {
    pub team: Option<TeamRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamRef {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// Response of `/game/{gamePk}/playByPlay`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayByPlay {
    #[serde(default)]
    pub all_plays: Vec<Play>,
}

/// One plate-appearance outcome unit
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    pub result: Option<PlayResult>,
    #[serde(default)]
    pub play_events: Vec<PlayEvent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayResult {
    pub event: Option<String>,
}

/// One tracked event within a play (pitch, pickoff, etc.)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayEvent {
    pub hit_data: Option<HitData>,
    pub pitch_data: Option<PitchData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitData {
    pub launch_speed: Option<f64>,
    pub launch_angle: Option<f64>,
    pub total_distance: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchData {
    pub start_speed: Option<f64>,
    pub end_speed: Option<f64>,
    pub extension: Option<f64>,
    pub breaks: Option<PitchBreaks>,
}

/// Pitch-trajectory deviation measurements
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchBreaks {
    pub break_angle: Option<f64>,
    pub break_length: Option<f64>,
    pub break_y: Option<f64>,
    pub break_vertical: Option<f64>,
    pub break_vertical_induced: Option<f64>,
    pub spin_rate: Option<f64>,
    pub spin_direction: Option<f64>,
}
