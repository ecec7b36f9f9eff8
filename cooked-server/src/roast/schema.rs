//! Roast result schema
//!
//! Every field is required. Deserialization enforces presence and type;
//! [`RoastResult::validate`] enforces value ranges and list sizes.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Upper bound for the four headline scores
pub const MAX_SCORE: u8 = 10;
/// Upper bound for the percentage-style stats
pub const MAX_STAT: u8 = 100;
/// Minimum entries in every list field
pub const MIN_LIST_ITEMS: usize = 3;

/// Structured critique returned by `/ai-roast`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoastResult {
    pub roast_paragraph: String,
    pub scores: Scores,
    pub fun_cooked_points: Vec<String>,
    pub fun_facts: Vec<String>,
    pub main_character_energy: MainCharacterEnergy,
    pub era_analysis: EraAnalysis,
    pub music_personality: MusicPersonality,
    pub spotify_algorithm_opinion: AlgorithmOpinion,
    pub listener_warnings: Vec<String>,
    pub fake_music_stats: FakeMusicStats,
    pub most_overplayed_song_roast: OverplayedSongRoast,
    pub song_based_observations: SongObservations,
}

/// Headline scores, 0-10
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    #[serde(deserialize_with = "rounded_u8")]
    pub uniqueness: u8,
    #[serde(deserialize_with = "rounded_u8")]
    pub emotional_damage: u8,
    #[serde(deserialize_with = "rounded_u8")]
    pub cringe_factor: u8,
    #[serde(deserialize_with = "rounded_u8")]
    pub overall_taste: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainCharacterEnergy {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraAnalysis {
    pub mentally_stuck_in: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicPersonality {
    pub label: String,
    pub behavior: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmOpinion {
    pub thoughts: String,
}

/// Made-up percentages, 0-100
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FakeMusicStats {
    #[serde(deserialize_with = "rounded_u8")]
    pub sad_song_percentage: u8,
    #[serde(deserialize_with = "rounded_u8")]
    pub repeat_song_tendency: u8,
    #[serde(deserialize_with = "rounded_u8")]
    pub late_night_listening_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverplayedSongRoast {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongObservations {
    pub top_tracks_summary: String,
    pub liked_songs_summary: String,
    pub recently_played_summary: String,
    pub most_heard_songs_summary: String,
}

/// A decoded result that breaks a value constraint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl RoastResult {
    /// Check value ranges and list contents
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.roast_paragraph.trim().is_empty() {
            return Err(ValidationError::new("roast_paragraph", "must not be blank"));
        }

        let scores = [
            ("scores.uniqueness", self.scores.uniqueness),
            ("scores.emotional_damage", self.scores.emotional_damage),
            ("scores.cringe_factor", self.scores.cringe_factor),
            ("scores.overall_taste", self.scores.overall_taste),
        ];
        for (field, value) in scores {
            check_range(field, value, MAX_SCORE)?;
        }

        let stats = [
            ("fake_music_stats.sad_song_percentage", self.fake_music_stats.sad_song_percentage),
            ("fake_music_stats.repeat_song_tendency", self.fake_music_stats.repeat_song_tendency),
            (
                "fake_music_stats.late_night_listening_score",
                self.fake_music_stats.late_night_listening_score,
            ),
        ];
        for (field, value) in stats {
            check_range(field, value, MAX_STAT)?;
        }

        check_list("fun_cooked_points", &self.fun_cooked_points)?;
        check_list("fun_facts", &self.fun_facts)?;
        check_list("listener_warnings", &self.listener_warnings)?;

        Ok(())
    }
}

fn check_range(field: &'static str, value: u8, max: u8) -> Result<(), ValidationError> {
    if value > max {
        return Err(ValidationError::new(
            field,
            format!("{} is outside 0-{}", value, max),
        ));
    }
    Ok(())
}

fn check_list(field: &'static str, items: &[String]) -> Result<(), ValidationError> {
    if items.len() < MIN_LIST_ITEMS {
        return Err(ValidationError::new(
            field,
            format!("expected at least {} items, got {}", MIN_LIST_ITEMS, items.len()),
        ));
    }
    if let Some(index) = items.iter().position(|item| item.trim().is_empty()) {
        return Err(ValidationError::new(field, format!("item {} is blank", index)));
    }
    Ok(())
}

/// Accept any JSON number and round it to the nearest integer.
///
/// Strings, negatives and values above 255 are rejected here; the tighter
/// per-field range is checked by [`RoastResult::validate`].
fn rounded_u8<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    let rounded = raw.round();
    if !rounded.is_finite() || rounded < 0.0 || rounded > f64::from(u8::MAX) {
        return Err(serde::de::Error::custom(format!(
            "number {} is out of range",
            raw
        )));
    }
    Ok(rounded as u8)
}
