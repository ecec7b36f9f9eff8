//! Static roast returned when generation fails

use super::schema::{
    AlgorithmOpinion, EraAnalysis, FakeMusicStats, MainCharacterEnergy, MusicPersonality,
    OverplayedSongRoast, RoastResult, Scores, SongObservations,
};

const UNAVAILABLE: &str = "Unavailable";

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Complete, schema-valid stand-in result
pub fn fallback_roast() -> RoastResult {
    RoastResult {
        roast_paragraph: "The roast machine opened your listening history, went very quiet, \
            and asked for a moment alone. It will be back once it has recovered from whatever \
            that playlist was."
            .to_string(),
        scores: Scores {
            uniqueness: 0,
            emotional_damage: 0,
            cringe_factor: 0,
            overall_taste: 0,
        },
        fun_cooked_points: lines(&[
            "Your library overheated the roast engine before it could finish a sentence.",
            "The AI read three songs in and requested hazard pay.",
            "Full roast postponed until the smoke clears.",
        ]),
        fun_facts: lines(&[
            "Your listening data could not be analysed without safety goggles.",
            "At least one playlist is now under observation.",
            "Backup roast deployed so nobody leaves empty-handed.",
        ]),
        main_character_energy: MainCharacterEnergy {
            kind: "Loading Screen Protagonist".to_string(),
            description: "Your story arc is still buffering. Please stand by.".to_string(),
        },
        era_analysis: EraAnalysis {
            mentally_stuck_in: "An unlisted timeline".to_string(),
            description: "Your era could not be pinned down without further emotional damage."
                .to_string(),
        },
        music_personality: MusicPersonality {
            label: "Signal Lost Listener".to_string(),
            behavior: "Keeps recommendation engines guessing and slightly nervous.".to_string(),
        },
        spotify_algorithm_opinion: AlgorithmOpinion {
            thoughts: "The algorithm has gone quiet and is reconsidering its career.".to_string(),
        },
        listener_warnings: lines(&[
            "Aux cord privileges suspended pending review.",
            "May destabilise shared playlists.",
            "Share your music at your own risk.",
        ]),
        fake_music_stats: FakeMusicStats {
            sad_song_percentage: 0,
            repeat_song_tendency: 0,
            late_night_listening_score: 0,
        },
        most_overplayed_song_roast: OverplayedSongRoast {
            summary: "Your most replayed song stays anonymous to protect everyone involved."
                .to_string(),
        },
        song_based_observations: SongObservations {
            top_tracks_summary: UNAVAILABLE.to_string(),
            liked_songs_summary: UNAVAILABLE.to_string(),
            recently_played_summary: UNAVAILABLE.to_string(),
            most_heard_songs_summary: UNAVAILABLE.to_string(),
        },
    }
}
