//! Per-play feature extraction
//!
//! Turns one raw play into at most one [`FeatureRow`]. Measurements come
//! from the play's final tracked event (the pitch that ended the plate
//! appearance), the label from the play's result event. A play missing any
//! required field at any nesting level yields no row at all: partial records
//! are dropped, never imputed.

use crate::data::schema::Play;
use crate::FeatureRow;

/// Ordinal slugging value of a result event. Non-hit events (outs, walks,
/// hit-by-pitch, errors) all map to 0.
pub fn slugging_value(event: &str) -> f64 {
    match event {
        "Single" => 1.0,
        "Double" => 2.0,
        "Triple" => 3.0,
        "Home Run" => 4.0,
        _ => 0.0,
    }
}

/// Extract one feature row from a play, or `None` if any required
/// measurement is absent.
pub fn extract_row(play: &Play) -> Option<FeatureRow> {
    let event = play.result.as_ref()?.event.as_deref()?;
    let slg = slugging_value(event);

    let last = play.play_events.last()?;
    let hit = last.hit_data.as_ref()?;
    let pitch = last.pitch_data.as_ref()?;
    let breaks = pitch.breaks.as_ref()?;

    Some(FeatureRow {
        angle: hit.launch_angle?,
        velo: hit.launch_speed?,
        pitch_speed_start: pitch.start_speed?,
        pitch_speed_end: pitch.end_speed?,
        pitch_break_angle: breaks.break_angle?,
        pitch_spin_rate: breaks.spin_rate?,
        pitch_break_length: breaks.break_length?,
        pitch_break_y: breaks.break_y?,
        pitch_break_vertical: breaks.break_vertical?,
        pitch_break_vertical_induced: breaks.break_vertical_induced?,
        pitch_extension: pitch.extension?,
        pitch_spin_direction: breaks.spin_direction?,
        total_distance: hit.total_distance?,
        slg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{HitData, PitchBreaks, PitchData, PlayEvent, PlayResult};

    fn full_play(event: &str) -> Play {
        Play {
            result: Some(PlayResult {
                event: Some(event.to_string()),
            }),
            play_events: vec![
                // An earlier pitch with no hit data; extraction must ignore it
                PlayEvent {
                    hit_data: None,
                    pitch_data: Some(PitchData {
                        start_speed: Some(90.0),
                        ..Default::default()
                    }),
                },
                PlayEvent {
                    hit_data: Some(HitData {
                        launch_speed: Some(104.3),
                        launch_angle: Some(21.0),
                        total_distance: Some(389.0),
                    }),
                    pitch_data: Some(PitchData {
                        start_speed: Some(95.1),
                        end_speed: Some(87.4),
                        extension: Some(6.5),
                        breaks: Some(PitchBreaks {
                            break_angle: Some(22.8),
                            break_length: Some(4.2),
                            break_y: Some(24.0),
                            break_vertical: Some(-13.7),
                            break_vertical_induced: Some(17.2),
                            spin_rate: Some(2285.0),
                            spin_direction: Some(208.0),
                        }),
                    }),
                },
            ],
        }
    }

    #[test]
    fn test_slugging_values() {
        assert_eq!(slugging_value("Single"), 1.0);
        assert_eq!(slugging_value("Double"), 2.0);
        assert_eq!(slugging_value("Triple"), 3.0);
        assert_eq!(slugging_value("Home Run"), 4.0);
        assert_eq!(slugging_value("Groundout"), 0.0);
        assert_eq!(slugging_value("Walk"), 0.0);
        assert_eq!(slugging_value("Hit By Pitch"), 0.0);
        assert_eq!(slugging_value(""), 0.0);
        // Exact match only
        assert_eq!(slugging_value("single"), 0.0);
    }

    #[test]
    fn test_full_play_emits_verbatim_row() {
        let row = extract_row(&full_play("Double")).unwrap();
        assert_eq!(row.slg, 2.0);
        assert_eq!(row.angle, 21.0);
        assert_eq!(row.velo, 104.3);
        assert_eq!(row.pitch_speed_start, 95.1);
        assert_eq!(row.pitch_speed_end, 87.4);
        assert_eq!(row.pitch_break_angle, 22.8);
        assert_eq!(row.pitch_spin_rate, 2285.0);
        assert_eq!(row.pitch_break_length, 4.2);
        assert_eq!(row.pitch_break_y, 24.0);
        assert_eq!(row.pitch_break_vertical, -13.7);
        assert_eq!(row.pitch_break_vertical_induced, 17.2);
        assert_eq!(row.pitch_extension, 6.5);
        assert_eq!(row.pitch_spin_direction, 208.0);
        assert_eq!(row.total_distance, 389.0);
    }

    #[test]
    fn test_out_is_labeled_zero_but_kept() {
        let row = extract_row(&full_play("Flyout")).unwrap();
        assert_eq!(row.slg, 0.0);
    }

    #[test]
    fn test_uses_final_event_only() {
        // Hit data on the first event but not the last: no row
        let mut play = full_play("Single");
        play.play_events.reverse();
        assert!(extract_row(&play).is_none());
    }

    #[test]
    fn test_missing_any_field_drops_play() {
        let mut play = full_play("Single");
        play.play_events
            .last_mut()
            .unwrap()
            .hit_data
            .as_mut()
            .unwrap()
            .launch_angle = None;
        assert!(extract_row(&play).is_none());

        let mut play = full_play("Single");
        play.play_events
            .last_mut()
            .unwrap()
            .pitch_data
            .as_mut()
            .unwrap()
            .breaks
            .as_mut()
            .unwrap()
            .spin_rate = None;
        assert!(extract_row(&play).is_none());

        let mut play = full_play("Single");
        play.play_events.last_mut().unwrap().pitch_data = None;
        assert!(extract_row(&play).is_none());

        let mut play = full_play("Single");
        play.result = None;
        assert!(extract_row(&play).is_none());
    }

    #[test]
    fn test_play_without_events_drops() {
        let play = Play {
            result: Some(PlayResult {
                event: Some("Single".to_string()),
            }),
            play_events: Vec::new(),
        };
        assert!(extract_row(&play).is_none());
    }
}
