// Note events: the timing layer between tunes and MIDI output.
//
// Each tune becomes one EventTrack of (key, onset, duration, velocity)
// events, one per note, with onsets in quarter-note beats. Note `i` of a
// tune starts at beat `i + offset`; offsetting the counterpoint by a fraction
// of a beat keeps its attacks audibly distinct from the cantus.

use crate::error::{Error, Result};
use crate::tune::Tune;

/// A single sounding note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    /// MIDI key number.
    pub key: u8,
    /// Start, in beats from the beginning of the piece.
    pub onset: f64,
    /// Length in beats.
    pub duration: f64,
    /// 0-127.
    pub velocity: u8,
}

impl NoteEvent {
    /// Beat at which the note stops sounding.
    pub fn end(&self) -> f64 {
        self.onset + self.duration
    }
}

/// Timing and dynamics applied uniformly to every note of a tune.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventLayout {
    pub offset: f64,
    pub duration: f64,
    pub velocity: u8,
}

impl Default for EventLayout {
    fn default() -> Self {
        EventLayout {
            offset: 0.0,
            duration: 1.0,
            velocity: 100,
        }
    }
}

impl EventLayout {
    fn validate(&self) -> Result<()> {
        if self.velocity > 127 {
            return Err(Error::OutOfRange(format!(
                "velocity {} above 127",
                self.velocity
            )));
        }
        if self.offset < 0.0 || !self.offset.is_finite() {
            return Err(Error::OutOfRange(format!("onset offset {}", self.offset)));
        }
        if self.duration <= 0.0 || !self.duration.is_finite() {
            return Err(Error::OutOfRange(format!("note duration {}", self.duration)));
        }
        Ok(())
    }
}

/// A named sequence of events destined for one MIDI track.
#[derive(Debug, Clone, PartialEq)]
pub struct EventTrack {
    pub name: String,
    /// MIDI channel, 0-15.
    pub channel: u8,
    /// General MIDI program number.
    pub program: u8,
    pub events: Vec<NoteEvent>,
}

/// One event per tune note, at beat `index + offset`.
pub fn tune_events(tune: &Tune<'_>, layout: EventLayout) -> Result<Vec<NoteEvent>> {
    layout.validate()?;
    Ok(tune
        .midi()
        .iter()
        .enumerate()
        .map(|(i, &key)| NoteEvent {
            key,
            onset: i as f64 + layout.offset,
            duration: layout.duration,
            velocity: layout.velocity,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::ScaleCatalog;

    #[test]
    fn test_events_follow_tune() {
        let scale = ScaleCatalog::new().default_scale();
        let tune = Tune::new(&scale, &["C1", "D1", "F1"]).unwrap();
        let layout = EventLayout {
            offset: 0.25,
            ..Default::default()
        };
        let events = tune_events(&tune, layout).unwrap();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].key, 36);
        assert_eq!(events[2].key, 41);
        assert_eq!(events[1].onset, 1.25);
        assert_eq!(events[2].end(), 3.25);
        assert!(events.iter().all(|e| e.velocity == 100));
    }

    #[test]
    fn test_invalid_layouts() {
        let scale = ScaleCatalog::new().default_scale();
        let tune = Tune::new(&scale, &["C1"]).unwrap();
        let bad = [
            EventLayout {
                velocity: 128,
                ..Default::default()
            },
            EventLayout {
                offset: -0.5,
                ..Default::default()
            },
            EventLayout {
                duration: 0.0,
                ..Default::default()
            },
            EventLayout {
                duration: f64::NAN,
                ..Default::default()
            },
        ];
        for layout in bad {
            assert!(
                matches!(tune_events(&tune, layout), Err(Error::OutOfRange(_))),
                "{layout:?} should be rejected"
            );
        }
    }
}
