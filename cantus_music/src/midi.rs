// MIDI output from event tracks.
//
// Converts EventTracks into a Standard MIDI File (SMF) for playback. Each
// EventTrack maps to its own MIDI track after a leading tempo track. Beats
// map to ticks at a fixed resolution; note boundaries are rounded to the
// nearest tick.
//
// Uses the `midly` crate for MIDI writing. Output is SMF Format 1 (multi-track).

use crate::error::{Error, Result};
use crate::events::EventTrack;
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;
use tracing::debug;

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

/// Slowest tempo whose microseconds-per-quarter value fits the 24-bit
/// tempo meta event.
pub const MIN_TEMPO_BPM: u16 = 4;

const MAX_TICK: u32 = (1 << 28) - 1;

/// Convert event tracks to MIDI and write to a file.
pub fn write_midi(tracks: &[EventTrack], tempo_bpm: u16, path: &Path) -> Result<()> {
    let buf = encode_midi(tracks, tempo_bpm)?;
    std::fs::write(path, &buf)?;
    debug!(path = %path.display(), bytes = buf.len(), "wrote MIDI file");
    Ok(())
}

/// Serialize event tracks to SMF bytes.
pub fn encode_midi(tracks: &[EventTrack], tempo_bpm: u16) -> Result<Vec<u8>> {
    let smf = tracks_to_smf(tracks, tempo_bpm)?;
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    Ok(buf)
}

fn beats_to_ticks(beats: f64) -> Result<u32> {
    let ticks = (beats * TICKS_PER_QUARTER as f64).round();
    if !(0.0..=MAX_TICK as f64).contains(&ticks) {
        return Err(Error::Midi(format!("beat position {beats} out of MIDI range")));
    }
    Ok(ticks as u32)
}

fn checked_u7(value: u8, what: &str) -> Result<u7> {
    u7::try_from(value).ok_or_else(|| Error::Midi(format!("{what} {value} above 127")))
}

/// Convert event tracks to an in-memory SMF.
pub fn tracks_to_smf(tracks: &[EventTrack], tempo_bpm: u16) -> Result<Smf<'_>> {
    if tempo_bpm < MIN_TEMPO_BPM {
        return Err(Error::Midi(format!(
            "tempo {tempo_bpm} BPM below the minimum of {MIN_TEMPO_BPM}"
        )));
    }

    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Track 0: tempo track
    let tempo_microseconds = 60_000_000 / tempo_bpm as u32;
    let tempo = u24::try_from(tempo_microseconds).ok_or_else(|| {
        Error::Midi(format!("tempo {tempo_bpm} BPM does not fit a tempo event"))
    })?;
    smf.tracks.push(vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(tempo)),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        },
    ]);

    for event_track in tracks {
        smf.tracks.push(build_track(event_track)?);
    }

    Ok(smf)
}

fn build_track(event_track: &EventTrack) -> Result<Track<'_>> {
    let channel = u4::try_from(event_track.channel)
        .ok_or_else(|| Error::Midi(format!("channel {} above 15", event_track.channel)))?;
    let program = checked_u7(event_track.program, "program")?;

    let mut track: Track<'_> = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(event_track.name.as_bytes())),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange { program },
            },
        },
    ];

    // (tick, is_note_on, key, velocity). Sorting puts note-offs ahead of
    // note-ons that share a tick.
    let mut timeline: Vec<(u32, bool, u7, u7)> = Vec::with_capacity(event_track.events.len() * 2);
    for event in &event_track.events {
        let key = checked_u7(event.key, "key")?;
        let vel = checked_u7(event.velocity, "velocity")?;
        let start = beats_to_ticks(event.onset)?;
        let end = beats_to_ticks(event.end())?.max(start);
        timeline.push((start, true, key, vel));
        timeline.push((end, false, key, u7::new(0)));
    }
    timeline.sort_by_key(|&(tick, is_on, key, _)| (tick, is_on, key.as_int()));

    let mut last_tick = 0;
    for (tick, is_on, key, vel) in timeline {
        let message = if is_on {
            MidiMessage::NoteOn { key, vel }
        } else {
            MidiMessage::NoteOff { key, vel }
        };
        track.push(TrackEvent {
            delta: u28::new(tick - last_tick),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = tick;
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    Ok(track)
}
