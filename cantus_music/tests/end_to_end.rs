// Full pipeline: JSON config on disk -> composition -> MIDI file -> parsed
// back with midly.

use cantus_music::compose::compose;
use cantus_music::config::GenerationConfig;
use cantus_music::midi::write_midi;
use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};

fn note_ons(track: &[midly::TrackEvent<'_>]) -> Vec<u8> {
    track
        .iter()
        .filter_map(|e| match e.kind {
            TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, .. },
                ..
            } => Some(key.as_int()),
            _ => None,
        })
        .collect()
}

#[test]
fn config_file_to_midi_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("cantus.json");
    std::fs::write(
        &config_path,
        r#"{
            "scale": { "root": "C", "scale_type": "major" },
            "cantus_firmus": ["C1", "D1", "F1", "E1", "F1", "G1", "A1", "G1", "E1", "D1", "C1"],
            "tempo_bpm": 100,
            "counterpoint_track_name": "upper voice"
        }"#,
    )
    .unwrap();

    let config = GenerationConfig::load(&config_path).unwrap();
    let composition = compose(&config).unwrap();
    let midi_path = dir.path().join("out.mid");
    write_midi(&composition.tracks, config.tempo_bpm, &midi_path).unwrap();

    let bytes = std::fs::read(&midi_path).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(smf.tracks.len(), 3, "tempo track plus two voices");

    let cantus_keys = note_ons(&smf.tracks[1]);
    let counterpoint_keys = note_ons(&smf.tracks[2]);
    assert_eq!(cantus_keys, vec![36, 38, 41, 40, 41, 43, 45, 43, 40, 38, 36]);
    assert_eq!(counterpoint_keys, vec![36, 35, 33, 36, 35, 31, 29, 35, 36, 38, 36]);

    let name = smf.tracks[2].iter().find_map(|e| match e.kind {
        TrackEventKind::Meta(MetaMessage::TrackName(name)) => Some(name),
        _ => None,
    });
    assert_eq!(name, Some(&b"upper voice"[..]));
}

#[test]
fn unsatisfiable_cantus_produces_no_output() {
    let config = GenerationConfig {
        cantus_firmus: vec!["E2".into(), "E2".into(), "D2".into(), "C2".into()],
        ..Default::default()
    };
    let err = compose(&config).unwrap_err();
    assert!(
        matches!(err, cantus_music::Error::NoAcceptableInterval { position: 1, .. }),
        "unexpected error: {err}"
    );
}
