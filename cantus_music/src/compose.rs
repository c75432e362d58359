// End-to-end generation: config -> scale -> cantus firmus -> counterpoint
// -> event tracks.
//
// This is the library entry point used by the `generate` binary. It does no
// file I/O; the caller hands `Composition::tracks` to midi.rs.

use crate::config::GenerationConfig;
use crate::counterpoint::CounterpointGenerator;
use crate::error::Result;
use crate::events::{EventLayout, EventTrack, tune_events};
use crate::pitch::Pitch;
use crate::scale::{Scale, ScaleCatalog};
use crate::tune::Tune;
use tracing::info;

/// The result of one generation run.
#[derive(Debug, Clone)]
pub struct Composition {
    pub scale: Scale,
    pub cantus: Vec<Pitch>,
    pub counterpoint: Vec<Pitch>,
    /// Cantus track first, then counterpoint.
    pub tracks: Vec<EventTrack>,
}

pub fn compose(config: &GenerationConfig) -> Result<Composition> {
    config.validate()?;

    let catalog = ScaleCatalog::new();
    let scale = catalog.build_named(&config.scale.root, &config.scale.scale_type)?;
    info!(scale = %scale, "built scale");

    let cantus = Tune::new(&scale, &config.cantus_firmus)?;
    let generator = CounterpointGenerator::new(config.max_attempts);
    let counterpoint = generator.generate(&cantus)?;
    info!(cantus = %cantus, counterpoint = %counterpoint, "generated counterpoint");

    let cantus_layout = EventLayout {
        offset: 0.0,
        duration: config.note_duration_beats,
        velocity: config.velocity,
    };
    let counterpoint_layout = EventLayout {
        offset: config.counterpoint_offset_beats,
        ..cantus_layout
    };

    let tracks = vec![
        EventTrack {
            name: config.cantus_track_name.clone(),
            channel: 0,
            program: config.program,
            events: tune_events(&cantus, cantus_layout)?,
        },
        EventTrack {
            name: config.counterpoint_track_name.clone(),
            channel: 1,
            program: config.program,
            events: tune_events(&counterpoint, counterpoint_layout)?,
        },
    ];

    let cantus = cantus.pitches().to_vec();
    let counterpoint = counterpoint.pitches().to_vec();
    Ok(Composition {
        scale,
        cantus,
        counterpoint,
        tracks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::scale::ScaleType;

    #[test]
    fn test_compose_default() {
        let composition = compose(&GenerationConfig::default()).unwrap();
        assert_eq!(composition.scale.name(), "C_Major");
        assert_eq!(composition.cantus.len(), 11);
        assert_eq!(composition.counterpoint.len(), 11);
        assert_eq!(composition.counterpoint.first(), composition.cantus.first());
        assert_eq!(composition.counterpoint.last(), composition.cantus.last());

        assert_eq!(composition.tracks.len(), 2);
        let cp_track = &composition.tracks[1];
        assert_eq!(cp_track.name, "counterpoint");
        assert_eq!(cp_track.events[0].onset, 0.25);
        assert_eq!(cp_track.events[1].key, 35); // B0
    }

    #[test]
    fn test_compose_other_scale() {
        let config = GenerationConfig {
            scale: crate::config::ScaleSelection {
                root: "D".to_string(),
                scale_type: "Dorian".to_string(),
            },
            cantus_firmus: ["D3", "F3", "E3", "D3", "G3", "F3", "A3", "G3", "F3", "E3", "D3"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ..Default::default()
        };
        let composition = compose(&config).unwrap();
        assert_eq!(composition.scale.scale_type(), ScaleType::Dorian);
        assert_eq!(composition.counterpoint.len(), 11);
        assert!(composition.counterpoint.iter().all(|&p| composition.scale.contains(p)));
    }

    #[test]
    fn test_compose_errors() {
        let mut config = GenerationConfig {
            cantus_firmus: vec!["C1".to_string(), "Cs1".to_string()],
            ..Default::default()
        };
        assert!(matches!(compose(&config), Err(Error::NotInScale { .. })));

        config.scale.scale_type = "Bebop".to_string();
        assert!(matches!(compose(&config), Err(Error::UnknownScaleType(_))));
    }
}
