// Generation configuration.
//
// Every tunable parameter of a generation run lives in `GenerationConfig`,
// loaded from JSON. Parsing is strict: unknown keys at any level are an
// error, and every field falls back to its default when omitted, so a
// config file only needs to name what it changes. `validate()` checks value
// ranges after parsing.
//
// The defaults describe a classic exercise: C Major, the eleven-note
// cantus firmus below, one beat per note, counterpoint offset by a quarter
// beat, velocity 100.
//
// See also: `compose.rs`, which turns a validated config into tracks, and
// `main.rs`, which layers command-line overrides on top.

use crate::counterpoint::DEFAULT_MAX_ATTEMPTS;
use crate::error::{Error, Result};
use crate::midi::MIN_TEMPO_BPM;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which scale the cantus firmus and counterpoint live in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScaleSelection {
    /// Root letter, e.g. "C" or "Fs".
    pub root: String,
    /// Scale type name, case-insensitive: "Major", "minor", "Dorian", ...
    pub scale_type: String,
}

impl Default for ScaleSelection {
    fn default() -> Self {
        ScaleSelection {
            root: "C".to_string(),
            scale_type: "Major".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    pub scale: ScaleSelection,
    /// Scientific-pitch strings; every one must belong to the scale.
    pub cantus_firmus: Vec<String>,
    /// Quarter notes per minute.
    pub tempo_bpm: u16,
    /// Length of every note, in beats.
    pub note_duration_beats: f64,
    /// How far each counterpoint note lags its cantus note, in beats.
    pub counterpoint_offset_beats: f64,
    /// Note-on velocity for both lines (0-127).
    pub velocity: u8,
    /// Proposals tried per counterpoint position before giving up.
    pub max_attempts: u32,
    pub cantus_track_name: String,
    pub counterpoint_track_name: String,
    /// General MIDI program for both tracks (0 = acoustic grand piano).
    pub program: u8,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            scale: ScaleSelection::default(),
            cantus_firmus: ["C1", "D1", "F1", "E1", "F1", "G1", "A1", "G1", "E1", "D1", "C1"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            tempo_bpm: 120,
            note_duration_beats: 1.0,
            counterpoint_offset_beats: 0.25,
            velocity: 100,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            cantus_track_name: "cantus firmus".to_string(),
            counterpoint_track_name: "counterpoint".to_string(),
            program: 0,
        }
    }
}

impl GenerationConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GenerationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Range checks that the type system does not already enforce.
    pub fn validate(&self) -> Result<()> {
        if self.tempo_bpm < MIN_TEMPO_BPM {
            return Err(Error::Config(format!(
                "tempo_bpm {} below the minimum of {MIN_TEMPO_BPM}",
                self.tempo_bpm
            )));
        }
        if self.velocity > 127 {
            return Err(Error::Config(format!("velocity {} above 127", self.velocity)));
        }
        if self.program > 127 {
            return Err(Error::Config(format!("program {} above 127", self.program)));
        }
        if self.note_duration_beats <= 0.0 || !self.note_duration_beats.is_finite() {
            return Err(Error::Config(format!(
                "note_duration_beats {} must be positive",
                self.note_duration_beats
            )));
        }
        if self.counterpoint_offset_beats < 0.0 || !self.counterpoint_offset_beats.is_finite() {
            return Err(Error::Config(format!(
                "counterpoint_offset_beats {} must not be negative",
                self.counterpoint_offset_beats
            )));
        }
        if self.max_attempts == 0 {
            return Err(Error::Config("max_attempts must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = GenerationConfig::default();
        let json = config.to_json_pretty().unwrap();
        let restored = GenerationConfig::from_json_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn config_loads_partial_json() {
        let json = r#"{
            "scale": { "root": "D", "scale_type": "dorian" },
            "cantus_firmus": ["D2", "F2", "E2", "D2"],
            "tempo_bpm": 90
        }"#;
        let config = GenerationConfig::from_json_str(json).unwrap();
        assert_eq!(config.scale.root, "D");
        assert_eq!(config.cantus_firmus.len(), 4);
        assert_eq!(config.tempo_bpm, 90);
        // Omitted fields keep their defaults.
        assert_eq!(config.velocity, 100);
        assert_eq!(config.counterpoint_track_name, "counterpoint");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let top = r#"{ "tempo": 90 }"#;
        assert!(matches!(GenerationConfig::from_json_str(top), Err(Error::Json(_))));

        let nested = r#"{ "scale": { "root": "C", "mode": "major" } }"#;
        assert!(matches!(GenerationConfig::from_json_str(nested), Err(Error::Json(_))));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [
            r#"{ "tempo_bpm": 0 }"#,
            r#"{ "tempo_bpm": 1 }"#,
            r#"{ "tempo_bpm": 3 }"#,
            r#"{ "velocity": 200 }"#,
            r#"{ "program": 128 }"#,
            r#"{ "note_duration_beats": 0.0 }"#,
            r#"{ "counterpoint_offset_beats": -1.0 }"#,
            r#"{ "max_attempts": 0 }"#,
        ];
        for json in cases {
            assert!(
                matches!(GenerationConfig::from_json_str(json), Err(Error::Config(_))),
                "{json} should fail validation"
            );
        }
    }

    #[test]
    fn config_loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "velocity": 64 }"#).unwrap();
        let config = GenerationConfig::load(&path).unwrap();
        assert_eq!(config.velocity, 64);

        let missing = dir.path().join("missing.json");
        assert!(matches!(GenerationConfig::load(&missing), Err(Error::Io(_))));
    }
}
