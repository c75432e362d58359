// Scales: named subsets of the chromatic pitch space with positional
// arithmetic.
//
// A scale is defined by a root letter and a step template (semitone gaps
// between successive degrees, the first always 0). ScaleCatalog walks the
// chromatic alphabet from the root using the cumulative sums of the
// template to get the degree letters, then expands those letters across all
// eight octaves into a single ascending pitch table.
//
// All arithmetic on a scale is positional: "steps" count table positions,
// not semitones, so a step in C Major from E to F is 1 just like C to D.
// Interval numbers follow the music-theory convention (1 = unison/octave,
// 2 = second, ...) and wrap at the number of degrees.
//
// Consumed by tune.rs (pitch membership and MIDI resolution) and
// counterpoint.rs (shift and interval checks).

use crate::error::{Error, Result};
use crate::pitch::{NoteLetter, Pitch, PITCH_COUNT, all_pitches};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scale families available from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScaleType {
    /// All twelve letters.
    Chromatic,
    /// W W H W W W H
    Major,
    /// Natural minor: W H W W H W W
    Minor,
    /// Natural minor with raised 6th.
    Dorian,
    /// Half-step from 1 to 2.
    Phrygian,
    /// Raised 4th.
    Lydian,
    /// Major with lowered 7th.
    Mixolydian,
    /// Same degrees as Minor.
    Aeolian,
    /// Same degrees as Major.
    Ionian,
}

impl ScaleType {
    pub const ALL: [ScaleType; 9] = [
        ScaleType::Chromatic,
        ScaleType::Major,
        ScaleType::Minor,
        ScaleType::Dorian,
        ScaleType::Phrygian,
        ScaleType::Lydian,
        ScaleType::Mixolydian,
        ScaleType::Aeolian,
        ScaleType::Ionian,
    ];

    /// Semitone gap from the previous degree to each degree. The first
    /// entry is always 0 (the root itself).
    pub fn steps(self) -> &'static [u8] {
        match self {
            ScaleType::Chromatic => &[0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            ScaleType::Major | ScaleType::Ionian => &[0, 2, 2, 1, 2, 2, 2],
            ScaleType::Minor | ScaleType::Aeolian => &[0, 2, 1, 2, 2, 1, 2],
            ScaleType::Dorian => &[0, 2, 1, 2, 2, 2, 1],
            ScaleType::Phrygian => &[0, 1, 2, 2, 2, 1, 2],
            ScaleType::Lydian => &[0, 2, 2, 2, 1, 2, 2],
            ScaleType::Mixolydian => &[0, 2, 2, 1, 2, 2, 1],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScaleType::Chromatic => "Chromatic",
            ScaleType::Major => "Major",
            ScaleType::Minor => "Minor",
            ScaleType::Dorian => "Dorian",
            ScaleType::Phrygian => "Phrygian",
            ScaleType::Lydian => "Lydian",
            ScaleType::Mixolydian => "Mixolydian",
            ScaleType::Aeolian => "Aeolian",
            ScaleType::Ionian => "Ionian",
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScaleType {
    type Err = Error;

    /// Case-insensitive match on the type name.
    fn from_str(s: &str) -> Result<Self> {
        ScaleType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownScaleType(s.to_string()))
    }
}

/// An immutable scale: degree letters plus the full cross-octave pitch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scale {
    root: NoteLetter,
    scale_type: ScaleType,
    /// Degree letters within one octave, starting from the root.
    notes: Vec<NoteLetter>,
    /// Every member pitch from C0 to B7, ascending.
    table: Vec<Pitch>,
    /// Table position for each chromatic index, None for non-members.
    positions: Vec<Option<usize>>,
}

impl Scale {
    fn from_notes(root: NoteLetter, scale_type: ScaleType, notes: Vec<NoteLetter>) -> Self {
        let table: Vec<Pitch> = all_pitches()
            .filter(|p| notes.contains(&p.letter()))
            .collect();
        let mut positions = vec![None; PITCH_COUNT];
        for (pos, pitch) in table.iter().enumerate() {
            positions[pitch.to_index()] = Some(pos);
        }
        Scale {
            root,
            scale_type,
            notes,
            table,
            positions,
        }
    }

    pub fn root(&self) -> NoteLetter {
        self.root
    }

    pub fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    /// "C_Major", "D_Dorian", ...
    pub fn name(&self) -> String {
        format!("{}_{}", self.root, self.scale_type)
    }

    pub fn notes(&self) -> &[NoteLetter] {
        &self.notes
    }

    /// Number of degrees per octave.
    pub fn degree_count(&self) -> usize {
        self.notes.len()
    }

    /// The full ascending pitch table.
    pub fn pitches(&self) -> &[Pitch] {
        &self.table
    }

    /// Number of pitches in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn contains(&self, pitch: Pitch) -> bool {
        self.positions[pitch.to_index()].is_some()
    }

    /// Table position of a pitch.
    pub fn position(&self, pitch: Pitch) -> Result<usize> {
        self.positions[pitch.to_index()].ok_or_else(|| Error::NotInScale {
            pitch: pitch.to_string(),
            scale: self.name(),
        })
    }

    /// Table position of a scientific-pitch string.
    pub fn degree_index(&self, sp: &str) -> Result<usize> {
        self.position(sp.parse()?)
    }

    /// Pitch at a table position. Negative positions count from the end
    /// (-1 is the highest pitch).
    pub fn pitch_at(&self, position: isize) -> Result<Pitch> {
        let len = self.table.len() as isize;
        let resolved = if position < 0 { position + len } else { position };
        if !(0..len).contains(&resolved) {
            return Err(Error::OutOfRange(format!(
                "position {position} outside scale {} of {len} pitches",
                self.name()
            )));
        }
        Ok(self.table[resolved as usize])
    }

    /// The base letter of a pitch, without its octave.
    pub fn degree_of(&self, pitch: Pitch) -> NoteLetter {
        pitch.letter()
    }

    /// Index of a letter within the scale's degree letters.
    pub fn note_index(&self, letter: NoteLetter) -> Option<usize> {
        self.notes.iter().position(|&n| n == letter)
    }

    /// Signed count of scale positions from `a` to `b`.
    pub fn steps_between(&self, a: Pitch, b: Pitch) -> Result<i32> {
        Ok(self.position(b)? as i32 - self.position(a)? as i32)
    }

    /// Steps between each consecutive pair: [A1, B1, D2] -> [1, 2].
    pub fn step_sequence(&self, pitches: &[Pitch]) -> Result<Vec<i32>> {
        pitches
            .windows(2)
            .map(|w| self.steps_between(w[0], w[1]))
            .collect()
    }

    /// The pitch `amount` positions away from `pitch`. Leaving the table is an
    /// error; there is no wrap-around.
    pub fn shift(&self, pitch: Pitch, amount: i32) -> Result<Pitch> {
        let target = self.position(pitch)? as i64 + amount as i64;
        if target < 0 || target >= self.table.len() as i64 {
            return Err(Error::OutOfRange(format!(
                "shifting {pitch} by {amount} leaves scale {}",
                self.name()
            )));
        }
        Ok(self.table[target as usize])
    }

    /// Interval number from `a` to `b`, in `1..=degree_count`.
    ///
    /// Octave-compound intervals fold down, so C2-D3 and C2-D4 are both 2.
    /// Downward motion wraps too: D1 down to B0 is 6.
    pub fn interval_number(&self, a: Pitch, b: Pitch) -> Result<u8> {
        let steps = self.steps_between(a, b)?;
        Ok(steps.rem_euclid(self.degree_count() as i32) as u8 + 1)
    }

    /// MIDI number of a member pitch.
    pub fn midi_of(&self, pitch: Pitch) -> Result<u8> {
        self.position(pitch).map(|_| pitch.to_midi())
    }

    /// Member pitch for a MIDI number.
    pub fn pitch_of_midi(&self, midi: u8) -> Result<Pitch> {
        let pitch = Pitch::from_midi(midi)?;
        self.position(pitch)?;
        Ok(pitch)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let notes: Vec<&str> = self.notes.iter().map(|n| n.name()).collect();
        write!(f, "{}: [{}]", self.name(), notes.join(", "))
    }
}

/// Builds scales from the step templates.
#[derive(Debug, Clone)]
pub struct ScaleCatalog {
    chromatic: Scale,
}

impl Default for ScaleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ScaleCatalog {
    pub fn new() -> Self {
        ScaleCatalog {
            chromatic: Scale::from_notes(
                NoteLetter::C,
                ScaleType::Chromatic,
                NoteLetter::ALL.to_vec(),
            ),
        }
    }

    /// The twelve-letter base scale rooted at C.
    pub fn chromatic(&self) -> &Scale {
        &self.chromatic
    }

    pub fn build(&self, root: NoteLetter, scale_type: ScaleType) -> Scale {
        let mut offset = 0usize;
        let notes = scale_type
            .steps()
            .iter()
            .map(|&step| {
                offset += step as usize;
                root.transpose(offset)
            })
            .collect();
        Scale::from_notes(root, scale_type, notes)
    }

    /// Build from string names, e.g. ("D", "dorian").
    pub fn build_named(&self, root: &str, scale_type: &str) -> Result<Scale> {
        Ok(self.build(root.parse()?, scale_type.parse()?))
    }

    /// C Major.
    pub fn default_scale(&self) -> Scale {
        self.build(NoteLetter::C, ScaleType::Major)
    }
}
