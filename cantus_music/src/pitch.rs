// The chromatic pitch space: scientific pitch notation, positional index,
// and MIDI number.
//
// The space is fixed at 12 note letters across 8 octaves (C0 through B7),
// which gives 96 positions. Index order is octave-major then letter order
// within the octave, and that order is the only notion of "ascending pitch"
// used anywhere in the crate. MIDI numbers are the index plus a fixed offset
// of 24, so C0 sounds as MIDI 24 and B7 as MIDI 119.
//
// Letters are spelled with `s` for sharp ("Cs2"); the parser also accepts
// `#` ("C#2"). There are no flats.
//
// Used by scale.rs to build cross-octave pitch tables and by tune.rs to
// resolve MIDI numbers.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of supported octaves (0 through 7).
pub const OCTAVES: u8 = 8;

/// Total number of positions in the chromatic space.
pub const PITCH_COUNT: usize = NoteLetter::ALL.len() * OCTAVES as usize;

/// MIDI number of index 0 (C0).
pub const MIDI_OFFSET: u8 = 24;

/// The twelve semitone classes in ascending order from C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NoteLetter {
    C = 0,
    Cs = 1,
    D = 2,
    Ds = 3,
    E = 4,
    F = 5,
    Fs = 6,
    G = 7,
    Gs = 8,
    A = 9,
    As = 10,
    B = 11,
}

impl NoteLetter {
    pub const ALL: [NoteLetter; 12] = [
        NoteLetter::C,
        NoteLetter::Cs,
        NoteLetter::D,
        NoteLetter::Ds,
        NoteLetter::E,
        NoteLetter::F,
        NoteLetter::Fs,
        NoteLetter::G,
        NoteLetter::Gs,
        NoteLetter::A,
        NoteLetter::As,
        NoteLetter::B,
    ];

    /// Semitone class, 0 for C through 11 for B.
    pub fn semitone(self) -> u8 {
        self as u8
    }

    /// The letter `semitones` above this one, wrapping at the octave.
    pub fn transpose(self, semitones: usize) -> NoteLetter {
        Self::ALL[(self.semitone() as usize + semitones) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            NoteLetter::C => "C",
            NoteLetter::Cs => "Cs",
            NoteLetter::D => "D",
            NoteLetter::Ds => "Ds",
            NoteLetter::E => "E",
            NoteLetter::F => "F",
            NoteLetter::Fs => "Fs",
            NoteLetter::G => "G",
            NoteLetter::Gs => "Gs",
            NoteLetter::A => "A",
            NoteLetter::As => "As",
            NoteLetter::B => "B",
        }
    }
}

impl fmt::Display for NoteLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NoteLetter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let natural = match chars.next() {
            Some('C') => NoteLetter::C,
            Some('D') => NoteLetter::D,
            Some('E') => NoteLetter::E,
            Some('F') => NoteLetter::F,
            Some('G') => NoteLetter::G,
            Some('A') => NoteLetter::A,
            Some('B') => NoteLetter::B,
            _ => return Err(Error::OutOfRange(format!("unknown note letter '{s}'"))),
        };
        match chars.as_str() {
            "" => Ok(natural),
            // E#/B# are not part of the alphabet.
            "s" | "#" if !matches!(natural, NoteLetter::E | NoteLetter::B) => {
                Ok(natural.transpose(1))
            }
            _ => Err(Error::OutOfRange(format!("unknown note letter '{s}'"))),
        }
    }
}

/// A note letter in a specific octave, e.g. C4.
///
/// The octave is always within `0..OCTAVES`; every constructor validates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pitch {
    // Field order matters for the derived Ord: octave first, then letter.
    octave: u8,
    letter: NoteLetter,
}

impl Pitch {
    pub fn new(letter: NoteLetter, octave: u8) -> Result<Self> {
        if octave >= OCTAVES {
            return Err(Error::OutOfRange(format!(
                "octave {octave} outside 0..{OCTAVES}"
            )));
        }
        Ok(Pitch { octave, letter })
    }

    pub fn letter(self) -> NoteLetter {
        self.letter
    }

    pub fn octave(self) -> u8 {
        self.octave
    }

    /// Position in the chromatic space, in `0..PITCH_COUNT`.
    pub fn to_index(self) -> usize {
        self.octave as usize * NoteLetter::ALL.len() + self.letter.semitone() as usize
    }

    pub fn from_index(index: usize) -> Result<Self> {
        if index >= PITCH_COUNT {
            return Err(Error::OutOfRange(format!(
                "pitch index {index} outside 0..{PITCH_COUNT}"
            )));
        }
        let per_octave = NoteLetter::ALL.len();
        Ok(Pitch {
            octave: (index / per_octave) as u8,
            letter: NoteLetter::ALL[index % per_octave],
        })
    }

    pub fn to_midi(self) -> u8 {
        self.to_index() as u8 + MIDI_OFFSET
    }

    /// Inverse of `to_midi`. Accepts MIDI 24 (C0) through 119 (B7).
    pub fn from_midi(midi: u8) -> Result<Self> {
        let index = midi
            .checked_sub(MIDI_OFFSET)
            .ok_or_else(|| Error::OutOfRange(format!("MIDI pitch {midi} below C0")))?;
        Pitch::from_index(index as usize)
            .map_err(|_| Error::OutOfRange(format!("MIDI pitch {midi} above B7")))
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.octave)
    }
}

impl FromStr for Pitch {
    type Err = Error;

    /// Parse "NoteOctave", e.g. "C4", "Fs2", "G#7".
    fn from_str(s: &str) -> Result<Self> {
        let split = s
            .find(|c: char| c.is_ascii_digit() || c == '-')
            .ok_or_else(|| Error::OutOfRange(format!("pitch '{s}' has no octave")))?;
        let (letter, octave) = s.split_at(split);
        let letter: NoteLetter = letter.parse()?;
        let octave: u8 = octave
            .parse()
            .map_err(|_| Error::OutOfRange(format!("octave '{octave}' in pitch '{s}'")))?;
        Pitch::new(letter, octave)
    }
}

impl TryFrom<String> for Pitch {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Pitch> for String {
    fn from(p: Pitch) -> Self {
        p.to_string()
    }
}

/// Chromatic index of a scientific-pitch string.
pub fn index_of(sp: &str) -> Result<usize> {
    Ok(sp.parse::<Pitch>()?.to_index())
}

/// MIDI number of a scientific-pitch string.
pub fn midi_of(sp: &str) -> Result<u8> {
    Ok(sp.parse::<Pitch>()?.to_midi())
}

/// Every pitch in the space, in ascending order.
pub fn all_pitches() -> impl Iterator<Item = Pitch> {
    (0..OCTAVES).flat_map(|octave| {
        NoteLetter::ALL
            .into_iter()
            .map(move |letter| Pitch { octave, letter })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip_covers_space() {
        let mut count = 0;
        for (i, pitch) in all_pitches().enumerate() {
            assert_eq!(pitch.to_index(), i);
            assert_eq!(Pitch::from_index(i).unwrap(), pitch);
            assert_eq!(Pitch::from_midi(pitch.to_midi()).unwrap(), pitch);
            assert_eq!(pitch.to_string().parse::<Pitch>().unwrap(), pitch);
            count += 1;
        }
        assert_eq!(count, PITCH_COUNT);
    }

    #[test]
    fn test_midi_strictly_increasing() {
        let midi: Vec<u8> = all_pitches().map(Pitch::to_midi).collect();
        assert!(midi.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(midi.first(), Some(&24));
        assert_eq!(midi.last(), Some(&119));
    }

    #[test]
    fn test_known_midi_values() {
        assert_eq!(midi_of("C0").unwrap(), 24);
        assert_eq!(midi_of("C2").unwrap(), 48);
        assert_eq!(midi_of("A3").unwrap(), 69);
        assert_eq!(index_of("B7").unwrap(), 95);
    }

    #[test]
    fn test_sharp_spellings() {
        let s: Pitch = "Cs2".parse().unwrap();
        let hash: Pitch = "C#2".parse().unwrap();
        assert_eq!(s, hash);
        assert_eq!(hash.to_string(), "Cs2");
        assert_eq!(s.letter(), NoteLetter::Cs);
    }

    #[test]
    fn test_out_of_range_inputs() {
        assert!(matches!("C8".parse::<Pitch>(), Err(Error::OutOfRange(_))));
        assert!(matches!("C-1".parse::<Pitch>(), Err(Error::OutOfRange(_))));
        assert!(matches!("H2".parse::<Pitch>(), Err(Error::OutOfRange(_))));
        assert!(matches!("Es2".parse::<Pitch>(), Err(Error::OutOfRange(_))));
        assert!(matches!("C".parse::<Pitch>(), Err(Error::OutOfRange(_))));
        assert!(matches!(Pitch::from_index(96), Err(Error::OutOfRange(_))));
        assert!(matches!(Pitch::from_midi(23), Err(Error::OutOfRange(_))));
        assert!(matches!(Pitch::from_midi(120), Err(Error::OutOfRange(_))));
        assert!(Pitch::from_midi(119).is_ok());
    }

    #[test]
    fn test_letter_semitones_and_transpose() {
        assert_eq!(NoteLetter::C.semitone(), 0);
        assert_eq!(NoteLetter::Fs.semitone(), 6);
        assert_eq!(NoteLetter::B.semitone(), 11);
        assert_eq!(NoteLetter::A.transpose(3), NoteLetter::C);
        assert_eq!(NoteLetter::D.transpose(12), NoteLetter::D);
        let fs2 = Pitch::new(NoteLetter::Fs, 2).unwrap();
        assert_eq!(fs2.to_index(), 2 * 12 + 6);
    }

    #[test]
    fn test_ordering_matches_index() {
        let b3: Pitch = "B3".parse().unwrap();
        let c4: Pitch = "C4".parse().unwrap();
        assert!(b3 < c4);
        assert!(b3.to_index() < c4.to_index());
    }

    #[test]
    fn test_serde_as_string() {
        let p: Pitch = "Fs5".parse().unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"Fs5\"");
        let back: Pitch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_str::<Pitch>("\"Q1\"").is_err());
    }
}
