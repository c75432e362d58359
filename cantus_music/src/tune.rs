// A melodic line bound to a scale.
//
// A Tune is an ordered sequence of pitches that must all be members of its
// scale. Construction resolves every pitch (and its MIDI number) up front, so
// an out-of-scale note fails immediately and the derived queries below can
// never fail.
//
// Naming note: `peak` is the pitch with the LOWEST MIDI number and `trough`
// the one with the HIGHEST.

use crate::error::Result;
use crate::pitch::Pitch;
use crate::scale::Scale;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tune<'s> {
    scale: &'s Scale,
    pitches: Vec<Pitch>,
    midi: Vec<u8>,
    positions: Vec<usize>,
}

impl<'s> Tune<'s> {
    /// Build from scientific-pitch strings, e.g. `["C1", "D1", "F1"]`.
    pub fn new<S: AsRef<str>>(scale: &'s Scale, sps: &[S]) -> Result<Self> {
        let pitches = sps
            .iter()
            .map(|sp| sp.as_ref().parse())
            .collect::<Result<Vec<Pitch>>>()?;
        Self::from_pitches(scale, pitches)
    }

    pub fn from_pitches(scale: &'s Scale, pitches: Vec<Pitch>) -> Result<Self> {
        let positions = pitches
            .iter()
            .map(|&p| scale.position(p))
            .collect::<Result<Vec<usize>>>()?;
        let midi = pitches.iter().map(|p| p.to_midi()).collect();
        Ok(Tune {
            scale,
            pitches,
            midi,
            positions,
        })
    }

    pub fn scale(&self) -> &'s Scale {
        self.scale
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Pitch> {
        self.pitches.get(index).copied()
    }

    pub fn pitches(&self) -> &[Pitch] {
        &self.pitches
    }

    /// MIDI numbers, parallel to `pitches()`.
    pub fn midi(&self) -> &[u8] {
        &self.midi
    }

    /// Scale steps between consecutive notes.
    pub fn steps(&self) -> Vec<i32> {
        self.positions
            .windows(2)
            .map(|w| w[1] as i32 - w[0] as i32)
            .collect()
    }

    pub fn starting(&self) -> Option<Pitch> {
        self.pitches.first().copied()
    }

    pub fn ending(&self) -> Option<Pitch> {
        self.pitches.last().copied()
    }

    /// The lowest-sounding pitch (minimum MIDI number).
    pub fn peak(&self) -> Option<Pitch> {
        self.pitches.iter().copied().min_by_key(|p| p.to_midi())
    }

    /// The highest-sounding pitch (maximum MIDI number).
    pub fn trough(&self) -> Option<Pitch> {
        self.pitches.iter().copied().max_by_key(|p| p.to_midi())
    }
}

impl std::ops::Index<usize> for Tune<'_> {
    type Output = Pitch;

    fn index(&self, index: usize) -> &Pitch {
        &self.pitches[index]
    }
}

impl fmt::Display for Tune<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.pitches.iter().map(|p| p.to_string()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
