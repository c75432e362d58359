// First-species counterpoint against a cantus firmus.
//
// The generator walks the cantus firmus left to right and, for each interior
// position, proposes a note a growing number of scale steps away from the
// previous counterpoint note, always moving against the cantus. A proposal is
// rejected when:
// - the previous and proposed interval numbers are both 4 or 5 (parallel
//   perfect intervals),
// - the proposed interval number is 2 or 7 (a second or seventh against the
//   cantus),
// - the proposed pitch repeats one of the two previous counterpoint pitches.
//
// The first and last counterpoint notes are the cantus firmus's own first
// and last notes. The search per position is bounded by `max_attempts`;
// exhausting it fails the whole line with `NoAcceptableInterval`. A cantus
// that holds a pitch gives no direction to move in, so that position fails
// on its first rejection.
//
// `mirror_trace` is the unchecked variant: a plain melodic inversion of the
// cantus from a chosen starting pitch.

use crate::error::{Error, Result};
use crate::pitch::Pitch;
use crate::tune::Tune;
use tracing::{debug, trace};

/// Default retry budget per position.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 32;

/// Why a candidate note was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Previous and proposed intervals are both fourths/fifths.
    ParallelPerfect,
    /// Proposed interval is a second or seventh.
    Dissonance,
    /// Proposed pitch equals one of the two preceding counterpoint pitches.
    Repetition,
}

/// Run the acceptance checks for one candidate.
///
/// `recent` holds the preceding counterpoint pitches to compare against (at
/// most the last two are considered). Returns None when the candidate is
/// acceptable.
pub fn check_candidate(
    prev_interval: u8,
    interval: u8,
    candidate: Pitch,
    recent: &[Pitch],
) -> Option<Rejection> {
    let perfect = |iv: u8| matches!(iv, 4 | 5);
    if perfect(prev_interval) && perfect(interval) {
        return Some(Rejection::ParallelPerfect);
    }
    if matches!(interval, 2 | 7) {
        return Some(Rejection::Dissonance);
    }
    let window = &recent[recent.len().saturating_sub(2)..];
    if window.contains(&candidate) {
        return Some(Rejection::Repetition);
    }
    None
}

/// Transient search state for one generator run.
struct CandidateState {
    line: Vec<Pitch>,
    prev_interval: u8,
}

impl CandidateState {
    fn recent(&self) -> &[Pitch] {
        &self.line[self.line.len().saturating_sub(2)..]
    }
}

#[derive(Debug, Clone)]
pub struct CounterpointGenerator {
    /// Proposals tried per position before giving up.
    pub max_attempts: u32,
}

impl Default for CounterpointGenerator {
    fn default() -> Self {
        CounterpointGenerator {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl CounterpointGenerator {
    pub fn new(max_attempts: u32) -> Self {
        CounterpointGenerator { max_attempts }
    }

    /// Produce a counterpoint line of the same length as `cantus`, on the
    /// same scale.
    pub fn generate<'s>(&self, cantus: &Tune<'s>) -> Result<Tune<'s>> {
        let scale = cantus.scale();
        let (Some(first), Some(last)) = (cantus.starting(), cantus.ending()) else {
            return Tune::from_pitches(scale, Vec::new());
        };

        let cantus_steps = cantus.steps();
        let mut state = CandidateState {
            line: Vec::with_capacity(cantus.len()),
            prev_interval: 0,
        };
        state.line.push(first);
        debug!(%first, "anchored opening note");

        let mut previous = first;
        for position in 1..cantus.len().saturating_sub(1) {
            let direction = -cantus_steps[position - 1].signum();
            previous = self.place(&mut state, cantus, position, previous, direction)?;
        }

        if cantus.len() > 1 {
            state.line.push(last);
            debug!(%last, "anchored closing note");
        }
        Tune::from_pitches(scale, state.line)
    }

    /// Search for an acceptable note at `position`, moving from `previous` in
    /// `direction` by one more step per rejection.
    fn place(
        &self,
        state: &mut CandidateState,
        cantus: &Tune<'_>,
        position: usize,
        previous: Pitch,
        direction: i32,
    ) -> Result<Pitch> {
        let scale = cantus.scale();
        let against = cantus[position];
        let mut step = direction;

        for attempt in 1..=self.max_attempts {
            let candidate = scale.shift(previous, step)?;
            let interval = scale.interval_number(against, candidate)?;
            trace!(position, step, %candidate, interval, "proposal");

            match check_candidate(state.prev_interval, interval, candidate, state.recent()) {
                None => {
                    debug!(position, %against, %candidate, interval, attempt, "accepted");
                    state.line.push(candidate);
                    state.prev_interval = interval;
                    return Ok(candidate);
                }
                Some(reason) => {
                    trace!(position, ?reason, "rejected");
                    if direction == 0 {
                        // Holding cantus: every further proposal is identical.
                        return Err(Error::NoAcceptableInterval {
                            position,
                            attempts: attempt,
                        });
                    }
                    step += direction;
                }
            }
        }

        Err(Error::NoAcceptableInterval {
            position,
            attempts: self.max_attempts,
        })
    }
}

/// Invert the cantus melodically: start at `start` and take each cantus step
/// in the opposite direction. No interval checks are applied.
pub fn mirror_trace<'s>(cantus: &Tune<'s>, start: Pitch) -> Result<Tune<'s>> {
    let scale = cantus.scale();
    let mut line = Vec::with_capacity(cantus.len().max(1));
    let mut current = start;
    line.push(current);
    for step in cantus.steps() {
        current = scale.shift(current, -step)?;
        line.push(current);
    }
    Tune::from_pitches(scale, line)
}
