// Cantus Music: scale arithmetic and counterpoint generation.
//
// Builds a second melodic line against a fixed cantus firmus using simple
// first-species rules (contrary motion, no parallel perfect intervals, no
// seconds or sevenths, no immediate repetition) and writes both lines to a
// Standard MIDI File.
//
// Architecture:
// - pitch.rs: Chromatic pitch space (scientific pitch <-> index <-> MIDI)
// - scale.rs: Scale types, the scale catalog, positional step/interval math
// - tune.rs: A pitch sequence bound to a scale, with derived queries
// - counterpoint.rs: Bounded candidate search for the counterpoint line,
//   plus the unchecked mirror trace
// - events.rs: Tunes to timed note events
// - midi.rs: MIDI file output from event tracks
// - config.rs: Strict JSON generation config
// - compose.rs: The config-to-tracks pipeline
// - error.rs: Crate error type
//
// All computation is synchronous and deterministic: the same config always
// yields the same counterpoint.

pub mod compose;
pub mod config;
pub mod counterpoint;
pub mod error;
pub mod events;
pub mod midi;
pub mod pitch;
pub mod scale;
pub mod tune;

pub use error::{Error, Result};
