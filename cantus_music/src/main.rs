// Cantus Music: CLI entry point.
//
// Generates a counterpoint line against a cantus firmus and writes both
// lines to MIDI. The pipeline: config → scale → cantus firmus → counterpoint
// search → event tracks → MIDI output.
//
// Usage:
//   cargo run -p cantus_music -- [output.mid] [--config PATH] [--root NOTE]
//     [--scale TYPE] [--tempo BPM] [--max-attempts N]
//
// Scale types: chromatic, major, minor, dorian, phrygian, lydian,
// mixolydian, aeolian, ionian. Set RUST_LOG=debug to trace the search.

use cantus_music::compose::compose;
use cantus_music::config::GenerationConfig;
use cantus_music::error::{Error, Result};
use cantus_music::midi::write_midi;
use cantus_music::pitch::Pitch;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let output_path = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or("counterpoint.mid");

    let mut config = match parse_flag::<String>(args, "--config")? {
        Some(path) => GenerationConfig::load(Path::new(&path))?,
        None => GenerationConfig::default(),
    };
    if let Some(root) = parse_flag(args, "--root")? {
        config.scale.root = root;
    }
    if let Some(scale_type) = parse_flag(args, "--scale")? {
        config.scale.scale_type = scale_type;
    }
    if let Some(tempo) = parse_flag(args, "--tempo")? {
        config.tempo_bpm = tempo;
    }
    if let Some(attempts) = parse_flag(args, "--max-attempts")? {
        config.max_attempts = attempts;
    }
    config.validate()?;

    println!("=== Cantus Counterpoint Generator ===");
    println!("Output: {output_path}");
    println!("Scale: {} {}", config.scale.root, config.scale.scale_type);
    println!("Tempo: {} BPM", config.tempo_bpm);
    println!("Cantus firmus: {} notes", config.cantus_firmus.len());
    println!();

    println!("[1/2] Generating counterpoint...");
    let composition = compose(&config)?;
    println!("  Scale:        {}", composition.scale);
    println!("  Cantus:       {}", line(&composition.cantus));
    println!("  Counterpoint: {}", line(&composition.counterpoint));

    println!("[2/2] Writing MIDI to {output_path}...");
    write_midi(&composition.tracks, config.tempo_bpm, Path::new(output_path))?;
    println!("  Done! {} tracks.", composition.tracks.len());

    println!();
    println!("Play with: timidity {output_path} (or any MIDI player)");
    Ok(())
}

fn line(pitches: &[Pitch]) -> String {
    pitches
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Result<Option<T>> {
    let Some(i) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    let value = args
        .get(i + 1)
        .ok_or_else(|| Error::Config(format!("{flag} needs a value")))?;
    value
        .parse()
        .map(Some)
        .map_err(|_| Error::Config(format!("invalid value '{value}' for {flag}")))
}
