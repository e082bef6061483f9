// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::process;

use anyhow::Result;

use versegen::config::{PromptsFile, StructureFile};
use versegen::generator::SongGenerator;
use versegen::prompt::{PromptEngine, ScriptedBackend};
use versegen::song::Song;

const DEFAULT_STRUCTURE_FILE: &str = "song_structure.yaml";
const DEFAULT_PROMPTS_FILE: &str = "prompts.yaml";
const DEFAULT_STYLE: &str = "pop_song";

// Canned backend replies for the offline demo pipeline.
const DEMO_NAMES: &str = r#"{"name1": "Dancing At The Beach", "name2": "Glass Tide", "name3": "Paper Moons", "name4": "Low Orbit", "name5": "Salt And Smoke"}"#;
const DEMO_THEME: &str = r#"{"description": "A song about dancing at night time at the beach.", "narrative1": "The bonfire burns low while the tide creeps in.", "narrative2": "Two friends keep dancing long after the music stops.", "mood": "Warm, nostalgic, a little wild."}"#;
const DEMO_SONG: &str = r#"{"verse1": "Kick off your shoes where the dry sand ends\nThe radio crackles, the night descends", "verse2": "The bonfire's down to a single spark\nWe trace our names in the tide-line dark", "prechorus": "And the water's coming closer now\nBut nobody's counting waves", "chorus": "We're dancing at the beach tonight\nSalt in our hair and the moon for light", "bridge": "When the speakers die we hum the tune\nBarefoot orchestra under the moon", "outro": "The tide takes the floor, we take the dawn\nThe song in our heads keeps dancing on"}"#;

fn print_usage() {
    println!("VERSEGEN - Staged Song Lyrics Generator");
    println!();
    println!("Usage: versegen [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --list-styles [FILE]    List song styles in the structure file");
    println!("  --validate              Load and validate both configuration files");
    println!("  --show <FILE> [STYLE]   Print a saved song with assembled lyrics");
    println!("  --demo [STYLE]          Run the full pipeline against canned responses");
    println!("  --help                  Show this help message");
}

fn list_styles(file: &str) -> Result<()> {
    let structures = StructureFile::load(file)?;
    for style in structures.styles() {
        println!("{}", style);
    }
    Ok(())
}

fn validate() -> Result<()> {
    StructureFile::load(DEFAULT_STRUCTURE_FILE)?;
    PromptsFile::load(DEFAULT_PROMPTS_FILE)?;
    println!("Configuration OK");
    Ok(())
}

fn show_song(file: &str, style: &str) -> Result<()> {
    let structures = StructureFile::load(DEFAULT_STRUCTURE_FILE)?;
    let mut song = Song::new(structures.structure(style)?);
    song.load_from(file)?;

    println!("-------- SONG NAME --------");
    println!("{}", song.name());
    println!();
    println!("-------- SONG THEME --------");
    println!("{}", song.theme());
    println!();
    if song.has_lyrics() {
        println!("-------- SONG LYRICS --------");
        println!("{}", song.export()?);
    } else {
        println!("(no lyrics generated yet)");
    }
    Ok(())
}

fn run_demo(style: &str) -> Result<()> {
    let structures = StructureFile::load(DEFAULT_STRUCTURE_FILE)?;
    let prompts = PromptsFile::load(DEFAULT_PROMPTS_FILE)?;
    let backend = ScriptedBackend::new([DEMO_NAMES, DEMO_THEME, DEMO_SONG]);
    let engine = PromptEngine::new(prompts, Box::new(backend));
    let mut generator = SongGenerator::new(engine, structures.structure(style)?);

    let name = generator.set_random_song_name()?;
    println!("-------- SONG NAME --------");
    println!("{}", name);
    println!();

    let theme = generator.set_random_song_theme()?;
    println!("-------- SONG THEME --------");
    println!("{}", theme);
    println!();

    generator.generate_lyrics()?;
    println!("-------- SONG LYRICS --------");
    println!("{}", generator.export()?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("VERSEGEN - Staged Song Lyrics Generator");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "--list-styles" => {
            let file = args
                .get(2)
                .map(String::as_str)
                .unwrap_or(DEFAULT_STRUCTURE_FILE);
            list_styles(file)?;
        }
        "--validate" => {
            validate()?;
        }
        "--show" => {
            if args.len() < 3 {
                eprintln!("Error: --show requires a song file");
                process::exit(1);
            }
            let style = args.get(3).map(String::as_str).unwrap_or(DEFAULT_STYLE);
            show_song(&args[2], style)?;
        }
        "--demo" => {
            let style = args.get(2).map(String::as_str).unwrap_or(DEFAULT_STYLE);
            run_demo(style)?;
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            process::exit(1);
        }
    }

    Ok(())
}
