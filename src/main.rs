//! Stair Timeline CLI - Play a walkthrough headlessly from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use stair_timeline::{
    Engine,
    render::TextSurface,
    schema::{EngineConfig, JsonFilePreferences, validate_stairs},
};

/// Simulated display refresh interval (60 fps).
const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [stairs] [--prefs <prefs.json>]", args[0]);
        eprintln!();
        eprintln!("Play a climbing-stairs walkthrough from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to engine configuration file");
        eprintln!("  stairs       Override the number of stairs (1-45)");
        eprintln!("  --prefs      Preference file remembering the playback speed");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let mut config: EngineConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    let mut prefs_path = None;
    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        if arg == "--prefs" {
            prefs_path = rest.next().map(PathBuf::from);
        } else {
            config.stairs = validate_stairs(arg).unwrap_or_else(|e| {
                eprintln!("Invalid stair count: {}", e);
                std::process::exit(1);
            });
        }
    }

    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }

    println!("Stair Timeline");
    println!("==============");
    println!("Algorithm: {}", config.algorithm);
    println!("Stairs: {}", config.stairs);
    println!("Step duration: {:.0}ms", config.initial_step_ms());
    println!();

    let mut engine = match prefs_path {
        Some(path) => Engine::with_preferences(config, Box::new(JsonFilePreferences::new(path))),
        None => Engine::new(config),
    };
    let total_steps = engine.state().total_steps();
    println!(
        "Timeline: {} steps at speed {}",
        total_steps,
        engine.state().playback_speed()
    );
    println!();

    let mut surface = TextSurface::new(io::stdout().lock());
    let start = Instant::now();
    let mut now = 0.0;
    let mut frames = 0u64;

    engine.play_pause();
    loop {
        engine.tick(now);
        if let Err(e) = engine.render(&mut surface) {
            eprintln!("Error writing output: {}", e);
            std::process::exit(1);
        }
        frames += 1;
        if !engine.state().is_playing() && engine.is_idle() {
            break;
        }
        now += FRAME_MS;
    }
    drop(surface);

    println!();
    println!("Result: {}", engine.result());
    println!(
        "Simulated {:.1}s in {} frames ({:.2}ms wall clock)",
        now / 1000.0,
        frames,
        start.elapsed().as_secs_f64() * 1000.0
    );
}

fn print_example_config() {
    let config = EngineConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing config: {e}"),
    }
}
