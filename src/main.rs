//! Command-line interface for spot_match
//!
//! Scans a directory for scene images and reports, for every image, the
//! cards found and the symbol shared by each card pair.

use spot_match::{analyze_scene_file, image_loader, DebugSink, PipelineConfig, SceneAnalysis};
use std::{
    env,
    path::{Path, PathBuf},
    process,
};

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let mut verbose_dir: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut dir_arg: Option<String> = None;

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--verbose" => {
                // Take the next argument as the debug directory unless it
                // has to serve as the scene directory itself.
                let next_is_value = i + 1 < args.len() && !args[i + 1].starts_with("--");
                let next_is_last = i + 1 == args.len() - 1;
                if next_is_value && (dir_arg.is_some() || !next_is_last) {
                    verbose_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    verbose_dir = Some(PathBuf::from("debug"));
                }
            }
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    process::exit(1);
                }
                config_path = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => {
                if dir_arg.is_none() {
                    dir_arg = Some(arg.to_string());
                } else {
                    eprintln!("Error: Multiple directory paths provided");
                    process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    // No directory given: help is a clean exit.
    let dir_str = match dir_arg {
        Some(d) => d,
        None => {
            print_help(&args[0]);
            process::exit(0);
        }
    };

    let dir = Path::new(&dir_str);
    if !dir.is_dir() {
        eprintln!("Error: Provided path '{}' is not found", dir.display());
        process::exit(1);
    }

    let config = match config_path {
        Some(path) => match PipelineConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("Error: {}", error);
                eprintln!("{}", error.user_message());
                process::exit(1);
            }
        },
        None => PipelineConfig::default(),
    };

    let files = match scene_files(dir) {
        Ok(files) => files,
        Err(error) => {
            eprintln!("Error: cannot read '{}': {}", dir.display(), error);
            process::exit(1);
        }
    };
    if files.is_empty() {
        eprintln!("No images found at path '{}'", dir.display());
        print_help(&args[0]);
        process::exit(1);
    }

    let sink = verbose_dir.and_then(|d| match DebugSink::new(&d) {
        Ok(sink) => Some(sink),
        Err(error) => {
            eprintln!("Warning: diagnostics disabled: {}", error);
            None
        }
    });

    for file in &files {
        eprintln!("Open file '{}'", file.display());
        match analyze_scene_file(file, &config, sink.as_ref()) {
            Ok(analysis) => print_analysis(file, &analysis),
            Err(error) => {
                eprintln!("Analysis failed: {}", error);
                eprintln!("{}", error.user_message());
                process::exit(1);
            }
        }
    }

    process::exit(0);
}

/// List supported raster files in the directory, in name order.
fn scene_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(image_loader::is_supported_extension)
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

fn print_analysis(file: &Path, analysis: &SceneAnalysis) {
    // JSON to stdout for programmatic use, summary to stderr for humans.
    match serde_json::to_string_pretty(analysis) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing result: {}", e),
    }

    eprintln!();
    eprintln!("Scene '{}':", file.display());
    if analysis.cards_found == 0 {
        eprintln!("  No cards found");
        return;
    }
    eprintln!("  Cards found: {}", analysis.cards_found);
    for pair in &analysis.pairs {
        match &pair.shared {
            Some(shared) => eprintln!(
                "  Cards {} and {}: shared symbol {} / {} ({} good matches)",
                pair.card_a, pair.card_b, shared.index_a, shared.index_b, shared.good_matches
            ),
            None => eprintln!("  Cards {} and {}: no shared symbol", pair.card_a, pair.card_b),
        }
    }
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <image_data_path>", program_name);
    eprintln!();
    eprintln!("Find the symbol shared between circular playing cards in scene photos.");
    eprintln!();
    eprintln!("  <image_data_path>  Directory containing *.jpg, *.png, *.tif images");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --verbose [DIR]  Save intermediate pipeline images (default dir: debug/)");
    eprintln!("  --config FILE    Load pipeline configuration from a JSON file");
    eprintln!("  --help, -h       Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} ./scenes", program_name);
    eprintln!("  {} --verbose debug_out ./scenes", program_name);
}
