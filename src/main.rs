//! # Butterfly-encode CLI
//!
//! Command-line interface for the butterfly-encode library.
//! Turns JSON-lines OSM ways into walking/hiking edge flags.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use butterfly_encode::{
    ElevationProvider, EncodedValues, FootEncoder, FootProfile, ProfileConfig, ProfileKind,
    ProfileOptions, SrtmProvider,
};
use clap::{Parser, Subcommand};
use log::{error, info};
use rayon::prelude::*;

mod cli;

/// Command-line interface for butterfly-encode
#[derive(Parser)]
#[command(name = "butterfly-encode")]
#[command(about = "Derives walking and hiking edge flags from OpenStreetMap way tags")]
#[command(long_about = "Reads one JSON way per line and prints one JSON result per line:
  butterfly-encode encode ways.jsonl                          # foot profile
  butterfly-encode encode ways.jsonl --profile hike            # hiking, slope-corrected speeds
  butterfly-encode encode - --profile 'foot|block_fords=true'  # read stdin, custom options
  butterfly-encode profiles                                    # list profiles and options

Input line:  {\"id\":1,\"tags\":{\"highway\":\"path\"},\"geometry\":[[47.0,11.0,1200.0],[47.001,11.0,1215.0]],\"network\":\"regional\"}
Output line: {\"id\":1,\"access\":\"way\",\"speed\":3.0,\"priority\":\"very_nice\",\"corrected\":true,\"flags\":[...]}")]
#[command(version = env!("BUTTERFLY_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode ways from a JSON-lines file
    Encode {
        /// Input file, or "-" for stdin
        input: String,

        /// Profile: "foot", "hike", "hike|block_fords=true" or a JSON object
        #[arg(short, long, default_value = "foot")]
        profile: String,

        /// Directory with SRTM .hgt tiles used to add elevation to 2D geometry
        #[arg(long)]
        srtm_dir: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List available profiles and their options
    Profiles,
}

fn main() {
    if let Err(e) = run() {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    if cli.verbose {
        eprintln!("🦋 Butterfly-encode v{} starting...", env!("BUTTERFLY_VERSION"));
    }

    match cli.command {
        Commands::Encode {
            input,
            profile,
            srtm_dir,
            output,
        } => encode(&input, &profile, srtm_dir, output, cli.verbose),
        Commands::Profiles => list_profiles(),
    }
}

fn open_input(input: &str) -> Result<Box<dyn BufRead>> {
    if input == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(input).with_context(|| format!("Failed to open input {input}"))?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(output: Option<PathBuf>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create output {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn encode(
    input: &str,
    profile: &str,
    srtm_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let config: ProfileConfig = profile.parse()?;
    let mut registry = EncodedValues::new();
    let encoder = FootEncoder::new(FootProfile::from_config(&config)?, &mut registry)?;

    let srtm = srtm_dir.map(SrtmProvider::new);
    if let Some(provider) = &srtm {
        info!("Reading elevation tiles from {}", provider.cache_dir().display());
    }
    let elevation = srtm.as_ref().map(|p| p as &dyn ElevationProvider);

    let records = cli::read_records(open_input(input)?)?;
    info!("Encoding {} ways with profile '{}'", records.len(), encoder.name());

    let results = records
        .par_iter()
        .map(|record| cli::encode_record(&encoder, &registry, elevation, record))
        .collect::<Result<Vec<_>>>()?;

    let mut out = open_output(output)?;
    for result in &results {
        serde_json::to_writer(&mut out, result)?;
        writeln!(out)?;
    }
    out.flush()?;

    let summary = cli::Summary::from_results(&results);
    if verbose {
        eprintln!(
            "✅ Encoded {} ways: {} skipped, {} ferries, {} slope-corrected",
            summary.ways, summary.skipped, summary.ferries, summary.corrected
        );
    }
    Ok(())
}

fn list_profiles() -> Result<()> {
    let defaults = ProfileOptions::default();
    for kind in ProfileKind::ALL {
        let profile = FootProfile::new(kind, &defaults)?;
        println!(
            "{kind}: max speed {} km/h, elevation correction {}",
            profile.max_speed,
            if profile.elevation_correction { "on" } else { "off" }
        );
    }
    println!();
    println!("Options (profile|key=value|...):");
    println!("  name                  field prefix (default: profile name)");
    println!("  speed_bits            {}", defaults.speed_bits);
    println!("  speed_factor          {}", defaults.speed_factor);
    println!("  speed_two_directions  {}", defaults.speed_two_directions);
    println!("  block_private         {}", defaults.block_private);
    println!("  block_fords           {}", defaults.block_fords);
    Ok(())
}
