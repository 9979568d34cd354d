//! texconv CLI - convert PBR textures between glTF and native channel layouts
//!
//! Reads a PNG, runs an import (glTF to native) or export (native to glTF)
//! conversion for one texture type, and writes a deterministic PNG.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use texconv::png::{read_image_file, write_image_file, write_image_to_vec_with_hash, PngConfig};
use texconv::{ColorSpace, ConverterConfig, Direction, TextureConverters, TextureSemanticType};

/// texconv - PBR texture channel conversion
#[derive(Parser)]
#[command(name = "texconv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a glTF-layout texture to the native layout
    Import(ConvertArgs),

    /// Convert a native-layout texture to the glTF layout
    Export(ConvertArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// Texture type (color, metallic, normal, occlusion)
    #[arg(short, long)]
    kind: TextureSemanticType,

    /// Input PNG path
    #[arg(short, long)]
    input: PathBuf,

    /// Output PNG path
    #[arg(short, long)]
    output: PathBuf,

    /// Smoothness/roughness factor (overrides the config file)
    #[arg(long)]
    factor: Option<f32>,

    /// Path to a JSON converter config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat the input as sRGB-encoded instead of linear
    #[arg(long)]
    srgb: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(args: &ConvertArgs) -> Result<ConverterConfig> {
    let mut config = match &args.config {
        Some(path) => ConverterConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ConverterConfig::default(),
    };
    if let Some(factor) = args.factor {
        config.smoothness_or_roughness_factor = factor;
    }
    tracing::debug!(?config, "loaded converter config");
    Ok(config)
}

fn run(args: &ConvertArgs, direction: Direction) -> Result<ExitCode> {
    let config = load_config(args)?;
    let converters = TextureConverters::from_config(&config).context("invalid configuration")?;

    let color_space = if args.srgb {
        ColorSpace::Srgb
    } else {
        ColorSpace::Linear
    };
    let source = read_image_file(&args.input, color_space)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let converted = converters
        .convert(&source, args.kind, direction)
        .with_context(|| format!("failed to {} {} texture", direction, args.kind))?;

    let png_config = PngConfig::default();
    write_image_file(&converted, &args.output, &png_config)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    let (_, hash) = write_image_to_vec_with_hash(&converted, &png_config)?;

    print_summary(&args.output, direction, args.kind, &hash);
    Ok(ExitCode::SUCCESS)
}

fn print_summary(output: &Path, direction: Direction, kind: TextureSemanticType, hash: &str) {
    println!(
        "{} {} {} -> {}",
        "ok".green().bold(),
        direction,
        kind,
        output.display()
    );
    println!("  blake3: {}", hash.dimmed());
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Import(args) => run(args, Direction::Import),
        Commands::Export(args) => run(args, Direction::Export),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red(), e);
            ExitCode::from(1)
        }
    }
}
