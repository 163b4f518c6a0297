//! rwscene CLI
//!
//! Command-line interface for game version detection, archive listing and
//! extraction, and full scene loading.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use rwscene_parsers::{unpack, GameVersion, ImgArchive, TxdArchive};
use rwscene_scene::{RawDffSource, SceneLoader};

/// rwscene - asset extraction and scene loading for RenderWare-era titles
#[derive(Parser)]
#[command(name = "rwscene")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format for structured data
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the game version of an install directory
    Detect(DetectArgs),

    /// List contents of an IMG or TXD archive
    List(ListArgs),

    /// Unpack one IMG or TXD archive
    Unpack(UnpackArgs),

    /// Unpack every archive under a directory tree
    UnpackAll(UnpackAllArgs),

    /// Load the full scene from an install directory
    Load(LoadArgs),
}

#[derive(Args)]
struct DetectArgs {
    /// Game install root
    root: PathBuf,
}

#[derive(Args)]
struct ListArgs {
    /// Path to the archive (.img or .txd)
    archive: PathBuf,

    /// Game version the archive belongs to
    #[arg(short = 'g', long, value_parser = parse_game_version, default_value = "gta3")]
    game: GameVersion,
}

#[derive(Args)]
struct UnpackArgs {
    /// Path to the archive (.img or .txd)
    archive: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Game version the archive belongs to
    #[arg(short = 'g', long, value_parser = parse_game_version, default_value = "gta3")]
    game: GameVersion,
}

#[derive(Args)]
struct UnpackAllArgs {
    /// Directory to scan for .img and .txd archives
    dir: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Game version the archives belong to
    #[arg(short = 'g', long, value_parser = parse_game_version, default_value = "gta3")]
    game: GameVersion,
}

#[derive(Args)]
struct LoadArgs {
    /// Game install root
    root: PathBuf,

    /// Directory holding .dff model payloads, relative to the root
    #[arg(long, default_value = "models")]
    models_dir: PathBuf,
}

fn parse_game_version(s: &str) -> Result<GameVersion, String> {
    match s.to_lowercase().as_str() {
        "gta3" | "iii" | "3" => Ok(GameVersion::Gta3),
        "vc" | "vice-city" | "vicecity" => Ok(GameVersion::ViceCity),
        "sa" | "san-andreas" | "sanandreas" => Ok(GameVersion::SanAndreas),
        _ => Err(format!("Unknown game version: {}", s)),
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_file(verbosity >= 3)
        .with_line_number(verbosity >= 3)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Detect(args) => cmd_detect(args, cli.format),
        Commands::List(args) => cmd_list(args, cli.format),
        Commands::Unpack(args) => cmd_unpack(args, cli.format),
        Commands::UnpackAll(args) => cmd_unpack_all(args, cli.format),
        Commands::Load(args) => cmd_load(args, cli.format),
    }
}

fn cmd_detect(args: DetectArgs, format: OutputFormat) -> Result<()> {
    let version = GameVersion::detect(&args.root).context("Failed to detect game version")?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "root": args.root,
                "version": version,
                "manifest": version.manifest_path(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("Detected: {}", version);
            println!("Manifest: {}", version.manifest_path());
        }
    }

    Ok(())
}

fn cmd_list(args: ListArgs, format: OutputFormat) -> Result<()> {
    let entries = match extension_of(&args.archive).as_deref() {
        Some("txd") => TxdArchive::open(&args.archive)
            .context("Failed to parse TXD archive")?
            .entries(),
        _ => ImgArchive::open(&args.archive, args.game)
            .context("Failed to parse IMG archive")?
            .entries()
            .to_vec(),
    };

    match format {
        OutputFormat::Json => {
            let json: Vec<_> = entries
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "name": e.name,
                        "offset": e.offset,
                        "size": e.size,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("{:<12} {:<12} {}", "Offset", "Size", "Name");
            for entry in &entries {
                println!(
                    "{:<12} {:<12} {}",
                    entry.offset,
                    format_size(entry.size as u64),
                    entry.name
                );
            }
            println!("\nTotal: {} entries", entries.len());
        }
    }

    Ok(())
}

fn cmd_unpack(args: UnpackArgs, format: OutputFormat) -> Result<()> {
    std::fs::create_dir_all(&args.output).context("Failed to create output directory")?;

    let report = match extension_of(&args.archive).as_deref() {
        Some("txd") => unpack::unpack_txd(&args.archive, &args.output),
        _ => unpack::unpack_img(&args.archive, args.game, &args.output),
    }
    .context("Failed to unpack archive")?;

    print_report(&report, format)
}

fn cmd_unpack_all(args: UnpackAllArgs, format: OutputFormat) -> Result<()> {
    std::fs::create_dir_all(&args.output).context("Failed to create output directory")?;

    let report = unpack::unpack_directory(&args.dir, args.game, &args.output)
        .context("Failed to unpack directory")?;

    print_report(&report, format)
}

fn cmd_load(args: LoadArgs, format: OutputFormat) -> Result<()> {
    let mut source = RawDffSource::new(args.root.join(&args.models_dir));
    let loader = SceneLoader::new(&args.root);
    let (scene, stats) = loader.load(&mut source).context("Scene load failed")?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "objects": scene.len(),
                "stats": stats,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("Scene loaded:");
            println!("  Objects placed:     {}", stats.objects_placed);
            println!("  Models loaded:      {}", stats.models_loaded);
            println!("  Missed definitions: {}", stats.missed_definitions);
            println!("  Missed textures:    {}", stats.missed_textures);
            println!("  Memory used:        {}", format_size(stats.total_memory() as u64));
        }
    }

    Ok(())
}

fn print_report(report: &rwscene_parsers::UnpackReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Text => {
            println!("Extraction complete:");
            println!("  Extracted:       {}", report.extracted);
            println!("  Skipped:         {}", report.skipped);
            println!("  Failed archives: {}", report.failed_archives);
        }
    }
    Ok(())
}

fn extension_of(path: &std::path::Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
