//! riffnav Command Line Interface

#![deny(missing_docs)]

use std::fmt::Write as _;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{crate_version, ArgAction, Parser, Subcommand};
use riffnav::{FourCC, Navigator};
use tracing::instrument;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, about, long_about = None,
    disable_help_flag = true,
    disable_version_flag = true,
    next_help_heading = "Global Options",
    version = crate_version!())]
struct RiffnavArgs {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity; repeatable (-v, -vv, -vvv)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[arg(long, short, global = true, action = ArgAction::Help, help = "Print help")]
    help: (),

    #[arg(long, short = 'V', action = ArgAction::Version, help = "Print version")]
    version: (),
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    View(ViewConfig),
    Validate(ValidateConfig),
    Count(CountConfig),
}

/// Print the chunk tree of one or more RIFF/BW64 files
#[derive(Parser, Debug)]
#[command(long_about = None)]
struct ViewConfig {
    /// One or more paths to RIFF/BW64 files
    path: Vec<PathBuf>,
}

/// Walk every chunk in a file, reporting the first structural error found
#[derive(Parser, Debug)]
#[command(long_about = None)]
struct ValidateConfig {
    /// One or more paths to RIFF/BW64 files
    path: Vec<PathBuf>,
}

/// Count chunks in the file's outer level, optionally filtered by id
#[derive(Parser, Debug)]
#[command(long_about = None)]
struct CountConfig {
    /// Path to a RIFF/BW64 file
    path: PathBuf,

    /// Only count chunks with this four-character id, e.g. "data"
    #[arg(long, short)]
    id: Option<String>,
}

fn open(path: &PathBuf) -> Result<Navigator<riffnav::FileSource<BufReader<File>>>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let size = file.metadata()?.len();
    Navigator::open_file(BufReader::new(file), size)
        .with_context(|| format!("parsing {}", path.display()))
}

#[instrument]
fn view(config: &ViewConfig) -> Result<()> {
    for path in &config.path {
        println!("{}:", path.display());
        let mut nav = open(path)?;
        print!("{}", view_tree(&mut nav)?);
    }
    Ok(())
}

fn view_tree<S: riffnav::ByteSource>(nav: &mut Navigator<S>) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{:>8} {:9} {:>10} depth", "offset", "id", "size")?;
    print_level(nav, &mut out, 0)?;
    Ok(out)
}

fn print_level<S: riffnav::ByteSource>(
    nav: &mut Navigator<S>,
    out: &mut String,
    depth: usize,
) -> Result<()> {
    loop {
        writeln!(
            out,
            "{:>8} {:9} {:>10} {}",
            nav.chunk_pos(),
            nav.chunk_id(),
            nav.chunk_size(),
            depth
        )?;
        if is_list(nav.chunk_id()) {
            nav.seek_level_sub()?;
            print_level(nav, out, depth + 1)?;
            nav.level_parent()?;
        }
        match nav.seek_next_chunk() {
            Ok(()) => continue,
            Err(err) if !err.is_critical() => return Ok(()),
            Err(err) => return Err(err.into()),
        }
    }
}

fn is_list(id: FourCC) -> bool {
    id.matches(b"RIFF") || id.matches(b"LIST") || id.matches(b"BW64")
}

#[instrument]
fn validate(config: &ValidateConfig) -> Result<()> {
    for path in &config.path {
        let mut nav = open(path)?;
        match nav.file_validate() {
            Ok(()) => println!("{}: ok", path.display()),
            Err(err) => println!("{}: {err}", path.display()),
        }
    }
    Ok(())
}

#[instrument]
fn count(config: &CountConfig) -> Result<()> {
    let mut nav = open(&config.path)?;
    let count = match &config.id {
        Some(id) => {
            let bytes = id.as_bytes();
            anyhow::ensure!(bytes.len() == 4, "--id must be exactly four characters");
            let mut id = [0u8; 4];
            id.copy_from_slice(bytes);
            nav.count_chunks_in_level_with_id(FourCC(id))
        }
        None => nav.count_chunks_in_level(),
    };
    anyhow::ensure!(count >= 0, "counting failed before reaching the end of the level");
    println!("{count}");
    Ok(())
}

#[instrument]
fn main() -> Result<()> {
    let args = RiffnavArgs::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(args.verbose))
        .with_span_events(FmtSpan::NONE)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    match &args.command {
        Commands::View(config) => view(config),
        Commands::Validate(config) => validate(config),
        Commands::Count(config) => count(config),
    }
}

#[test]
fn verify_args() {
    use clap::CommandFactory;
    RiffnavArgs::command().debug_assert();
}
