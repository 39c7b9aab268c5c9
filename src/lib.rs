//! Rectregion: rectangle regions for image labeling.
//!
//! Rectregion models the rectangles an annotator draws on an image: their
//! geometry in pixel or percentage space, the label and rating states
//! attached to them, selection and highlight, and their export as
//! resolution-independent annotation records.
//!
//! # Modules
//!
//! - [`region`]: Region model (geometry, attachments, sessions, export)
//! - [`validation`]: Session validation and error reporting
//! - [`error`]: Error types for rectregion operations

pub mod error;
pub mod region;
pub mod validation;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;

pub use error::RegionError;

use region::export::to_records_string;
use region::io_json::{read_session, to_session_string, write_session, SessionFormat};
use region::io_results::{image_from_records, read_records};
use region::{ImageIndex, Session};

/// The rectregion CLI application.
#[derive(Parser)]
#[command(name = "rectregion")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Session file format ('json' or 'yaml'); detected from the extension if omitted.
    #[arg(long, global = true, env = "RECTREGION_FORMAT")]
    format: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Export every region of a session as annotation records.
    Export(ExportArgs),
    /// Validate a session for errors and warnings.
    Validate(ValidateArgs),
    /// Apply a new image size to every region of a session.
    Resize(ResizeArgs),
    /// Print the topmost region containing a point.
    Hit(HitArgs),
    /// Build a session from exported annotation records.
    Import(ImportArgs),
}

/// Arguments for the export subcommand.
#[derive(clap::Args)]
struct ExportArgs {
    /// Session file to export.
    input: PathBuf,

    /// Override the stored stage width of every image.
    #[arg(long, requires = "stage_height")]
    stage_width: Option<f64>,

    /// Override the stored stage height of every image.
    #[arg(long, requires = "stage_width")]
    stage_height: Option<f64>,

    /// Write records to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Session file to validate.
    input: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the resize subcommand.
#[derive(clap::Args)]
struct ResizeArgs {
    /// Session file to resize.
    input: PathBuf,

    /// New rendered width.
    #[arg(long)]
    display_width: f64,

    /// New rendered height.
    #[arg(long)]
    display_height: f64,

    /// Natural width; defaults to each image's stored natural width.
    #[arg(long)]
    natural_width: Option<f64>,

    /// Natural height; defaults to each image's stored natural height.
    #[arg(long)]
    natural_height: Option<f64>,

    /// Write the session here instead of overwriting the input.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Arguments for the hit subcommand.
#[derive(clap::Args)]
struct HitArgs {
    /// Session file to query.
    input: PathBuf,

    /// Image index within the session.
    #[arg(long, default_value_t = 0)]
    image: usize,

    /// Point x in stage pixels.
    #[arg(long, allow_hyphen_values = true)]
    x: f64,

    /// Point y in stage pixels.
    #[arg(long, allow_hyphen_values = true)]
    y: f64,
}

/// Arguments for the import subcommand.
#[derive(clap::Args)]
struct ImportArgs {
    /// Export records file (a record, an array, or an array of per-region exports).
    input: PathBuf,

    /// Name of the image tag the records point at.
    #[arg(long, default_value = "image")]
    image_name: String,

    /// Natural image width.
    #[arg(long)]
    natural_width: f64,

    /// Natural image height.
    #[arg(long)]
    natural_height: f64,

    /// Rendered width; resolves percentage geometry to pixels when given.
    #[arg(long, requires = "stage_height")]
    stage_width: Option<f64>,

    /// Rendered height.
    #[arg(long, requires = "stage_width")]
    stage_height: Option<f64>,

    /// Write the session to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Run the rectregion CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), RegionError> {
    let cli = Cli::parse();
    let format = cli.format.as_deref();

    match cli.command {
        Some(Commands::Export(args)) => run_export(args, format),
        Some(Commands::Validate(args)) => run_validate(args, format),
        Some(Commands::Resize(args)) => run_resize(args, format),
        Some(Commands::Hit(args)) => run_hit(args, format),
        Some(Commands::Import(args)) => run_import(args, format),
        None => {
            // No subcommand: just print help hint and exit successfully
            println!("rectregion {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Rectangle regions for image labeling.");
            println!();
            println!("Run 'rectregion --help' for usage information.");
            Ok(())
        }
    }
}

fn session_format(format: Option<&str>, path: &Path) -> Result<SessionFormat, RegionError> {
    match format {
        Some(name) => SessionFormat::parse(name),
        None => Ok(SessionFormat::from_path(path)),
    }
}

fn load_session(path: &Path, format: Option<&str>) -> Result<Session, RegionError> {
    let format = session_format(format, path)?;
    let session = read_session(path, format)?;
    info!(
        "loaded session from {} ({} image(s))",
        path.display(),
        session.images().len()
    );
    Ok(session)
}

/// Writes `text` to `path`, or to stdout when no path is given.
fn emit(text: &str, path: Option<&Path>) -> Result<(), RegionError> {
    match path {
        Some(path) => std::fs::write(path, text).map_err(RegionError::Io),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

/// Execute the export subcommand.
fn run_export(args: ExportArgs, format: Option<&str>) -> Result<(), RegionError> {
    let mut session = load_session(&args.input, format)?;

    if let (Some(width), Some(height)) = (args.stage_width, args.stage_height) {
        for index in 0..session.images().len() {
            let image = session.image_mut(ImageIndex(index))?;
            image.stage_width = width;
            image.stage_height = height;
        }
    }

    let records = session.export_all()?;
    info!("exported {} record(s)", records.len());
    emit(&to_records_string(&records)?, args.output.as_deref())
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs, format: Option<&str>) -> Result<(), RegionError> {
    let session = load_session(&args.input, format)?;

    let opts = validation::ValidateOptions {
        strict: args.strict,
    };
    let report = validation::validate_session(&session, &opts);

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report).map_err(RegionError::ReportWrite)?;
            println!("{}", json);
        }
        _ => {
            // Default text output
            print!("{}", report);
        }
    }

    // Determine exit status
    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(RegionError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

/// Execute the resize subcommand.
fn run_resize(args: ResizeArgs, format: Option<&str>) -> Result<(), RegionError> {
    let output_format = session_format(format, args.output.as_deref().unwrap_or(args.input.as_path()))?;
    let mut session = load_session(&args.input, format)?;

    for index in 0..session.images().len() {
        let image = session.image_mut(ImageIndex(index))?;
        let natural_width = args.natural_width.unwrap_or(image.natural_width);
        let natural_height = args.natural_height.unwrap_or(image.natural_height);
        image.resize(
            natural_width,
            natural_height,
            args.display_width,
            args.display_height,
        )?;
    }

    let path = args.output.as_deref().unwrap_or(args.input.as_path());
    write_session(path, &session, output_format)?;
    info!("wrote resized session to {}", path.display());
    Ok(())
}

/// Execute the hit subcommand.
fn run_hit(args: HitArgs, format: Option<&str>) -> Result<(), RegionError> {
    let session = load_session(&args.input, format)?;
    let image = session.image(ImageIndex(args.image))?;

    match image.region_at(args.x, args.y) {
        Some(region) => println!("{}", region.id()),
        None => println!("No region at ({}, {})", args.x, args.y),
    }
    Ok(())
}

/// Execute the import subcommand.
fn run_import(args: ImportArgs, format: Option<&str>) -> Result<(), RegionError> {
    let records = read_records(&args.input)?;
    let mut image = image_from_records(
        args.image_name,
        args.natural_width,
        args.natural_height,
        &records,
    )?;

    if let (Some(width), Some(height)) = (args.stage_width, args.stage_height) {
        image.resize(args.natural_width, args.natural_height, width, height)?;
    }
    info!(
        "imported {} region(s) from {} record(s)",
        image.regions().len(),
        records.len()
    );

    let session = Session::from_images(vec![image]);
    match args.output {
        Some(path) => write_session(&path, &session, session_format(format, &path)?),
        None => emit(&to_session_string(&session)?, None),
    }
}
