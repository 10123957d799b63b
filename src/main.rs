// certgen: Generate personalized certificates from a spreadsheet of names

use ::image::Rgb;
use certgen::config::{FontChoice, DEFAULT_FONT_SIZE, GOLDEN, MAX_FONT_SIZE, MIN_FONT_SIZE};
use certgen::font::{FontSource, FontSpec};
use certgen::pdf::write_png;
use certgen::pipeline::GenerateOptions;
use certgen::render::{parse_hex_color, CenterPoint};
use certgen::session::RenderRequest;
use certgen::{CertError, Session};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Data Structures
// ============================================================================

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate certificate PDFs from a spreadsheet of names")]
struct Args {
    /// Spreadsheet with a header row (xlsx, xlsm, xlsb, xls, ods)
    #[arg(short, long)]
    spreadsheet: PathBuf,

    /// Template image (png, jpg, ...)
    #[arg(short, long)]
    template: PathBuf,

    /// Horizontal center of the name in pixels (defaults to the template center)
    #[arg(short, value_parser = clap::value_parser!(i32).range(0..))]
    x: Option<i32>,

    /// Vertical center of the name in pixels (defaults to the template center)
    #[arg(short, value_parser = clap::value_parser!(i32).range(0..))]
    y: Option<i32>,

    /// Font family
    #[arg(short, long, value_enum, default_value_t = FontChoice::default())]
    font: FontChoice,

    /// Font file to use instead of a font family
    #[arg(long)]
    font_file: Option<PathBuf>,

    /// Font size in pixels
    #[arg(
        long,
        default_value_t = DEFAULT_FONT_SIZE,
        value_parser = clap::value_parser!(u32).range(MIN_FONT_SIZE as i64..=MAX_FONT_SIZE as i64)
    )]
    size: u32,

    /// Text color as #RRGGBB (defaults to gold)
    #[arg(long)]
    color: Option<String>,

    /// Output directory (defaults to "certificates" next to the spreadsheet)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Write a PNG preview of the first name instead of generating PDFs
    #[arg(long, value_name = "PNG")]
    preview: Option<PathBuf>,

    /// Skip rows that fail instead of stopping at the first one
    #[arg(long)]
    keep_going: bool,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "certgen=info".into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CertError> {
    let args = Args::parse();

    let color = match &args.color {
        Some(c) => parse_hex_color(c)?,
        None => Rgb(GOLDEN),
    };

    let source = match args.font_file {
        Some(path) => FontSource::File(path),
        None => FontSource::Choice(args.font),
    };

    let mut session = Session::new();
    session.load_dataset(&args.spreadsheet)?;
    session.load_template(&args.template)?;

    let center = session.default_center().map(|default| {
        CenterPoint::new(
            args.x.unwrap_or(default.x),
            args.y.unwrap_or(default.y),
        )
    });

    let request = RenderRequest {
        center,
        font: FontSpec::new(source, args.size),
        color,
        output_dir: args.output_dir,
        options: GenerateOptions {
            keep_going: args.keep_going,
        },
    };

    if let Some(preview_path) = &args.preview {
        let image = session.preview(&request)?;
        write_png(&image, preview_path)?;
        println!("✓ Preview: {}", preview_path.display());
        println!("  Text: {}", session.preview_text());
        return Ok(());
    }

    let summary = session.generate(&request)?;

    println!("✓ Generated {} PDF(s) in {}", summary.written, summary.output_dir.display());
    if summary.skipped > 0 {
        println!("  Skipped {} row(s) with an empty name", summary.skipped);
    }
    for failure in &summary.failed {
        println!("  Failed row {} ({}): {}", failure.row, failure.name, failure.error);
    }

    Ok(())
}
