// certgen: batch generation of one certificate per spreadsheet row

use crate::config::OUTPUT_DIR_NAME;
use crate::dataset::NameDataset;
use crate::error::CertError;
use crate::font::LoadedFont;
use crate::pdf::write_pdf;
use crate::render::{render_centered_text, CenterPoint};
use ::image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ============================================================================
// Data Structures
// ============================================================================

/// How each name is drawn
pub struct RenderSettings<'a> {
    pub center: CenterPoint,
    pub font: &'a LoadedFont,
    pub color: Rgb<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Log and skip rows that fail instead of aborting the batch
    pub keep_going: bool,
}

/// A row that could not be written in keep-going mode
#[derive(Debug)]
pub struct RowFailure {
    /// 1-based sheet row number
    pub row: usize,
    pub name: String,
    pub error: CertError,
}

#[derive(Debug)]
pub struct GenerationSummary {
    pub output_dir: PathBuf,
    pub written: usize,
    pub skipped: usize,
    pub failed: Vec<RowFailure>,
}

// ============================================================================
// Generation
// ============================================================================

/// Render every non-empty name onto a copy of `template` and save it as
/// `<name>.pdf` in `output_dir`, which is created when missing.
pub fn generate(
    dataset: &NameDataset,
    name_column: &str,
    template: &RgbImage,
    settings: &RenderSettings<'_>,
    output_dir: &Path,
    options: &GenerateOptions,
) -> Result<GenerationSummary, CertError> {
    if dataset.column_index(name_column).is_none() {
        return Err(CertError::NoSuitableColumn);
    }

    fs::create_dir_all(output_dir)?;

    let mut summary = GenerationSummary {
        output_dir: output_dir.to_path_buf(),
        written: 0,
        skipped: 0,
        failed: Vec::new(),
    };

    for index in 0..dataset.len() {
        let row = dataset.row_number(index);
        let name = dataset.name_at(index, name_column);
        if name.is_empty() {
            debug!("Row {}: empty name, skipped", row);
            summary.skipped += 1;
            continue;
        }

        match write_certificate(template, &name, settings, output_dir) {
            Ok(path) => {
                debug!("Row {}: wrote {}", row, path.display());
                summary.written += 1;
            }
            Err(error) if options.keep_going => {
                warn!("Row {} ({}): {}", row, name, error);
                summary.failed.push(RowFailure { row, name, error });
            }
            Err(error) => {
                return Err(CertError::Row {
                    row,
                    name,
                    source: Box::new(error),
                });
            }
        }
    }

    info!(
        "Generated {} certificate(s) in {} ({} empty, {} failed)",
        summary.written,
        output_dir.display(),
        summary.skipped,
        summary.failed.len()
    );

    Ok(summary)
}

fn write_certificate(
    template: &RgbImage,
    name: &str,
    settings: &RenderSettings<'_>,
    output_dir: &Path,
) -> Result<PathBuf, CertError> {
    let image = render_centered_text(template, name, settings.center, settings.font, settings.color);
    let path = output_dir.join(format!("{}.pdf", output_file_stem(name)));
    write_pdf(&image, &path, name)?;
    Ok(path)
}

// ============================================================================
// Output Paths
// ============================================================================

/// `<directory of the spreadsheet>/certificates`
pub fn output_dir_for(spreadsheet: &Path) -> PathBuf {
    spreadsheet
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(OUTPUT_DIR_NAME)
}

/// File stem for a recipient: path separators, reserved characters and
/// control characters become `_`.
pub fn output_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if stem.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        stem
    }
}
