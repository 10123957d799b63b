// certgen: explicitly held dataset/template state for callers

use crate::config::SAMPLE_NAME;
use crate::dataset::{pick_name_column, NameDataset};
use crate::error::CertError;
use crate::font::FontSpec;
use crate::pipeline::{generate, output_dir_for, GenerateOptions, GenerationSummary, RenderSettings};
use crate::render::{render_centered_text, CenterPoint};
use ::image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A spreadsheet together with the path it came from
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub path: PathBuf,
    pub dataset: NameDataset,
}

/// Everything a render or generation run needs beyond the loaded inputs
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Defaults to the middle of the template
    pub center: Option<CenterPoint>,
    pub font: FontSpec,
    pub color: Rgb<u8>,
    /// Defaults to `<spreadsheet dir>/certificates`
    pub output_dir: Option<PathBuf>,
    pub options: GenerateOptions,
}

/// Currently loaded spreadsheet and template. A failed load keeps whatever
/// was loaded before.
#[derive(Debug, Default)]
pub struct Session {
    dataset: Option<LoadedDataset>,
    template: Option<RgbImage>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset(&self) -> Option<&LoadedDataset> {
        self.dataset.as_ref()
    }

    pub fn template(&self) -> Option<&RgbImage> {
        self.template.as_ref()
    }

    pub fn load_dataset(&mut self, path: &Path) -> Result<&LoadedDataset, CertError> {
        let dataset = NameDataset::load(path)?;

        match pick_name_column(&dataset) {
            Ok(column) => info!(
                "Loaded {} ({} rows), columns: {:?}, using: {}",
                path.display(),
                dataset.len(),
                dataset.columns(),
                column
            ),
            Err(e) => warn!(
                "Loaded {} ({} rows), columns: {:?}: {}",
                path.display(),
                dataset.len(),
                dataset.columns(),
                e
            ),
        }

        Ok(&*self.dataset.insert(LoadedDataset {
            path: path.to_path_buf(),
            dataset,
        }))
    }

    pub fn load_template(&mut self, path: &Path) -> Result<&RgbImage, CertError> {
        let template = load_template(path)?;
        info!(
            "Loaded template {} ({}x{})",
            path.display(),
            template.width(),
            template.height()
        );
        Ok(&*self.template.insert(template))
    }

    /// Middle of the loaded template
    pub fn default_center(&self) -> Option<CenterPoint> {
        self.template.as_ref().map(CenterPoint::of_image)
    }

    /// First row's name, or the sample text when there is none.
    pub fn preview_text(&self) -> String {
        self.dataset
            .as_ref()
            .and_then(|loaded| {
                let column = pick_name_column(&loaded.dataset).ok()?;
                Some(loaded.dataset.name_at(0, &column))
            })
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| SAMPLE_NAME.to_string())
    }

    /// Render the preview text on a copy of the template.
    pub fn preview(&self, request: &RenderRequest) -> Result<RgbImage, CertError> {
        let template = self
            .template
            .as_ref()
            .ok_or_else(|| CertError::PreconditionMissing("template".to_string()))?;
        let font = request.font.load()?;
        let center = request.center.unwrap_or_else(|| CenterPoint::of_image(template));

        Ok(render_centered_text(
            template,
            &self.preview_text(),
            center,
            &font,
            request.color,
        ))
    }

    /// Generate one PDF per non-empty name.
    pub fn generate(&self, request: &RenderRequest) -> Result<GenerationSummary, CertError> {
        let (loaded, template) = match (&self.dataset, &self.template) {
            (Some(loaded), Some(template)) => (loaded, template),
            (None, Some(_)) => return Err(CertError::PreconditionMissing("spreadsheet".to_string())),
            (Some(_), None) => return Err(CertError::PreconditionMissing("template".to_string())),
            (None, None) => {
                return Err(CertError::PreconditionMissing("spreadsheet and template".to_string()))
            }
        };

        let column = pick_name_column(&loaded.dataset)?;
        let font = request.font.load()?;
        let settings = RenderSettings {
            center: request.center.unwrap_or_else(|| CenterPoint::of_image(template)),
            font: &font,
            color: request.color,
        };
        let output_dir = request
            .output_dir
            .clone()
            .unwrap_or_else(|| output_dir_for(&loaded.path));

        generate(&loaded.dataset, &column, template, &settings, &output_dir, &request.options)
    }
}

/// Decode an image file and convert it to 8-bit RGB.
pub fn load_template(path: &Path) -> Result<RgbImage, CertError> {
    ::image::open(path)
        .map(|img| img.to_rgb8())
        .map_err(|e| CertError::TemplateLoad(format!("{}: {}", path.display(), e)))
}
