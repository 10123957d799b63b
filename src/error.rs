// certgen: error types shared by the library and the CLI

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CertError {
    #[error("Failed to load spreadsheet: {0}")]
    DatasetLoad(String),
    #[error("Failed to load template: {0}")]
    TemplateLoad(String),
    #[error("No suitable name column found")]
    NoSuitableColumn,
    #[error("Failed to load font: {0}")]
    FontLoad(String),
    #[error("Load a spreadsheet and a template first (missing: {0})")]
    PreconditionMissing(String),
    #[error("Failed to create PDF: {0}")]
    Pdf(String),
    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
    /// A failed row, numbered as in the spreadsheet (header is row 1)
    #[error("Row {row} ({name}): {source}")]
    Row {
        row: usize,
        name: String,
        #[source]
        source: Box<CertError>,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
