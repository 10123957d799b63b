//! # certgen
//!
//! Batch generation of personalized certificates: every name in a spreadsheet
//! column is drawn, centered on a configurable point, over a copy of a template
//! image and saved as a single-page PDF.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`dataset`] | Spreadsheet loading and name column selection |
//! | [`font`] | Font file lookup and loading |
//! | [`render`] | Centered text drawing |
//! | [`pdf`] | PDF and PNG output |
//! | [`pipeline`] | Per-row batch generation |
//! | [`session`] | Loaded inputs held by a caller |
//! | [`config`] | Fixed settings and font families |
//! | [`error`] | Error types |

pub mod config;
pub mod dataset;
pub mod error;
pub mod font;
pub mod pdf;
pub mod pipeline;
pub mod render;
pub mod session;

pub use error::CertError;
pub use session::Session;
