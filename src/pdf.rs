// certgen: writing rendered certificates to disk

use crate::error::CertError;
use ::image::codecs::jpeg::JpegEncoder;
use ::image::RgbImage;
use printpdf::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Raster resolution used to size the page: one pixel per point
const PAGE_DPI: f32 = 72.0;

/// JPEG quality for the embedded page image
const JPEG_QUALITY: u8 = 90;

fn px_to_mm(px: u32) -> f32 {
    px as f32 * 25.4 / PAGE_DPI
}

/// Save `image` as a single-page PDF whose page matches the image size.
pub fn write_pdf(image: &RgbImage, path: &Path, title: &str) -> Result<(), CertError> {
    let (width, height) = image.dimensions();

    let (doc, page, layer) = PdfDocument::new(title, Mm(px_to_mm(width)), Mm(px_to_mm(height)), "Layer 1");
    let layer = doc.get_page(page).get_layer(layer);

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode(image.as_raw(), width, height, ::image::ExtendedColorType::Rgb8)
        .map_err(|e| CertError::Pdf(format!("JPEG encoding failed: {}", e)))?;

    let xobject = Image::from(ImageXObject {
        width: Px(width as usize),
        height: Px(height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: jpeg,
        image_filter: Some(ImageFilter::DCT),
        clipping_bbox: None,
        smask: None,
    });

    xobject.add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(0.0)),
            dpi: Some(PAGE_DPI),
            ..Default::default()
        },
    );

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)
        .map_err(|e| CertError::Pdf(e.to_string()))?;
    writer.flush()?;

    Ok(())
}

/// Save `image` as a PNG, used for previews.
pub fn write_png(image: &RgbImage, path: &Path) -> Result<(), CertError> {
    image
        .save_with_format(path, ::image::ImageFormat::Png)
        .map_err(|e| CertError::Io(std::io::Error::other(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::Rgb;
    use std::fs;

    #[test]
    fn test_px_to_mm() {
        assert!((px_to_mm(72) - 25.4).abs() < 1e-4);
    }

    #[test]
    fn test_write_pdf_creates_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Alice.pdf");
        let img = RgbImage::from_pixel(130, 90, Rgb([10, 20, 30]));

        write_pdf(&img, &path, "Alice").unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_page_image_is_jpeg_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Gradient.pdf");
        let img = RgbImage::from_fn(1300, 900, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]));

        write_pdf(&img, &path, "Gradient").unwrap();

        let bytes = fs::read(&path).unwrap();
        let raw_size = 1300 * 900 * 3;
        assert!(bytes.len() < raw_size / 4, "PDF is {} bytes", bytes.len());
        assert!(bytes.windows(9).any(|w| w == b"DCTDecode"));
    }

    #[test]
    fn test_write_pdf_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Bob.pdf");
        fs::write(&path, b"stale").unwrap();

        write_pdf(&RgbImage::new(20, 20), &path, "Bob").unwrap();
        assert!(fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_write_pdf_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("Carol.pdf");
        let err = write_pdf(&RgbImage::new(20, 20), &path, "Carol").unwrap_err();
        assert!(matches!(err, CertError::Io(_)));
    }

    #[test]
    fn test_write_png_round_trips_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        write_png(&RgbImage::new(64, 32), &path).unwrap();
        let reloaded = ::image::open(&path).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (64, 32));
    }
}
