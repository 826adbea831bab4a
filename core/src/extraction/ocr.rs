use crate::error::{CoreError, CoreResult};
use image::{DynamicImage, ImageFormat};
use std::io::ErrorKind;
use std::process::Command;
use tracing::debug;

pub trait OcrEngine {
    /// Recognized text, possibly empty. No text found is not an error.
    fn recognize(&self, image: &DynamicImage) -> CoreResult<String>;
}

/// Runs the `tesseract` executable over a temporary PNG copy of the image.
pub struct TesseractOcr {
    command: String,
    language: String,
}

impl TesseractOcr {
    pub fn new(command: &str, language: &str) -> Self {
        Self {
            command: command.to_string(),
            language: language.to_string(),
        }
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &DynamicImage) -> CoreResult<String> {
        let tmp = tempfile::Builder::new()
            .prefix("reqdraft_ocr_")
            .suffix(".png")
            .tempfile()?;
        image
            .save_with_format(tmp.path(), ImageFormat::Png)
            .map_err(|e| CoreError::Extraction(format!("failed to stage image for OCR: {}", e)))?;

        let output = Command::new(&self.command)
            .arg(tmp.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => CoreError::Extraction(format!(
                    "OCR engine '{}' is not installed",
                    self.command
                )),
                _ => CoreError::Io(e),
            })?;
        if !output.status.success() {
            return Err(CoreError::Extraction(format!(
                "OCR failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Decodes `bytes` as an image, then hands it to the OCR engine.
pub fn extract_image_text(bytes: &[u8], engine: &dyn OcrEngine) -> CoreResult<String> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| CoreError::Extraction(format!("unreadable image: {}", e)))?;
    debug!(width = img.width(), height = img.height(), "image decoded");
    engine.recognize(&img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct SizeOcr;

    impl OcrEngine for SizeOcr {
        fn recognize(&self, image: &DynamicImage) -> CoreResult<String> {
            Ok(format!("{}x{}", image.width(), image.height()))
        }
    }

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(w, h));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decoded_image_reaches_engine() {
        assert_eq!(extract_image_text(&png_bytes(3, 2), &SizeOcr).unwrap(), "3x2");
    }

    #[test]
    fn corrupt_bytes_are_extraction_errors() {
        assert!(matches!(
            extract_image_text(b"definitely not an image", &SizeOcr),
            Err(CoreError::Extraction(_))
        ));
    }

    #[test]
    fn missing_tesseract_binary_is_reported() {
        let engine = TesseractOcr::new("reqdraft-no-such-ocr-binary", "eng");
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(2, 2));
        assert!(matches!(
            engine.recognize(&img),
            Err(CoreError::Extraction(_))
        ));
    }
}
