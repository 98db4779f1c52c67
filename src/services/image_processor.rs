// src/services/image_processor.rs
use image::{GenericImageView, ImageFormat as ImgFormat};

use crate::errors::WardrobeError;

// The vision model gets no benefit past this edge length, and smaller
// payloads keep the base64 body within the API limits.
const MAX_ANALYSIS_DIM: u32 = 1024;
const MAX_UPLOAD_DIM: u32 = 4096;

pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_image(&self, data: &[u8]) -> Result<(u32, u32), WardrobeError> {
        let img = image::load_from_memory(data)
            .map_err(|e| WardrobeError::ImageProcessing(format!("Invalid image format: {}", e)))?;

        let (width, height) = img.dimensions();

        if width > MAX_UPLOAD_DIM || height > MAX_UPLOAD_DIM {
            return Err(WardrobeError::ImageProcessing(format!(
                "Image dimensions exceed {}x{}",
                MAX_UPLOAD_DIM, MAX_UPLOAD_DIM
            )));
        }

        Ok((width, height))
    }

    /// Downscales the capture to the analysis size and re-encodes as JPEG,
    /// which is what the vision payload declares.
    pub fn prepare_for_analysis(&self, data: &[u8]) -> Result<Vec<u8>, WardrobeError> {
        let img = image::load_from_memory(data)
            .map_err(|e| WardrobeError::ImageProcessing(format!("Failed to load image: {}", e)))?;

        let (width, height) = img.dimensions();

        let img = if width > MAX_ANALYSIS_DIM || height > MAX_ANALYSIS_DIM {
            let ratio = (MAX_ANALYSIS_DIM as f32 / width.max(height) as f32).min(1.0);
            let new_width = (width as f32 * ratio) as u32;
            let new_height = (height as f32 * ratio) as u32;
            img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
        } else {
            img
        };

        let mut output = Vec::new();
        img.to_rgb8()
            .write_to(&mut std::io::Cursor::new(&mut output), ImgFormat::Jpeg)
            .map_err(|e| {
                WardrobeError::ImageProcessing(format!("Failed to encode image: {}", e))
            })?;

        Ok(output)
    }
}
