//! Image enhancement stage.
//!
//! Approximates a generative "smile correction" with a fixed filter chain so
//! the UI can show an illustrative before/after.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::{DynamicImage, ImageReader, RgbImage};
use smilecheck_core::{EnhancementProvider, SmileError};
use tracing::{debug, info};

use crate::filters;

pub const BRIGHTNESS_FACTOR: f32 = 1.15;
pub const CONTRAST_FACTOR: f32 = 1.1;
pub const SATURATION_FACTOR: f32 = 1.2;

pub const SOURCE_NOT_FOUND_MESSAGE: &str = "Imagem original não encontrada para processamento.";

/// Produce an enhanced copy of `source` at `output`.
///
/// `_instructions` is where a real image-generation call would take its
/// prompt; the filter chain ignores it.
///
/// # Errors
///
/// Returns [`SmileError::ImageGeneration`] if the source is missing, cannot
/// be decoded, or the output cannot be written. Nothing is written on error.
pub fn generate_corrected_image(
    source: &Path,
    _instructions: &str,
    output: &Path,
) -> Result<PathBuf, SmileError> {
    let image = decode_source(source)?;
    debug!(
        source = %source.display(),
        width = image.width(),
        height = image.height(),
        "Decoded source image"
    );

    let enhanced = apply_chain(&image.to_rgb8());

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).map_err(processing_failure)?;
    }
    if let Err(err) = enhanced.save(output) {
        // Don't leave a truncated file behind.
        let _ = std::fs::remove_file(output);
        return Err(processing_failure(err));
    }

    info!(output = %output.display(), "Wrote enhanced image");
    Ok(output.to_path_buf())
}

/// Decode `source`, picking the format from its content rather than its
/// extension.
fn decode_source(source: &Path) -> Result<DynamicImage, SmileError> {
    let reader = ImageReader::open(source).map_err(|io| {
        if io.kind() == std::io::ErrorKind::NotFound {
            SmileError::ImageGeneration(SOURCE_NOT_FOUND_MESSAGE.to_string())
        } else {
            processing_failure(io)
        }
    })?;
    reader
        .with_guessed_format()
        .map_err(processing_failure)?
        .decode()
        .map_err(processing_failure)
}

/// Brightness, contrast, detail, then saturation.
pub fn apply_chain(image: &RgbImage) -> RgbImage {
    let brightened = filters::brightness(image, BRIGHTNESS_FACTOR);
    let contrasted = filters::contrast(&brightened, CONTRAST_FACTOR);
    let sharpened = filters::detail(&contrasted);
    filters::saturation(&sharpened, SATURATION_FACTOR)
}

fn processing_failure(err: impl std::fmt::Display) -> SmileError {
    SmileError::ImageGeneration(format!("Falha ao processar a imagem: {err}"))
}

/// [`EnhancementProvider`] running the filter chain on the blocking pool.
#[derive(Debug, Default, Clone)]
pub struct FilterEnhancer;

impl FilterEnhancer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EnhancementProvider for FilterEnhancer {
    fn name(&self) -> &str {
        "filter-chain"
    }

    async fn enhance(
        &self,
        source: &Path,
        instructions: &str,
        output: &Path,
    ) -> Result<PathBuf, SmileError> {
        let source = source.to_path_buf();
        let instructions = instructions.to_string();
        let output = output.to_path_buf();
        tokio::task::spawn_blocking(move || {
            generate_corrected_image(&source, &instructions, &output)
        })
        .await
        .map_err(processing_failure)?
    }
}
