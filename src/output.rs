//! PNG output and file path generation

use image::imageops::FilterType;
use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Save an RGBA image to a PNG file, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// Placeholder art is pixel art; nearest-neighbor keeps the edges crisp.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor as u32, h * factor as u32, FilterType::Nearest)
}

/// Generate the output path for an asset key.
///
/// | Scenario | Output |
/// |----------|--------|
/// | No `-o` | `{key}.png` in the working directory |
/// | `-o out.png`, single asset | `out.png` |
/// | `-o out.png`, several assets | `out_{key}.png` |
/// | `-o dir/` or an existing directory | `dir/{key}.png` |
pub fn generate_output_path(key: &str, output_arg: Option<&Path>, is_single: bool) -> PathBuf {
    let file_name = format!("{}.png", sanitize_key(key));
    match output_arg {
        None => PathBuf::from(file_name),
        Some(output) => {
            let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();
            if is_dir {
                output.join(file_name)
            } else if is_single {
                output.to_path_buf()
            } else {
                let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
                let name = format!("{}_{}.png", stem, sanitize_key(key));
                match output.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
                    _ => PathBuf::from(name),
                }
            }
        }
    }
}

/// Keys are free-form text; keep only characters that are safe in file names.
fn sanitize_key(key: &str) -> String {
    let cleaned: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '-' })
        .collect();
    if cleaned.is_empty() {
        "asset".to_string()
    } else {
        cleaned
    }
}
