//! In-place downsizing of oversized raster assets.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use tracing::debug;

use scormchef_shared::{ChefError, Result};

/// Default maximum image height in pixels.
pub const DEFAULT_MAX_HEIGHT: u32 = 640;

/// Downsize every `.png` or `.jpg` file directly in `dir` whose height
/// exceeds `max_height`.
///
/// Width is scaled proportionally, resampling uses Lanczos3, and the file is
/// overwritten in its original format. Files at or below the limit, and files
/// with any other extension (the match is case-sensitive), are left
/// untouched. A file that cannot be decoded fails the whole run.
pub fn normalize_images(dir: &Path, max_height: u32) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| ChefError::io(dir, e))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ChefError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    for path in paths {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".png") && !name.ends_with(".jpg") {
            continue;
        }
        resize_if_oversized(&path, max_height)?;
    }

    Ok(())
}

/// Decode one image and overwrite it with a height-capped version if needed.
fn resize_if_oversized(path: &Path, max_height: u32) -> Result<()> {
    let reader = image::ImageReader::open(path)
        .map_err(|e| ChefError::io(path, e))?
        .with_guessed_format()
        .map_err(|e| ChefError::io(path, e))?;

    let format = reader
        .format()
        .ok_or_else(|| ChefError::image(path, "unrecognized image format"))?;

    let img = reader
        .decode()
        .map_err(|e| ChefError::image(path, e.to_string()))?;

    let (width, height) = (img.width(), img.height());
    if height <= max_height {
        return Ok(());
    }

    let new_width = (f64::from(width) * f64::from(max_height) / f64::from(height)).round() as u32;
    let resized = img.resize_exact(new_width, max_height, FilterType::Lanczos3);

    resized
        .save_with_format(path, format)
        .map_err(|e| ChefError::image(path, e.to_string()))?;

    debug!(
        path = %path.display(),
        width,
        height,
        new_width,
        max_height,
        "image downsized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn write_png(path: &Path, width: u32, height: u32) {
        RgbImage::new(width, height)
            .save_with_format(path, ImageFormat::Png)
            .unwrap();
    }

    fn dimensions(path: &Path) -> (u32, u32) {
        let img = image::open(path).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn oversized_png_is_downsized_proportionally() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banner.png");
        write_png(&path, 1200, 800);

        normalize_images(dir.path(), 640).unwrap();

        assert_eq!(dimensions(&path), (960, 640));
    }

    #[test]
    fn oversized_jpg_keeps_its_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        RgbImage::new(500, 1000)
            .save_with_format(&path, ImageFormat::Jpeg)
            .unwrap();

        normalize_images(dir.path(), 640).unwrap();

        assert_eq!(dimensions(&path), (320, 640));
        let reader = image::ImageReader::open(&path)
            .unwrap()
            .with_guessed_format()
            .unwrap();
        assert_eq!(reader.format(), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn image_at_limit_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        write_png(&path, 800, 640);
        let before = std::fs::read(&path).unwrap();

        normalize_images(dir.path(), 640).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn extension_match_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SHOUTING.PNG");
        write_png(&path, 400, 1200);
        let before = std::fs::read(&path).unwrap();

        normalize_images(dir.path(), 640).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn other_extensions_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("script.js"), "var x = 1;").unwrap();
        std::fs::write(dir.path().join("style.css"), "body {}").unwrap();

        normalize_images(dir.path(), 640).unwrap();
    }

    #[test]
    fn corrupt_image_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.png"), b"definitely not a png").unwrap();

        let err = normalize_images(dir.path(), 640).unwrap_err();
        assert!(matches!(err, ChefError::Image { .. }));
    }

    #[test]
    fn rounding_follows_nearest_width() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.png");
        // 1001 * 640 / 1000 = 640.64, rounds to 641.
        write_png(&path, 1001, 1000);

        normalize_images(dir.path(), 640).unwrap();

        assert_eq!(dimensions(&path), (641, 640));
    }
}
