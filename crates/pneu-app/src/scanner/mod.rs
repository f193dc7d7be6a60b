//! Image scanning and validation

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use pneu_types::{Error, Result, TirePosition, VerificationError};

/// Supported image extensions
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

/// File stems that mark the plate photo in a capture directory
const PLATE_STEMS: &[&str] = &["plate", "placa"];

/// Check if a path is a supported image file
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Validate an image file exists and is readable
pub fn validate_image(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    if !path.is_file() {
        return Err(Error::InvalidImageFormat(format!(
            "{} is not a file",
            path.display()
        )));
    }

    if !is_supported_image(path) {
        return Err(Error::InvalidImageFormat(format!(
            "Unsupported image format: {}",
            path.display()
        )));
    }

    // Try to open the image to validate it
    image::open(path)?;

    Ok(())
}

/// Scan a directory (non-recursive) for image files, sorted by file name
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::FileNotFound(dir.display().to_string()));
    }

    if !dir.is_dir() {
        return Err(Error::InvalidImageFormat(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut images: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file() && is_supported_image(path))
        .collect();

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(images)
}

/// Photos found in a capture directory
#[derive(Debug, Clone, Default)]
pub struct CapturePhotos {
    pub tires: BTreeMap<TirePosition, PathBuf>,
    pub plate: Option<PathBuf>,
}

impl CapturePhotos {
    pub fn photo_for(&self, position: TirePosition) -> Option<&Path> {
        self.tires.get(&position).map(|p| p.as_path())
    }
}

/// Map the images in `dir` to tire positions by file stem.
///
/// `front-left.jpg`, `FL.png` and `dianteiro_esquerdo.jpg` all name the
/// front-left tire; `plate.*` is the plate photo. Other images are ignored.
pub fn find_capture_photos(dir: &Path) -> Result<CapturePhotos> {
    let mut photos = CapturePhotos::default();

    for path in scan_directory(dir)? {
        let stem = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };

        if PLATE_STEMS.contains(&stem.to_lowercase().as_str()) {
            photos.plate = Some(path);
            continue;
        }

        let position = match stem.parse::<TirePosition>() {
            Ok(position) => position,
            Err(_) => {
                debug!(file = %path.display(), "ignoring unrecognized photo");
                continue;
            }
        };

        if photos.tires.insert(position, path).is_some() {
            return Err(VerificationError::DuplicatePosition(position).into());
        }
    }

    Ok(photos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("test.jpg")));
        assert!(is_supported_image(Path::new("test.JPEG")));
        assert!(is_supported_image(Path::new("test.png")));
        assert!(!is_supported_image(Path::new("test.txt")));
        assert!(!is_supported_image(Path::new("test")));
    }

    #[test]
    fn test_find_capture_photos() {
        let dir = tempdir().unwrap();
        for name in ["front-left.jpg", "FR.png", "traseiro_esquerdo.jpg", "plate.jpg", "notes.txt", "misc.jpg"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let photos = find_capture_photos(dir.path()).unwrap();
        assert_eq!(photos.tires.len(), 3);
        assert!(photos.photo_for(TirePosition::FrontRight).is_some());
        assert!(photos.photo_for(TirePosition::RearLeft).is_some());
        assert!(photos.photo_for(TirePosition::Spare).is_none());
        assert!(photos.plate.is_some());
    }

    #[test]
    fn test_two_photos_for_one_position() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("front-left.jpg"), b"x").unwrap();
        fs::write(dir.path().join("FL.png"), b"x").unwrap();
        assert!(matches!(
            find_capture_photos(dir.path()),
            Err(Error::Verification(VerificationError::DuplicatePosition(
                TirePosition::FrontLeft
            )))
        ));
    }

    #[test]
    fn test_validate_image_missing() {
        assert!(matches!(
            validate_image(Path::new("/nonexistent/tire.jpg")),
            Err(Error::FileNotFound(_))
        ));
    }
}
