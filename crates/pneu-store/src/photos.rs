//! Content-addressed storage for tire and plate photos

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use pneu_types::{Error, ImageRef, Result};

/// Photos are copied under `photos/` and named by the SHA-256 of their content
pub struct PhotoStore {
    photo_dir: PathBuf,
}

impl PhotoStore {
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        let photo_dir = store_dir.join("photos");
        fs::create_dir_all(&photo_dir)?;
        Ok(Self { photo_dir })
    }

    /// Compute hash for an image file
    pub fn hash_image(image_path: &Path) -> Result<String> {
        let file = File::open(image_path)?;
        let mut reader = BufReader::new(file);
        let mut hasher = Sha256::new();
        std::io::copy(&mut reader, &mut hasher)?;
        let hash = hasher.finalize();
        Ok(format!("{:x}", hash))
    }

    /// Copy a photo into the store; storing the same bytes twice is a no-op
    pub fn store(&self, image_path: &Path) -> Result<ImageRef> {
        if !image_path.is_file() {
            return Err(Error::FileNotFound(image_path.display().to_string()));
        }
        let hash = Self::hash_image(image_path)?;
        let name = match image_path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", hash, ext.to_lowercase()),
            None => hash,
        };
        let target = self.photo_dir.join(&name);
        if !target.exists() {
            fs::copy(image_path, &target)?;
            debug!(photo = %name, "photo stored");
        }
        Ok(ImageRef(name))
    }

    /// Location of a stored photo
    pub fn path_of(&self, image_ref: &ImageRef) -> PathBuf {
        self.photo_dir.join(&image_ref.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_same_content_same_ref() {
        let dir = tempdir().unwrap();
        let store = PhotoStore::open(dir.path().join("store")).unwrap();
        let a = dir.path().join("a.JPG");
        let b = dir.path().join("b.jpg");
        fs::write(&a, b"tire bytes").unwrap();
        fs::write(&b, b"tire bytes").unwrap();

        let ref_a = store.store(&a).unwrap();
        let ref_b = store.store(&b).unwrap();
        assert_eq!(ref_a, ref_b);
        assert!(ref_a.0.ends_with(".jpg"));
        assert!(store.path_of(&ref_a).exists());
    }

    #[test]
    fn test_missing_photo() {
        let dir = tempdir().unwrap();
        let store = PhotoStore::open(dir.path().to_path_buf()).unwrap();
        assert!(matches!(
            store.store(&dir.path().join("nope.jpg")),
            Err(Error::FileNotFound(_))
        ));
    }
}
