//! Capture Service - builds a five-tire scan from photos
//!
//! Each photo goes through the extractor one position at a time. A failed
//! extraction is retried for that position only; positions already captured
//! are never re-read.

use std::path::Path;

use tracing::{info, warn};

use pneu_domain::model::ScanSession;
use pneu_store::PhotoStore;
use pneu_types::{Error, ExtractedTire, Result, TireObservation, TirePosition};
use pneu_vision::AttributeExtractor;

use crate::scanner::{find_capture_photos, validate_image, CapturePhotos};

/// Called before each position is read
pub type ProgressCallback<'a> = Box<dyn Fn(TirePosition) + 'a>;

pub struct CaptureService<'a> {
    extractor: &'a dyn AttributeExtractor,
    photos: Option<&'a PhotoStore>,
    retries: u32,
    progress: Option<ProgressCallback<'a>>,
}

impl<'a> CaptureService<'a> {
    pub fn new(extractor: &'a dyn AttributeExtractor) -> Self {
        Self {
            extractor,
            photos: None,
            retries: 0,
            progress: None,
        }
    }

    /// Keep a copy of every photo of a completed scan in the store
    pub fn with_photo_store(mut self, photos: &'a PhotoStore) -> Self {
        self.photos = Some(photos);
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_progress(mut self, progress: ProgressCallback<'a>) -> Self {
        self.progress = Some(progress);
        self
    }

    fn extract_with_retry(&self, photo: &Path) -> Result<ExtractedTire> {
        let mut attempt = 0;
        loop {
            match self.extractor.extract_tire_attributes(photo) {
                Ok(tire) => return Ok(tire),
                Err(err) if err.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    warn!(
                        photo = %photo.display(),
                        attempt,
                        error = %err,
                        "extraction failed, retrying"
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Read one photo and record it in the session at `position`
    pub fn capture_position(
        &self,
        session: &mut ScanSession,
        position: TirePosition,
        photo: &Path,
    ) -> Result<()> {
        validate_image(photo)?;
        if let Some(progress) = &self.progress {
            progress(position);
        }

        let observation = self
            .extract_with_retry(photo)?
            .into_observation(position, None);

        match observation.fingerprint() {
            Some(key) => info!(position = %position, key = %key, "tire captured"),
            None => warn!(position = %position, "tire captured without readable week/year"),
        }

        session.capture(observation);
        Ok(())
    }

    /// Walk the session cursor over the photos until every slot is filled.
    ///
    /// Photos reach the store only once all five positions are captured.
    pub fn capture_photos(&self, photos: &CapturePhotos) -> Result<Vec<TireObservation>> {
        let mut session = ScanSession::new();
        while let Some(position) = session.current_position() {
            match photos.photo_for(position) {
                Some(photo) => self.capture_position(&mut session, position, photo)?,
                None => break,
            }
        }
        let mut tires = session.finish()?;

        if let Some(store) = self.photos {
            for tire in &mut tires {
                if let Some(photo) = photos.photo_for(tire.position) {
                    tire.image_ref = Some(store.store(photo)?);
                }
            }
        }
        Ok(tires)
    }

    /// Capture every position from a directory of named photos
    pub fn capture_directory(&self, dir: &Path) -> Result<Vec<TireObservation>> {
        let photos = find_capture_photos(dir)?;
        self.capture_photos(&photos)
    }
}

/// Read a JSON array of observations prepared elsewhere
pub fn load_observations(path: &Path) -> Result<Vec<TireObservation>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
