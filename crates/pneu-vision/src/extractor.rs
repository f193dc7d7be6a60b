//! Attribute extractors

use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use pneu_types::{Attr, ConfigError, Error, ExtractedTire, Result};

use crate::prompts::{PLATE_PROMPT, TIRE_PROMPT};
use crate::{parse_plate_response, parse_tire_response};

/// Reads tire and plate attributes from photos.
///
/// Unreadable fields come back as `Attr::Unknown`; `Err` is reserved for
/// failures of the extractor itself.
pub trait AttributeExtractor {
    fn extract_tire_attributes(&self, image_path: &Path) -> Result<ExtractedTire>;

    fn extract_plate_text(&self, image_path: &Path) -> Result<Attr<String>>;
}

/// Runs an external command and parses the JSON it prints.
///
/// The command is invoked as `<command...> --prompt <text> --image <path>`.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    program: String,
    args: Vec<String>,
}

impl CommandExtractor {
    pub fn new(command: &str) -> Result<Self> {
        let mut parts = match shell_words::split(command) {
            Ok(parts) if !parts.is_empty() => parts,
            _ => return Err(ConfigError::ExtractorNotConfigured.into()),
        };
        let program = parts.remove(0);
        Ok(Self {
            program,
            args: parts,
        })
    }

    fn run(&self, prompt: &str, image_path: &Path) -> Result<String> {
        if !image_path.exists() {
            return Err(Error::FileNotFound(image_path.display().to_string()));
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.arg("--prompt");
        cmd.arg(prompt);
        cmd.arg("--image");
        cmd.arg(image_path);

        debug!(program = %self.program, image = %image_path.display(), "running extractor");

        let output = cmd.output().map_err(|e| {
            Error::Extraction(format!("failed to run {}: {}", self.program, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(program = %self.program, status = %output.status, "extractor failed");
            return Err(Error::Extraction(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if stdout.trim().is_empty() {
            return Err(Error::Extraction(format!("{} printed nothing", self.program)));
        }
        Ok(stdout)
    }
}

impl AttributeExtractor for CommandExtractor {
    fn extract_tire_attributes(&self, image_path: &Path) -> Result<ExtractedTire> {
        let response = self.run(TIRE_PROMPT, image_path)?;
        parse_tire_response(&response)
    }

    fn extract_plate_text(&self, image_path: &Path) -> Result<Attr<String>> {
        let response = self.run(PLATE_PROMPT, image_path)?;
        parse_plate_response(&response)
    }
}
