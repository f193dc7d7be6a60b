//! Vision module - AI-backed reading of tire sidewalls and license plates

pub mod extractor;
pub mod prompts;

pub use extractor::{AttributeExtractor, CommandExtractor};

use serde::Deserialize;

use pneu_types::{date_code_from_dot, Attr, Error, ExtractedTire, Result};

/// Extract JSON from AI response (handles markdown code blocks)
pub fn extract_json_from_response(response: &str) -> String {
    let response = response.trim();

    // Check for markdown code block
    if response.starts_with("```") {
        if let Some(end) = response.rfind("```") {
            let start = response.find('\n').map(|i| i + 1).unwrap_or(response.len());
            if start < end {
                return response[start..end].trim().to_string();
            }
        }
    }

    // Try to find JSON object directly
    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if start < end {
                return response[start..=end].to_string();
            }
        }
    }

    response.to_string()
}

/// Parse a tire reading, filling week/year from the DOT date code when the
/// model left them blank.
pub fn parse_tire_response(response: &str) -> Result<ExtractedTire> {
    let json_str = extract_json_from_response(response);
    let mut tire: ExtractedTire = serde_json::from_str(&json_str)
        .map_err(|e| Error::Extraction(format!("unreadable tire response: {}", e)))?;

    if !tire.manufacture_week.is_known() || !tire.manufacture_year.is_known() {
        if let Some((week, year)) = tire.dot.known().and_then(|dot| date_code_from_dot(dot)) {
            if !tire.manufacture_week.is_known() {
                tire.manufacture_week = Attr::Known(week);
            }
            if !tire.manufacture_year.is_known() {
                tire.manufacture_year = Attr::Known(year);
            }
        }
    }

    Ok(tire)
}

#[derive(Debug, Deserialize)]
struct PlateResponse {
    #[serde(default, alias = "plateText", alias = "plate_text")]
    plate: Option<String>,
}

/// Parse a plate reading; "N/A" and blanks come back as unknown
pub fn parse_plate_response(response: &str) -> Result<Attr<String>> {
    let json_str = extract_json_from_response(response);
    let parsed: PlateResponse = serde_json::from_str(&json_str)
        .map_err(|e| Error::Extraction(format!("unreadable plate response: {}", e)))?;
    Ok(parsed
        .plate
        .map(|text| Attr::from_text(&text))
        .unwrap_or(Attr::Unknown))
}
