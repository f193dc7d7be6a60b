//! Prompts sent to the extraction command
//!
//! Both prompts ask for a bare JSON object and use "N/A" for anything the
//! model cannot read, so an illegible field never turns into a guess.

pub const TIRE_PROMPT: &str = r#"You are reading the sidewall of a single vehicle tire.
Find the DOT code, the brand, and the overall condition of the tire.

Rules:
- "dot": the full DOT code exactly as printed, e.g. "DOT 4B8X LMLR 4119"
- "brand": the manufacturer name printed on the sidewall
- "condition": one of "new", "good", "worn", "damaged"
- "week" and "year": the last four digits of the DOT code are WWYY.
  Use the two-digit week and two-digit year from those digits.
- Use "N/A" for any field you cannot read with confidence. Do not guess.

Output ONLY this JSON object:
{"dot": "<dot code>", "brand": "<brand>", "condition": "<condition>", "week": "<WW>", "year": "<YY>"}"#;

pub const PLATE_PROMPT: &str = r#"Read the license plate in this photo.
Return the characters without spaces or dashes.
Use "N/A" if no plate is visible or it cannot be read.

Output ONLY this JSON object:
{"plateText": "<plate>"}"#;
