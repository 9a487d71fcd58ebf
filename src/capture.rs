//! Photo intake for the report form.

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::Path;

fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

pub fn is_inline_reference(reference: &str) -> bool {
    reference.starts_with("data:")
        || reference.starts_with("http://")
        || reference.starts_with("https://")
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Resolve what the citizen gave as a photo into something storable on the issue.
///
/// URLs and data URLs are kept as they are; a local file becomes a data URL.
pub fn photo_reference(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        bail!("No photo provided");
    }
    if is_inline_reference(input) {
        return Ok(input.to_string());
    }

    let path = Path::new(input);
    let mime = match image_mime(path) {
        Some(m) => m,
        None => bail!("'{}' is not an image file (expected jpg, png, gif, webp or bmp)", input),
    };
    let bytes = fs::read(path).with_context(|| format!("Could not read photo '{}'", input))?;
    tracing::debug!(path = %input, bytes = bytes.len(), "encoded photo as data URL");
    Ok(encode_data_url(mime, &bytes))
}

/// Short description of a stored photo, for listings.
pub fn describe(reference: &str) -> String {
    if let Some(rest) = reference.strip_prefix("data:") {
        let mime = rest.split(';').next().unwrap_or("unknown");
        let payload = rest.split_once(',').map(|(_, p)| p.len()).unwrap_or(0);
        format!("embedded {} ({} base64 chars)", mime, payload)
    } else {
        reference.to_string()
    }
}
