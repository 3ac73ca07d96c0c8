// Ad hoc form checks run before any request is issued.

use std::path::Path;

use crate::error::CoreError;

/// Fail with a `Validation` error when `value` is blank.
pub fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::validation(field, "is required"))
    } else {
        Ok(())
    }
}

/// Fail when `value` is not a positive finite number.
pub fn require_positive(field: &str, value: f64) -> Result<(), CoreError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoreError::validation(field, "must be greater than zero"))
    }
}

/// Accepts watch, shorts, and youtu.be links with an 11-character video id.
/// An empty link is valid; the field is optional.
pub fn is_youtube_link(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return true;
    }

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);

    let video_id = ["youtube.com/watch?v=", "youtube.com/shorts/", "youtu.be/"]
        .iter()
        .find_map(|prefix| rest.strip_prefix(prefix));

    video_id.is_some_and(|id| {
        id.len() >= 11
            && id
                .bytes()
                .take(11)
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    })
}

pub fn youtube_link(field: &str, url: &str) -> Result<(), CoreError> {
    if is_youtube_link(url) {
        Ok(())
    } else {
        Err(CoreError::validation(field, "please enter a valid YouTube link"))
    }
}

/// MIME type for an upload, guessed from its extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => return None,
    };
    Some(mime)
}
