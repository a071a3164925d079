//! Client-side content validation.
//!
//! These checks run before any network call; the backend is not assumed to
//! duplicate them.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ArcadeError, Result};

/// UI-enforced ceiling on comment/reply length.
pub const MAX_COMMENT_LEN: usize = 500;

static IMAGE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://\S+\.(png|jpe?g|gif|webp)(\?\S*)?$").expect("image url regex")
});

/// Detect the "image URL" content sentinel. A comment whose entire content
/// is a bare image link renders as an image instead of text.
pub fn is_image_url(content: &str) -> bool {
    IMAGE_URL_RE.is_match(content.trim())
}

/// Validate comment/reply content: non-empty after trim, at most
/// [`MAX_COMMENT_LEN`] characters. Length is counted in characters, not
/// bytes, matching what the input field counts.
pub fn validate_content(content: &str) -> Result<()> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ArcadeError::validation("comment content is empty"));
    }
    let len = content.chars().count();
    if len > MAX_COMMENT_LEN {
        return Err(ArcadeError::validation(format!(
            "comment is {len} characters, maximum is {MAX_COMMENT_LEN}"
        )));
    }
    Ok(())
}
