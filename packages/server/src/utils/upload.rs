//! Upload filename validation and media categorization.

/// Extension allowlist per media category.
const CATEGORIES: &[(&str, &[&str])] = &[
    ("image", &["jpg", "jpeg", "png", "gif", "webp"]),
    ("video", &["mp4", "webm", "mov", "avi"]),
    ("audio", &["mp3", "wav", "ogg"]),
    ("document", &["pdf", "txt", "doc", "docx"]),
];

/// Map a filename to its media category from the extension.
/// Returns `None` for missing or disallowed extensions.
pub fn media_category(filename: &str) -> Option<&'static str> {
    let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
    CATEGORIES
        .iter()
        .find(|(_, exts)| exts.contains(&ext.as_str()))
        .map(|(category, _)| *category)
}

/// Reject empty names, path separators, traversal components, and control
/// characters so a stored filename can be echoed into headers safely.
pub fn validate_filename(filename: &str) -> Result<&str, String> {
    let name = filename.trim();
    if name.is_empty() {
        return Err("Filename must not be empty".into());
    }
    if name.len() > 255 {
        return Err("Filename must be at most 255 bytes".into());
    }
    if name.contains('/') || name.contains('\\') {
        return Err("Filename must not contain path separators".into());
    }
    if name == "." || name == ".." {
        return Err("Filename must not be a directory reference".into());
    }
    if name.chars().any(|c| c.is_control()) {
        return Err("Filename must not contain control characters".into());
    }
    Ok(name)
}
