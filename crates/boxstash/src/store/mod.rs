//! Filesystem-backed stores for boxes and photos.
//!
//! Each box is a markdown file under `<root>/boxes/`, and each box's photos
//! live under `<root>/photos/<box id>/`. Both stores take the data root
//! explicitly at construction; nothing here is global.

pub mod boxes;
pub mod photos;

pub use boxes::{BoxStore, BoxSummary, SearchHit};
pub use photos::PhotoStore;

use crate::error::{Error, Result};

/// Image extensions accepted for photo uploads (lowercase).
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Extract the extension of `name` if it is in the allowed set.
///
/// Matching is case-insensitive; the returned extension is lowercased.
#[must_use]
pub fn allowed_extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Some(ext)
    } else {
        None
    }
}

/// Validate a box identifier for use in a storage path.
///
/// Identifiers may only contain ASCII alphanumerics, `-` and `_`, which
/// rules out traversal sequences and path separators.
///
/// # Errors
///
/// Returns [`Error::InvalidBoxId`] if the identifier is empty, longer than
/// 128 bytes, or contains any other character.
pub fn sanitize_id(id: &str) -> Result<&str> {
    if id.is_empty()
        || id.len() > 128
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::invalid_box_id(id));
    }
    Ok(id)
}

/// Validate a photo filename for use in a storage path.
///
/// Filenames may only contain ASCII alphanumerics, `-`, `_` and `.`, and
/// may not start with a dot. This keeps every stored name inside its box
/// directory.
///
/// # Errors
///
/// Returns [`Error::InvalidFilename`] if the name is empty, longer than
/// 255 bytes, starts with a dot, or contains any other character.
pub fn sanitize_filename(name: &str) -> Result<&str> {
    if name.is_empty()
        || name.len() > 255
        || name.starts_with('.')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(Error::invalid_filename(name));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_id_accepts_slugs() {
        assert!(sanitize_id("box-001").is_ok());
        assert!(sanitize_id("garage_shelf_3").is_ok());
        assert!(sanitize_id("A1").is_ok());
    }

    #[test]
    fn test_sanitize_id_rejects_traversal() {
        assert!(sanitize_id("../etc").is_err());
        assert!(sanitize_id("a/b").is_err());
        assert!(sanitize_id("a\\b").is_err());
        assert!(sanitize_id("..").is_err());
        assert!(sanitize_id("").is_err());
        assert!(sanitize_id("box 1").is_err());
    }

    #[test]
    fn test_sanitize_filename_accepts_photo_names() {
        assert!(sanitize_filename("20240101_100000.jpg").is_ok());
        assert!(sanitize_filename("photo.webp").is_ok());
    }

    #[test]
    fn test_sanitize_filename_rejects_traversal() {
        assert!(sanitize_filename("../secret.png").is_err());
        assert!(sanitize_filename("a/b.png").is_err());
        assert!(sanitize_filename(".hidden").is_err());
        assert!(sanitize_filename("..").is_err());
        assert!(sanitize_filename("").is_err());
    }

    #[test]
    fn test_allowed_extension_case_insensitive() {
        assert_eq!(allowed_extension("a.PNG"), Some("png".to_string()));
        assert_eq!(allowed_extension("a.JpEg"), Some("jpeg".to_string()));
        assert_eq!(allowed_extension("archive.exe"), None);
        assert_eq!(allowed_extension("noextension"), None);
    }
}
