//! Per-box photo storage.
//!
//! Photos live under `<root>/photos/<box id>/`, named by upload time as
//! `YYYYMMDD_HHMMSS.<ext>`. Two uploads to the same box within the same
//! second overwrite each other; callers accept that.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::store::{allowed_extension, sanitize_filename, sanitize_id};

/// Store for photo files, one directory per box.
#[derive(Debug)]
pub struct PhotoStore {
    /// Directory holding one subdirectory per box.
    dir: PathBuf,
}

impl PhotoStore {
    /// Open a photo store rooted at the given data directory.
    ///
    /// Creates `<root>/photos/` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let dir = root.as_ref().join("photos");
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|source| Error::DirectoryCreate {
                path: dir.clone(),
                source,
            })?;
        }
        info!("Photo store opened at {}", dir.display());
        Ok(Self { dir })
    }

    /// Directory holding a box's photos, after validating the identifier.
    fn box_dir(&self, box_id: &str) -> Result<PathBuf> {
        let box_id = sanitize_id(box_id)?;
        Ok(self.dir.join(box_id))
    }

    /// Path to one photo, after validating both path components.
    fn photo_path(&self, box_id: &str, filename: &str) -> Result<PathBuf> {
        let dir = self.box_dir(box_id)?;
        let filename = sanitize_filename(filename)?;
        Ok(dir.join(filename))
    }

    /// List a box's photo filenames, lexically sorted.
    ///
    /// Only files with an allowed image extension are returned. A box with
    /// no photo directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid identifier or a failed read.
    pub fn list(&self, box_id: &str) -> Result<Vec<String>> {
        let dir = self.box_dir(box_id)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut photos: Vec<String> = std::fs::read_dir(&dir)?
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| allowed_extension(name).is_some())
            .collect();

        photos.sort();
        Ok(photos)
    }

    /// Store an uploaded photo, returning the stored filename.
    ///
    /// The stored name is `YYYYMMDD_HHMMSS.<ext>` from the current local
    /// time, with the original extension lowercased. Returns `None` as a
    /// silent no-op when the original name has no allowed extension.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid identifier or a failed write.
    pub fn add(&self, box_id: &str, original_name: &str, bytes: &[u8]) -> Result<Option<String>> {
        self.add_at(box_id, original_name, bytes, Local::now().naive_local())
    }

    /// Store a photo named after the given timestamp.
    ///
    /// Split out from [`PhotoStore::add`] so the naming scheme is testable
    /// without a real clock.
    fn add_at(
        &self,
        box_id: &str,
        original_name: &str,
        bytes: &[u8],
        taken: NaiveDateTime,
    ) -> Result<Option<String>> {
        let Some(ext) = allowed_extension(original_name) else {
            debug!("Rejected upload {original_name:?} for box {box_id}: extension not allowed");
            return Ok(None);
        };

        let dir = self.box_dir(box_id)?;
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|source| Error::DirectoryCreate {
                path: dir.clone(),
                source,
            })?;
        }

        let filename = format!("{}.{ext}", taken.format("%Y%m%d_%H%M%S"));
        std::fs::write(dir.join(&filename), bytes)?;
        info!("Stored photo {filename} for box {box_id}");
        Ok(Some(filename))
    }

    /// Read a photo's raw bytes, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid identifier/filename or a failed read.
    pub fn read(&self, box_id: &str, filename: &str) -> Result<Option<Vec<u8>>> {
        let path = self.photo_path(box_id, filename)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete one photo. Idempotent: absent files are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid identifier/filename or a failed
    /// removal.
    pub fn delete(&self, box_id: &str, filename: &str) -> Result<()> {
        let path = self.photo_path(box_id, filename)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!("Deleted photo {filename} for box {box_id}");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a box's entire photo directory. Idempotent when absent.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid identifier or a failed removal.
    pub fn delete_all(&self, box_id: &str) -> Result<()> {
        let dir = self.box_dir(box_id)?;
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => {
                info!("Deleted all photos for box {box_id}");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// MIME type for serving a stored photo, derived from its extension.
#[must_use]
pub fn content_type(filename: &str) -> &'static str {
    match allowed_extension(filename).as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, PhotoStore) {
        let tmp = TempDir::new().unwrap();
        let store = PhotoStore::open(tmp.path()).unwrap();
        (tmp, store)
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_add_names_by_timestamp() {
        let (_tmp, store) = open_store();
        let stored = store
            .add_at("box-001", "photo.jpg", b"jpeg bytes", at(2024, 1, 1, 10, 0, 0))
            .unwrap();

        assert_eq!(stored.as_deref(), Some("20240101_100000.jpg"));
        assert_eq!(
            store.list("box-001").unwrap(),
            vec!["20240101_100000.jpg".to_string()]
        );
    }

    #[test]
    fn test_add_lowercases_extension() {
        let (_tmp, store) = open_store();
        let stored = store
            .add_at("box-001", "IMG_0001.JPG", b"x", at(2024, 6, 2, 8, 30, 15))
            .unwrap();
        assert_eq!(stored.as_deref(), Some("20240602_083015.jpg"));
    }

    #[test]
    fn test_add_rejects_disallowed_extension() {
        let (_tmp, store) = open_store();
        let stored = store
            .add_at("box-001", "malware.exe", b"mz", at(2024, 1, 1, 10, 0, 0))
            .unwrap();

        assert_eq!(stored, None);
        assert!(store.list("box-001").unwrap().is_empty());
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let (_tmp, store) = open_store();
        assert!(store.list("box-404").unwrap().is_empty());
    }

    #[test]
    fn test_list_sorted_and_filtered() {
        let (tmp, store) = open_store();
        store
            .add_at("box-001", "b.png", b"x", at(2024, 1, 2, 0, 0, 0))
            .unwrap();
        store
            .add_at("box-001", "a.png", b"x", at(2024, 1, 1, 0, 0, 0))
            .unwrap();
        // A stray non-image file in the directory is not listed
        std::fs::write(tmp.path().join("photos/box-001/notes.txt"), b"x").unwrap();

        assert_eq!(
            store.list("box-001").unwrap(),
            vec![
                "20240101_000000.png".to_string(),
                "20240102_000000.png".to_string(),
            ]
        );
    }

    #[test]
    fn test_read_round_trip_and_missing() {
        let (_tmp, store) = open_store();
        store
            .add_at("box-001", "p.gif", b"gif!", at(2024, 1, 1, 0, 0, 0))
            .unwrap();

        assert_eq!(
            store.read("box-001", "20240101_000000.gif").unwrap(),
            Some(b"gif!".to_vec())
        );
        assert_eq!(store.read("box-001", "20991231_235959.gif").unwrap(), None);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_tmp, store) = open_store();
        store
            .add_at("box-001", "p.png", b"x", at(2024, 1, 1, 0, 0, 0))
            .unwrap();

        store.delete("box-001", "20240101_000000.png").unwrap();
        assert!(store.list("box-001").unwrap().is_empty());
        store.delete("box-001", "20240101_000000.png").unwrap();
    }

    #[test]
    fn test_delete_all_removes_directory() {
        let (tmp, store) = open_store();
        store
            .add_at("box-001", "p.png", b"x", at(2024, 1, 1, 0, 0, 0))
            .unwrap();

        store.delete_all("box-001").unwrap();
        assert!(!tmp.path().join("photos/box-001").exists());
        assert!(store.list("box-001").unwrap().is_empty());

        // Absent directory is not an error
        store.delete_all("box-001").unwrap();
    }

    #[test]
    fn test_same_second_upload_overwrites() {
        let (_tmp, store) = open_store();
        let when = at(2024, 1, 1, 10, 0, 0);
        store.add_at("box-001", "a.png", b"first", when).unwrap();
        store.add_at("box-001", "b.png", b"second", when).unwrap();

        assert_eq!(store.list("box-001").unwrap().len(), 1);
        assert_eq!(
            store.read("box-001", "20240101_100000.png").unwrap(),
            Some(b"second".to_vec())
        );
    }

    #[test]
    fn test_traversal_rejected() {
        let (_tmp, store) = open_store();
        assert!(store.read("box-001", "../../etc/passwd").is_err());
        assert!(store.read("../escape", "p.png").is_err());
        assert!(store.delete("box-001", "..").is_err());
        assert!(store.delete_all("a/b").is_err());
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("a.png"), "image/png");
        assert_eq!(content_type("a.JPG"), "image/jpeg");
        assert_eq!(content_type("a.jpeg"), "image/jpeg");
        assert_eq!(content_type("a.gif"), "image/gif");
        assert_eq!(content_type("a.webp"), "image/webp");
        assert_eq!(content_type("a.exe"), "application/octet-stream");
    }
}
