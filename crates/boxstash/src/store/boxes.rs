//! Flat-file store for box records.
//!
//! One markdown file per box under `<root>/boxes/<id>.md`. The file's
//! modification time doubles as the box's last-modified timestamp.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::store::sanitize_id;

/// Summary of a box as shown on the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxSummary {
    /// The box identifier.
    pub id: String,
    /// Display title derived from the first content line.
    pub title: String,
    /// When the record was last written.
    pub modified: DateTime<Utc>,
}

/// A single search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// The matching box identifier.
    pub id: String,
    /// Display title of the matching box.
    pub title: String,
    /// Up to 3 trimmed content lines containing the query.
    pub preview: Vec<String>,
}

/// Store for box markdown records.
///
/// Supports listing, reading, writing, deletion, id allocation, and
/// substring search. All operations validate the identifier before
/// building a path from it.
#[derive(Debug)]
pub struct BoxStore {
    /// Directory holding one `<id>.md` file per box.
    dir: PathBuf,
}

impl BoxStore {
    /// Open a box store rooted at the given data directory.
    ///
    /// Creates `<root>/boxes/` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let dir = root.as_ref().join("boxes");
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|source| Error::DirectoryCreate {
                path: dir.clone(),
                source,
            })?;
        }
        info!("Box store opened at {}", dir.display());
        Ok(Self { dir })
    }

    /// Get the directory holding box records.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path to the record for `id`, after validating the identifier.
    fn record_path(&self, id: &str) -> Result<PathBuf> {
        let id = sanitize_id(id)?;
        Ok(self.dir.join(format!("{id}.md")))
    }

    /// The markdown template a new box starts with.
    #[must_use]
    pub fn template(id: &str) -> String {
        format!("# {id}\n\n## Contents\n\n- \n\n## Location\n\n\n## Notes\n\n")
    }

    /// List all boxes, most recently modified first.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or a record cannot be read.
    pub fn list(&self) -> Result<Vec<BoxSummary>> {
        let mut boxes = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = std::fs::read_to_string(&path)?;
            let modified = DateTime::<Utc>::from(entry.metadata()?.modified()?);

            boxes.push(BoxSummary {
                id: id.to_string(),
                title: derive_title(id, &content),
                modified,
            });
        }

        boxes.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(boxes)
    }

    /// Read a box's content, or `None` if no record exists.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid identifier or a failed read.
    pub fn read(&self, id: &str) -> Result<Option<String>> {
        let path = self.record_path(id)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a box's full content, creating the record if absent.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid identifier or a failed write.
    pub fn write(&self, id: &str, content: &str) -> Result<()> {
        let path = self.record_path(id)?;
        std::fs::write(&path, content)?;
        debug!("Wrote box record {}", path.display());
        Ok(())
    }

    /// Read a box's content, writing the template first if no record exists.
    ///
    /// Returns the content either way. This is the one place where a read
    /// creates state, and callers opt into it by name.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid identifier or a failed read/write.
    pub fn get_or_create(&self, id: &str) -> Result<String> {
        if let Some(content) = self.read(id)? {
            return Ok(content);
        }
        let content = Self::template(id);
        self.write(id, &content)?;
        info!("Created box {id} from template");
        Ok(content)
    }

    /// Delete a box record. Idempotent: absent records are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid identifier or a failed removal.
    pub fn delete(&self, id: &str) -> Result<()> {
        let path = self.record_path(id)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!("Deleted box {id}");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Allocate the smallest unused identifier of the form `box-NNN`.
    ///
    /// Does not create the record; the id stays free until written.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn generate_id(&self) -> Result<String> {
        let mut existing = HashSet::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            if let Some(id) = path.file_stem().and_then(|s| s.to_str()) {
                existing.insert(id.to_string());
            }
        }

        let mut counter = 1u32;
        loop {
            let candidate = format!("box-{counter:03}");
            if !existing.contains(&candidate) {
                return Ok(candidate);
            }
            counter += 1;
        }
    }

    /// Case-insensitive substring search across all box contents.
    ///
    /// Each hit carries up to 3 matching lines as a preview. An empty
    /// query matches nothing. Hits are ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or a record cannot be read.
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = std::fs::read_to_string(&path)?;
            if !content.to_lowercase().contains(&query) {
                continue;
            }

            let preview: Vec<String> = content
                .trim()
                .lines()
                .filter(|line| line.to_lowercase().contains(&query))
                .take(3)
                .map(|line| line.trim().to_string())
                .collect();

            hits.push(SearchHit {
                id: id.to_string(),
                title: derive_title(id, &content),
                preview,
            });
        }

        hits.sort_by(|a, b| a.id.cmp(&b.id));
        debug!("Search for {query:?} matched {} boxes", hits.len());
        Ok(hits)
    }
}

/// Derive a display title from the first content line.
///
/// Strips leading `#` markers and whitespace; falls back to the id when
/// the content is empty.
fn derive_title(id: &str, content: &str) -> String {
    let title = content
        .trim()
        .lines()
        .next()
        .map(|line| line.trim_start_matches(['#', ' ']).trim())
        .unwrap_or_default();

    if title.is_empty() {
        id.to_string()
    } else {
        title.to_string()
    }
}
