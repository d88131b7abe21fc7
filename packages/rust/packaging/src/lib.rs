//! Reproducible zip packaging for staged lesson directories.
//!
//! The downstream archive registry deduplicates by content, so packaging the
//! same directory twice must yield byte-identical archives. Entries are
//! therefore added in a stable order with fixed timestamps and permissions:
//! the bytes depend only on relative paths and file contents, never on
//! filesystem metadata.

pub mod extract;

pub use extract::extract_course_archives;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, instrument};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use scormchef_shared::{ChefError, Result};

/// A zip archive produced from a staged lesson directory.
#[derive(Debug, Clone)]
pub struct PackagedArchive {
    /// Path of the written archive (`<directory>.zip`).
    pub path: PathBuf,
    /// SHA-256 of the archive bytes, for content-addressed deduplication.
    pub sha256: String,
    /// Archive size in bytes.
    pub size_bytes: u64,
}

/// Compress `directory` into a sibling `<directory>.zip` with byte-stable
/// output, and return the archive path with its checksum.
#[instrument(skip_all, fields(dir = %directory.display()))]
pub fn package_deterministic(directory: &Path) -> Result<PackagedArchive> {
    if !directory.is_dir() {
        return Err(ChefError::validation(format!(
            "not a directory: {}",
            directory.display()
        )));
    }

    let name = directory
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            ChefError::validation(format!("unusable directory name: {}", directory.display()))
        })?;
    let archive_path = directory
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(format!("{name}.zip"));

    // Collect file entries and sort by their archive-relative name so the
    // entry order never depends on readdir order.
    let mut files: Vec<(PathBuf, String)> = Vec::new();
    for entry in WalkDir::new(directory) {
        let entry = entry
            .map_err(|e| ChefError::Archive(format!("walking {}: {e}", directory.display())))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(directory).map_err(|e| {
            ChefError::Archive(format!("{}: {e}", entry.path().display()))
        })?;
        files.push((entry.path().to_path_buf(), zip_entry_name(rel)));
    }
    files.sort_by(|a, b| a.1.cmp(&b.1));

    let file = File::create(&archive_path).map_err(|e| ChefError::io(&archive_path, e))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    // Epoch timestamp and fixed mode keep the central directory stable.
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644);

    for (path, entry_name) in &files {
        writer
            .start_file(entry_name.as_str(), options)
            .map_err(|e| ChefError::Archive(format!("{entry_name}: {e}")))?;
        let mut source = File::open(path).map_err(|e| ChefError::io(path, e))?;
        std::io::copy(&mut source, &mut writer).map_err(|e| ChefError::io(path, e))?;
    }

    let mut inner = writer
        .finish()
        .map_err(|e| ChefError::Archive(e.to_string()))?;
    inner.flush().map_err(|e| ChefError::io(&archive_path, e))?;

    let bytes = std::fs::read(&archive_path).map_err(|e| ChefError::io(&archive_path, e))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let sha256 = format!("{:x}", hasher.finalize());

    debug!(
        path = %archive_path.display(),
        entries = files.len(),
        size = bytes.len(),
        %sha256,
        "archive written"
    );

    Ok(PackagedArchive {
        path: archive_path,
        sha256,
        size_bytes: bytes.len() as u64,
    })
}

/// Archive entry name for a relative path: components joined with `/`.
fn zip_entry_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
