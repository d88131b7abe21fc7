//! Lesson staging: turn an extracted SCORM export into a self-contained,
//! viewer-ready HTML5 lesson directory.
//!
//! [`stage_lesson`] copies the export's `scormcontent/` tree, prunes unwanted
//! assets, downsizes oversized images, and patches the index page. The work
//! happens in a temporary sibling directory that is renamed into place on
//! success, so a failed run never leaves a directory that a later run would
//! mistake for a completed one.

pub mod images;
pub mod patch;
pub mod prune;

pub use images::{DEFAULT_MAX_HEIGHT, normalize_images};
pub use patch::patch_index;
pub use prune::prune;

use std::path::Path;

use tracing::{info, instrument};

use scormchef_shared::{ChefError, LessonSpec, Result};

/// Name of the content subdirectory inside an extracted SCORM export.
pub const SCORM_CONTENT_DIR: &str = "scormcontent";

/// Stage one lesson from `source_root` into `output_dir`.
///
/// Precondition: `output_dir` does not exist. Callers treat its presence as
/// the completion marker and must skip staging entirely when it does (a
/// staged directory is never re-derived).
#[instrument(skip_all, fields(lesson = %spec.slug, course = %spec.file))]
pub fn stage_lesson(
    spec: &LessonSpec,
    source_root: &Path,
    output_dir: &Path,
    max_height: u32,
) -> Result<()> {
    if output_dir.exists() {
        return Err(ChefError::validation(format!(
            "staging target already exists: {}",
            output_dir.display()
        )));
    }

    let source = source_root.join(&spec.file).join(SCORM_CONTENT_DIR);
    if !source.is_dir() {
        return Err(ChefError::validation(format!(
            "no {SCORM_CONTENT_DIR} directory under {}",
            source_root.join(&spec.file).display()
        )));
    }

    let parent = output_dir.parent().ok_or_else(|| {
        ChefError::validation(format!(
            "staging target has no parent directory: {}",
            output_dir.display()
        ))
    })?;
    std::fs::create_dir_all(parent).map_err(|e| ChefError::io(parent, e))?;

    // Stage into a temp sibling and rename at the end, so the completion
    // marker only ever appears for a fully transformed directory.
    let scratch = tempfile::Builder::new()
        .prefix(".staging-")
        .tempdir_in(parent)
        .map_err(|e| ChefError::io(parent, e))?;
    let work = scratch.path().join("lesson");

    copy_dir_recursive(&source, &work)?;
    prune(&work.join("assets"), &spec.remove_assets)?;
    normalize_images(&work.join("assets"), max_height)?;
    patch_index(&work.join("index.html"), &spec.route)?;

    std::fs::rename(&work, output_dir).map_err(|e| ChefError::io(output_dir, e))?;

    info!(path = %output_dir.display(), "lesson staged");
    Ok(())
}

/// Recursively copy `src` into `dst`, overwriting existing files and keeping
/// non-conflicting ones.
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst).map_err(|e| ChefError::io(dst, e))?;

    for entry in std::fs::read_dir(src).map_err(|e| ChefError::io(src, e))? {
        let entry = entry.map_err(|e| ChefError::io(src, e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());

        let file_type = entry.file_type().map_err(|e| ChefError::io(&from, e))?;
        if file_type.is_dir() {
            copy_dir_recursive(&from, &to)?;
        } else {
            std::fs::copy(&from, &to).map_err(|e| ChefError::io(&from, e))?;
        }
    }

    Ok(())
}
