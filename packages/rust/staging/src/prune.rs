//! Selective removal of unwanted assets from a staged lesson directory.

use std::path::{Component, Path};

use tracing::{debug, warn};

use scormchef_shared::{ChefError, Result};

/// Delete the given relative paths from `assets_dir`.
///
/// A path resolving to a regular file is removed; a directory is removed
/// recursively; a path that does not exist is skipped silently. Paths that
/// would escape `assets_dir` (absolute paths or `..` components) are ignored
/// with a warning and never traversed.
pub fn prune(assets_dir: &Path, relative_paths: &[String]) -> Result<()> {
    for rel in relative_paths {
        if !is_safe_relative(Path::new(rel)) {
            warn!(path = %rel, "ignoring asset path that escapes the assets directory");
            continue;
        }

        let target = assets_dir.join(rel);
        if !target.exists() {
            debug!(path = %target.display(), "asset already absent");
            continue;
        }

        if target.is_file() {
            std::fs::remove_file(&target).map_err(|e| ChefError::io(&target, e))?;
            debug!(path = %target.display(), "removed asset file");
        } else {
            std::fs::remove_dir_all(&target).map_err(|e| ChefError::io(&target, e))?;
            debug!(path = %target.display(), "removed asset directory");
        }
    }

    Ok(())
}

/// A path is safe when it stays under the assets directory after joining.
fn is_safe_relative(path: &Path) -> bool {
    !path.is_absolute()
        && !path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("unused.js"), "var x = 1;").unwrap();
        std::fs::write(dir.path().join("keep.css"), "body {}").unwrap();
        std::fs::create_dir_all(dir.path().join("videos/clips")).unwrap();
        std::fs::write(dir.path().join("videos/clips/intro.mp4"), "bytes").unwrap();
        dir
    }

    #[test]
    fn prune_removes_file() {
        let dir = setup();
        prune(dir.path(), &["unused.js".into()]).unwrap();

        assert!(!dir.path().join("unused.js").exists());
        assert!(dir.path().join("keep.css").exists());
    }

    #[test]
    fn prune_removes_directory_recursively() {
        let dir = setup();
        prune(dir.path(), &["videos".into()]).unwrap();

        assert!(!dir.path().join("videos").exists());
        assert!(dir.path().join("keep.css").exists());
    }

    #[test]
    fn prune_missing_path_is_a_noop() {
        let dir = setup();
        prune(dir.path(), &["does_not_exist.png".into()]).unwrap();

        assert!(dir.path().join("unused.js").exists());
        assert!(dir.path().join("keep.css").exists());
    }

    #[test]
    fn prune_ignores_parent_escapes() {
        let dir = setup();
        let outside = dir.path().parent().unwrap().join("outside.txt");
        // Even if a sibling file exists, "../" paths must not reach it.
        std::fs::write(&outside, "do not touch").unwrap();

        prune(dir.path(), &["../outside.txt".into()]).unwrap();
        assert!(outside.exists());

        let _ = std::fs::remove_file(&outside);
    }

    #[test]
    fn prune_ignores_absolute_paths() {
        let dir = setup();
        let victim = dir.path().join("keep.css");

        prune(dir.path(), &[victim.display().to_string()]).unwrap();
        assert!(victim.exists());
    }

    #[test]
    fn prune_handles_nested_relative_paths() {
        let dir = setup();
        prune(dir.path(), &["videos/clips/intro.mp4".into()]).unwrap();

        assert!(!dir.path().join("videos/clips/intro.mp4").exists());
        assert!(dir.path().join("videos/clips").exists());
    }
}
