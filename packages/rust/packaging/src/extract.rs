//! Extraction of downloaded SCORM course archives.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};
use zip::ZipArchive;

use scormchef_shared::{ChefError, Result};

/// Extract every `<workdir>/*.zip` course archive that has not been
/// extracted yet.
///
/// `foo.zip` is extracted to `<workdir>/foo/`; when that directory already
/// exists the archive is skipped. Returns the number of archives extracted
/// this run.
#[instrument(skip_all, fields(workdir = %workdir.display()))]
pub fn extract_course_archives(workdir: &Path) -> Result<usize> {
    let mut archives: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(workdir).map_err(|e| ChefError::io(workdir, e))? {
        let entry = entry.map_err(|e| ChefError::io(workdir, e))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "zip") {
            archives.push(path);
        }
    }
    archives.sort();

    let mut extracted = 0;
    for path in archives {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let course_dir = workdir.join(stem);
        if course_dir.exists() {
            info!(course = stem, "already extracted");
            continue;
        }

        info!(course = stem, "extracting course archive");
        let file = File::open(&path).map_err(|e| ChefError::io(&path, e))?;
        let mut archive = ZipArchive::new(BufReader::new(file))
            .map_err(|e| ChefError::Archive(format!("{}: {e}", path.display())))?;
        archive
            .extract(&course_dir)
            .map_err(|e| ChefError::Archive(format!("{}: {e}", path.display())))?;

        extracted += 1;
    }

    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn write_course_zip(path: &Path) {
        let file = File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        writer
            .start_file("scormcontent/index.html", options)
            .unwrap();
        writer.write_all(b"<html></html>").unwrap();
        writer
            .start_file("scormcontent/assets/app.css", options)
            .unwrap();
        writer.write_all(b"body {}").unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn extracts_archive_beside_itself() {
        let tmp = tempfile::tempdir().unwrap();
        write_course_zip(&tmp.path().join("syb_course.zip"));

        let count = extract_course_archives(tmp.path()).unwrap();

        assert_eq!(count, 1);
        assert!(
            tmp.path()
                .join("syb_course/scormcontent/index.html")
                .is_file()
        );
    }

    #[test]
    fn skips_already_extracted_archives() {
        let tmp = tempfile::tempdir().unwrap();
        write_course_zip(&tmp.path().join("syb_course.zip"));

        assert_eq!(extract_course_archives(tmp.path()).unwrap(), 1);
        assert_eq!(extract_course_archives(tmp.path()).unwrap(), 0);
    }

    #[test]
    fn ignores_non_zip_files() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "not an archive").unwrap();

        assert_eq!(extract_course_archives(tmp.path()).unwrap(), 0);
    }

    #[test]
    fn corrupt_archive_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("broken.zip"), b"not a zip").unwrap();

        let err = extract_course_archives(tmp.path()).unwrap_err();
        assert!(matches!(err, ChefError::Archive(_)));
    }
}
