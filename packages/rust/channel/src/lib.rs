//! Channel tree construction for the content upload SDK.
//!
//! Builds the typed topic/app/document tree for a finished run and serializes
//! it as `channel.json`, the hand-off artifact the uploader consumes.
//! Validation, diffing against the remote catalog, and the upload itself are
//! the uploader's job, not ours.

pub mod nodes;

pub use nodes::{
    CATEGORIES, ChannelInfo, ContentNode, DocumentNode, Html5AppNode, License, TopicNode,
};

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use scormchef_shared::{ChefError, CourseData, Result};

// ---------------------------------------------------------------------------
// ChannelTree
// ---------------------------------------------------------------------------

/// Root structure of `channel.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelTree {
    /// Channel metadata.
    pub info: ChannelInfo,
    /// Tool version that produced this manifest.
    pub tool_version: String,
    /// When the manifest was generated.
    pub generated_at: DateTime<Utc>,
    /// One topic per course.
    pub topics: Vec<TopicNode>,
}

/// A packaged lesson ready to be attached to an app node.
#[derive(Debug, Clone)]
pub struct LessonArtifact {
    /// Slug of the course the lesson belongs to.
    pub course_slug: String,
    /// Slug of the lesson.
    pub lesson_slug: String,
    /// Path of the packaged lesson archive.
    pub zip_path: PathBuf,
    /// SHA-256 of the archive bytes.
    pub zip_sha256: String,
}

// ---------------------------------------------------------------------------
// Tree construction
// ---------------------------------------------------------------------------

/// Build the channel tree for a run: one topic per course, one HTML5 app node
/// per lesson, one document node per PDF directly in the course directory.
///
/// Every lesson must have a matching entry in `artifacts`; a missing archive
/// means packaging was skipped and the manifest would dangle.
#[instrument(skip_all, fields(channel = %info.source_id, courses = data.courses.len()))]
pub fn build_channel(
    info: &ChannelInfo,
    license: &License,
    data: &CourseData,
    workdir: &Path,
    artifacts: &[LessonArtifact],
    tool_version: &str,
) -> Result<ChannelTree> {
    let categories: Vec<String> = CATEGORIES.iter().map(|c| (*c).to_string()).collect();
    let mut topics = Vec::with_capacity(data.courses.len());

    for course in &data.courses {
        let slug = course.slug();
        let mut children = Vec::new();

        for lesson in &course.lessons {
            let artifact = artifacts
                .iter()
                .find(|a| a.course_slug == slug && a.lesson_slug == lesson.slug)
                .ok_or_else(|| {
                    ChefError::validation(format!(
                        "no packaged archive for lesson {} in course {slug}",
                        lesson.slug
                    ))
                })?;

            children.push(ContentNode::Html5App(Html5AppNode {
                source_id: format!("{slug}_{}_id", lesson.slug),
                title: lesson.title.clone(),
                language: info.language.clone(),
                categories: categories.clone(),
                license: license.clone(),
                zip_path: artifact.zip_path.clone(),
                zip_sha256: artifact.zip_sha256.clone(),
            }));
        }

        for pdf in course_pdfs(&workdir.join(&slug))? {
            let file_name = pdf
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            children.push(ContentNode::Document(DocumentNode {
                source_id: format!("{slug}_{}_id", file_name.replace(' ', "_")),
                title: file_name,
                language: info.language.clone(),
                categories: categories.clone(),
                license: license.clone(),
                pdf_path: pdf,
            }));
        }

        debug!(course = %slug, children = children.len(), "topic assembled");

        topics.push(TopicNode {
            source_id: format!("{slug}_id"),
            title: course.title.clone(),
            language: info.language.clone(),
            categories: categories.clone(),
            thumbnail: topic_thumbnail(course.thumbnail.as_deref(), workdir, &slug),
            children,
        });
    }

    Ok(ChannelTree {
        info: info.clone(),
        tool_version: tool_version.to_string(),
        generated_at: Utc::now(),
        topics,
    })
}

/// Write the channel manifest as pretty-printed JSON.
pub fn write_manifest(path: &Path, channel: &ChannelTree) -> Result<()> {
    let json = serde_json::to_string_pretty(channel)
        .map_err(|e| ChefError::validation(format!("manifest serialization failed: {e}")))?;
    std::fs::write(path, json).map_err(|e| ChefError::io(path, e))?;

    info!(
        path = %path.display(),
        topics = channel.topics.len(),
        "channel manifest written"
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// PDFs sitting directly in the course directory, sorted by file name.
fn course_pdfs(course_dir: &Path) -> Result<Vec<PathBuf>> {
    if !course_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(course_dir).map_err(|e| ChefError::io(course_dir, e))? {
        let entry = entry.map_err(|e| ChefError::io(course_dir, e))?;
        let path = entry.path();
        let is_pdf = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".pdf"));
        if path.is_file() && is_pdf {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

/// Explicit thumbnail from course data, else the conventional
/// `<workdir>/<slug>.png` when present on disk.
fn topic_thumbnail(explicit: Option<&str>, workdir: &Path, slug: &str) -> Option<PathBuf> {
    if let Some(name) = explicit {
        return Some(workdir.join(name));
    }
    let conventional = workdir.join(format!("{slug}.png"));
    conventional.exists().then_some(conventional)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scormchef_shared::{CourseSpec, LessonSpec};

    fn make_info() -> ChannelInfo {
        ChannelInfo {
            source_domain: "https://example.org/siyb".into(),
            source_id: "ilo-siyb".into(),
            title: "Test Channel".into(),
            language: "en".into(),
            description: "A channel".into(),
            thumbnail: None,
        }
    }

    fn make_license() -> License {
        License {
            license_id: "CC BY-SA".into(),
            copyright_holder: "Test Org".into(),
        }
    }

    fn make_data() -> CourseData {
        CourseData {
            courses: vec![CourseSpec {
                title: "Start Your Business".into(),
                thumbnail: None,
                lessons: vec![LessonSpec {
                    slug: "lesson_1".into(),
                    title: "Getting Started".into(),
                    file: "syb_export".into(),
                    route: "lesson1".into(),
                    remove_assets: vec![],
                }],
            }],
        }
    }

    fn make_artifacts(workdir: &Path) -> Vec<LessonArtifact> {
        vec![LessonArtifact {
            course_slug: "start_your_business".into(),
            lesson_slug: "lesson_1".into(),
            zip_path: workdir.join("start_your_business/lesson_1.zip"),
            zip_sha256: "abc123".into(),
        }]
    }

    #[test]
    fn builds_topic_per_course_with_app_nodes() {
        let tmp = tempfile::tempdir().unwrap();
        let channel = build_channel(
            &make_info(),
            &make_license(),
            &make_data(),
            tmp.path(),
            &make_artifacts(tmp.path()),
            "0.1.0-test",
        )
        .unwrap();

        assert_eq!(channel.topics.len(), 1);
        let topic = &channel.topics[0];
        assert_eq!(topic.source_id, "start_your_business_id");
        assert_eq!(topic.children.len(), 1);

        match &topic.children[0] {
            ContentNode::Html5App(app) => {
                assert_eq!(app.source_id, "start_your_business_lesson_1_id");
                assert_eq!(app.zip_sha256, "abc123");
                assert_eq!(app.license, make_license());
            }
            other => panic!("expected app node, got {other:?}"),
        }
    }

    #[test]
    fn picks_up_course_pdfs_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let course_dir = tmp.path().join("start_your_business");
        std::fs::create_dir_all(&course_dir).unwrap();
        std::fs::write(course_dir.join("workbook b.pdf"), "pdf").unwrap();
        std::fs::write(course_dir.join("workbook a.pdf"), "pdf").unwrap();
        std::fs::write(course_dir.join("notes.txt"), "not a pdf").unwrap();

        let channel = build_channel(
            &make_info(),
            &make_license(),
            &make_data(),
            tmp.path(),
            &make_artifacts(tmp.path()),
            "0.1.0-test",
        )
        .unwrap();

        let docs: Vec<&DocumentNode> = channel.topics[0]
            .children
            .iter()
            .filter_map(|c| match c {
                ContentNode::Document(d) => Some(d),
                _ => None,
            })
            .collect();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].title, "workbook a.pdf");
        assert_eq!(docs[0].source_id, "start_your_business_workbook_a.pdf_id");
        assert_eq!(docs[1].title, "workbook b.pdf");
    }

    #[test]
    fn missing_artifact_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let err = build_channel(
            &make_info(),
            &make_license(),
            &make_data(),
            tmp.path(),
            &[],
            "0.1.0-test",
        )
        .unwrap_err();

        assert!(err.to_string().contains("no packaged archive"));
    }

    #[test]
    fn conventional_thumbnail_is_discovered() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("start_your_business.png"), "png").unwrap();

        let channel = build_channel(
            &make_info(),
            &make_license(),
            &make_data(),
            tmp.path(),
            &make_artifacts(tmp.path()),
            "0.1.0-test",
        )
        .unwrap();

        assert_eq!(
            channel.topics[0].thumbnail,
            Some(tmp.path().join("start_your_business.png"))
        );
    }

    #[test]
    fn manifest_roundtrips_through_json() {
        let tmp = tempfile::tempdir().unwrap();
        let channel = build_channel(
            &make_info(),
            &make_license(),
            &make_data(),
            tmp.path(),
            &make_artifacts(tmp.path()),
            "0.1.0-test",
        )
        .unwrap();

        let path = tmp.path().join("channel.json");
        write_manifest(&path, &channel).unwrap();

        let parsed: ChannelTree =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.info.source_id, "ilo-siyb");
        assert_eq!(parsed.tool_version, "0.1.0-test");
        assert_eq!(parsed.topics.len(), 1);
    }
}
