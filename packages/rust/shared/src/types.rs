//! Core domain types for scormchef course ingestion.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChefError, Result};

// ---------------------------------------------------------------------------
// LessonSpec
// ---------------------------------------------------------------------------

/// A single lesson inside a course, as declared in `course_data.json`.
///
/// Immutable input: the staging pipeline reads these fields and never writes
/// them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonSpec {
    /// Output directory name for the staged lesson.
    pub slug: String,
    /// Display title shown on the content platform.
    pub title: String,
    /// Name of the source course folder the SCORM export was extracted to.
    pub file: String,
    /// Route fragment used for in-page navigation (`#/lessons/<route>`).
    pub route: String,
    /// Relative asset paths to delete from the staged `assets/` directory.
    #[serde(default)]
    pub remove_assets: Vec<String>,
}

// ---------------------------------------------------------------------------
// CourseSpec
// ---------------------------------------------------------------------------

/// A course: a titled group of lessons plus optional PDF handouts on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSpec {
    /// Display title; also the source of the course directory slug.
    pub title: String,
    /// Optional thumbnail file name, resolved against the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Lessons in display order.
    pub lessons: Vec<LessonSpec>,
}

impl CourseSpec {
    /// Directory slug for this course: lowercased title, spaces replaced
    /// with underscores.
    pub fn slug(&self) -> String {
        course_slug(&self.title)
    }
}

/// Derive a course directory slug from a display title.
pub fn course_slug(title: &str) -> String {
    title.to_lowercase().replace(' ', "_")
}

// ---------------------------------------------------------------------------
// CourseData
// ---------------------------------------------------------------------------

/// Root structure of `course_data.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseData {
    /// Courses in channel display order.
    pub courses: Vec<CourseSpec>,
}

impl CourseData {
    /// Check structural invariants that serde cannot express.
    ///
    /// Slugs, source folders, and routes must be non-empty, and slugs must be
    /// unique (courses globally, lessons within their course).
    pub fn validate(&self) -> Result<()> {
        let mut course_slugs = HashSet::new();

        for course in &self.courses {
            if course.title.trim().is_empty() {
                return Err(ChefError::validation("course title must not be empty"));
            }
            let slug = course.slug();
            if !course_slugs.insert(slug.clone()) {
                return Err(ChefError::validation(format!(
                    "duplicate course slug: {slug}"
                )));
            }

            let mut lesson_slugs = HashSet::new();
            for lesson in &course.lessons {
                for (field, value) in [
                    ("slug", &lesson.slug),
                    ("file", &lesson.file),
                    ("route", &lesson.route),
                ] {
                    if value.trim().is_empty() {
                        return Err(ChefError::validation(format!(
                            "lesson {field} must not be empty (course {slug})"
                        )));
                    }
                }
                if !lesson_slugs.insert(lesson.slug.clone()) {
                    return Err(ChefError::validation(format!(
                        "duplicate lesson slug {} in course {slug}",
                        lesson.slug
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Load and validate course data from a JSON file.
pub fn load_course_data(path: &Path) -> Result<CourseData> {
    let content = std::fs::read_to_string(path).map_err(|e| ChefError::io(path, e))?;

    let data: CourseData = serde_json::from_str(&content).map_err(|e| {
        ChefError::validation(format!("invalid course data {}: {e}", path.display()))
    })?;

    data.validate()?;
    tracing::debug!(
        path = %path.display(),
        courses = data.courses.len(),
        "course data loaded"
    );

    Ok(data)
}
