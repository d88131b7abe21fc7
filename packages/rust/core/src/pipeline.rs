//! The chef run: extract → stage → package → channel manifest.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use scormchef_channel::{ChannelInfo, ChannelTree, LessonArtifact, License};
use scormchef_packaging::{extract_course_archives, package_deterministic};
use scormchef_shared::{CourseData, Result};
use scormchef_staging::stage_lesson;

/// File name of the channel manifest written into the working directory.
pub const MANIFEST_FILE_NAME: &str = "channel.json";

/// Configuration for a full chef run.
///
/// Everything the run needs is passed in explicitly; the pipeline reads no
/// global state and loads no files of its own.
#[derive(Debug, Clone)]
pub struct ChefRunConfig {
    /// Working directory holding course archives and staged output.
    pub workdir: PathBuf,
    /// Maximum height in pixels for staged raster assets.
    pub max_image_height: u32,
    /// Channel metadata recorded in the manifest.
    pub channel: ChannelInfo,
    /// License applied to every content node.
    pub license: License,
    /// Tool version string recorded in the manifest.
    pub tool_version: String,
}

/// Result of a chef run.
#[derive(Debug)]
pub struct ChefRunResult {
    /// Course archives extracted this run.
    pub archives_extracted: usize,
    /// Lessons staged this run.
    pub lessons_staged: usize,
    /// Lessons skipped because their directory already existed.
    pub lessons_skipped: usize,
    /// Lesson archives packaged.
    pub lessons_packaged: usize,
    /// Path of the written channel manifest.
    pub manifest_path: PathBuf,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a lesson is staged.
    fn lesson_staged(&self, course: &str, lesson: &str, current: usize, total: usize);
    /// Called before a lesson is packaged.
    fn lesson_packaged(&self, lesson: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &ChefRunResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn lesson_staged(&self, _course: &str, _lesson: &str, _current: usize, _total: usize) {}
    fn lesson_packaged(&self, _lesson: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &ChefRunResult) {}
}

/// Run the full chef pipeline.
///
/// 1. Extract `<workdir>/*.zip` course archives not yet extracted
/// 2. Stage every lesson whose output directory does not exist yet
/// 3. Package each staged lesson into a reproducible zip
/// 4. Build the channel tree and write the manifest
///
/// Processing is sequential and fail-fast: the first error aborts the run.
#[instrument(skip_all, fields(workdir = %config.workdir.display()))]
pub fn run_chef(
    config: &ChefRunConfig,
    data: &CourseData,
    progress: &dyn ProgressReporter,
) -> Result<ChefRunResult> {
    let start = Instant::now();
    info!(courses = data.courses.len(), "starting chef run");

    // --- Phase 1: course archives ---
    progress.phase("Extracting course archives");
    let archives_extracted = extract_course_archives(&config.workdir)?;

    // --- Phase 2: staging ---
    progress.phase("Staging lessons");
    let total: usize = data.courses.iter().map(|c| c.lessons.len()).sum();
    let mut lessons_staged = 0;
    let mut lessons_skipped = 0;
    let mut current = 0;

    for course in &data.courses {
        let course_slug = course.slug();
        for lesson in &course.lessons {
            current += 1;
            let lesson_dir = config.workdir.join(&course_slug).join(&lesson.slug);

            if lesson_dir.exists() {
                // Directory presence is the completion marker; a staged
                // lesson is never re-derived.
                info!(course = %course_slug, lesson = %lesson.slug, "already staged, skipping");
                lessons_skipped += 1;
                continue;
            }

            progress.lesson_staged(&course_slug, &lesson.slug, current, total);
            stage_lesson(lesson, &config.workdir, &lesson_dir, config.max_image_height)?;
            lessons_staged += 1;
        }
    }

    // --- Phase 3: packaging ---
    progress.phase("Packaging lessons");
    let mut artifacts: Vec<LessonArtifact> = Vec::with_capacity(total);
    let mut current = 0;

    for course in &data.courses {
        let course_slug = course.slug();
        for lesson in &course.lessons {
            current += 1;
            progress.lesson_packaged(&lesson.slug, current, total);

            let lesson_dir = config.workdir.join(&course_slug).join(&lesson.slug);
            let archive = package_deterministic(&lesson_dir)?;
            artifacts.push(LessonArtifact {
                course_slug: course_slug.clone(),
                lesson_slug: lesson.slug.clone(),
                zip_path: archive.path,
                zip_sha256: archive.sha256,
            });
        }
    }

    // --- Phase 4: channel manifest ---
    progress.phase("Building channel manifest");
    let channel: ChannelTree = scormchef_channel::build_channel(
        &config.channel,
        &config.license,
        data,
        &config.workdir,
        &artifacts,
        &config.tool_version,
    )?;
    let manifest_path = config.workdir.join(MANIFEST_FILE_NAME);
    scormchef_channel::write_manifest(&manifest_path, &channel)?;

    let result = ChefRunResult {
        archives_extracted,
        lessons_staged,
        lessons_skipped,
        lessons_packaged: artifacts.len(),
        manifest_path,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        archives_extracted = result.archives_extracted,
        lessons_staged = result.lessons_staged,
        lessons_skipped = result.lessons_skipped,
        lessons_packaged = result.lessons_packaged,
        elapsed_ms = result.elapsed.as_millis(),
        "chef run complete"
    );

    Ok(result)
}
