//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use scormchef_channel::{ChannelInfo, License};
use scormchef_core::{ChefRunConfig, ChefRunResult, ProgressReporter, run_chef};
use scormchef_shared::{AppConfig, init_config, load_config, load_course_data};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// scormchef — repackage SCORM course exports into a publishable channel.
#[derive(Parser)]
#[command(
    name = "scormchef",
    version,
    about = "Repackage SCORM course exports into lesson apps and a channel manifest.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the full pipeline: extract, stage, package, write the manifest.
    Run {
        /// Working directory (defaults to the configured one).
        #[arg(short, long)]
        workdir: Option<String>,

        /// Course data JSON file (defaults to <workdir>/course_data.json).
        #[arg(short, long)]
        course_data: Option<String>,
    },

    /// Stage the lessons of one course without packaging or publishing.
    Stage {
        /// Course slug (lowercased title with underscores).
        course: String,

        /// Stage only this lesson slug instead of the whole course.
        #[arg(short, long)]
        lesson: Option<String>,

        /// Working directory (defaults to the configured one).
        #[arg(short, long)]
        workdir: Option<String>,

        /// Course data JSON file (defaults to <workdir>/course_data.json).
        #[arg(short, long)]
        course_data: Option<String>,
    },

    /// Package a single directory into a reproducible zip.
    Package {
        /// Directory to compress.
        dir: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "scormchef=info",
        1 => "scormchef=debug",
        _ => "scormchef=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            workdir,
            course_data,
        } => cmd_run(workdir.as_deref(), course_data.as_deref()),
        Command::Stage {
            course,
            lesson,
            workdir,
            course_data,
        } => cmd_stage(
            &course,
            lesson.as_deref(),
            workdir.as_deref(),
            course_data.as_deref(),
        ),
        Command::Package { dir } => cmd_package(&dir),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

/// Resolve working directory and course data path from config + flags.
fn resolve_inputs(
    config: &AppConfig,
    workdir: Option<&str>,
    course_data: Option<&str>,
) -> (PathBuf, PathBuf) {
    let workdir = PathBuf::from(workdir.unwrap_or(&config.defaults.workdir));
    let course_data_path = match course_data {
        Some(p) => PathBuf::from(p),
        None => workdir.join(&config.defaults.course_data),
    };
    (workdir, course_data_path)
}

fn cmd_run(workdir: Option<&str>, course_data: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let (workdir, course_data_path) = resolve_inputs(&config, workdir, course_data);
    let data = load_course_data(&course_data_path)?;

    let run_config = ChefRunConfig {
        workdir,
        max_image_height: config.defaults.max_image_height,
        channel: ChannelInfo::from(&config.channel),
        license: License::from(&config.channel),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    info!(
        workdir = %run_config.workdir.display(),
        courses = data.courses.len(),
        "starting chef run"
    );

    let reporter = CliProgress::new();
    let result = run_chef(&run_config, &data, &reporter)?;

    println!();
    println!("  Chef run complete!");
    println!("  Archives extracted: {}", result.archives_extracted);
    println!("  Lessons staged:     {}", result.lessons_staged);
    println!("  Lessons skipped:    {}", result.lessons_skipped);
    println!("  Lessons packaged:   {}", result.lessons_packaged);
    println!("  Manifest:           {}", result.manifest_path.display());
    println!("  Time:               {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_stage(
    course: &str,
    lesson: Option<&str>,
    workdir: Option<&str>,
    course_data: Option<&str>,
) -> Result<()> {
    let config = load_config()?;
    let (workdir, course_data_path) = resolve_inputs(&config, workdir, course_data);
    let data = load_course_data(&course_data_path)?;

    let course_spec = data
        .courses
        .iter()
        .find(|c| c.slug() == course)
        .ok_or_else(|| eyre!("no course with slug '{course}' in {}", course_data_path.display()))?;

    let lessons: Vec<_> = course_spec
        .lessons
        .iter()
        .filter(|l| lesson.is_none_or(|slug| l.slug == slug))
        .collect();
    if lessons.is_empty() {
        return Err(match lesson {
            Some(slug) => eyre!("no lesson with slug '{slug}' in course '{course}'"),
            None => eyre!("course '{course}' has no lessons"),
        });
    }

    let mut staged = 0;
    let mut skipped = 0;
    for spec in lessons {
        let lesson_dir = workdir.join(course).join(&spec.slug);
        if lesson_dir.exists() {
            println!("  {} already staged, skipping", spec.slug);
            skipped += 1;
            continue;
        }
        scormchef_staging::stage_lesson(
            spec,
            &workdir,
            &lesson_dir,
            config.defaults.max_image_height,
        )?;
        println!("  {} staged at {}", spec.slug, lesson_dir.display());
        staged += 1;
    }

    println!();
    println!("  Staged: {staged}  Skipped: {skipped}");
    Ok(())
}

fn cmd_package(dir: &str) -> Result<()> {
    let archive = scormchef_packaging::package_deterministic(&PathBuf::from(dir))?;

    println!();
    println!("  Archive: {}", archive.path.display());
    println!("  SHA-256: {}", archive.sha256);
    println!("  Size:    {} bytes", archive.size_bytes);
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Created {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let rendered = toml::to_string_pretty(&config)?;
    println!("{rendered}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn lesson_staged(&self, course: &str, lesson: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Staging [{current}/{total}] {course}/{lesson}"));
    }

    fn lesson_packaged(&self, lesson: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Packaging [{current}/{total}] {lesson}"));
    }

    fn done(&self, _result: &ChefRunResult) {
        self.spinner.finish_and_clear();
    }
}
