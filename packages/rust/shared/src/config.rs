//! Application configuration for scormchef.
//!
//! User config lives at `~/.scormchef/scormchef.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ChefError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "scormchef.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".scormchef";

// ---------------------------------------------------------------------------
// Config structs (matching scormchef.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Channel metadata recorded in the manifest.
    #[serde(default)]
    pub channel: ChannelConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Working directory holding course archives and staged output.
    #[serde(default = "default_workdir")]
    pub workdir: String,

    /// Course data file name, resolved against the working directory.
    #[serde(default = "default_course_data")]
    pub course_data: String,

    /// Maximum height in pixels for staged raster assets.
    #[serde(default = "default_max_image_height")]
    pub max_image_height: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            workdir: default_workdir(),
            course_data: default_course_data(),
            max_image_height: default_max_image_height(),
        }
    }
}

fn default_workdir() -> String {
    "chefdata".into()
}
fn default_course_data() -> String {
    "course_data.json".into()
}
fn default_max_image_height() -> u32 {
    640
}

/// `[channel]` section.
///
/// Defaults describe the ILO "Start and Improve Your Business" channel this
/// chef was built for; other channels override them in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Source domain the channel is attributed to.
    #[serde(default = "default_source_domain")]
    pub source_domain: String,

    /// Stable channel source identifier.
    #[serde(default = "default_source_id")]
    pub source_id: String,

    /// Channel display title.
    #[serde(default = "default_channel_title")]
    pub title: String,

    /// Channel language code.
    #[serde(default = "default_language")]
    pub language: String,

    /// Channel description.
    #[serde(default = "default_description")]
    pub description: String,

    /// Channel thumbnail file name, resolved against the working directory.
    #[serde(default = "default_thumbnail")]
    pub thumbnail: String,

    /// License identifier applied to every content node.
    #[serde(default = "default_license_id")]
    pub license_id: String,

    /// Copyright holder recorded with the license.
    #[serde(default = "default_copyright_holder")]
    pub copyright_holder: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            source_domain: default_source_domain(),
            source_id: default_source_id(),
            title: default_channel_title(),
            language: default_language(),
            description: default_description(),
            thumbnail: default_thumbnail(),
            license_id: default_license_id(),
            copyright_holder: default_copyright_holder(),
        }
    }
}

fn default_source_domain() -> String {
    "https://www.ilo.org/empent/areas/start-and-improve-your-business/WCMS_751556/lang--en/index.htm".into()
}
fn default_source_id() -> String {
    "ilo-siyb".into()
}
fn default_channel_title() -> String {
    "ILO - Start and improve your business".into()
}
fn default_language() -> String {
    "en".into()
}
fn default_description() -> String {
    "The Start and Improve Your Business (SIYB) programme is a management-training \
     programme developed by the International Labour Organization (ILO) with a focus \
     on starting and improving small businesses as a strategy for creating more and \
     better employment for women and men, particularly in emerging economies."
        .into()
}
fn default_thumbnail() -> String {
    "ilo_siyb.png".into()
}
fn default_license_id() -> String {
    "CC BY-SA".into()
}
fn default_copyright_holder() -> String {
    "International Labour Organization".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.scormchef/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ChefError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.scormchef/scormchef.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ChefError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| ChefError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ChefError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ChefError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ChefError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
