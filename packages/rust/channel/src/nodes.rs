//! Typed content nodes for the channel tree.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use scormchef_shared::ChannelConfig;

/// Category labels attached to every node in this channel.
pub const CATEGORIES: [&str; 5] = [
    "technical_and_vocational_training",
    "entrepreneurship",
    "financial_literacy",
    "professional_skills",
    "work",
];

// ---------------------------------------------------------------------------
// ChannelInfo / License
// ---------------------------------------------------------------------------

/// Channel-level metadata recorded at the root of the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Source domain the channel is attributed to.
    pub source_domain: String,
    /// Stable channel source identifier.
    pub source_id: String,
    /// Channel display title.
    pub title: String,
    /// Channel language code.
    pub language: String,
    /// Channel description.
    pub description: String,
    /// Channel thumbnail file name, resolved against the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl From<&ChannelConfig> for ChannelInfo {
    fn from(config: &ChannelConfig) -> Self {
        Self {
            source_domain: config.source_domain.clone(),
            source_id: config.source_id.clone(),
            title: config.title.clone(),
            language: config.language.clone(),
            description: config.description.clone(),
            thumbnail: Some(config.thumbnail.clone()),
        }
    }
}

/// License attached to every content node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// License identifier (e.g. `CC BY-SA`).
    pub license_id: String,
    /// Copyright holder recorded with the license.
    pub copyright_holder: String,
}

impl From<&ChannelConfig> for License {
    fn from(config: &ChannelConfig) -> Self {
        Self {
            license_id: config.license_id.clone(),
            copyright_holder: config.copyright_holder.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// A course topic grouping lesson apps and document handouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicNode {
    /// Stable source identifier (`<course_slug>_id`).
    pub source_id: String,
    /// Display title.
    pub title: String,
    /// Language code inherited from the channel.
    pub language: String,
    /// Category labels.
    pub categories: Vec<String>,
    /// Topic thumbnail, when one exists on disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<PathBuf>,
    /// Child nodes in display order: lesson apps first, then documents.
    pub children: Vec<ContentNode>,
}

/// A leaf content node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentNode {
    Html5App(Html5AppNode),
    Document(DocumentNode),
}

/// A staged lesson published as an HTML5 app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Html5AppNode {
    /// Stable source identifier (`<course_slug>_<lesson_slug>_id`).
    pub source_id: String,
    /// Display title.
    pub title: String,
    /// Language code inherited from the channel.
    pub language: String,
    /// Category labels.
    pub categories: Vec<String>,
    /// License for this node.
    pub license: License,
    /// Path of the packaged lesson archive.
    pub zip_path: PathBuf,
    /// SHA-256 of the archive, for upload-side deduplication.
    pub zip_sha256: String,
}

/// A PDF handout published as a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentNode {
    /// Stable source identifier (`<course_slug>_<file_name>_id`, spaces
    /// replaced with underscores).
    pub source_id: String,
    /// Display title (the file name).
    pub title: String,
    /// Language code inherited from the channel.
    pub language: String,
    /// Category labels.
    pub categories: Vec<String>,
    /// License for this node.
    pub license: License,
    /// Path of the PDF on disk.
    pub pdf_path: PathBuf,
}
