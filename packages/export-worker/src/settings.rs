//! Per-job export settings.
//!
//! One fully-populated, immutable settings value per job: defaults are
//! filled at construction, overrides are applied through `with_*`
//! methods, and nothing is mutated after enqueue. Validation happens
//! once at the enqueue boundary, not scattered through the pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use youtube_client::Comment;

/// Output file format for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
    Json,
}

impl ExportFormat {
    /// File extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Json => "json",
        }
    }
}

/// How multiple keywords combine: at least one match, or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMode {
    #[default]
    Any,
    All,
}

/// Sort order applied after filtering. `None` preserves fetch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    None,
    LengthDesc,
    LengthAsc,
    LikesDesc,
    DateNew,
    DateOld,
}

/// A projectable comment field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Author,
    PublishedAt,
    LikeCount,
    Text,
    ReplyCount,
    CommentId,
    ParentId,
    VideoId,
}

impl Field {
    /// Every projectable field, in canonical order.
    pub const ALL: [Field; 8] = [
        Field::Author,
        Field::PublishedAt,
        Field::LikeCount,
        Field::Text,
        Field::ReplyCount,
        Field::CommentId,
        Field::ParentId,
        Field::VideoId,
    ];

    /// Column header / JSON key for the field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::PublishedAt => "published_at",
            Self::LikeCount => "like_count",
            Self::Text => "text",
            Self::ReplyCount => "reply_count",
            Self::CommentId => "comment_id",
            Self::ParentId => "parent_id",
            Self::VideoId => "video_id",
        }
    }

    /// Render the field of `comment` as text; absent values render empty.
    pub fn render(&self, comment: &Comment) -> String {
        match self {
            Self::Author => comment.author.clone(),
            Self::PublishedAt => comment.published_at.clone(),
            Self::LikeCount => comment.like_count.to_string(),
            Self::Text => comment.text.clone(),
            Self::ReplyCount => comment.reply_count.to_string(),
            Self::CommentId => comment.comment_id.clone(),
            Self::ParentId => comment.parent_id.clone().unwrap_or_default(),
            Self::VideoId => comment.video_id.clone(),
        }
    }

    /// Render the field with its native JSON type (counts stay numbers,
    /// an absent parent id stays null).
    pub fn to_value(&self, comment: &Comment) -> serde_json::Value {
        match self {
            Self::LikeCount => comment.like_count.into(),
            Self::ReplyCount => comment.reply_count.into(),
            Self::ParentId => comment
                .parent_id
                .clone()
                .map(serde_json::Value::String)
                .unwrap_or(serde_json::Value::Null),
            other => serde_json::Value::String(other.render(comment)),
        }
    }
}

/// Settings rejected at the enqueue boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("limit must be positive")]
    ZeroLimit,
    #[error("video id must not be empty")]
    EmptyVideoId,
    #[error("field selection must not be empty")]
    NoFields,
}

pub const DEFAULT_LIMIT: u32 = 200;

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_fields() -> Vec<Field> {
    vec![Field::Author, Field::PublishedAt, Field::LikeCount, Field::Text]
}

/// Fully-populated settings for one export job.
///
/// Serde defaults mirror the constructor, so a partial settings blob
/// from the enqueue interface deserializes into a complete value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    pub video_id: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub include_replies: bool,
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub keywords_mode: KeywordMode,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub min_len: Option<usize>,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default = "default_fields")]
    pub fields: Vec<Field>,
}

impl ExportSettings {
    /// Settings with every default filled in.
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            limit: DEFAULT_LIMIT,
            include_replies: false,
            format: ExportFormat::default(),
            keywords: Vec::new(),
            keywords_mode: KeywordMode::default(),
            case_sensitive: false,
            min_len: None,
            sort: SortKey::default(),
            fields: default_fields(),
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_include_replies(mut self, include_replies: bool) -> Self {
        self.include_replies = include_replies;
        self
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>, mode: KeywordMode) -> Self {
        self.keywords = keywords;
        self.keywords_mode = mode;
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = Some(min_len);
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    /// Validate the invariants the pipeline relies on.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.video_id.is_empty() {
            return Err(SettingsError::EmptyVideoId);
        }
        if self.limit == 0 {
            return Err(SettingsError::ZeroLimit);
        }
        if self.fields.is_empty() {
            return Err(SettingsError::NoFields);
        }
        Ok(())
    }
}
