//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// One stored row per (post_id, locale). `id` is the concatenation
/// `{post_id}_{locale}`; all rows sharing a `post_id` are translations of
/// the same logical post.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PostTranslationRecord {
    pub id: String,
    pub post_id: String,
    pub locale: String,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    /// Serialized content-block document (JSON text).
    pub content: String,
    /// Comma-joined category slugs.
    pub categories: Option<String>,
    pub cover_image: Option<String>,
    pub featured: bool,
    pub published: bool,
    pub author_name: String,
    pub badge_text: Option<String>,
    pub badge_color: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CategoryRecord {
    pub slug: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
