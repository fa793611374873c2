//! Post document shapes: the import/editing payload accepted by the admin
//! surface and the fully parsed read model handed to rendering.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::blocks::ContentBlock;
use crate::domain::document::{deserialize_document, parse_categories};
use crate::domain::entities::PostTranslationRecord;

/// The multi-locale editing document. One upsert carries every translation
/// of a logical post; cover image, flags and author are locale-independent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDocument {
    pub post_id: String,
    pub translations: Vec<PostTranslation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub published: bool,
    pub author_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTranslation {
    pub locale: String,
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub content: Vec<ContentBlock>,
    /// Category slugs; every slug must already be registered.
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_color: Option<String>,
}

/// Identity key of the stored row for one (post, locale) pair.
pub fn translation_key(post_id: &str, locale: &str) -> String {
    format!("{post_id}_{locale}")
}

/// A stored translation with its document and category set decoded. Content
/// decoding fails soft (see `domain::document`), so a corrupted row renders
/// as a post with empty content rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPost {
    pub id: String,
    pub post_id: String,
    pub locale: String,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: Vec<ContentBlock>,
    pub categories: BTreeSet<String>,
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

impl ParsedPost {
    pub fn from_record(record: PostTranslationRecord) -> Self {
        let content = deserialize_document(&record.content);
        let categories = parse_categories(record.categories.as_deref());

        Self {
            id: record.id,
            post_id: record.post_id,
            locale: record.locale,
            slug: record.slug,
            title: record.title,
            excerpt: record.excerpt,
            content,
            categories,
            cover_image: record.cover_image,
            featured: record.featured,
            published: record.published,
            author_name: record.author_name,
            badge_text: record.badge_text,
            badge_color: record.badge_color,
            published_at: record.published_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
