//! Post read and write services.
//!
//! The upsert path is the only mutating entry point: it validates the whole
//! multi-locale document, checks every referenced category against the
//! registered set, and only then hands the encoded rows to the write
//! repository, which lands them in one transaction.

use std::collections::BTreeSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::info;

use crate::application::repos::{
    CategoriesRepo, PostsRepo, PostsWriteRepo, RepoError, UpsertTranslation,
};
use crate::domain::blocks::{BlockKind, ContentBlock, EmbedProvider, validate_document};
use crate::domain::document::{join_categories, serialize_document};
use crate::domain::error::DomainError;
use crate::domain::posts::{ParsedPost, PostDocument, translation_key};
use crate::domain::slug::is_valid_slug;

#[derive(Debug, Error)]
pub enum PostAdminError {
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),
    #[error("invalid slug `{slug}` in locale `{locale}`")]
    InvalidSlug { locale: String, slug: String },
    #[error("duplicate locale `{0}` in document")]
    DuplicateLocale(String),
    #[error("unknown categories: {}", .0.join(", "))]
    UnknownCategories(Vec<String>),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Inline-only sanitizer for paragraph rich text. Block-level structure
/// arrives as dedicated block types, never inside a paragraph.
static INLINE_SANITIZER: Lazy<ammonia::Builder<'static>> = Lazy::new(|| {
    let mut builder = ammonia::Builder::default();
    builder
        .tags(
            [
                "a", "b", "strong", "i", "em", "u", "s", "code", "mark", "span", "sub", "sup",
                "br",
            ]
            .into_iter()
            .collect(),
        )
        .link_rel(Some("noopener noreferrer"));
    builder
});

#[derive(Clone)]
pub struct PostService {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
    categories: Arc<dyn CategoriesRepo>,
}

impl PostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        categories: Arc<dyn CategoriesRepo>,
    ) -> Self {
        Self {
            reader,
            writer,
            categories,
        }
    }

    pub async fn health(&self) -> Result<(), RepoError> {
        self.reader.health().await
    }

    pub async fn find_published(
        &self,
        locale: &str,
        slug: &str,
    ) -> Result<Option<ParsedPost>, RepoError> {
        let record = self.reader.find_by_slug(locale, slug).await?;
        Ok(record
            .filter(|record| record.published)
            .map(ParsedPost::from_record))
    }

    pub async fn list_published(
        &self,
        locale: &str,
        limit: u32,
    ) -> Result<Vec<ParsedPost>, RepoError> {
        let records = self.reader.list_published(locale, None, limit).await?;
        Ok(records.into_iter().map(ParsedPost::from_record).collect())
    }

    /// Admin listing: every translation row, newest edits first, with the
    /// total row count for pagination.
    pub async fn list_all(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<(Vec<ParsedPost>, u64), RepoError> {
        let total = self.reader.count_translations().await?;
        let records = self.reader.list_translations(offset, limit).await?;
        let posts = records.into_iter().map(ParsedPost::from_record).collect();
        Ok((posts, total))
    }

    /// Validate and persist a whole multi-locale document. All rows land in
    /// one transaction or none do; any unknown category slug aborts the
    /// operation before a single write happens.
    pub async fn upsert_post(&self, document: PostDocument) -> Result<(), PostAdminError> {
        ensure_non_empty(&document.post_id, "postId")?;
        ensure_non_empty(&document.author_name, "authorName")?;
        if document.translations.is_empty() {
            return Err(PostAdminError::EmptyField("translations"));
        }

        let mut seen_locales: BTreeSet<&str> = BTreeSet::new();
        let mut referenced: BTreeSet<String> = BTreeSet::new();
        for translation in &document.translations {
            ensure_non_empty(&translation.locale, "locale")?;
            ensure_non_empty(&translation.title, "title")?;
            if !is_valid_slug(&translation.slug) {
                return Err(PostAdminError::InvalidSlug {
                    locale: translation.locale.clone(),
                    slug: translation.slug.clone(),
                });
            }
            if !seen_locales.insert(translation.locale.as_str()) {
                return Err(PostAdminError::DuplicateLocale(translation.locale.clone()));
            }
            validate_document(&translation.content)?;
            referenced.extend(translation.categories.iter().cloned());
        }

        let registered: BTreeSet<String> = self
            .categories
            .list_all()
            .await?
            .into_iter()
            .map(|category| category.slug)
            .collect();
        let unknown: Vec<String> = referenced.difference(&registered).cloned().collect();
        if !unknown.is_empty() {
            return Err(PostAdminError::UnknownCategories(unknown));
        }

        let translation_count = document.translations.len();
        let mut rows = Vec::with_capacity(translation_count);
        for translation in document.translations {
            let content = normalize_document(translation.content);
            let serialized = serialize_document(&content)?;
            let categories: BTreeSet<String> = translation.categories.into_iter().collect();

            rows.push(UpsertTranslation {
                id: translation_key(&document.post_id, &translation.locale),
                post_id: document.post_id.clone(),
                locale: translation.locale,
                slug: translation.slug,
                title: translation.title,
                excerpt: translation.excerpt,
                content: serialized,
                categories: join_categories(&categories),
                cover_image: document.cover_image.clone(),
                featured: document.featured,
                published: document.published,
                author_name: document.author_name.clone(),
                badge_text: translation.badge_text,
                badge_color: translation.badge_color,
            });
        }

        self.writer.upsert_translations(rows).await?;

        metrics::counter!("stanza_post_upsert_total").increment(1);
        info!(
            target = "stanza::application::posts",
            post_id = %document.post_id,
            translations = translation_count,
            published = document.published,
            "post upserted"
        );

        Ok(())
    }

    /// Remove every translation of a logical post.
    pub async fn delete_post(&self, post_id: &str) -> Result<(), PostAdminError> {
        let deleted = self.writer.delete_post(post_id).await?;
        if deleted == 0 {
            return Err(PostAdminError::Repo(RepoError::NotFound));
        }
        info!(
            target = "stanza::application::posts",
            post_id, deleted, "post deleted"
        );
        Ok(())
    }
}

fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), PostAdminError> {
    if value.trim().is_empty() {
        return Err(PostAdminError::EmptyField(field));
    }
    Ok(())
}

/// Run paragraph rich text through the inline sanitizer and fill in missing
/// embed providers from the URL host. Other block types carry plain strings
/// and render escaped, so they pass through untouched.
fn normalize_document(document: Vec<ContentBlock>) -> Vec<ContentBlock> {
    document
        .into_iter()
        .map(|block| match block.kind {
            BlockKind::Paragraph { content } => ContentBlock {
                id: block.id,
                kind: BlockKind::Paragraph {
                    content: INLINE_SANITIZER.clean(&content).to_string(),
                },
            },
            BlockKind::Embed {
                url,
                provider: None,
            } => {
                let provider = Some(EmbedProvider::classify(&url));
                ContentBlock {
                    id: block.id,
                    kind: BlockKind::Embed { url, provider },
                }
            }
            _ => block,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_script_but_keeps_inline_markup() {
        let document = vec![ContentBlock::new(
            "b1",
            BlockKind::Paragraph {
                content: "ok <strong>bold</strong> <script>alert(1)</script>".to_string(),
            },
        )];

        let sanitized = normalize_document(document);
        match &sanitized[0].kind {
            BlockKind::Paragraph { content } => {
                assert!(content.contains("<strong>bold</strong>"));
                assert!(!content.contains("script"));
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn missing_embed_provider_is_classified_from_the_host() {
        let document = vec![
            ContentBlock::new(
                "e1",
                BlockKind::Embed {
                    url: "https://www.youtube.com/watch?v=abc".to_string(),
                    provider: None,
                },
            ),
            ContentBlock::new(
                "e2",
                BlockKind::Embed {
                    url: "https://example.org/widget".to_string(),
                    provider: Some(EmbedProvider::Codepen),
                },
            ),
        ];

        let normalized = normalize_document(document);
        assert_eq!(
            normalized[0].kind,
            BlockKind::Embed {
                url: "https://www.youtube.com/watch?v=abc".to_string(),
                provider: Some(EmbedProvider::Youtube),
            }
        );
        // An explicit provider is trusted as sent.
        assert_eq!(
            normalized[1].kind,
            BlockKind::Embed {
                url: "https://example.org/widget".to_string(),
                provider: Some(EmbedProvider::Codepen),
            }
        );
    }

    #[test]
    fn sanitize_leaves_code_blocks_alone() {
        let document = vec![ContentBlock::new(
            "c1",
            BlockKind::Code {
                language: "html".to_string(),
                code: "<script>alert(1)</script>".to_string(),
                filename: None,
            },
        )];

        let sanitized = normalize_document(document);
        assert_eq!(
            sanitized[0].kind,
            BlockKind::Code {
                language: "html".to_string(),
                code: "<script>alert(1)</script>".to_string(),
                filename: None,
            }
        );
    }
}
