//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{CategoryRecord, PostTranslationRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Write parameters for one translation row. `content` is already the
/// serialized document and `categories` the comma-joined set; the service
/// layer owns both encodings.
#[derive(Debug, Clone)]
pub struct UpsertTranslation {
    pub id: String,
    pub post_id: String,
    pub locale: String,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub categories: Option<String>,
    pub cover_image: Option<String>,
    pub featured: bool,
    pub published: bool,
    pub author_name: String,
    pub badge_text: Option<String>,
    pub badge_color: Option<String>,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn find_by_slug(
        &self,
        locale: &str,
        slug: &str,
    ) -> Result<Option<PostTranslationRecord>, RepoError>;

    /// Published translations for a locale, most recent first
    /// (`published_at` descending, nulls last, then `created_at`).
    async fn list_published(
        &self,
        locale: &str,
        exclude_post_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<PostTranslationRecord>, RepoError>;

    /// Every translation row regardless of publication state, for the
    /// admin listing. Ordered by `updated_at` descending.
    async fn list_translations(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<PostTranslationRecord>, RepoError>;

    async fn count_translations(&self) -> Result<u64, RepoError>;

    async fn health(&self) -> Result<(), RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    /// Insert or update every row in one transaction. Either all
    /// translations land or none do.
    async fn upsert_translations(&self, rows: Vec<UpsertTranslation>) -> Result<(), RepoError>;

    /// Remove all translations of a logical post. Returns the number of
    /// rows deleted.
    async fn delete_post(&self, post_id: &str) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    async fn list_all(&self) -> Result<Vec<CategoryRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepoError>;

    async fn create(&self, slug: &str, name: &str) -> Result<CategoryRecord, RepoError>;

    async fn delete(&self, slug: &str) -> Result<(), RepoError>;
}
