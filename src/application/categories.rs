//! Category registry management. Slugs created here gate what post
//! translations may reference (see `application::posts`).

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::repos::{CategoriesRepo, RepoError};
use crate::domain::entities::CategoryRecord;
use crate::domain::slug::{SlugError, derive_slug, is_valid_slug};

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),
    #[error("invalid category slug `{0}`")]
    InvalidSlug(String),
    #[error("category `{0}` already exists")]
    Duplicate(String),
    #[error("category not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoriesRepo>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoriesRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<CategoryRecord>, CategoryError> {
        Ok(self.repo.list_all().await?)
    }

    /// Register a category. When no slug is supplied one is derived from
    /// the display name; a supplied slug must already be canonical.
    pub async fn create(
        &self,
        slug: Option<String>,
        name: String,
    ) -> Result<CategoryRecord, CategoryError> {
        if name.trim().is_empty() {
            return Err(CategoryError::EmptyField("name"));
        }

        let slug = match slug {
            Some(slug) => {
                if !is_valid_slug(&slug) {
                    return Err(CategoryError::InvalidSlug(slug));
                }
                slug
            }
            None => derive_slug(&name).map_err(|err| match err {
                SlugError::EmptyInput => CategoryError::EmptyField("name"),
                SlugError::Unrepresentable { input } => CategoryError::InvalidSlug(input),
            })?,
        };

        let created = self
            .repo
            .create(&slug, name.trim())
            .await
            .map_err(|err| match err {
                RepoError::Duplicate { .. } => CategoryError::Duplicate(slug.clone()),
                other => CategoryError::Repo(other),
            })?;

        info!(
            target = "stanza::application::categories",
            slug = %created.slug,
            "category created"
        );
        Ok(created)
    }

    pub async fn delete(&self, slug: &str) -> Result<(), CategoryError> {
        match self.repo.delete(slug).await {
            Ok(()) => {
                info!(
                    target = "stanza::application::categories",
                    slug, "category deleted"
                );
                Ok(())
            }
            Err(RepoError::NotFound) => Err(CategoryError::NotFound),
            Err(other) => Err(CategoryError::Repo(other)),
        }
    }
}
