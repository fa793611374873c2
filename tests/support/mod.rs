#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use stanza::application::categories::CategoryService;
use stanza::application::posts::PostService;
use stanza::application::related::RelatedPostsService;
use stanza::application::repos::{
    CategoriesRepo, PostsRepo, PostsWriteRepo, RepoError, UpsertTranslation,
};
use stanza::domain::entities::{CategoryRecord, PostTranslationRecord};
use stanza::infra::http::AppState;

/// In-memory stand-in for the Postgres repositories, including the
/// `published_at` lifecycle the upsert statement implements: first publish
/// stamps the clock, a republish keeps the original stamp, unpublishing
/// clears it.
#[derive(Default)]
pub struct MemoryRepositories {
    pub posts: Mutex<BTreeMap<String, PostTranslationRecord>>,
    pub categories: Mutex<BTreeMap<String, CategoryRecord>>,
}

impl MemoryRepositories {
    pub async fn seed_category(&self, slug: &str, name: &str) {
        self.categories.lock().await.insert(
            slug.to_string(),
            CategoryRecord {
                slug: slug.to_string(),
                name: name.to_string(),
                created_at: OffsetDateTime::now_utc(),
            },
        );
    }

    pub async fn seed_post(&self, record: PostTranslationRecord) {
        self.posts.lock().await.insert(record.id.clone(), record);
    }

    pub async fn translation(&self, id: &str) -> Option<PostTranslationRecord> {
        self.posts.lock().await.get(id).cloned()
    }

    pub async fn post_count(&self) -> usize {
        self.posts.lock().await.len()
    }
}

#[async_trait]
impl PostsRepo for MemoryRepositories {
    async fn find_by_slug(
        &self,
        locale: &str,
        slug: &str,
    ) -> Result<Option<PostTranslationRecord>, RepoError> {
        let posts = self.posts.lock().await;
        Ok(posts
            .values()
            .find(|record| record.locale == locale && record.slug == slug)
            .cloned())
    }

    async fn list_published(
        &self,
        locale: &str,
        exclude_post_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<PostTranslationRecord>, RepoError> {
        let posts = self.posts.lock().await;
        let mut matched: Vec<PostTranslationRecord> = posts
            .values()
            .filter(|record| record.locale == locale && record.published)
            .filter(|record| exclude_post_id.is_none_or(|id| record.post_id != id))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        matched.truncate(limit as usize);
        Ok(matched)
    }

    async fn list_translations(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<PostTranslationRecord>, RepoError> {
        let posts = self.posts.lock().await;
        let mut rows: Vec<PostTranslationRecord> = posts.values().cloned().collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_translations(&self) -> Result<u64, RepoError> {
        Ok(self.posts.lock().await.len() as u64)
    }

    async fn health(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait]
impl PostsWriteRepo for MemoryRepositories {
    async fn upsert_translations(&self, rows: Vec<UpsertTranslation>) -> Result<(), RepoError> {
        let now = OffsetDateTime::now_utc();
        let mut posts = self.posts.lock().await;
        for row in rows {
            let existing = posts.get(&row.id);
            let published_at = if row.published {
                existing
                    .and_then(|record| record.published_at)
                    .or(Some(now))
            } else {
                None
            };
            let created_at = existing.map(|record| record.created_at).unwrap_or(now);

            posts.insert(
                row.id.clone(),
                PostTranslationRecord {
                    id: row.id,
                    post_id: row.post_id,
                    locale: row.locale,
                    slug: row.slug,
                    title: row.title,
                    excerpt: row.excerpt,
                    content: row.content,
                    categories: row.categories,
                    cover_image: row.cover_image,
                    featured: row.featured,
                    published: row.published,
                    author_name: row.author_name,
                    badge_text: row.badge_text,
                    badge_color: row.badge_color,
                    published_at,
                    created_at,
                    updated_at: now,
                },
            );
        }
        Ok(())
    }

    async fn delete_post(&self, post_id: &str) -> Result<u64, RepoError> {
        let mut posts = self.posts.lock().await;
        let before = posts.len();
        posts.retain(|_, record| record.post_id != post_id);
        Ok((before - posts.len()) as u64)
    }
}

#[async_trait]
impl CategoriesRepo for MemoryRepositories {
    async fn list_all(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        Ok(self.categories.lock().await.values().cloned().collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepoError> {
        Ok(self.categories.lock().await.get(slug).cloned())
    }

    async fn create(&self, slug: &str, name: &str) -> Result<CategoryRecord, RepoError> {
        let mut categories = self.categories.lock().await;
        if categories.contains_key(slug) {
            return Err(RepoError::Duplicate {
                constraint: "categories_pkey".to_string(),
            });
        }
        let record = CategoryRecord {
            slug: slug.to_string(),
            name: name.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        categories.insert(slug.to_string(), record.clone());
        Ok(record)
    }

    async fn delete(&self, slug: &str) -> Result<(), RepoError> {
        let mut categories = self.categories.lock().await;
        if categories.remove(slug).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

pub fn post_service(repo: &Arc<MemoryRepositories>) -> PostService {
    PostService::new(repo.clone(), repo.clone(), repo.clone())
}

pub fn related_service(repo: &Arc<MemoryRepositories>) -> RelatedPostsService {
    RelatedPostsService::new(repo.clone())
}

pub fn app_state(repo: &Arc<MemoryRepositories>) -> AppState {
    AppState {
        posts: post_service(repo),
        related: related_service(repo),
        categories: CategoryService::new(repo.clone()),
        related_limit: 6,
    }
}

pub fn published_record(
    post_id: &str,
    locale: &str,
    categories: Option<&str>,
    featured: bool,
    published_at: Option<OffsetDateTime>,
) -> PostTranslationRecord {
    let created = published_at.unwrap_or(OffsetDateTime::UNIX_EPOCH);
    PostTranslationRecord {
        id: format!("{post_id}_{locale}"),
        post_id: post_id.to_string(),
        locale: locale.to_string(),
        slug: post_id.to_string(),
        title: post_id.to_string(),
        excerpt: None,
        content: "[]".to_string(),
        categories: categories.map(str::to_string),
        cover_image: None,
        featured,
        published: true,
        author_name: "Ada".to_string(),
        badge_text: None,
        badge_color: None,
        published_at,
        created_at: created,
        updated_at: created,
    }
}
