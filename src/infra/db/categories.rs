use async_trait::async_trait;

use crate::application::repos::{CategoriesRepo, RepoError};
use crate::domain::entities::CategoryRecord;

use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl CategoriesRepo for PostgresRepositories {
    async fn list_all(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        sqlx::query_as::<_, CategoryRecord>(
            "SELECT slug, name, created_at FROM categories ORDER BY slug",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepoError> {
        sqlx::query_as::<_, CategoryRecord>(
            "SELECT slug, name, created_at FROM categories WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn create(&self, slug: &str, name: &str) -> Result<CategoryRecord, RepoError> {
        sqlx::query_as::<_, CategoryRecord>(
            "INSERT INTO categories (slug, name, created_at) \
             VALUES ($1, $2, now()) \
             RETURNING slug, name, created_at",
        )
        .bind(slug)
        .bind(name)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn delete(&self, slug: &str) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM categories WHERE slug = $1")
            .bind(slug)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
