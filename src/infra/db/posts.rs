use async_trait::async_trait;

use crate::application::repos::{PostsRepo, PostsWriteRepo, RepoError, UpsertTranslation};
use crate::domain::entities::PostTranslationRecord;

use super::{PostgresRepositories, map_sqlx_error};

const TRANSLATION_COLUMNS: &str = "id, post_id, locale, slug, title, excerpt, content, \
     categories, cover_image, featured, published, author_name, badge_text, badge_color, \
     published_at, created_at, updated_at";

/// Insert-or-replace for one translation row. The publish timestamp is
/// stamped on first publish, preserved on republish, and cleared when a
/// post goes back to draft.
const UPSERT_TRANSLATION_SQL: &str = "INSERT INTO post_translations (\
         id, post_id, locale, slug, title, excerpt, content, categories, cover_image, \
         featured, published, author_name, badge_text, badge_color, published_at, \
         created_at, updated_at) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
         CASE WHEN $11 THEN now() END, now(), now()) \
     ON CONFLICT (id) DO UPDATE SET \
         post_id = EXCLUDED.post_id, \
         locale = EXCLUDED.locale, \
         slug = EXCLUDED.slug, \
         title = EXCLUDED.title, \
         excerpt = EXCLUDED.excerpt, \
         content = EXCLUDED.content, \
         categories = EXCLUDED.categories, \
         cover_image = EXCLUDED.cover_image, \
         featured = EXCLUDED.featured, \
         published = EXCLUDED.published, \
         author_name = EXCLUDED.author_name, \
         badge_text = EXCLUDED.badge_text, \
         badge_color = EXCLUDED.badge_color, \
         published_at = CASE \
             WHEN NOT EXCLUDED.published THEN NULL \
             ELSE COALESCE(post_translations.published_at, now()) \
         END, \
         updated_at = now()";

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn find_by_slug(
        &self,
        locale: &str,
        slug: &str,
    ) -> Result<Option<PostTranslationRecord>, RepoError> {
        let sql = format!(
            "SELECT {TRANSLATION_COLUMNS} FROM post_translations \
             WHERE locale = $1 AND slug = $2"
        );
        sqlx::query_as::<_, PostTranslationRecord>(&sql)
            .bind(locale)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn list_published(
        &self,
        locale: &str,
        exclude_post_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<PostTranslationRecord>, RepoError> {
        let sql = format!(
            "SELECT {TRANSLATION_COLUMNS} FROM post_translations \
             WHERE locale = $1 AND published \
               AND ($2::text IS NULL OR post_id <> $2) \
             ORDER BY published_at DESC NULLS LAST, created_at DESC \
             LIMIT $3"
        );
        sqlx::query_as::<_, PostTranslationRecord>(&sql)
            .bind(locale)
            .bind(exclude_post_id)
            .bind(i64::from(limit))
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn list_translations(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<PostTranslationRecord>, RepoError> {
        let sql = format!(
            "SELECT {TRANSLATION_COLUMNS} FROM post_translations \
             ORDER BY updated_at DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, PostTranslationRecord>(&sql)
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn count_translations(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_translations")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Self::convert_count(count)
    }

    async fn health(&self) -> Result<(), RepoError> {
        self.health_check().await.map_err(map_sqlx_error)
    }
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn upsert_translations(&self, rows: Vec<UpsertTranslation>) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        for row in rows {
            sqlx::query(UPSERT_TRANSLATION_SQL)
                .bind(&row.id)
                .bind(&row.post_id)
                .bind(&row.locale)
                .bind(&row.slug)
                .bind(&row.title)
                .bind(&row.excerpt)
                .bind(&row.content)
                .bind(&row.categories)
                .bind(&row.cover_image)
                .bind(row.featured)
                .bind(row.published)
                .bind(&row.author_name)
                .bind(&row.badge_text)
                .bind(&row.badge_color)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn delete_post(&self, post_id: &str) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM post_translations WHERE post_id = $1")
            .bind(post_id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }
}
