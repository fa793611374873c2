//! Related-posts recommendation: additive scoring over a bounded,
//! recency-biased candidate pool.

use std::collections::BTreeSet;
use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::posts::ParsedPost;

pub const DEFAULT_RELATED_LIMIT: u32 = 6;

/// Candidates fetched per requested result. Keeps the scoring pass bounded
/// by the limit rather than by the size of the published set; very old
/// strong matches beyond the window are never surfaced.
const CANDIDATE_POOL_FACTOR: u32 = 4;

/// Publication within this window earns the flat freshness bonus.
const RECENCY_WINDOW: Duration = Duration::days(30);

const SHARED_CATEGORY_WEIGHT: i64 = 3;
const FEATURED_BONUS: i64 = 2;
const RECENCY_BONUS: i64 = 1;

#[derive(Clone)]
pub struct RelatedPostsService {
    reader: Arc<dyn PostsRepo>,
}

impl RelatedPostsService {
    pub fn new(reader: Arc<dyn PostsRepo>) -> Self {
        Self { reader }
    }

    /// Rank published siblings of `source` and return at most `limit`,
    /// best first. An empty pool is a valid outcome, not an error.
    pub async fn related_to(
        &self,
        source: &ParsedPost,
        limit: u32,
    ) -> Result<Vec<ParsedPost>, RepoError> {
        metrics::counter!("stanza_related_query_total").increment(1);

        let pool_size = limit.saturating_mul(CANDIDATE_POOL_FACTOR);
        let records = self
            .reader
            .list_published(&source.locale, Some(&source.post_id), pool_size)
            .await?;

        if records.is_empty() {
            return Ok(Vec::new());
        }

        let now = OffsetDateTime::now_utc();
        let mut scored: Vec<(i64, ParsedPost)> = records
            .into_iter()
            .map(ParsedPost::from_record)
            .map(|candidate| {
                let score = score_candidate(&source.categories, &candidate, now);
                (score, candidate)
            })
            .collect();

        rank(&mut scored);
        scored.truncate(limit as usize);

        debug!(
            target = "stanza::application::related",
            post_id = %source.post_id,
            locale = %source.locale,
            results = scored.len(),
            "ranked related posts"
        );

        Ok(scored.into_iter().map(|(_, candidate)| candidate).collect())
    }
}

/// Additive relevance score: shared categories dominate, featured posts get
/// a flat boost, and publication inside the recency window adds one.
fn score_candidate(
    source_categories: &BTreeSet<String>,
    candidate: &ParsedPost,
    now: OffsetDateTime,
) -> i64 {
    let shared = candidate
        .categories
        .intersection(source_categories)
        .count() as i64;
    let mut score = shared * SHARED_CATEGORY_WEIGHT;

    if candidate.featured {
        score += FEATURED_BONUS;
    }

    if let Some(published_at) = candidate.published_at
        && now - published_at < RECENCY_WINDOW
    {
        score += RECENCY_BONUS;
    }

    score
}

/// Score descending, then publish timestamp descending. An undated post
/// sorts after every dated one at equal score (`None` orders below `Some`).
fn rank(scored: &mut [(i64, ParsedPost)]) {
    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| b.1.published_at.cmp(&a.1.published_at))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blocks::ContentBlock;
    use time::macros::datetime;

    fn candidate(
        post_id: &str,
        categories: &[&str],
        featured: bool,
        published_at: Option<OffsetDateTime>,
    ) -> ParsedPost {
        ParsedPost {
            id: format!("{post_id}_en"),
            post_id: post_id.to_string(),
            locale: "en".to_string(),
            slug: post_id.to_string(),
            title: post_id.to_string(),
            excerpt: None,
            content: Vec::<ContentBlock>::new(),
            categories: categories.iter().map(|slug| slug.to_string()).collect(),
            cover_image: None,
            featured,
            published: true,
            author_name: "Ada".to_string(),
            badge_text: None,
            badge_color: None,
            published_at,
            created_at: datetime!(2026-01-01 00:00 UTC),
            updated_at: datetime!(2026-01-01 00:00 UTC),
        }
    }

    fn source_categories(slugs: &[&str]) -> BTreeSet<String> {
        slugs.iter().map(|slug| slug.to_string()).collect()
    }

    #[test]
    fn shared_categories_outweigh_featured() {
        let now = datetime!(2026-06-01 00:00 UTC);
        let source = source_categories(&["go", "rust"]);
        let old = Some(datetime!(2025-01-01 00:00 UTC));

        let both = candidate("a", &["go", "rust"], false, old);
        let one_featured = candidate("b", &["go"], true, old);

        assert_eq!(score_candidate(&source, &both, now), 6);
        assert_eq!(score_candidate(&source, &one_featured, now), 5);
    }

    #[test]
    fn recency_bonus_uses_a_thirty_day_window() {
        let now = datetime!(2026-06-30 12:00 UTC);
        let source = source_categories(&[]);

        let fresh = candidate("a", &[], false, Some(now - Duration::days(29)));
        let stale = candidate("b", &[], false, Some(now - Duration::days(31)));

        assert_eq!(score_candidate(&source, &fresh, now), 1);
        assert_eq!(score_candidate(&source, &stale, now), 0);
    }

    #[test]
    fn equal_scores_rank_newer_first_and_undated_last() {
        let newer = candidate("a", &[], false, Some(datetime!(2026-03-01 00:00 UTC)));
        let older = candidate("b", &[], false, Some(datetime!(2026-01-01 00:00 UTC)));
        let undated = candidate("c", &[], false, None);

        let mut scored = vec![(0, undated), (0, older), (0, newer)];
        rank(&mut scored);

        let order: Vec<&str> = scored
            .iter()
            .map(|(_, post)| post.post_id.as_str())
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }
}
