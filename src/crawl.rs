//! Crawl data: third-party snippets about a post's location and their
//! aggregate summary.
//!
//! There is no real crawler behind this; a mock provider fabricates
//! plausible snippets per provider so the rest of the pipeline (generation
//! context, plagiarism comparison) can be exercised end to end.

use crate::orm::crawl_sources::{self, Provider};
use crate::orm::crawl_summaries;
use chrono::Utc;
use rand::Rng;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, TransactionTrait};
use uuid::Uuid;

/// A snippet produced by the crawl provider, not yet persisted.
#[derive(Debug, Clone)]
pub struct MockSource {
    pub provider: Provider,
    pub source_url: Option<String>,
    pub snippet_text: String,
    pub rating: Option<f64>,
}

/// Aggregate of one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlDigest {
    pub total_count: i32,
    pub average_rating: Option<f64>,
    pub summary_text: String,
}

const NAVER_SNIPPETS: &[&str] = &[
    "{place} visit report - the atmosphere is great and the food was delicious. The interior is stylish enough to make photos worth taking.",
    "{place} is recommended! We went on a weekend and there was a wait, but it was worth it.",
    "Went to {place} for a weekday lunch. Good value and the staff were friendly.",
    "{place} - would absolutely return. The menu is varied and consistent in quality.",
    "{place} is perfect for a date. Quiet, with a pleasant mood throughout.",
];

const KAKAO_SNIPPETS: &[&str] = &[
    "{place} - great location and easy to reach. Parking was convenient too.",
    "{place} review: high service quality and good value for the price.",
    "{place} in one line: a place to revisit. The dessert in particular is recommended.",
    "{place} trip notes: a good spot to bring children, there is even a kids corner.",
    "{place} report: clean interior, tasty food, and reasonable prices all around.",
];

const GOOGLE_SNIPPETS: &[&str] = &[
    "Great experience at {place}. The atmosphere is wonderful and the food quality is excellent.",
    "{place} is a must-visit. Friendly staff and delicious menu options.",
    "Visited {place} last weekend. A bit crowded but worth the wait.",
    "{place} review: clean, well-organized, and great service. Highly recommended.",
    "{place} - one of the best spots in the area. Will definitely come back.",
];

const BLOG_SNIPPETS: &[&str] = &[
    "[{place} visit report] Went to the much-talked-about {place} today, and honestly it exceeded expectations. The mood, the food, the service - all of it was satisfying, and it is a place I want to visit again. Full notes with photos below.",
    "[Honest review] Is {place} worth the trip? I visited {place} recently, and just like on social media the interior is lovely and very photogenic. The menu is varied and tasty, though the weekend wait can run long, so a weekday visit is the better plan.",
];

/// Fabricate one crawl run's worth of sources: five each from the rated
/// providers plus two blog posts without ratings.
pub fn generate_mock_crawl_data(location_name: &str) -> Vec<MockSource> {
    let mut rng = rand::thread_rng();
    let mut sources = Vec::with_capacity(17);

    for (i, snippet) in NAVER_SNIPPETS.iter().enumerate() {
        sources.push(MockSource {
            provider: Provider::Naver,
            source_url: Some(format!("https://map.naver.com/place/{}", 1_000_001 + i)),
            snippet_text: snippet.replace("{place}", location_name),
            rating: Some(rng.gen_range(3.5..5.0)),
        });
    }

    for (i, snippet) in KAKAO_SNIPPETS.iter().enumerate() {
        sources.push(MockSource {
            provider: Provider::Kakao,
            source_url: Some(format!("https://place.map.kakao.com/{}", 2_000_001 + i)),
            snippet_text: snippet.replace("{place}", location_name),
            rating: Some(rng.gen_range(3.0..5.0)),
        });
    }

    for (i, snippet) in GOOGLE_SNIPPETS.iter().enumerate() {
        sources.push(MockSource {
            provider: Provider::Google,
            source_url: Some(format!("https://maps.google.com/place/{}", 3_000_001 + i)),
            snippet_text: snippet.replace("{place}", location_name),
            rating: Some(rng.gen_range(3.0..5.0)),
        });
    }

    for (i, snippet) in BLOG_SNIPPETS.iter().enumerate() {
        sources.push(MockSource {
            provider: Provider::Blog,
            source_url: Some(format!(
                "https://blog.example.com/reviewer{}/post{}",
                i + 1,
                4_000_001 + i
            )),
            snippet_text: snippet.replace("{place}", location_name),
            rating: None,
        });
    }

    sources
}

/// Aggregate a crawl run: source count, average rating over the rated
/// sources (rounded to one decimal), and a one-paragraph summary.
pub fn generate_mock_summary(location_name: &str, sources: &[MockSource]) -> CrawlDigest {
    let rated: Vec<f64> = sources.iter().filter_map(|s| s.rating).collect();
    let average_rating = if rated.is_empty() {
        None
    } else {
        let avg = rated.iter().sum::<f64>() / rated.len() as f64;
        Some((avg * 10.0).round() / 10.0)
    };

    let count_of = |p: Provider| sources.iter().filter(|s| s.provider == p).count();
    let rating_clause = match average_rating {
        Some(avg) => format!(" The average rating is {:.1} out of 5.", avg),
        None => String::new(),
    };

    CrawlDigest {
        total_count: sources.len() as i32,
        average_rating,
        summary_text: format!(
            "Collected {} sources about {}: {} from Naver, {} from Kakao, {} from Google, and {} blog posts.{} \
             Reviews skew positive, with the atmosphere and the service coming up repeatedly.",
            sources.len(),
            location_name,
            count_of(Provider::Naver),
            count_of(Provider::Kakao),
            count_of(Provider::Google),
            count_of(Provider::Blog),
            rating_clause,
        ),
    }
}

/// Persist a batch of sources in one transaction.
pub async fn insert_crawl_sources(
    db: &DatabaseConnection,
    user_id: i32,
    post_id: &str,
    sources: Vec<MockSource>,
) -> Result<Vec<crawl_sources::Model>, DbErr> {
    let now = Utc::now().timestamp_millis();
    let txn = db.begin().await?;
    let mut inserted = Vec::with_capacity(sources.len());

    for source in sources {
        let model = crawl_sources::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id),
            post_id: Set(post_id.to_owned()),
            provider: Set(source.provider),
            source_url: Set(source.source_url),
            snippet_text: Set(source.snippet_text),
            rating: Set(source.rating),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;
        inserted.push(model);
    }

    txn.commit().await?;
    Ok(inserted)
}

pub async fn list_crawl_sources(
    db: &DatabaseConnection,
    user_id: i32,
    post_id: &str,
) -> Result<Vec<crawl_sources::Model>, DbErr> {
    crawl_sources::Entity::find()
        .filter(crawl_sources::Column::UserId.eq(user_id))
        .filter(crawl_sources::Column::PostId.eq(post_id))
        .order_by_asc(crawl_sources::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn get_crawl_summary(
    db: &DatabaseConnection,
    user_id: i32,
    post_id: &str,
) -> Result<Option<crawl_summaries::Model>, DbErr> {
    crawl_summaries::Entity::find()
        .filter(crawl_summaries::Column::UserId.eq(user_id))
        .filter(crawl_summaries::Column::PostId.eq(post_id))
        .one(db)
        .await
}

/// One summary row per (user, post); an update keeps the row's id and
/// createdAt and replaces the aggregate fields. Same transactional
/// read-modify-write contract as the style profile upsert.
pub async fn upsert_crawl_summary(
    db: &DatabaseConnection,
    user_id: i32,
    post_id: &str,
    digest: &CrawlDigest,
) -> Result<crawl_summaries::Model, DbErr> {
    let txn = db.begin().await?;

    let existing = crawl_summaries::Entity::find()
        .filter(crawl_summaries::Column::UserId.eq(user_id))
        .filter(crawl_summaries::Column::PostId.eq(post_id))
        .one(&txn)
        .await?;

    match existing {
        Some(summary) => {
            let mut active: crawl_summaries::ActiveModel = summary.into();
            active.total_count = Set(digest.total_count);
            active.average_rating = Set(digest.average_rating);
            active.summary_text = Set(digest.summary_text.clone());
            active.update(&txn).await?;
        }
        None => {
            crawl_summaries::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                user_id: Set(user_id),
                post_id: Set(post_id.to_owned()),
                total_count: Set(digest.total_count),
                average_rating: Set(digest.average_rating),
                summary_text: Set(digest.summary_text.clone()),
                created_at: Set(Utc::now().timestamp_millis()),
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;

    get_crawl_summary(db, user_id, post_id)
        .await?
        .ok_or_else(|| DbErr::Custom("crawl summary upsert lost its row".to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_crawl_shape() {
        let sources = generate_mock_crawl_data("Test Place");
        assert_eq!(sources.len(), 17);
        assert_eq!(
            sources.iter().filter(|s| s.provider == Provider::Naver).count(),
            5
        );
        assert_eq!(
            sources.iter().filter(|s| s.provider == Provider::Blog).count(),
            2
        );
        for source in &sources {
            // Snippet CHECK constraint range.
            let len = source.snippet_text.chars().count();
            assert!((20..=2000).contains(&len), "snippet length {} out of range", len);
            if let Some(rating) = source.rating {
                assert!((0.0..=5.0).contains(&rating));
            }
            assert!(source.snippet_text.contains("Test Place"));
        }
        assert!(sources
            .iter()
            .filter(|s| s.provider == Provider::Blog)
            .all(|s| s.rating.is_none()));
    }

    #[test]
    fn test_mock_summary_aggregates() {
        let sources = generate_mock_crawl_data("Test Place");
        let digest = generate_mock_summary("Test Place", &sources);
        assert_eq!(digest.total_count, 17);
        let avg = digest.average_rating.expect("rated sources present");
        assert!((3.0..=5.0).contains(&avg));
        // Rounded to one decimal place.
        assert!(((avg * 10.0).round() - avg * 10.0).abs() < 1e-9);
        assert!(digest.summary_text.contains("Test Place"));
        assert!(digest.summary_text.contains("17 sources"));
    }

    #[test]
    fn test_mock_summary_without_ratings() {
        let sources = vec![MockSource {
            provider: Provider::Blog,
            source_url: None,
            snippet_text: "A long enough snippet about a place.".to_string(),
            rating: None,
        }];
        let digest = generate_mock_summary("Somewhere", &sources);
        assert_eq!(digest.total_count, 1);
        assert!(digest.average_rating.is_none());
        assert!(!digest.summary_text.contains("average rating"));
    }
}
