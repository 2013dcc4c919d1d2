pub mod categories;
pub mod crawl_sources;
pub mod crawl_summaries;
pub mod learning_samples;
pub mod monetization_tips;
pub mod photos;
pub mod plagiarism_checks;
pub mod post_versions;
pub mod posts;
pub mod seo_analyses;
pub mod sessions;
pub mod style_profiles;
pub mod subscriptions;
pub mod users;
