//! Heuristic text analysis for generated drafts.
//!
//! Pure functions only; persistence of results lives in the repository
//! layer and orchestration in [`crate::generation`].

pub mod plagiarism;
pub mod seo;

pub use plagiarism::{check_plagiarism, PlagiarismResult, SourceSnippet};
pub use seo::{analyze_seo, SeoScores};
