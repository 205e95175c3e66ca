//! SEO extractor and scorer
//!
//! Parses one HTML document into a metadata report and computes a
//! deterministic 0-100 score and letter grade from it.

mod extract;
mod score;

pub use extract::{extract_seo, try_extract_seo, OpenGraph, SeoError, SeoReport, TwitterCard};
pub use score::{compute_score, ScoreInputs, SeoGrade};
