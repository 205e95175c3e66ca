//! URL handling module for Sumi-Scope
//!
//! This module provides input normalization, registrable-domain extraction
//! and the helpers the crawler uses to scope and deduplicate links.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, registrable_domain, site_key, strip_fragment};
pub use normalize::{apply_scheme, normalize_target, NormalizedTarget};
