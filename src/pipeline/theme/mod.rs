//! Theme extraction: composite rules, curated mapping, heuristic fallback
//! and the invalid-theme filter.

pub mod curated;
pub mod extractor;
pub mod fallback;
pub mod filter;

pub use extractor::ThemeExtractor;
pub use filter::reject_reason;
